//! Error types for the intake agent.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::flow::NodeId;
use crate::session::FieldKey;

/// Top-level error type for the agent.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Eligibility error: {0}")]
    Eligibility(#[from] EligibilityError),

    #[error("Input error: {0}")]
    Input(#[from] InputParseError),

    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Failure categories reported by the eligibility client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EligibilityErrorKind {
    ConfigurationError,
    TransportError,
    Timeout,
    ApiError,
    JsonError,
}

impl std::fmt::Display for EligibilityErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ConfigurationError => "configuration_error",
            Self::TransportError => "transport_error",
            Self::Timeout => "timeout",
            Self::ApiError => "api_error",
            Self::JsonError => "json_error",
        };
        write!(f, "{s}")
    }
}

/// Reported (never raised) failures of a single eligibility attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EligibilityError {
    #[error("Eligibility API key is not configured")]
    Configuration,

    #[error("Eligibility request failed: {reason}")]
    Transport { reason: String },

    #[error("Eligibility request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Eligibility service returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse eligibility response: {reason}")]
    MalformedResponse { reason: String },
}

impl EligibilityError {
    /// Category of this failure.
    pub fn kind(&self) -> EligibilityErrorKind {
        match self {
            Self::Configuration => EligibilityErrorKind::ConfigurationError,
            Self::Transport { .. } => EligibilityErrorKind::TransportError,
            Self::Timeout { .. } => EligibilityErrorKind::Timeout,
            Self::Status { .. } => EligibilityErrorKind::ApiError,
            Self::MalformedResponse { .. } => EligibilityErrorKind::JsonError,
        }
    }

    /// Configuration failures abort before any network call and never retry.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration)
    }
}

/// Caller input that could not be turned into a usable field value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputParseError {
    #[error("Could not understand date of birth: {input:?}")]
    UnrecognizedDate { input: String },

    #[error("Date of birth {date} is out of range")]
    DateOutOfRange { date: String },

    #[error("Insurance ID {input:?} is invalid: {reason}")]
    InvalidInsuranceId { input: String, reason: String },
}

/// Voice I/O collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("Caller disconnected")]
    Disconnected,

    #[error("Failed to play prompt: {0}")]
    PlaybackFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session lifecycle (room) errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Failed to create room {room}: {reason}")]
    CreateFailed { room: String, reason: String },

    #[error("Failed to delete room {room}: {reason}")]
    DeleteFailed { room: String, reason: String },
}

/// Flow graph and engine errors.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Node {0} is not registered in the flow graph")]
    UnknownNode(NodeId),

    #[error("Node {0} is terminal but has targets, or non-terminal without any")]
    MisconfiguredNode(NodeId),

    #[error("Node {from} routes to unregistered node {to}")]
    DanglingEdge { from: NodeId, to: NodeId },

    #[error("Node requires field {0}, which has not been collected")]
    MissingField(FieldKey),

    #[error("Conversation exceeded step limit of {limit} transitions")]
    StepLimit { limit: usize },
}

/// Result type alias for the agent.
pub type Result<T> = std::result::Result<T, Error>;
