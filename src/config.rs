//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default eligibility endpoint (Stedi real-time eligibility, v3).
pub const DEFAULT_ELIGIBILITY_URL: &str =
    "https://healthcare.us.stedi.com/2024-04-01/change/medicalnetwork/eligibility/v3";

/// Control number sent with every eligibility request.
pub const CONTROL_NUMBER: &str = "112233445";

/// Remote eligibility service configuration.
#[derive(Debug, Clone)]
pub struct EligibilityConfig {
    /// POST endpoint for eligibility checks.
    pub url: String,
    /// API key sent as `Authorization: Key <key>`. `None` is reported as a
    /// configuration failure at check time, not at startup.
    pub api_key: Option<SecretString>,
    /// Payer identifier.
    pub trading_partner_service_id: String,
    /// Requesting provider organization.
    pub provider_name: String,
    /// Requesting provider NPI.
    pub provider_npi: String,
    /// Upper bound for a single eligibility call.
    pub timeout: Duration,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ELIGIBILITY_URL.to_string(),
            api_key: None,
            trading_partner_service_id: "60054".to_string(),
            provider_name: "Provider Name".to_string(),
            provider_npi: "1999999984".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl EligibilityConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_key = std::env::var("STEDI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::from);

        let timeout_secs: u64 = match std::env::var("ELIGIBILITY_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "ELIGIBILITY_TIMEOUT_SECS".into(),
                message: format!("expected whole seconds, got {raw:?}"),
            })?,
            Err(_) => defaults.timeout.as_secs(),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ELIGIBILITY_TIMEOUT_SECS".into(),
                message: "timeout must be at least one second".into(),
            });
        }

        Ok(Self {
            url: std::env::var("ELIGIBILITY_URL").unwrap_or(defaults.url),
            api_key,
            trading_partner_service_id: std::env::var("ELIGIBILITY_TRADING_PARTNER_ID")
                .unwrap_or(defaults.trading_partner_service_id),
            provider_name: std::env::var("ELIGIBILITY_PROVIDER_NAME")
                .unwrap_or(defaults.provider_name),
            provider_npi: std::env::var("ELIGIBILITY_PROVIDER_NPI")
                .unwrap_or(defaults.provider_npi),
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// What rejecting the last name does to the first name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LastNameRejection {
    /// Clear only the last name and ask for it again.
    #[default]
    Isolated,
    /// Clear both names and start over at the first name.
    RestartFromFirstName,
}

impl std::str::FromStr for LastNameRejection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolated" => Ok(Self::Isolated),
            "restart" | "restart_from_first_name" => Ok(Self::RestartFromFirstName),
            other => Err(ConfigError::InvalidValue {
                key: "INTAKE_LAST_NAME_REJECTION".into(),
                message: format!("expected `isolated` or `restart`, got {other:?}"),
            }),
        }
    }
}

/// Conversation flow configuration.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    /// Maximum node transitions before the engine gives up.
    pub max_transitions: usize,
    /// Rejection policy for the last-name confirm node.
    pub last_name_rejection: LastNameRejection,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_transitions: 200,
            last_name_rejection: LastNameRejection::default(),
        }
    }
}

impl FlowConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_transitions = match std::env::var("INTAKE_MAX_TRANSITIONS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INTAKE_MAX_TRANSITIONS".into(),
                message: format!("expected a positive integer, got {raw:?}"),
            })?,
            Err(_) => defaults.max_transitions,
        };

        let last_name_rejection = match std::env::var("INTAKE_LAST_NAME_REJECTION") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.last_name_rejection,
        };

        Ok(Self {
            max_transitions,
            last_name_rejection,
        })
    }
}

/// Agent configuration.
#[derive(Debug, Clone, Default)]
pub struct IntakeConfig {
    pub eligibility: EligibilityConfig,
    pub flow: FlowConfig,
}

impl IntakeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            eligibility: EligibilityConfig::from_env()?,
            flow: FlowConfig::from_env()?,
        })
    }
}
