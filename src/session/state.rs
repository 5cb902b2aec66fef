//! Session record — collected fields, confirmation result, retry counter,
//! eligibility flags and the audit trail.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::eligibility::Decision;
use crate::flow::NodeId;

/// Keys of the values collected from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    FirstName,
    LastName,
    /// Date of birth exactly as the caller said it.
    DateOfBirthRaw,
    /// Date of birth normalized to `YYYYMMDD`.
    DateOfBirth,
    InsuranceId,
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::DateOfBirthRaw => "date_of_birth_raw",
            Self::DateOfBirth => "date_of_birth",
            Self::InsuranceId => "insurance_id",
        };
        write!(f, "{s}")
    }
}

/// Whether the provider is in the caller's plan network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NetworkStatus {
    InNetwork,
    OutOfNetwork,
    #[default]
    Unknown,
}

impl std::fmt::Display for NetworkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InNetwork => "in-network",
            Self::OutOfNetwork => "out-of-network",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Routing and eligibility flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionFlags {
    pub needs_representative: bool,
    pub retry_validation: bool,
    pub insurance_verified: bool,
    pub active_insurance: bool,
    pub has_office_coverage: bool,
    pub network_status: NetworkStatus,
    pub copay_amount: Option<Decimal>,
}

/// One audit trail record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub node: NodeId,
    pub label: String,
    pub value: String,
    pub at: DateTime<Utc>,
}

/// Mutable state of one conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Conversation identifier, also used as the room name.
    pub session_id: Uuid,
    /// Node currently being processed. Always a registered node.
    pub current_node: NodeId,
    pub flags: SessionFlags,
    fields: BTreeMap<FieldKey, String>,
    confirm: Option<bool>,
    retry_count: u32,
    history: Vec<HistoryEntry>,
}

impl SessionState {
    /// Fresh state positioned at the first node of the flow.
    pub fn new(session_id: Uuid) -> Self {
        Self {
            session_id,
            current_node: NodeId::START,
            flags: SessionFlags::default(),
            fields: BTreeMap::new(),
            confirm: None,
            retry_count: 0,
            history: Vec::new(),
        }
    }

    /// Collected value for `key`, if any.
    pub fn field(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        self.fields.insert(key, value.into());
    }

    pub fn clear_field(&mut self, key: FieldKey) {
        self.fields.remove(&key);
    }

    /// Result of the most recent read-back confirmation.
    pub fn confirm(&self) -> Option<bool> {
        self.confirm
    }

    pub fn set_confirm(&mut self, accepted: bool) {
        self.confirm = Some(accepted);
    }

    /// Consume the confirmation result, leaving it unset.
    pub fn take_confirm(&mut self) -> Option<bool> {
        self.confirm.take()
    }

    /// Number of eligibility attempts made so far.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Count an eligibility attempt about to be made and return the new
    /// total. The counter only moves up.
    pub fn increment_retry(&mut self) -> u32 {
        self.retry_count = self.retry_count.saturating_add(1);
        self.retry_count
    }

    /// Append to the audit trail.
    pub fn record(&mut self, node: NodeId, label: impl Into<String>, value: impl Into<String>) {
        self.history.push(HistoryEntry {
            node,
            label: label.into(),
            value: value.into(),
            at: Utc::now(),
        });
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Copy an eligibility decision into the flags.
    pub fn apply_decision(&mut self, decision: &Decision) {
        self.flags.needs_representative = decision.needs_representative;
        self.flags.retry_validation = decision.retry_validation;
        self.flags.insurance_verified = decision.is_valid;
        self.flags.active_insurance = decision.active_insurance;
        self.flags.has_office_coverage = decision.has_office_coverage;
        self.flags.network_status = decision.network_status;
        self.flags.copay_amount = decision.copay_amount;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_first_name() {
        let state = SessionState::new(Uuid::new_v4());
        assert_eq!(state.current_node, NodeId::CollectFirstName);
        assert_eq!(state.retry_count(), 0);
        assert!(state.confirm().is_none());
        assert!(state.history().is_empty());
        assert_eq!(state.flags, SessionFlags::default());
    }

    #[test]
    fn fields_set_and_clear() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.set_field(FieldKey::FirstName, "Anne");
        assert_eq!(state.field(FieldKey::FirstName), Some("Anne"));
        state.set_field(FieldKey::FirstName, "Anna");
        assert_eq!(state.field(FieldKey::FirstName), Some("Anna"));
        state.clear_field(FieldKey::FirstName);
        assert_eq!(state.field(FieldKey::FirstName), None);
    }

    #[test]
    fn take_confirm_resets() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.set_confirm(false);
        assert_eq!(state.take_confirm(), Some(false));
        assert_eq!(state.confirm(), None);
    }

    #[test]
    fn history_is_append_only() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.record(NodeId::CollectFirstName, "first_name", "Anna");
        state.record(NodeId::ConfirmFirstName, "confirm", "no");
        let labels: Vec<_> = state.history().iter().map(|h| h.label.as_str()).collect();
        assert_eq!(labels, ["first_name", "confirm"]);
        assert_eq!(state.history()[0].node, NodeId::CollectFirstName);
    }

    #[test]
    fn invalid_decision_sets_flags_only() {
        let mut state = SessionState::new(Uuid::new_v4());
        assert_eq!(state.increment_retry(), 1);
        let decision = Decision::invalid(1, "retry", "escalate");
        state.apply_decision(&decision);
        assert_eq!(state.retry_count(), 1);
        assert!(state.flags.retry_validation);
        assert!(!state.flags.insurance_verified);
    }

    #[test]
    fn valid_decision_keeps_retry() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.increment_retry();
        let decision = Decision {
            is_valid: true,
            active_insurance: true,
            has_office_coverage: true,
            network_status: NetworkStatus::InNetwork,
            copay_amount: Some(Decimal::from(25)),
            needs_representative: false,
            retry_validation: false,
            message: "ok".into(),
        };
        state.apply_decision(&decision);
        assert_eq!(state.retry_count(), 1);
        assert!(state.flags.insurance_verified);
        assert_eq!(state.flags.network_status, NetworkStatus::InNetwork);
        assert_eq!(state.flags.copay_amount, Some(Decimal::from(25)));
    }

    #[test]
    fn network_status_display_matches_serde() {
        for status in [
            NetworkStatus::InNetwork,
            NetworkStatus::OutOfNetwork,
            NetworkStatus::Unknown,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(format!("\"{status}\""), json);
        }
    }

    #[test]
    fn state_serde_roundtrip() {
        let mut state = SessionState::new(Uuid::new_v4());
        state.set_field(FieldKey::LastName, "Smith");
        state.increment_retry();
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.field(FieldKey::LastName), Some("Smith"));
        assert_eq!(parsed.retry_count(), 1);
        assert_eq!(parsed.session_id, state.session_id);
    }
}
