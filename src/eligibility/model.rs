//! Eligibility request/response wire types.
//!
//! Response types are lenient: every section is optional so that a sparse
//! payer response still decodes and the interpreter can decide what is
//! missing.

use serde::{Deserialize, Serialize};

use crate::config::{CONTROL_NUMBER, EligibilityConfig};

/// Health benefit plan coverage.
pub const SERVICE_TYPE_PLAN_COVERAGE: &str = "30";
/// Professional (physician) office visit.
pub const SERVICE_TYPE_OFFICE_VISIT: &str = "98";
/// Benefit code for a copayment.
pub const BENEFIT_CODE_COPAY: &str = "B";

/// Caller details needed for one eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDetails {
    pub first_name: String,
    pub last_name: String,
    pub insurance_id: String,
    /// `YYYYMMDD`.
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    pub control_number: String,
    pub trading_partner_service_id: String,
    pub provider: RequestProvider,
    pub subscriber: RequestSubscriber,
    pub encounter: RequestEncounter,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestProvider {
    pub organization_name: String,
    pub npi: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSubscriber {
    pub first_name: String,
    pub last_name: String,
    pub member_id: String,
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEncounter {
    pub service_type_codes: Vec<String>,
}

impl EligibilityRequest {
    /// Build the request body for `patient` using the configured provider.
    pub fn new(config: &EligibilityConfig, patient: &PatientDetails) -> Self {
        Self {
            control_number: CONTROL_NUMBER.to_string(),
            trading_partner_service_id: config.trading_partner_service_id.clone(),
            provider: RequestProvider {
                organization_name: config.provider_name.clone(),
                npi: config.provider_npi.clone(),
            },
            subscriber: RequestSubscriber {
                first_name: patient.first_name.clone(),
                last_name: patient.last_name.clone(),
                member_id: patient.insurance_id.clone(),
                date_of_birth: patient.date_of_birth.clone(),
            },
            encounter: RequestEncounter {
                service_type_codes: vec![SERVICE_TYPE_PLAN_COVERAGE.to_string()],
            },
        }
    }
}

/// 2xx response body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityResponse {
    #[serde(default)]
    pub subscriber: Option<serde_json::Value>,
    #[serde(default)]
    pub plan_status: Option<Vec<PlanStatus>>,
    #[serde(default)]
    pub benefits_information: Option<Vec<BenefitInformation>>,
    #[serde(default)]
    pub errors: Option<Vec<serde_json::Value>>,
}

impl EligibilityResponse {
    /// Whether a non-empty subscriber record is present.
    pub fn has_subscriber(&self) -> bool {
        match &self.subscriber {
            None | Some(serde_json::Value::Null) => false,
            Some(serde_json::Value::Object(map)) => !map.is_empty(),
            Some(serde_json::Value::Array(items)) => !items.is_empty(),
            Some(serde_json::Value::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    pub fn plan_status(&self) -> &[PlanStatus] {
        self.plan_status.as_deref().unwrap_or_default()
    }

    pub fn benefits(&self) -> &[BenefitInformation] {
        self.benefits_information.as_deref().unwrap_or_default()
    }

    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|e| !e.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanStatus {
    #[serde(default)]
    pub status_code: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub service_type_codes: Vec<String>,
}

impl PlanStatus {
    /// Active health benefit plan coverage entry.
    pub fn is_active_plan_coverage(&self) -> bool {
        self.service_type_codes
            .iter()
            .any(|c| c == SERVICE_TYPE_PLAN_COVERAGE)
            && (self.status.as_deref() == Some("Active Coverage")
                || self.status_code.as_deref() == Some("1"))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitInformation {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub service_type_codes: Vec<String>,
    /// Usually a decimal string, occasionally a bare number.
    #[serde(default)]
    pub benefit_amount: Option<serde_json::Value>,
    #[serde(default)]
    pub in_plan_network_indicator: Option<String>,
    #[serde(default)]
    pub in_plan_network_indicator_code: Option<String>,
}

impl BenefitInformation {
    /// Office visit copay entry.
    pub fn is_office_visit_copay(&self) -> bool {
        self.service_type_codes
            .iter()
            .any(|c| c == SERVICE_TYPE_OFFICE_VISIT)
            && self.code.as_deref() == Some(BENEFIT_CODE_COPAY)
    }

    /// Benefit amount as the payer sent it.
    pub fn benefit_amount_text(&self) -> Option<String> {
        match self.benefit_amount.as_ref()? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
