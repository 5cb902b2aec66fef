//! Eligibility interpreter — maps a response and the retry count to a
//! routing decision.
//!
//! Checks run in a fixed order and the first one that decides wins:
//! 1. subscriber record present
//! 2. plan status present
//! 3. no payer errors
//! 4. active plan coverage (service type 30)
//! 5. office visit copay (service type 98, code B)
//! 6. network indicator on that copay entry

use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::EligibilityError;
use crate::session::NetworkStatus;

use super::model::EligibilityResponse;

/// Highest attempt number (`retry_count`, counting the attempt being
/// judged) at which a failed attempt is still retried.
pub const MAX_RETRY_COUNT: u32 = 1;

/// Routing decision for one eligibility attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// The response could be evaluated at all.
    pub is_valid: bool,
    pub active_insurance: bool,
    pub has_office_coverage: bool,
    pub network_status: NetworkStatus,
    pub copay_amount: Option<Decimal>,
    pub needs_representative: bool,
    pub retry_validation: bool,
    /// What to tell the caller.
    pub message: String,
}

impl Decision {
    fn valid() -> Self {
        Self {
            is_valid: true,
            active_insurance: false,
            has_office_coverage: false,
            network_status: NetworkStatus::Unknown,
            copay_amount: None,
            needs_representative: false,
            retry_validation: false,
            message: String::new(),
        }
    }

    /// Invalid attempt: retry while `retry_count` is within budget,
    /// otherwise hand off to a representative.
    pub fn invalid(retry_count: u32, retry_message: &str, escalate_message: &str) -> Self {
        let retry = retry_count <= MAX_RETRY_COUNT;
        Self {
            is_valid: false,
            needs_representative: !retry,
            retry_validation: retry,
            message: if retry {
                retry_message.to_string()
            } else {
                escalate_message.to_string()
            },
            ..Self::valid()
        }
    }

    /// Decision for an attempt where the client reported a failure.
    ///
    /// Configuration failures escalate at once; everything else follows the
    /// same retry/escalate split as an invalid response.
    pub fn from_failure(error: &EligibilityError, retry_count: u32) -> Self {
        if error.is_configuration() {
            return Self {
                is_valid: false,
                needs_representative: true,
                message: "I'm sorry, our insurance verification system isn't configured right now. \
                          I'll connect you to a representative."
                    .to_string(),
                ..Self::valid()
            };
        }
        Self::invalid(
            retry_count,
            "Sorry, there was an error verifying your insurance information. Let's try again with your insurance details.",
            "I'm still unable to reach our insurance verification system. I'll connect you to a representative.",
        )
    }

    fn escalate(mut self, message: &str) -> Self {
        self.needs_representative = true;
        self.message = message.to_string();
        self
    }
}

/// Evaluate an eligibility response.
pub fn interpret(response: &EligibilityResponse, retry_count: u32) -> Decision {
    if !response.has_subscriber() {
        debug!(retry_count, "Eligibility response has no subscriber record");
        return Decision::invalid(
            retry_count,
            "I'm having trouble verifying your insurance. Let's try again with your insurance details.",
            "I wasn't able to validate your insurance after retrying. I'll connect you to a representative.",
        );
    }

    if response.plan_status().is_empty() {
        debug!(retry_count, "Eligibility response has no plan status");
        return Decision::invalid(
            retry_count,
            "I'm having trouble finding your plan information. Let's try again with your insurance details.",
            "I wasn't able to find your plan information after retrying. I'll connect you to a representative.",
        );
    }

    if response.has_errors() {
        debug!(retry_count, "Eligibility response carries payer errors");
        return Decision::invalid(
            retry_count,
            "There seems to be an issue with the insurance verification. Let's try again with your information.",
            "I'm still encountering errors verifying your insurance. I'll connect you to a representative.",
        );
    }

    let mut decision = Decision::valid();

    if !response
        .plan_status()
        .iter()
        .any(|p| p.is_active_plan_coverage())
    {
        return decision.escalate(
            "Your insurance appears to be inactive. I'll connect you to a representative.",
        );
    }
    decision.active_insurance = true;

    let Some(copay) = response.benefits().iter().find(|b| b.is_office_visit_copay()) else {
        return decision.escalate(
            "I couldn't find your coverage details for office visits. I'll transfer you to a representative.",
        );
    };
    decision.has_office_coverage = true;

    let amount_text = copay.benefit_amount_text();
    decision.copay_amount = amount_text
        .as_deref()
        .and_then(|a| Decimal::from_str(a).ok());

    let code = copay.in_plan_network_indicator_code.as_deref();
    let indicator = copay.in_plan_network_indicator.as_deref();

    if code == Some("Y") || indicator == Some("Yes") {
        decision.network_status = NetworkStatus::InNetwork;
        decision.message = match amount_text {
            Some(amount) => {
                format!("Your copay for in-network office visits is ${amount} dollars.")
            }
            None => "Your office visits are in-network, but your plan doesn't list a copay amount."
                .to_string(),
        };
    } else if code == Some("N") || indicator == Some("No") {
        decision.network_status = NetworkStatus::OutOfNetwork;
        decision.message =
            "You have office visit coverage, but this provider is out-of-network under your plan."
                .to_string();
    } else {
        decision.network_status = NetworkStatus::Unknown;
        decision = decision.escalate(
            "Your insurance doesn't specify if this provider is in-network. I'll connect you to a representative.",
        );
    }

    decision
}
