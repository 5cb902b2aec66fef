//! Insurance eligibility — wire model, remote client, and the interpreter
//! that turns a response into a routing decision.
//!
//! The client never retries on its own; the retry budget lives in
//! `SessionState::retry_count` and is applied by `interpret` and
//! `Decision::from_failure`.

pub mod client;
pub mod interpreter;
pub mod model;

pub use client::{EligibilityProvider, HttpEligibilityClient};
pub use interpreter::{Decision, interpret};
pub use model::{
    BenefitInformation, EligibilityRequest, EligibilityResponse, PatientDetails, PlanStatus,
};
