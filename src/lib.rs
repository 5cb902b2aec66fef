//! Intake Agent — voice intake dialogue and insurance eligibility checks.

pub mod agent;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod flow;
pub mod session;
pub mod spellback;
pub mod voice;
