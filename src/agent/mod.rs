//! Agent module — one intake conversation per call.

pub mod intake;

pub use intake::{AgentDeps, IntakeAgent};
