//! Per-conversation session state.
//!
//! A `SessionState` is created once per call, owned exclusively by the flow
//! engine driving that call, and dropped when the call ends.

pub mod state;

pub use state::{FieldKey, HistoryEntry, NetworkStatus, SessionFlags, SessionState};
