//! Conversation flow — node ids, the flow graph, node handlers and the
//! engine that walks the graph one node at a time.
//!
//! Each node runs its handler to completion, then the graph picks the next
//! node from the updated session state. Rejections and re-prompts are plain
//! graph edges back to a collect node.

pub mod engine;
pub mod graph;
pub mod handlers;
pub mod input;
pub mod node;
pub mod prompts;

pub use engine::{ConversationOutcome, EndReason, FlowEngine, NodeContext};
pub use graph::{FlowGraph, NextFn, NodeEntry};
pub use handlers::{FieldKind, NodeHandler, TerminalKind, Transition};
pub use node::NodeId;
