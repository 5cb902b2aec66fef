//! Flow engine — walks the graph for one conversation.

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::eligibility::EligibilityProvider;
use crate::error::{Error, FlowError, VoiceError};
use crate::session::SessionState;
use crate::voice::{RoomLifecycle, VoiceIo};

use super::graph::FlowGraph;
use super::handlers::{NodeHandler, TerminalKind, Transition};
use super::node::NodeId;

/// Collaborators available to node handlers.
pub struct NodeContext<'a> {
    pub voice: &'a dyn VoiceIo,
    pub eligibility: &'a dyn EligibilityProvider,
    pub rooms: &'a dyn RoomLifecycle,
    pub flow: &'a FlowConfig,
}

impl NodeContext<'_> {
    /// Tear down the conversation's room. Failures are logged, never returned.
    pub async fn release_room(&self, session_id: Uuid) {
        let room = session_id.to_string();
        if let Err(e) = self.rooms.delete_room(&room).await {
            warn!(session_id = %session_id, error = %e, "Room teardown failed");
        }
    }
}

/// How a conversation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Reached `goodbye`.
    Completed,
    /// Reached `transfer_to_representative`.
    Transferred,
    /// The caller hung up before a terminal node.
    Disconnected,
}

/// Final result of a conversation.
#[derive(Debug, Clone)]
pub struct ConversationOutcome {
    pub reason: EndReason,
    /// Last node processed.
    pub last_node: NodeId,
    pub state: SessionState,
}

/// Drives one conversation through the flow graph.
///
/// Exactly one node is processed at a time; the next node is chosen only
/// after the current handler has finished mutating the state.
pub struct FlowEngine<'a> {
    graph: &'a FlowGraph,
    ctx: NodeContext<'a>,
}

impl<'a> FlowEngine<'a> {
    pub fn new(graph: &'a FlowGraph, ctx: NodeContext<'a>) -> Self {
        Self { graph, ctx }
    }

    /// Run from `state.current_node` until a terminal node, a hang-up, or
    /// an error. The room is released on every exit path.
    pub async fn run(&self, mut state: SessionState) -> Result<ConversationOutcome, Error> {
        let limit = self.ctx.flow.max_transitions;

        for _ in 0..limit {
            let node = state.current_node;
            let entry = match self.graph.get(node) {
                Some(entry) => entry,
                None => {
                    return self.abort(&mut state, FlowError::UnknownNode(node).into()).await;
                }
            };

            debug!(session_id = %state.session_id, node = %node, "Entering node");

            match entry.handler.on_enter(node, &mut state, &self.ctx).await {
                Ok(Transition::End) => return Ok(finished(node, state)),
                Ok(Transition::Advance) => {}
                Err(Error::Voice(VoiceError::Disconnected)) => {
                    info!(session_id = %state.session_id, node = %node, "Caller disconnected");
                    self.ctx.release_room(state.session_id).await;
                    return Ok(ConversationOutcome {
                        reason: EndReason::Disconnected,
                        last_node: node,
                        state,
                    });
                }
                Err(e) => return self.abort(&mut state, e).await,
            }

            let next = (entry.next)(&state);
            state.take_confirm();

            let Some(next) = next else {
                return Ok(finished(node, state));
            };
            if !self.graph.contains(next) {
                let err = FlowError::DanglingEdge {
                    from: node,
                    to: next,
                };
                return self.abort(&mut state, err.into()).await;
            }

            debug!(
                session_id = %state.session_id,
                from = %node,
                to = %next,
                retry_count = state.retry_count(),
                "Transition"
            );
            state.current_node = next;
        }

        self.abort(&mut state, FlowError::StepLimit { limit }.into())
            .await
    }

    /// Hand the caller to a representative, then report `error`.
    ///
    /// The transfer closing is spoken and the room released even when the
    /// graph itself is what failed.
    async fn abort(
        &self,
        state: &mut SessionState,
        error: Error,
    ) -> Result<ConversationOutcome, Error> {
        warn!(
            session_id = %state.session_id,
            node = %state.current_node,
            error = %error,
            "Conversation aborted, transferring to a representative"
        );
        state.flags.needs_representative = true;
        state.current_node = NodeId::TransferToRepresentative;
        let transfer = NodeHandler::Terminal(TerminalKind::TransferToRepresentative);
        if let Err(e) = transfer
            .on_enter(NodeId::TransferToRepresentative, state, &self.ctx)
            .await
        {
            warn!(session_id = %state.session_id, error = %e, "Transfer after abort failed");
            self.ctx.release_room(state.session_id).await;
        }
        Err(error)
    }
}

fn finished(node: NodeId, state: SessionState) -> ConversationOutcome {
    let reason = match node {
        NodeId::TransferToRepresentative => EndReason::Transferred,
        _ if state.flags.needs_representative => EndReason::Transferred,
        _ => EndReason::Completed,
    };
    info!(session_id = %state.session_id, node = %node, reason = ?reason, "Conversation finished");
    ConversationOutcome {
        reason,
        last_node: node,
        state,
    }
}
