//! Intake agent — owns the flow graph and shared collaborators, and runs
//! each call as an independent conversation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::config::FlowConfig;
use crate::eligibility::EligibilityProvider;
use crate::error::{Error, VoiceError};
use crate::flow::prompts::GREETING;
use crate::flow::{ConversationOutcome, EndReason, FlowEngine, FlowGraph, NodeContext};
use crate::session::SessionState;
use crate::voice::{RoomLifecycle, VoiceIo};

/// Shared collaborators for every conversation.
///
/// Bundles the shared components to reduce argument count.
#[derive(Clone)]
pub struct AgentDeps {
    pub eligibility: Arc<dyn EligibilityProvider>,
    pub rooms: Arc<dyn RoomLifecycle>,
}

/// Runs intake conversations.
///
/// The graph is built and validated once; each call gets its own
/// `SessionState`, so concurrent conversations share nothing mutable.
pub struct IntakeAgent {
    config: FlowConfig,
    deps: AgentDeps,
    graph: FlowGraph,
}

impl IntakeAgent {
    /// Build the agent. Fails if the intake graph is inconsistent.
    pub fn new(config: FlowConfig, deps: AgentDeps) -> Result<Self, Error> {
        let graph = FlowGraph::intake();
        graph.validate()?;
        Ok(Self {
            config,
            deps,
            graph,
        })
    }

    /// Run one conversation over `voice` until it ends.
    pub async fn run_conversation(
        &self,
        voice: Arc<dyn VoiceIo>,
    ) -> Result<ConversationOutcome, Error> {
        let session_id = Uuid::new_v4();
        self.deps.rooms.create_room(&session_id.to_string()).await?;
        info!(session_id = %session_id, "Conversation started");

        let state = SessionState::new(session_id);
        let ctx = NodeContext {
            voice: voice.as_ref(),
            eligibility: self.deps.eligibility.as_ref(),
            rooms: self.deps.rooms.as_ref(),
            flow: &self.config,
        };

        if let Err(e) = voice.prompt(GREETING).await {
            ctx.release_room(session_id).await;
            return match e {
                VoiceError::Disconnected => {
                    info!(session_id = %session_id, "Caller disconnected during greeting");
                    Ok(ConversationOutcome {
                        reason: EndReason::Disconnected,
                        last_node: state.current_node,
                        state,
                    })
                }
                other => Err(other.into()),
            };
        }

        FlowEngine::new(&self.graph, ctx).run(state).await
    }
}
