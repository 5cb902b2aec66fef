//! Flow graph — the fixed node registry and its transition rules.

use std::collections::BTreeMap;

use crate::error::FlowError;
use crate::session::{FieldKey, SessionState};

use super::handlers::{FieldKind, NodeHandler, TerminalKind};
use super::node::NodeId;

/// Transition rule: next node for the updated state, `None` at a terminal.
pub type NextFn = fn(&SessionState) -> Option<NodeId>;

/// A registered node.
#[derive(Debug, Clone, Copy)]
pub struct NodeEntry {
    pub handler: NodeHandler,
    pub next: NextFn,
    /// Every node `next` can return.
    pub targets: &'static [NodeId],
}

/// Node registry. Built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct FlowGraph {
    nodes: BTreeMap<NodeId, NodeEntry>,
}

impl FlowGraph {
    /// The intake conversation: first name, last name, date of birth,
    /// insurance id, eligibility check, then goodbye or transfer.
    pub fn intake() -> Self {
        use FieldKind::*;
        use NodeId::*;

        let mut graph = Self {
            nodes: BTreeMap::new(),
        };

        graph.insert(CollectFirstName, NodeHandler::Collect(FirstName), &[ConfirmFirstName], |_| {
            Some(ConfirmFirstName)
        });
        graph.insert(
            ConfirmFirstName,
            NodeHandler::Confirm(FirstName),
            &[CollectLastName, CollectFirstName],
            |s| Some(if accepted(s) { CollectLastName } else { CollectFirstName }),
        );
        graph.insert(CollectLastName, NodeHandler::Collect(LastName), &[ConfirmLastName], |_| {
            Some(ConfirmLastName)
        });
        graph.insert(
            ConfirmLastName,
            NodeHandler::Confirm(LastName),
            &[CollectDob, CollectLastName, CollectFirstName],
            |s| {
                Some(if accepted(s) {
                    CollectDob
                } else if s.field(FieldKey::FirstName).is_some() {
                    CollectLastName
                } else {
                    CollectFirstName
                })
            },
        );
        graph.insert(CollectDob, NodeHandler::Collect(DateOfBirth), &[ConfirmDob, CollectDob], |s| {
            Some(if s.field(FieldKey::DateOfBirth).is_some() {
                ConfirmDob
            } else {
                CollectDob
            })
        });
        graph.insert(
            ConfirmDob,
            NodeHandler::Confirm(DateOfBirth),
            &[CollectInsurance, CollectDob],
            |s| Some(if accepted(s) { CollectInsurance } else { CollectDob }),
        );
        graph.insert(
            CollectInsurance,
            NodeHandler::Collect(InsuranceId),
            &[ConfirmInsurance, CollectInsurance],
            |s| {
                Some(if s.field(FieldKey::InsuranceId).is_some() {
                    ConfirmInsurance
                } else {
                    CollectInsurance
                })
            },
        );
        graph.insert(
            ConfirmInsurance,
            NodeHandler::Confirm(InsuranceId),
            &[EligibilityCheck, CollectInsurance],
            |s| Some(if accepted(s) { EligibilityCheck } else { CollectInsurance }),
        );
        graph.insert(
            EligibilityCheck,
            NodeHandler::EligibilityCheck,
            &[TransferToRepresentative, CollectInsurance, Goodbye],
            |s| {
                Some(if s.flags.needs_representative {
                    TransferToRepresentative
                } else if s.flags.retry_validation {
                    CollectInsurance
                } else {
                    Goodbye
                })
            },
        );
        graph.insert(
            TransferToRepresentative,
            NodeHandler::Terminal(TerminalKind::TransferToRepresentative),
            &[],
            |_| None,
        );
        graph.insert(Goodbye, NodeHandler::Terminal(TerminalKind::Goodbye), &[], |_| None);

        graph
    }

    fn insert(
        &mut self,
        node: NodeId,
        handler: NodeHandler,
        targets: &'static [NodeId],
        next: NextFn,
    ) {
        self.nodes.insert(
            node,
            NodeEntry {
                handler,
                next,
                targets,
            },
        );
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Check that every node is registered, every declared target is a
    /// registered node, and only terminal nodes have no targets.
    pub fn validate(&self) -> Result<(), FlowError> {
        for node in NodeId::ALL {
            let entry = self.get(node).ok_or(FlowError::UnknownNode(node))?;
            if let Some(to) = entry.targets.iter().find(|t| !self.contains(**t)) {
                return Err(FlowError::DanglingEdge { from: node, to: *to });
            }
            if node.is_terminal() != entry.targets.is_empty() {
                return Err(FlowError::MisconfiguredNode(node));
            }
        }
        Ok(())
    }
}

fn accepted(state: &SessionState) -> bool {
    state.confirm() == Some(true)
}
