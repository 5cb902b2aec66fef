//! Node identifiers.

use serde::{Deserialize, Serialize};

/// A step in the intake conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeId {
    CollectFirstName,
    ConfirmFirstName,
    CollectLastName,
    ConfirmLastName,
    CollectDob,
    ConfirmDob,
    CollectInsurance,
    ConfirmInsurance,
    EligibilityCheck,
    TransferToRepresentative,
    Goodbye,
}

impl NodeId {
    /// Entry node of every conversation.
    pub const START: NodeId = NodeId::CollectFirstName;

    pub const ALL: [NodeId; 11] = [
        NodeId::CollectFirstName,
        NodeId::ConfirmFirstName,
        NodeId::CollectLastName,
        NodeId::ConfirmLastName,
        NodeId::CollectDob,
        NodeId::ConfirmDob,
        NodeId::CollectInsurance,
        NodeId::ConfirmInsurance,
        NodeId::EligibilityCheck,
        NodeId::TransferToRepresentative,
        NodeId::Goodbye,
    ];

    /// Whether the conversation ends at this node.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::TransferToRepresentative | Self::Goodbye)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CollectFirstName => "collect_first_name",
            Self::ConfirmFirstName => "confirm_first_name",
            Self::CollectLastName => "collect_last_name",
            Self::ConfirmLastName => "confirm_last_name",
            Self::CollectDob => "collect_dob",
            Self::ConfirmDob => "confirm_dob",
            Self::CollectInsurance => "collect_insurance",
            Self::ConfirmInsurance => "confirm_insurance",
            Self::EligibilityCheck => "eligibility_check",
            Self::TransferToRepresentative => "transfer_to_representative",
            Self::Goodbye => "goodbye",
        };
        write!(f, "{s}")
    }
}
