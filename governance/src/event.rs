//! Notifications emitted by accepted operations.
//!
//! Engines return their events to the caller instead of publishing them; the
//! ledger appends them to its ordered log and fans them out via [`EventBus`].

use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::proposal::ProposalId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GovernanceEvent {
    /// A registry proposal was appended.
    ProposalAdded { index: ProposalId, name: String },
    /// A registry vote was cast directly.
    VoteCasted { voter: Address, index: ProposalId },
    /// A registry vote was delegated.
    VotingDelegated { voter: Address, target: Address },
    /// The registry chairperson role moved.
    ChairpersonChanged { chairperson: Address },
    /// A hub proposal was opened for voting.
    ProposalCreated {
        id: ProposalId,
        proposer: Address,
        description: String,
        deadline: Timestamp,
    },
    /// A hub ballot was recorded.
    Voted {
        id: ProposalId,
        voter: Address,
        support: bool,
    },
    /// A hub proposal was executed.
    ProposalExecuted { id: ProposalId },
}

impl GovernanceEvent {
    /// Stable event name, matching the serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProposalAdded { .. } => "proposal_added",
            Self::VoteCasted { .. } => "vote_casted",
            Self::VotingDelegated { .. } => "voting_delegated",
            Self::ChairpersonChanged { .. } => "chairperson_changed",
            Self::ProposalCreated { .. } => "proposal_created",
            Self::Voted { .. } => "voted",
            Self::ProposalExecuted { .. } => "proposal_executed",
        }
    }
}

/// Synchronous fan-out event bus for governance events.
///
/// Listeners are invoked inline while the ledger holds its state lock; keep
/// handlers fast and never call back into the ledger from one.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&GovernanceEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl Fn(&GovernanceEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn publish(&self, event: &GovernanceEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
