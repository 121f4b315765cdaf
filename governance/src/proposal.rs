//! Proposals and the append-only store that owns them.

use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;

/// Ordinal of a proposal within its store. Doubles as the hub's proposal id.
pub type ProposalId = u64;

/// A single-choice option in the voting registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Short label. May be empty for construction-time proposals.
    pub name: String,
    /// Credited votes, direct and delegated.
    pub vote_count: u64,
}

impl Proposal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vote_count: 0,
        }
    }
}

/// A time-boxed yes/no proposal in the governance hub.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceProposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub description: String,
    /// Votes are accepted while `now <= deadline`.
    pub deadline: Timestamp,
    pub votes_for: u64,
    pub votes_against: u64,
    /// Flips false -> true exactly once.
    pub executed: bool,
}

impl GovernanceProposal {
    pub fn total_votes(&self) -> u64 {
        self.votes_for.saturating_add(self.votes_against)
    }

    /// Lifecycle phase of this proposal at `now`.
    pub fn phase(&self, now: Timestamp) -> ProposalPhase {
        if self.executed {
            ProposalPhase::Executed
        } else if now > self.deadline {
            ProposalPhase::Closed
        } else {
            ProposalPhase::Active
        }
    }
}

/// Execution lifecycle: `Active -> Closed -> Executed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProposalPhase {
    /// Accepting ballots (`now <= deadline`).
    Active,
    /// Deadline passed, not yet executed.
    Closed,
    /// Terminal.
    Executed,
}

impl ProposalPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Executed => "executed",
        }
    }
}

/// Append-only proposal collection, addressed by ordinal.
///
/// Entries are never removed or reordered, so an id handed out once stays
/// valid for the life of the store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProposalStore<P> {
    entries: Vec<P>,
}

impl<P> ProposalStore<P> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a proposal built from its future id; returns that id.
    pub fn push_with(&mut self, build: impl FnOnce(ProposalId) -> P) -> ProposalId {
        let id = self.next_id();
        self.entries.push(build(id));
        id
    }

    /// The id the next appended proposal will receive.
    pub fn next_id(&self) -> ProposalId {
        self.entries.len() as ProposalId
    }

    pub fn get(&self, id: ProposalId) -> Result<&P, GovernanceError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.entries.get(i))
            .ok_or(GovernanceError::InvalidProposalIndex(id))
    }

    pub fn get_mut(&mut self, id: ProposalId) -> Result<&mut P, GovernanceError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.entries.get_mut(i))
            .ok_or(GovernanceError::InvalidProposalIndex(id))
    }

    pub fn len(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &P> {
        self.entries.iter()
    }
}

impl<P> Default for ProposalStore<P> {
    fn default() -> Self {
        Self::new()
    }
}
