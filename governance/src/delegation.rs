//! Vote delegation for the voting registry.
//!
//! The delegation relation lives inside the voter records as a key lookup
//! (`voter -> delegate`), never as live references. Chains are resolved by an
//! explicit walk bounded by the number of known voters, carrying the
//! delegating voter's identity so a walk that returns to it is a loop.

use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::GovernanceError;
use crate::proposal::ProposalId;

/// A registry participant. Created implicitly on first interaction.
///
/// Exactly one holds at a time: untouched (`has_voted == false`), voted
/// directly (`choice` set), or delegated (`delegate` set).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub has_voted: bool,
    /// Immediate delegation target, as named by the voter.
    pub delegate: Option<Address>,
    /// Proposal voted for directly.
    pub choice: Option<ProposalId>,
    /// Votes delegated onto this voter that await its own direct vote.
    pub pending_weight: u64,
}

impl Voter {
    pub fn is_untouched(&self) -> bool {
        !self.has_voted
    }
}

/// Outcome of a validated delegation: where the chain ends and how many
/// votes travel along it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelegationPlan {
    pub end: Address,
    pub weight: u64,
}

/// Owns the voter table and resolves delegate chains over it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelegationResolver {
    voters: HashMap<Address, Voter>,
}

impl DelegationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for `address`, or an untouched one if never seen.
    pub fn voter(&self, address: &Address) -> Voter {
        self.voters.get(address).cloned().unwrap_or_default()
    }

    pub(crate) fn voter_mut(&mut self, address: Address) -> &mut Voter {
        self.voters.entry(address).or_default()
    }

    pub fn known_voters(&self) -> usize {
        self.voters.len()
    }

    /// Follow delegate links from `start` to the first voter that has not
    /// voted or voted directly.
    ///
    /// Fails with `DelegationLoop` if the walk reaches `origin` or exceeds the
    /// voter count.
    fn walk(&self, start: Address, origin: Option<Address>) -> Result<Address, GovernanceError> {
        let max_hops = self.voters.len();
        let mut current = start;
        let mut hops = 0usize;
        loop {
            if origin == Some(current) {
                return Err(GovernanceError::DelegationLoop);
            }
            let next = match self.voters.get(&current) {
                Some(v) if v.has_voted => v.delegate,
                _ => None,
            };
            match next {
                Some(next) => {
                    hops += 1;
                    if hops > max_hops {
                        return Err(GovernanceError::DelegationLoop);
                    }
                    current = next;
                }
                None => return Ok(current),
            }
        }
    }

    /// End of the delegation chain starting at `voter` (the voter itself if
    /// it has not delegated).
    pub fn resolve(&self, voter: &Address) -> Result<Address, GovernanceError> {
        self.walk(*voter, None)
    }

    /// Check that `from` may delegate to `to`, without mutating anything.
    ///
    /// Preconditions are checked in order: not yet voted, not self, no loop.
    pub fn plan(&self, from: &Address, to: &Address) -> Result<DelegationPlan, GovernanceError> {
        let sender = self.voters.get(from);
        if sender.is_some_and(|v| v.has_voted) {
            return Err(GovernanceError::AlreadyVoted {
                voter: *from,
                delegating: true,
            });
        }
        if from == to {
            return Err(GovernanceError::SelfDelegation);
        }
        let end = self.walk(*to, Some(*from))?;
        let pending = sender.map_or(0, |v| v.pending_weight);
        Ok(DelegationPlan {
            end,
            weight: pending.saturating_add(1),
        })
    }

    /// Record a planned delegation. The sender's pending weight moves with it.
    pub(crate) fn record(&mut self, from: Address, to: Address) {
        let sender = self.voter_mut(from);
        sender.has_voted = true;
        sender.delegate = Some(to);
        sender.pending_weight = 0;
    }
}
