//! Vote crediting.
//!
//! Registry votes reach a proposal either directly or along a delegation
//! chain. [`credit`] is the single place that decides between applying a
//! vote now (the chain ends at a direct voter) and parking it on the chain's
//! end until that voter votes.

use agora_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::delegation::DelegationResolver;
use crate::error::GovernanceError;
use crate::proposal::{GovernanceProposal, Proposal, ProposalId, ProposalStore};

/// Where a credited weight ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Credit {
    /// Added to the proposal's `vote_count`.
    Applied { proposal: ProposalId, weight: u64 },
    /// Parked on a voter who has not voted yet.
    Deferred { holder: Address, weight: u64 },
}

/// Credit `weight` votes to whatever the chain ending at `end` stands for.
pub(crate) fn credit(
    proposals: &mut ProposalStore<Proposal>,
    voters: &mut DelegationResolver,
    end: Address,
    weight: u64,
) -> Result<Credit, GovernanceError> {
    match voters.voter(&end).choice {
        Some(index) => {
            let proposal = proposals.get_mut(index)?;
            proposal.vote_count = proposal.vote_count.saturating_add(weight);
            Ok(Credit::Applied {
                proposal: index,
                weight,
            })
        }
        None => {
            let holder = voters.voter_mut(end);
            holder.pending_weight = holder.pending_weight.saturating_add(weight);
            Ok(Credit::Deferred { holder: end, weight })
        }
    }
}

/// Registry direct vote: validate, record the choice, then credit the voter's
/// own vote plus everything delegated onto it so far.
pub(crate) fn cast(
    proposals: &mut ProposalStore<Proposal>,
    voters: &mut DelegationResolver,
    voter: Address,
    index: ProposalId,
) -> Result<Credit, GovernanceError> {
    proposals.get(index)?;
    let record = voters.voter(&voter);
    if record.has_voted {
        return Err(GovernanceError::AlreadyVoted {
            voter,
            delegating: false,
        });
    }
    let weight = record.pending_weight.saturating_add(1);
    let entry = voters.voter_mut(voter);
    entry.has_voted = true;
    entry.choice = Some(index);
    entry.pending_weight = 0;
    credit(proposals, voters, voter, weight)
}

/// One ballot per (voter, proposal) pair for the governance hub.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BallotBox {
    ballots: HashSet<(Address, ProposalId)>,
}

impl BallotBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_voted(&self, voter: &Address, id: ProposalId) -> bool {
        self.ballots.contains(&(*voter, id))
    }

    /// Record a ballot and bump the matching tally. The caller has already
    /// checked that the proposal is open.
    pub(crate) fn cast(
        &mut self,
        proposal: &mut GovernanceProposal,
        voter: Address,
        support: bool,
    ) -> Result<(), GovernanceError> {
        if self.has_voted(&voter, proposal.id) {
            return Err(GovernanceError::AlreadyVoted {
                voter,
                delegating: false,
            });
        }
        if support {
            proposal.votes_for = proposal.votes_for.saturating_add(1);
        } else {
            proposal.votes_against = proposal.votes_against.saturating_add(1);
        }
        self.ballots.insert((voter, proposal.id));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }
}
