//! Delegated single-choice voting registry.

use agora_types::Address;
use serde::{Deserialize, Serialize};

use crate::delegation::{DelegationResolver, Voter};
use crate::error::{GovernanceError, Role};
use crate::event::GovernanceEvent;
use crate::proposal::{Proposal, ProposalId, ProposalStore};
use crate::tally::{self, Credit};
use crate::winner;

/// A chairperson-curated list of proposals, each voter choosing exactly one
/// either directly or by delegating to another voter.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VotingRegistry {
    chairperson: Address,
    proposals: ProposalStore<Proposal>,
    voters: DelegationResolver,
}

impl VotingRegistry {
    /// Deploy a registry with `chairperson` as the deployer. Construction-time
    /// proposal names are unconstrained; one `ProposalAdded` is emitted each.
    pub fn new<I, S>(
        chairperson: Address,
        names: I,
    ) -> Result<(Self, Vec<GovernanceEvent>), GovernanceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if chairperson.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        let mut registry = Self {
            chairperson,
            proposals: ProposalStore::new(),
            voters: DelegationResolver::new(),
        };
        let events = names
            .into_iter()
            .map(|name| registry.append(name.into()))
            .collect();
        Ok((registry, events))
    }

    fn append(&mut self, name: String) -> GovernanceEvent {
        let index = self.proposals.push_with(|_| Proposal::new(name.clone()));
        GovernanceEvent::ProposalAdded { index, name }
    }

    fn require_chairperson(&self, caller: &Address) -> Result<(), GovernanceError> {
        if *caller != self.chairperson {
            return Err(GovernanceError::Unauthorized {
                caller: *caller,
                role: Role::Chairperson,
            });
        }
        Ok(())
    }

    /// Append a proposal. Chairperson only.
    pub fn add_proposal(
        &mut self,
        caller: &Address,
        name: impl Into<String>,
    ) -> Result<GovernanceEvent, GovernanceError> {
        self.require_chairperson(caller)?;
        let event = self.append(name.into());
        tracing::debug!(chairperson = %caller, index = self.proposals.len() - 1, "proposal added");
        Ok(event)
    }

    /// Vote directly for `index`. Votes already delegated onto the caller are
    /// credited along with its own.
    pub fn vote(
        &mut self,
        caller: &Address,
        index: ProposalId,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let credit = tally::cast(&mut self.proposals, &mut self.voters, *caller, index)?;
        tracing::debug!(voter = %caller, proposal = index, ?credit, "vote cast");
        Ok(GovernanceEvent::VoteCasted {
            voter: *caller,
            index,
        })
    }

    /// Delegate the caller's vote to `target`.
    ///
    /// If the chain starting at `target` ends at a voter who already voted,
    /// that proposal is credited now; otherwise the vote waits on the chain's
    /// end until it votes.
    pub fn delegate(
        &mut self,
        caller: &Address,
        target: &Address,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let plan = self.voters.plan(caller, target)?;
        self.voters.record(*caller, *target);
        let credit = tally::credit(&mut self.proposals, &mut self.voters, plan.end, plan.weight)?;
        match credit {
            Credit::Applied { proposal, weight } => {
                tracing::debug!(voter = %caller, target = %target, proposal, weight, "delegated vote credited");
            }
            Credit::Deferred { holder, weight } => {
                tracing::debug!(voter = %caller, target = %target, holder = %holder, weight, "delegated vote pending");
            }
        }
        Ok(GovernanceEvent::VotingDelegated {
            voter: *caller,
            target: *target,
        })
    }

    /// Hand the chairperson role to `new_chairperson`. Chairperson only.
    pub fn change_chairperson(
        &mut self,
        caller: &Address,
        new_chairperson: &Address,
    ) -> Result<GovernanceEvent, GovernanceError> {
        self.require_chairperson(caller)?;
        if new_chairperson.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        self.chairperson = *new_chairperson;
        tracing::info!(from = %caller, to = %new_chairperson, "chairperson changed");
        Ok(GovernanceEvent::ChairpersonChanged {
            chairperson: *new_chairperson,
        })
    }

    pub fn chairperson(&self) -> Address {
        self.chairperson
    }

    pub fn proposal(&self, index: ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals.get(index)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len()
    }

    /// The voter record for `address`; untouched if never seen.
    pub fn voter(&self, address: &Address) -> Voter {
        self.voters.voter(address)
    }

    /// End of `voter`'s delegation chain.
    pub fn resolve_delegate(&self, voter: &Address) -> Result<Address, GovernanceError> {
        self.voters.resolve(voter)
    }

    pub fn winning_proposal(&self) -> ProposalId {
        winner::winning_proposal(&self.proposals)
    }

    pub fn winner_name(&self) -> Result<&str, GovernanceError> {
        winner::winner_name(&self.proposals)
    }
}
