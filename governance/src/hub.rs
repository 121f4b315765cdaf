//! Time-boxed, quorum-gated proposal hub.

use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::GovernanceError;
use crate::event::GovernanceEvent;
use crate::execution::ExecutionGate;
use crate::proposal::{GovernanceProposal, ProposalId, ProposalPhase, ProposalStore};
use crate::tally::BallotBox;

/// Open yes/no proposals: anyone proposes, anyone votes once per proposal
/// until the deadline, and the execution authority executes each proposal
/// at most once after the deadline when quorum is met.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceHub {
    gate: ExecutionGate,
    proposals: ProposalStore<GovernanceProposal>,
    ballots: BallotBox,
}

impl GovernanceHub {
    pub fn new(quorum: u64, execution_authority: Address) -> Result<Self, GovernanceError> {
        Ok(Self {
            gate: ExecutionGate::new(quorum, execution_authority)?,
            proposals: ProposalStore::new(),
            ballots: BallotBox::new(),
        })
    }

    /// Open a proposal for `duration_secs` from `now`.
    pub fn create_proposal(
        &mut self,
        caller: &Address,
        description: impl Into<String>,
        duration_secs: u64,
        now: Timestamp,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let description = description.into();
        if description.is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }
        if duration_secs == 0 {
            return Err(GovernanceError::InvalidDuration);
        }
        let deadline = now
            .checked_add_secs(duration_secs)
            .ok_or(GovernanceError::InvalidDuration)?;
        let id = self.proposals.push_with(|id| GovernanceProposal {
            id,
            proposer: *caller,
            description: description.clone(),
            deadline,
            votes_for: 0,
            votes_against: 0,
            executed: false,
        });
        tracing::debug!(id, proposer = %caller, %deadline, "proposal created");
        Ok(GovernanceEvent::ProposalCreated {
            id,
            proposer: *caller,
            description,
            deadline,
        })
    }

    /// Cast a for/against ballot on `id`.
    pub fn vote(
        &mut self,
        caller: &Address,
        id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let proposal = self.proposals.get_mut(id)?;
        if now > proposal.deadline {
            return Err(GovernanceError::VotingClosed(id));
        }
        self.ballots.cast(proposal, *caller, support)?;
        tracing::debug!(id, voter = %caller, support, "ballot recorded");
        Ok(GovernanceEvent::Voted {
            id,
            voter: *caller,
            support,
        })
    }

    /// Execute `id`. Execution authority only, after the deadline, with quorum.
    pub fn execute_proposal(
        &mut self,
        caller: &Address,
        id: ProposalId,
        now: Timestamp,
    ) -> Result<GovernanceEvent, GovernanceError> {
        let proposal = self.proposals.get_mut(id)?;
        self.gate.execute(caller, proposal, now)?;
        tracing::info!(
            id,
            votes_for = proposal.votes_for,
            votes_against = proposal.votes_against,
            "proposal executed"
        );
        Ok(GovernanceEvent::ProposalExecuted { id })
    }

    pub fn proposal(&self, id: ProposalId) -> Result<&GovernanceProposal, GovernanceError> {
        self.proposals.get(id)
    }

    pub fn proposals(&self) -> impl Iterator<Item = &GovernanceProposal> {
        self.proposals.iter()
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len()
    }

    pub fn phase(&self, id: ProposalId, now: Timestamp) -> Result<ProposalPhase, GovernanceError> {
        Ok(self.proposals.get(id)?.phase(now))
    }

    pub fn has_voted(&self, id: ProposalId, voter: &Address) -> bool {
        self.ballots.has_voted(voter, id)
    }

    pub fn quorum(&self) -> u64 {
        self.gate.quorum()
    }

    pub fn execution_authority(&self) -> Address {
        self.gate.authority()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTHORITY: Address = Address::repeat_byte(0xaa);
    const DAY: u64 = 86_400;

    fn addr(n: u8) -> Address {
        Address::repeat_byte(n)
    }

    fn at(secs: u64) -> Timestamp {
        Timestamp::new(secs)
    }

    #[test]
    fn create_sets_deadline_and_zero_tallies() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        let event = hub.create_proposal(&addr(1), "Upgrade protocol to v2", DAY, at(100)).unwrap();
        assert_eq!(
            event,
            GovernanceEvent::ProposalCreated {
                id: 0,
                proposer: addr(1),
                description: "Upgrade protocol to v2".into(),
                deadline: at(100 + DAY),
            }
        );
        let p = hub.proposal(0).unwrap();
        assert_eq!((p.votes_for, p.votes_against, p.executed), (0, 0, false));
    }

    #[test]
    fn empty_description_checked_before_duration() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        assert_eq!(
            hub.create_proposal(&addr(1), "", 0, at(0)).unwrap_err(),
            GovernanceError::EmptyDescription
        );
        assert_eq!(hub.proposal_count(), 0);
    }

    #[test]
    fn zero_or_overflowing_duration_rejected() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        assert_eq!(
            hub.create_proposal(&addr(1), "x", 0, at(5)).unwrap_err(),
            GovernanceError::InvalidDuration
        );
        assert_eq!(
            hub.create_proposal(&addr(1), "x", u64::MAX, at(5)).unwrap_err(),
            GovernanceError::InvalidDuration
        );
        assert_eq!(hub.proposal_count(), 0);
    }

    #[test]
    fn voting_allowed_at_deadline_closed_after() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        hub.create_proposal(&addr(1), "x", DAY, at(0)).unwrap();
        hub.vote(&addr(2), 0, true, at(DAY)).unwrap();
        assert_eq!(
            hub.vote(&addr(3), 0, true, at(DAY + 1)).unwrap_err(),
            GovernanceError::VotingClosed(0)
        );
        assert!(hub.has_voted(0, &addr(2)));
        assert!(!hub.has_voted(0, &addr(3)));
    }

    #[test]
    fn ballots_are_per_proposal() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        hub.create_proposal(&addr(1), "a", DAY, at(0)).unwrap();
        hub.create_proposal(&addr(1), "b", DAY, at(0)).unwrap();
        hub.vote(&addr(2), 0, true, at(1)).unwrap();
        hub.vote(&addr(2), 1, false, at(1)).unwrap();
        assert_eq!(hub.proposal(1).unwrap().votes_against, 1);
    }

    #[test]
    fn unknown_proposal_checked_first_on_execute() {
        let mut hub = GovernanceHub::new(3, AUTHORITY).unwrap();
        assert_eq!(
            hub.execute_proposal(&addr(1), 5, at(0)).unwrap_err(),
            GovernanceError::InvalidProposalIndex(5)
        );
    }

    #[test]
    fn phase_tracks_lifecycle() {
        let mut hub = GovernanceHub::new(1, AUTHORITY).unwrap();
        hub.create_proposal(&addr(1), "x", DAY, at(0)).unwrap();
        hub.vote(&addr(2), 0, false, at(1)).unwrap();
        assert_eq!(hub.phase(0, at(DAY)).unwrap(), ProposalPhase::Active);
        assert_eq!(hub.phase(0, at(DAY + 1)).unwrap(), ProposalPhase::Closed);
        hub.execute_proposal(&AUTHORITY, 0, at(DAY + 1)).unwrap();
        assert_eq!(hub.phase(0, at(DAY + 1)).unwrap(), ProposalPhase::Executed);
    }
}
