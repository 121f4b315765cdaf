//! One-time execution of hub proposals behind deadline and quorum checks.

use agora_types::{Address, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::{GovernanceError, Role};
use crate::proposal::GovernanceProposal;

/// Gate fixed at hub construction: who may execute and how many votes are needed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionGate {
    /// Absolute vote count (for + against), not a share of eligible voters.
    quorum: u64,
    authority: Address,
}

impl ExecutionGate {
    pub fn new(quorum: u64, authority: Address) -> Result<Self, GovernanceError> {
        if authority.is_zero() {
            return Err(GovernanceError::ZeroAddress);
        }
        Ok(Self { quorum, authority })
    }

    pub fn quorum(&self) -> u64 {
        self.quorum
    }

    pub fn authority(&self) -> Address {
        self.authority
    }

    /// Check every execution precondition against `proposal` at `now`.
    ///
    /// Order: authority, deadline passed, quorum, not yet executed. Outcome
    /// (for vs against) is deliberately not consulted.
    pub fn check(
        &self,
        caller: &Address,
        proposal: &GovernanceProposal,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        if *caller != self.authority {
            return Err(GovernanceError::Unauthorized {
                caller: *caller,
                role: Role::ExecutionAuthority,
            });
        }
        if now <= proposal.deadline {
            return Err(GovernanceError::ProposalStillActive(proposal.id));
        }
        let have = proposal.total_votes();
        if have < self.quorum {
            return Err(GovernanceError::QuorumNotReached {
                have,
                need: self.quorum,
            });
        }
        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(proposal.id));
        }
        Ok(())
    }

    /// Check and, on success, mark `proposal` executed.
    pub fn execute(
        &self,
        caller: &Address,
        proposal: &mut GovernanceProposal,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        self.check(caller, proposal, now)?;
        proposal.executed = true;
        Ok(())
    }
}
