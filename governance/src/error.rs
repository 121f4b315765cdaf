use agora_types::Address;
use thiserror::Error;

use crate::proposal::ProposalId;

/// A privileged singleton role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Chairperson,
    ExecutionAuthority,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chairperson => "chairperson",
            Self::ExecutionAuthority => "execution authority",
        }
    }
}

/// Rejection of a governance operation. A rejected operation never changes state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("invalid proposal index {0}")]
    InvalidProposalIndex(ProposalId),

    #[error("voting duration must be positive and keep the deadline representable")]
    InvalidDuration,

    #[error("description cannot be empty")]
    EmptyDescription,

    #[error("zero address not allowed")]
    ZeroAddress,

    #[error("{}", already_voted_message(*delegating, voter))]
    AlreadyVoted { voter: Address, delegating: bool },

    #[error("self-delegation is disallowed")]
    SelfDelegation,

    #[error("found loop in delegation")]
    DelegationLoop,

    #[error("caller {caller} is not the {}", role.as_str())]
    Unauthorized { caller: Address, role: Role },

    #[error("voting period for proposal {0} has ended")]
    VotingClosed(ProposalId),

    #[error("proposal {0} is still active")]
    ProposalStillActive(ProposalId),

    #[error("quorum not reached: {have} < {need} votes")]
    QuorumNotReached { have: u64, need: u64 },

    #[error("proposal {0} already executed")]
    AlreadyExecuted(ProposalId),
}

fn already_voted_message(delegating: bool, voter: &Address) -> String {
    if delegating {
        format!("you already voted ({voter})")
    } else {
        format!("{voter} already voted")
    }
}
