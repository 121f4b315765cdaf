//! Governance state machines for the agora workspace.
//!
//! Two independently usable engines over one shared, versioned state:
//! - [`VotingRegistry`]: chairperson-curated proposals, one choice per voter,
//!   transitive delegation with loop rejection, first-index-wins winner.
//! - [`GovernanceHub`]: open yes/no proposals with a voting deadline, one
//!   ballot per voter per proposal, and one-time execution by a fixed
//!   authority once the deadline has passed and quorum is met.
//!
//! Engines never perform I/O: each accepted operation returns the event it
//! emits. [`GovernanceLedger`] serializes operations, stamps them with the
//! clock, and keeps the ordered event log.

pub mod config;
pub mod delegation;
pub mod error;
pub mod event;
pub mod execution;
pub mod hub;
pub mod ledger;
pub mod proposal;
pub mod registry;
pub mod tally;
pub mod winner;

pub use config::{ConfigError, GovernanceConfig, HubConfig, LoggingConfig, RegistryConfig};
pub use delegation::{DelegationPlan, DelegationResolver, Voter};
pub use error::{GovernanceError, Role};
pub use event::{EventBus, GovernanceEvent};
pub use execution::ExecutionGate;
pub use hub::GovernanceHub;
pub use ledger::{
    CommittedEvent, GovernanceLedger, GovernanceState, Operation, Receipt, SnapshotError,
};
pub use proposal::{GovernanceProposal, Proposal, ProposalId, ProposalPhase, ProposalStore};
pub use registry::VotingRegistry;
pub use tally::{BallotBox, Credit};
