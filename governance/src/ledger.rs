//! The ledger boundary: one versioned state, one total order.
//!
//! Every state-mutating operation goes through [`GovernanceLedger::submit`],
//! which holds a single lock for the whole transition. The clock is read once
//! per operation; an accepted operation bumps the state version and appends
//! its events to the ordered log, a rejected one leaves everything as it was.

use agora_types::{Address, Clock, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;

use crate::config::GovernanceConfig;
use crate::error::GovernanceError;
use crate::event::{EventBus, GovernanceEvent};
use crate::hub::GovernanceHub;
use crate::proposal::ProposalId;
use crate::registry::VotingRegistry;

/// A state-mutating request, as submitted by an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Registry: append a proposal (chairperson only).
    AddProposal { name: String },
    /// Registry: vote directly.
    Vote { index: ProposalId },
    /// Registry: delegate to another voter.
    Delegate { target: Address },
    /// Registry: hand over the chairperson role.
    ChangeChairperson { chairperson: Address },
    /// Hub: open a proposal.
    CreateProposal {
        description: String,
        duration_secs: u64,
    },
    /// Hub: vote for or against.
    CastBallot { id: ProposalId, support: bool },
    /// Hub: execute after the deadline (execution authority only).
    ExecuteProposal { id: ProposalId },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddProposal { .. } => "add_proposal",
            Self::Vote { .. } => "vote",
            Self::Delegate { .. } => "delegate",
            Self::ChangeChairperson { .. } => "change_chairperson",
            Self::CreateProposal { .. } => "create_proposal",
            Self::CastBallot { .. } => "cast_ballot",
            Self::ExecuteProposal { .. } => "execute_proposal",
        }
    }
}

/// The shared state every component operates over.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceState {
    /// Number of accepted operations since construction.
    pub version: u64,
    pub registry: VotingRegistry,
    pub hub: GovernanceHub,
}

/// Result of an accepted operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Receipt {
    /// State version after the operation.
    pub version: u64,
    pub timestamp: Timestamp,
    pub events: Vec<GovernanceEvent>,
}

/// An event in the ledger's ordered log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommittedEvent {
    pub version: u64,
    pub timestamp: Timestamp,
    pub event: GovernanceEvent,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(bincode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(bincode::Error),
}

struct Inner {
    state: GovernanceState,
    log: Vec<CommittedEvent>,
}

pub struct GovernanceLedger<C> {
    clock: C,
    inner: Mutex<Inner>,
    bus: EventBus,
}

impl<C: Clock> GovernanceLedger<C> {
    /// Deploy both engines from `config`. The registry's construction events
    /// are logged at version 0.
    pub fn new(config: &GovernanceConfig, clock: C) -> Result<Self, GovernanceError> {
        let (registry, events) = VotingRegistry::new(
            config.registry.chairperson,
            config.registry.proposals.iter().cloned(),
        )?;
        let hub = GovernanceHub::new(config.hub.quorum, config.hub.execution_authority)?;
        let timestamp = clock.now();
        let log = events
            .into_iter()
            .map(|event| CommittedEvent {
                version: 0,
                timestamp,
                event,
            })
            .collect();
        Ok(Self::from_inner(
            clock,
            Inner {
                state: GovernanceState {
                    version: 0,
                    registry,
                    hub,
                },
                log,
            },
        ))
    }

    fn from_inner(clock: C, inner: Inner) -> Self {
        Self {
            clock,
            inner: Mutex::new(inner),
            bus: EventBus::new(),
        }
    }

    /// Register a listener for every event committed from now on.
    pub fn subscribe(&mut self, listener: impl Fn(&GovernanceEvent) + Send + Sync + 'static) {
        self.bus.subscribe(listener);
    }

    // Transitions validate before they write and the log is appended before
    // listeners run, so a poisoned lock still holds a consistent state.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `op` on behalf of `caller` as one atomic transition.
    pub fn submit(&self, caller: &Address, op: Operation) -> Result<Receipt, GovernanceError> {
        let mut inner = self.lock();
        let timestamp = self.clock.now();
        let op_name = op.name();
        let event = match apply(&mut inner.state, caller, op, timestamp) {
            Ok(event) => event,
            Err(e) => {
                tracing::debug!(caller = %caller, op = op_name, error = %e, "operation rejected");
                return Err(e);
            }
        };
        inner.state.version += 1;
        let version = inner.state.version;
        inner.log.push(CommittedEvent {
            version,
            timestamp,
            event: event.clone(),
        });
        // Fan out only once state and log agree; a panicking listener then
        // leaves a committed, logged operation behind.
        self.bus.publish(&event);
        tracing::trace!(caller = %caller, op = op_name, version, "operation committed");
        Ok(Receipt {
            version,
            timestamp,
            events: vec![event],
        })
    }

    /// Run a read-only query against a consistent view of the state.
    pub fn with_state<R>(&self, query: impl FnOnce(&GovernanceState) -> R) -> R {
        query(&self.lock().state)
    }

    pub fn version(&self) -> u64 {
        self.lock().state.version
    }

    /// All committed events, in commit order.
    pub fn events(&self) -> Vec<CommittedEvent> {
        self.lock().log.clone()
    }

    /// Events committed after `version`.
    pub fn events_since(&self, version: u64) -> Vec<CommittedEvent> {
        self.lock()
            .log
            .iter()
            .filter(|e| e.version > version)
            .cloned()
            .collect()
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Serialize the full state for persistence. The event log is not included.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(&self.lock().state).map_err(SnapshotError::Encode)
    }

    /// Rebuild a ledger from [`snapshot`](Self::snapshot) output, with an empty log.
    pub fn restore(data: &[u8], clock: C) -> Result<Self, SnapshotError> {
        let state: GovernanceState = bincode::deserialize(data).map_err(SnapshotError::Decode)?;
        Ok(Self::from_inner(
            clock,
            Inner {
                state,
                log: Vec::new(),
            },
        ))
    }
}

fn apply(
    state: &mut GovernanceState,
    caller: &Address,
    op: Operation,
    now: Timestamp,
) -> Result<GovernanceEvent, GovernanceError> {
    match op {
        Operation::AddProposal { name } => state.registry.add_proposal(caller, name),
        Operation::Vote { index } => state.registry.vote(caller, index),
        Operation::Delegate { target } => state.registry.delegate(caller, &target),
        Operation::ChangeChairperson { chairperson } => {
            state.registry.change_chairperson(caller, &chairperson)
        }
        Operation::CreateProposal {
            description,
            duration_secs,
        } => state
            .hub
            .create_proposal(caller, description, duration_secs, now),
        Operation::CastBallot { id, support } => state.hub.vote(caller, id, support, now),
        Operation::ExecuteProposal { id } => state.hub.execute_proposal(caller, id, now),
    }
}
