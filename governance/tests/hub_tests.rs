//! Behavioral tests for the quorum-gated governance hub.

use agora_governance::{GovernanceError, GovernanceEvent, GovernanceHub, ProposalPhase, Role};
use agora_nullables::NullClock;
use agora_types::{Address, Clock, Timestamp};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const QUORUM: u64 = 3;
const VOTING_DURATION: u64 = 86_400;
const START: u64 = 1_700_000_000;

const AUTHORITY: Address = Address::repeat_byte(0xaa);
const VOTER1: Address = Address::repeat_byte(0x11);
const VOTER2: Address = Address::repeat_byte(0x22);
const VOTER3: Address = Address::repeat_byte(0x33);

fn deploy() -> (GovernanceHub, NullClock) {
    (
        GovernanceHub::new(QUORUM, AUTHORITY).expect("deploy"),
        NullClock::new(START),
    )
}

/// A hub with proposal 0 open and three supporting ballots.
fn with_quorum_met() -> (GovernanceHub, NullClock) {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now())
        .unwrap();
    for voter in [VOTER1, VOTER2, VOTER3] {
        hub.vote(&voter, 0, true, clock.now()).unwrap();
    }
    (hub, clock)
}

// ---------------------------------------------------------------------------
// Deployment
// ---------------------------------------------------------------------------

#[test]
fn deployment_parameters() {
    let (hub, _) = deploy();
    assert_eq!(hub.quorum(), QUORUM);
    assert_eq!(hub.execution_authority(), AUTHORITY);
    assert_eq!(hub.proposal_count(), 0);
}

#[test]
fn zero_execution_authority_rejected() {
    assert_eq!(
        GovernanceHub::new(QUORUM, Address::ZERO).unwrap_err(),
        GovernanceError::ZeroAddress
    );
}

// ---------------------------------------------------------------------------
// createProposal
// ---------------------------------------------------------------------------

#[test]
fn create_proposal_fields_and_event() {
    let (mut hub, clock) = deploy();
    let event = hub
        .create_proposal(&VOTER1, "Upgrade protocol to v2", VOTING_DURATION, clock.now())
        .unwrap();
    assert_eq!(
        event,
        GovernanceEvent::ProposalCreated {
            id: 0,
            proposer: VOTER1,
            description: "Upgrade protocol to v2".into(),
            deadline: Timestamp::new(START + VOTING_DURATION),
        }
    );
    let p = hub.proposal(0).unwrap();
    assert_eq!(p.proposer, VOTER1);
    assert_eq!(p.description, "Upgrade protocol to v2");
    assert_eq!((p.votes_for, p.votes_against), (0, 0));
    assert!(!p.executed);
}

#[test]
fn proposal_count_increments() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Proposal 1", VOTING_DURATION, clock.now()).unwrap();
    hub.create_proposal(&VOTER2, "Proposal 2", VOTING_DURATION, clock.now()).unwrap();
    assert_eq!(hub.proposal_count(), 2);
}

#[test]
fn empty_description_rejected() {
    let (mut hub, clock) = deploy();
    assert_eq!(
        hub.create_proposal(&VOTER1, "", VOTING_DURATION, clock.now()).unwrap_err(),
        GovernanceError::EmptyDescription
    );
    assert_eq!(hub.proposal_count(), 0);
}

// ---------------------------------------------------------------------------
// vote
// ---------------------------------------------------------------------------

#[test]
fn vote_for() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now()).unwrap();
    let event = hub.vote(&VOTER1, 0, true, clock.now()).unwrap();
    assert_eq!(event, GovernanceEvent::Voted { id: 0, voter: VOTER1, support: true });
    let p = hub.proposal(0).unwrap();
    assert_eq!((p.votes_for, p.votes_against), (1, 0));
}

#[test]
fn vote_against() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now()).unwrap();
    hub.vote(&VOTER1, 0, false, clock.now()).unwrap();
    let p = hub.proposal(0).unwrap();
    assert_eq!((p.votes_for, p.votes_against), (0, 1));
}

#[test]
fn double_ballot_rejected() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now()).unwrap();
    hub.vote(&VOTER1, 0, true, clock.now()).unwrap();
    assert!(matches!(
        hub.vote(&VOTER1, 0, false, clock.now()).unwrap_err(),
        GovernanceError::AlreadyVoted { voter: VOTER1, .. }
    ));
    assert_eq!(hub.proposal(0).unwrap().votes_against, 0);
}

#[test]
fn vote_after_deadline_rejected() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now()).unwrap();
    clock.advance(VOTING_DURATION + 1);
    assert_eq!(
        hub.vote(&VOTER1, 0, true, clock.now()).unwrap_err(),
        GovernanceError::VotingClosed(0)
    );
}

#[test]
fn vote_on_unknown_proposal_rejected() {
    let (mut hub, clock) = deploy();
    assert_eq!(
        hub.vote(&VOTER1, 0, true, clock.now()).unwrap_err(),
        GovernanceError::InvalidProposalIndex(0)
    );
}

#[test]
fn multiple_voters_tracked() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Test proposal", VOTING_DURATION, clock.now()).unwrap();
    hub.vote(&VOTER1, 0, true, clock.now()).unwrap();
    hub.vote(&VOTER2, 0, true, clock.now()).unwrap();
    hub.vote(&VOTER3, 0, false, clock.now()).unwrap();
    let p = hub.proposal(0).unwrap();
    assert_eq!((p.votes_for, p.votes_against), (2, 1));
}

// ---------------------------------------------------------------------------
// executeProposal
// ---------------------------------------------------------------------------

#[test]
fn execute_after_deadline_with_quorum() {
    let (mut hub, clock) = with_quorum_met();
    clock.advance(VOTING_DURATION + 1);
    let event = hub.execute_proposal(&AUTHORITY, 0, clock.now()).unwrap();
    assert_eq!(event, GovernanceEvent::ProposalExecuted { id: 0 });
    assert!(hub.proposal(0).unwrap().executed);
    assert_eq!(hub.phase(0, clock.now()).unwrap(), ProposalPhase::Executed);
}

#[test]
fn execute_before_deadline_rejected() {
    let (mut hub, clock) = with_quorum_met();
    assert_eq!(
        hub.execute_proposal(&AUTHORITY, 0, clock.now()).unwrap_err(),
        GovernanceError::ProposalStillActive(0)
    );
    assert!(!hub.proposal(0).unwrap().executed);
}

#[test]
fn execute_without_quorum_rejected() {
    let (mut hub, clock) = with_quorum_met();
    hub.create_proposal(&VOTER1, "Low vote proposal", VOTING_DURATION, clock.now()).unwrap();
    hub.vote(&VOTER1, 1, true, clock.now()).unwrap();
    clock.advance(VOTING_DURATION + 1);
    assert_eq!(
        hub.execute_proposal(&AUTHORITY, 1, clock.now()).unwrap_err(),
        GovernanceError::QuorumNotReached { have: 1, need: QUORUM }
    );
}

#[test]
fn double_execution_rejected() {
    let (mut hub, clock) = with_quorum_met();
    clock.advance(VOTING_DURATION + 1);
    hub.execute_proposal(&AUTHORITY, 0, clock.now()).unwrap();
    assert_eq!(
        hub.execute_proposal(&AUTHORITY, 0, clock.now()).unwrap_err(),
        GovernanceError::AlreadyExecuted(0)
    );
}

#[test]
fn non_authority_execution_rejected() {
    let (mut hub, clock) = with_quorum_met();
    clock.advance(VOTING_DURATION + 1);
    assert_eq!(
        hub.execute_proposal(&VOTER1, 0, clock.now()).unwrap_err(),
        GovernanceError::Unauthorized { caller: VOTER1, role: Role::ExecutionAuthority }
    );
}

#[test]
fn quorum_counts_mixed_votes() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Quorum test", VOTING_DURATION, clock.now()).unwrap();
    hub.vote(&VOTER1, 0, true, clock.now()).unwrap();
    hub.vote(&VOTER2, 0, false, clock.now()).unwrap();
    hub.vote(&VOTER3, 0, true, clock.now()).unwrap();
    clock.advance(VOTING_DURATION + 1);
    assert!(hub.execute_proposal(&AUTHORITY, 0, clock.now()).is_ok());
}

#[test]
fn losing_proposal_still_executes_once_quorum_met() {
    let (mut hub, clock) = deploy();
    hub.create_proposal(&VOTER1, "Unpopular", VOTING_DURATION, clock.now()).unwrap();
    for voter in [VOTER1, VOTER2, VOTER3] {
        hub.vote(&voter, 0, false, clock.now()).unwrap();
    }
    clock.advance(VOTING_DURATION + 1);
    assert!(hub.execute_proposal(&AUTHORITY, 0, clock.now()).is_ok());
}
