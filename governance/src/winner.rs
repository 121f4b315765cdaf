//! Leading-proposal selection for the voting registry.

use crate::error::GovernanceError;
use crate::proposal::{Proposal, ProposalId, ProposalStore};

/// Index of the proposal with the strictly greatest vote count.
///
/// Ties go to the lowest index. With no votes at all (or no proposals) this
/// is 0, which does not mean proposal 0 is leading.
pub fn winning_proposal(proposals: &ProposalStore<Proposal>) -> ProposalId {
    let mut winner = 0;
    let mut best = 0u64;
    for (index, proposal) in proposals.iter().enumerate() {
        if proposal.vote_count > best {
            best = proposal.vote_count;
            winner = index as ProposalId;
        }
    }
    winner
}

/// Name of the proposal returned by [`winning_proposal`].
pub fn winner_name(proposals: &ProposalStore<Proposal>) -> Result<&str, GovernanceError> {
    proposals
        .get(winning_proposal(proposals))
        .map(|p| p.name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(counts: &[u64]) -> ProposalStore<Proposal> {
        let mut s = ProposalStore::new();
        for (i, &count) in counts.iter().enumerate() {
            s.push_with(|_| Proposal {
                name: format!("Proposal {i}"),
                vote_count: count,
            });
        }
        s
    }

    #[test]
    fn highest_count_wins() {
        assert_eq!(winning_proposal(&store(&[1, 2, 0])), 1);
        assert_eq!(winner_name(&store(&[0, 0, 2])).unwrap(), "Proposal 2");
    }

    #[test]
    fn tie_goes_to_first_index() {
        assert_eq!(winning_proposal(&store(&[1, 1, 0])), 0);
        assert_eq!(winning_proposal(&store(&[0, 3, 3])), 1);
    }

    #[test]
    fn no_votes_defaults_to_zero() {
        assert_eq!(winning_proposal(&store(&[0, 0, 0])), 0);
        assert_eq!(winning_proposal(&store(&[])), 0);
    }

    #[test]
    fn empty_store_has_no_winner_name() {
        assert_eq!(
            winner_name(&store(&[])).unwrap_err(),
            GovernanceError::InvalidProposalIndex(0)
        );
    }
}
