//! Peer chain validation, run once per peer after the `status` handshake.
//! Kept independent of the swarm so it can be unit-tested without a
//! running libp2p transport.

use eth2_network::{GoodbyeReason, Status};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PeerValidationOutcome {
    /// The peer's finalized chain is compatible with ours; keep the peer.
    Compatible,
    /// Ask the peer for the block at our finalized epoch and compare it
    /// against `expected_root` before accepting or rejecting the peer.
    NeedsBlockAt { finalized_epoch: types::primitives::Epoch, expected_root: types::primitives::H256 },
    /// The peer's advertised finalized root conflicts with our finalized history.
    Disconnect(GoodbyeReason),
}

/// Implements the peer chain validation rule: if the peer is behind us,
/// our own stored block at the peer's finalized epoch must equal the
/// peer's advertised finalized root (else `IRRELEVANT_NETWORK`). If the
/// peer is ahead, we must fetch and check our finalized epoch's block from
/// them (handled by the caller once it receives `NeedsBlockAt`).
pub fn validate_peer_status(
    local: &Status,
    remote: &Status,
    local_block_root_at_finalized_epoch: impl Fn(types::primitives::Epoch) -> Option<types::primitives::H256>,
) -> PeerValidationOutcome {
    if remote.finalized_epoch < local.finalized_epoch {
        match local_block_root_at_finalized_epoch(remote.finalized_epoch) {
            Some(root) if root == remote.finalized_root => PeerValidationOutcome::Compatible,
            Some(_) => PeerValidationOutcome::Disconnect(GoodbyeReason::IrrelevantNetwork),
            None => PeerValidationOutcome::Disconnect(GoodbyeReason::UnableToVerifyNetwork),
        }
    } else if remote.finalized_epoch > local.finalized_epoch {
        PeerValidationOutcome::NeedsBlockAt {
            finalized_epoch: local.finalized_epoch,
            expected_root: local.finalized_root,
        }
    } else {
        PeerValidationOutcome::Compatible
    }
}

/// Resolves a deferred `NeedsBlockAt` check once the peer's response arrives.
pub fn validate_fetched_block(expected_root: types::primitives::H256, fetched: Option<types::primitives::H256>) -> PeerValidationOutcome {
    match fetched {
        Some(root) if root == expected_root => PeerValidationOutcome::Compatible,
        Some(_) => PeerValidationOutcome::Disconnect(GoodbyeReason::IrrelevantNetwork),
        None => PeerValidationOutcome::Disconnect(GoodbyeReason::UnableToVerifyNetwork),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eth2_network::ForkDigest;
    use types::primitives::H256;

    fn status(finalized_epoch: u64, finalized_root: H256) -> Status {
        Status {
            fork_digest: ForkDigest::default(),
            finalized_root,
            finalized_epoch,
            head_root: H256::zero(),
            head_slot: 0,
        }
    }

    #[test]
    fn agreeing_peer_behind_us_is_compatible() {
        let root = H256::repeat_byte(1);
        let local = status(10, H256::repeat_byte(9));
        let remote = status(3, root);
        let outcome = validate_peer_status(&local, &remote, |_| Some(root));
        assert_eq!(outcome, PeerValidationOutcome::Compatible);
    }

    #[test]
    fn disagreeing_peer_behind_us_is_irrelevant() {
        let local = status(10, H256::repeat_byte(9));
        let remote = status(3, H256::repeat_byte(1));
        let outcome = validate_peer_status(&local, &remote, |_| Some(H256::repeat_byte(2)));
        assert_eq!(outcome, PeerValidationOutcome::Disconnect(GoodbyeReason::IrrelevantNetwork));
    }

    #[test]
    fn unresponsive_peer_behind_us_is_unable_to_verify() {
        let local = status(10, H256::repeat_byte(9));
        let remote = status(3, H256::repeat_byte(1));
        let outcome = validate_peer_status(&local, &remote, |_| None);
        assert_eq!(outcome, PeerValidationOutcome::Disconnect(GoodbyeReason::UnableToVerifyNetwork));
    }

    #[test]
    fn peer_ahead_of_us_needs_a_block_fetch() {
        let local = status(3, H256::repeat_byte(9));
        let remote = status(10, H256::repeat_byte(1));
        let outcome = validate_peer_status(&local, &remote, |_| None);
        assert!(matches!(outcome, PeerValidationOutcome::NeedsBlockAt { .. }));
    }
}
