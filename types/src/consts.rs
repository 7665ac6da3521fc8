pub use crate::primitives::{Epoch, Gwei, Slot, ValidatorIndex};

pub const BASE_REWARDS_PER_EPOCH: u64 = 4;
pub const GENESIS_EPOCH: Epoch = 0;
pub const GENESIS_SLOT: Slot = 0;
pub const JUSTIFICATION_BITS_LENGTH: usize = 4;
pub const SECONDS_PER_DAY: u64 = 86_400;
pub const DEPOSIT_CONTRACT_TREE_DEPTH: u64 = 32;
pub const FAR_FUTURE_EPOCH: Epoch = u64::MAX;
pub type DepositContractTreeDepth = typenum::U32;
pub type JustificationBitsLength = typenum::U4;

/// Minimum number of slots that must pass between an attestation's slot and
/// the slot at which it may be included in a block.
pub const MIN_ATTESTATION_INCLUSION_DELAY: Slot = 1;

/// Number of attestation gossip subnets, independent of validator/committee
/// count.
pub const ATTESTATION_SUBNET_COUNT: u64 = 64;

/// Wire-protocol request bounds (spec.md §4.8/§4.9).
pub const MAX_BLOCKS_BY_RANGE: u64 = 1024;
pub const MAX_BLOCKS_BY_ROOT: u64 = 1024;

/// Resource-policy bounds (spec.md §5).
pub const MAX_PENDING_BLOCKS: usize = 256;
pub const MAX_PENDING_ATTESTATIONS: usize = 4096;
pub const MIN_EPOCHS_FOR_BLOCK_REQUESTS: Epoch = 33_024 / 32;

/// Sync-engine batch sizing (spec.md §4.9); expressed in slots.
pub const SYNC_BATCH_SIZE: Slot = MAX_BLOCKS_BY_RANGE;

/// Domain-separation tag fed into `hash_to_curve` by the crypto adapter
/// (spec.md §4.2).
pub const BLS_SIG_DOMAIN_TAG: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";
