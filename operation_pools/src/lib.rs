#![allow(dead_code)]

pub mod attestation_manager;
pub mod attestation_pool;
pub mod pending_block_pool;
pub mod slashing_pools;

pub use attestation_manager::AttestationManager;
pub use attestation_pool::AttestationPool;
pub use pending_block_pool::PendingBlockPool;
pub use slashing_pools::{AttesterSlashingPool, ProposerSlashingPool, VoluntaryExitPool};
