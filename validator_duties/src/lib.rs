#![allow(dead_code)]

pub mod duties;
pub mod scheduler;

pub use duties::{compute_attestation_duty, compute_proposer_duties, AttestationDuty, ProposerDuty};
pub use scheduler::{Duty, DutyScheduler};
