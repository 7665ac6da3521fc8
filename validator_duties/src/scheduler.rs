//! Slot-keyed deferred work for produced duties. A duty fires only when
//! its own deadline slot arrives: one that fires early (wall-clock drift)
//! stays deferred, one whose deadline has already passed is discarded
//! rather than retried.

use std::collections::BTreeMap;

use types::primitives::{CommitteeIndex, Slot, ValidatorIndex};

use crate::duties::{AttestationDuty, ProposerDuty};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Duty {
    AttestationProduction { committee_index: CommitteeIndex, validator_index: ValidatorIndex },
    BlockProduction { validator_index: ValidatorIndex },
}

/// Two independent deadlines per slot: block production at slot start,
/// attestation production at slot start + ⅓ `SECONDS_PER_SLOT`. Kept as
/// separate maps since they're driven by distinct wall-clock events.
#[derive(Default)]
pub struct DutyScheduler {
    block_duties: BTreeMap<Slot, Vec<Duty>>,
    attestation_duties: BTreeMap<Slot, Vec<Duty>>,
}

impl DutyScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule_proposer_duties(&mut self, duties: &[ProposerDuty]) {
        for duty in duties {
            self.block_duties
                .entry(duty.slot)
                .or_default()
                .push(Duty::BlockProduction { validator_index: duty.validator_index });
        }
    }

    pub fn schedule_attestation_duties(&mut self, duties: &[AttestationDuty]) {
        for duty in duties {
            self.attestation_duties.entry(duty.slot).or_default().push(Duty::AttestationProduction {
                committee_index: duty.committee_index,
                validator_index: duty.validator_index,
            });
        }
    }

    /// Called on slot start. Releases block-production duties due exactly
    /// at `slot`; duties for slots before `slot` that were never released
    /// (a missed deadline) are dropped, never retried. Duties for slots
    /// after `slot` are left deferred.
    pub fn on_slot_start(&mut self, slot: Slot) -> Vec<Duty> {
        release_due(&mut self.block_duties, slot)
    }

    /// Called at slot start + ⅓ `SECONDS_PER_SLOT`. Same discard/defer
    /// rule as `on_slot_start`, for attestation-production duties.
    pub fn on_attestation_time(&mut self, slot: Slot) -> Vec<Duty> {
        release_due(&mut self.attestation_duties, slot)
    }
}

fn release_due(queue: &mut BTreeMap<Slot, Vec<Duty>>, slot: Slot) -> Vec<Duty> {
    queue.retain(|&due_slot, _| due_slot >= slot);
    queue.remove(&slot).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missed_block_duty_is_discarded_not_retried() {
        let mut scheduler = DutyScheduler::new();
        scheduler.schedule_proposer_duties(&[ProposerDuty { slot: 5, validator_index: 1 }]);

        assert!(scheduler.on_slot_start(6).is_empty());
        assert!(scheduler.on_slot_start(5).is_empty());
    }

    #[test]
    fn early_fired_duty_stays_deferred_until_its_slot() {
        let mut scheduler = DutyScheduler::new();
        scheduler.schedule_proposer_duties(&[ProposerDuty { slot: 5, validator_index: 1 }]);

        assert!(scheduler.on_slot_start(4).is_empty());
        assert_eq!(scheduler.on_slot_start(5).len(), 1);
    }

    #[test]
    fn attestation_duties_fire_independently_of_block_duties() {
        let mut scheduler = DutyScheduler::new();
        scheduler.schedule_attestation_duties(&[AttestationDuty { slot: 3, committee_index: 0, validator_index: 2 }]);
        assert!(scheduler.on_slot_start(3).is_empty());
        assert_eq!(scheduler.on_attestation_time(3).len(), 1);
    }
}
