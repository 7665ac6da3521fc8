use types::{
    beacon_state::BeaconState,
    config::Config,
    primitives::*,
    types::{AttestationData, IndexedAttestation, Validator},
};
use typenum::marker_traits::Unsigned;

use bls::AggregateSignature;

use crate::{beacon_state_accessors::get_domain, crypto::hash, error::Error};

pub fn is_slashable_validator(validator: &Validator, epoch: Epoch) -> bool {
    !validator.slashed
        && validator.activation_epoch <= epoch
        && epoch < validator.withdrawable_epoch
}

pub fn is_active_validator(validator: &Validator, epoch: Epoch) -> bool {
    validator.activation_epoch <= epoch && epoch < validator.exit_epoch
}

pub fn is_slashable_attestation_data(data_1: &AttestationData, data_2: &AttestationData) -> bool {
    // Double vote
    (data_1 != data_2 && data_1.target.epoch == data_2.target.epoch) ||
    // Surround vote
    (data_1.source.epoch < data_2.source.epoch && data_2.target.epoch < data_1.target.epoch)
}

/// Checks the structural and cryptographic validity of an
/// `IndexedAttestation`: `attesting_indices` must be non-empty, within the
/// per-committee size limit, strictly ascending with no duplicates, and the
/// aggregate signature must verify against the signing root of its `data`.
pub fn validate_indexed_attestation<C: Config>(
    state: &BeaconState<C>,
    indexed_attestation: &IndexedAttestation<C>,
) -> Result<(), Error> {
    let indices = &indexed_attestation.attesting_indices;

    if indices.is_empty() {
        return Err(Error::ArrayIsEmpty);
    }
    if indices.len() > C::MaxValidatorsPerCommittee::to_usize() {
        return Err(Error::IndicesExceedMaxValidators);
    }
    if !indices.windows(2).all(|pair| pair[0] < pair[1]) {
        return Err(Error::IndicesNotSorted);
    }

    let public_keys = indices
        .iter()
        .map(|index| {
            usize::try_from(*index)
                .map_err(|_| Error::ConversionToUsize)
                .and_then(|id| {
                    state
                        .validators
                        .get(id)
                        .ok_or(Error::IndexOutOfRange)
                        .and_then(|validator| {
                            validator
                                .pubkey
                                .try_into_public_key()
                                .map_err(|_| Error::PubKeyConversionError)
                        })
                })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let public_key_refs = public_keys.iter().collect::<Vec<_>>();

    let domain = get_domain(
        state,
        C::domain_beacon_attester(),
        Some(indexed_attestation.data.target.epoch),
    );
    let signing_root = crate::misc::compute_signing_root(&indexed_attestation.data, domain);

    let aggregate_signature = AggregateSignature::from_bytes(indexed_attestation.signature.as_bytes())
        .map_err(|_| Error::SignatureConversionError)?;

    if !aggregate_signature.fast_aggregate_verify(signing_root.as_bytes(), &public_key_refs) {
        return Err(Error::InvalidSignature);
    }

    Ok(())
}

pub fn is_valid_merkle_branch<C: Config>(
    leaf: &H256,
    branch: &[H256],
    depth: u64,
    index: u64,
    root: &H256,
) -> Result<bool, Error> {
    let mut value: H256 = *leaf;

    for i in 0..depth {
        if index / (1 << i) % 2 == 0 {
            value = H256::from_slice(&hash(&join_hashes(&value, &branch[i as usize])));
        } else {
            value = H256::from_slice(&hash(&join_hashes(&branch[i as usize], &value)));
        }
    }

    Ok(value == *root)
}

fn join_hashes<'a>(hash1: &'a H256, hash2: &H256) -> Vec<u8> {
    hash1
        .as_ref()
        .iter()
        .chain(hash2.as_ref())
        .copied()
        .collect::<Vec<u8>>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MainnetConfig;
    use types::types::Checkpoint;

    #[test]
    fn test_is_slashable_validator() {
        let v = Validator {
            slashed: false,
            activation_epoch: 0,
            withdrawable_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 0), true);
    }

    #[test]
    fn test_is_slashable_validator_already_slashed() {
        let v = Validator {
            slashed: true,
            activation_epoch: 0,
            withdrawable_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 0), false);
    }

    #[test]
    fn test_is_slashable_validator_activation_epoch_greater_than_epoch() {
        let v = Validator {
            slashed: false,
            activation_epoch: 1,
            withdrawable_epoch: 2,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 0), false);
    }

    #[test]
    fn test_is_slashable_validator_withdrawable_epoch_equals_epoch() {
        let v = Validator {
            slashed: false,
            activation_epoch: 0,
            withdrawable_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_slashable_validator(&v, 1), false);
    }

    #[test]
    fn test_is_active_validator() {
        let v = Validator {
            activation_epoch: 0,
            exit_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_active_validator(&v, 0), true);
    }

    #[test]
    fn test_is_active_validator_activation_epoch_greater_than_epoch() {
        let v = Validator {
            activation_epoch: 1,
            exit_epoch: 2,
            ..Validator::default()
        };
        assert_eq!(is_active_validator(&v, 0), false);
    }

    #[test]
    fn test_is_active_validator_exit_epoch_equals_epoch() {
        let v = Validator {
            activation_epoch: 0,
            exit_epoch: 1,
            ..Validator::default()
        };
        assert_eq!(is_active_validator(&v, 1), false);
    }

    #[test]
    fn test_is_slashable_attestation_data_double_vote_false() {
        let attestation_data_1 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        let attestation_data_2 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        assert_eq!(
            is_slashable_attestation_data(&attestation_data_1, &attestation_data_2),
            false
        );
    }

    #[test]
    fn test_is_slashable_attestation_data_double_vote_true() {
        let attestation_data_1 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        let attestation_data_2 = AttestationData {
            target: Checkpoint {
                epoch: 1,
                root: H256::from([1; 32]),
            },
            ..AttestationData::default()
        };
        assert_eq!(
            is_slashable_attestation_data(&attestation_data_1, &attestation_data_2),
            true
        );
    }

    #[test]
    fn test_is_slashable_attestation_data_surround_vote_true() {
        let attestation_data_1 = AttestationData {
            source: Checkpoint {
                epoch: 0,
                root: H256::from([0; 32]),
            },
            target: Checkpoint {
                epoch: 3,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        let attestation_data_2 = AttestationData {
            source: Checkpoint {
                epoch: 1,
                root: H256::from([1; 32]),
            },
            target: Checkpoint {
                epoch: 2,
                root: H256::from([0; 32]),
            },
            ..AttestationData::default()
        };
        assert_eq!(
            is_slashable_attestation_data(&attestation_data_1, &attestation_data_2),
            true
        );
    }

    #[test]
    fn test_validate_indexed_attestation_empty_indices() {
        let state: BeaconState<MainnetConfig> = BeaconState::default();
        let attestation: IndexedAttestation<MainnetConfig> = IndexedAttestation::default();
        assert_eq!(
            validate_indexed_attestation(&state, &attestation),
            Err(Error::ArrayIsEmpty)
        );
    }

    #[test]
    fn test_validate_indexed_attestation_indices_not_sorted() {
        use ssz_types::VariableList;

        let state: BeaconState<MainnetConfig> = BeaconState::default();
        let attestation: IndexedAttestation<MainnetConfig> = IndexedAttestation {
            attesting_indices: VariableList::from(vec![2_u64, 1_u64]),
            ..IndexedAttestation::default()
        };
        assert_eq!(
            validate_indexed_attestation(&state, &attestation),
            Err(Error::IndicesNotSorted)
        );
    }
}
