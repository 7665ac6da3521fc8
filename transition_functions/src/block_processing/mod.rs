use std::collections::BTreeSet;
use std::convert::TryFrom;

use helper_functions::beacon_state_accessors::{
    get_beacon_committee, get_beacon_proposer_index, get_committee_count_at_slot,
    get_current_epoch, get_domain, get_indexed_attestation, get_previous_epoch, get_randao_mix,
};
use helper_functions::beacon_state_mutators::{increase_balance, initiate_validator_exit, slash_validator};
use helper_functions::crypto::{bls_verify, hash, hash_tree_root};
use helper_functions::misc::{compute_domain, compute_epoch_at_slot, compute_signing_root};
use helper_functions::predicates::{
    is_active_validator, is_slashable_attestation_data, is_slashable_validator,
    is_valid_merkle_branch, validate_indexed_attestation,
};
use typenum::marker_traits::Unsigned;
use types::consts::*;
use types::{
    beacon_state::BeaconState,
    config::Config,
    consts::DEPOSIT_CONTRACT_TREE_DEPTH,
    primitives::H256,
    types::{
        Attestation, AttesterSlashing, BeaconBlock, BeaconBlockBody, BeaconBlockHeader, Deposit,
        DepositData, DepositMessage, PendingAttestation, ProposerSlashing, SignedBeaconBlockHeader,
        SignedVoluntaryExit, Validator,
    },
};

pub fn process_block<T: Config>(state: &mut BeaconState<T>, block: &BeaconBlock<T>) {
    process_block_header(state, block);
    process_randao(state, &block.body);
    process_eth1_data(state, &block.body);
    process_operations(state, &block.body);
}

fn process_voluntary_exit<T: Config>(
    state: &mut BeaconState<T>,
    signed_voluntary_exit: &SignedVoluntaryExit,
) {
    let voluntary_exit = &signed_voluntary_exit.message;
    let validator = &state.validators
        [usize::try_from(voluntary_exit.validator_index).expect("conversion error")];
    assert!(is_active_validator(validator, get_current_epoch(state)));
    assert!(validator.exit_epoch == FAR_FUTURE_EPOCH);
    assert!(get_current_epoch(state) >= voluntary_exit.epoch);
    assert!(
        get_current_epoch(state) >= validator.activation_epoch + T::persistent_committee_period()
    );

    let domain = get_domain(state, T::domain_voluntary_exit(), Some(voluntary_exit.epoch));
    let signing_root = compute_signing_root(voluntary_exit, domain);
    assert!(bls_verify(
        &validator.pubkey,
        signing_root.as_bytes(),
        &signed_voluntary_exit.signature,
    )
    .expect("BLS error"));

    initiate_validator_exit(state, voluntary_exit.validator_index).expect("exit error");
}

fn process_deposit<T: Config>(state: &mut BeaconState<T>, deposit: &Deposit) {
    assert!(is_valid_merkle_branch::<T>(
        &hash_tree_root(&deposit.data),
        &deposit.proof,
        DEPOSIT_CONTRACT_TREE_DEPTH + 1,
        state.eth1_deposit_index,
        &state.eth1_data.deposit_root,
    )
    .expect("merkle error"));

    state.eth1_deposit_index += 1;

    let DepositData {
        pubkey,
        withdrawal_credentials,
        amount,
        signature,
    } = &deposit.data;

    for (index, validator) in state.validators.iter().enumerate() {
        if validator.pubkey == *pubkey {
            increase_balance(state, index as u64, *amount);
            return;
        }
    }

    // Deposits are valid across forks, so the deposit domain is retrieved
    // directly from `compute_domain` rather than `get_domain`.
    let domain = compute_domain::<T>(T::domain_deposit(), None);
    let deposit_message = DepositMessage {
        pubkey: *pubkey,
        withdrawal_credentials: *withdrawal_credentials,
        amount: *amount,
    };
    let signing_root = compute_signing_root(&deposit_message, domain);

    if !bls_verify(pubkey, signing_root.as_bytes(), signature).expect("BLS error") {
        return;
    }

    state
        .validators
        .push(Validator {
            pubkey: *pubkey,
            withdrawal_credentials: *withdrawal_credentials,
            activation_eligibility_epoch: FAR_FUTURE_EPOCH,
            activation_epoch: FAR_FUTURE_EPOCH,
            exit_epoch: FAR_FUTURE_EPOCH,
            withdrawable_epoch: FAR_FUTURE_EPOCH,
            effective_balance: std::cmp::min(
                amount - (amount % T::effective_balance_increment()),
                T::max_effective_balance(),
            ),
            slashed: false,
        })
        .expect("push error");
    state.balances.push(*amount).expect("push error");
}

fn process_block_header<T: Config>(state: &mut BeaconState<T>, block: &BeaconBlock<T>) {
    assert!(block.slot == state.slot);
    assert!(block.proposer_index == get_beacon_proposer_index(state).expect("proposer error"));
    assert!(block.parent_root == hash_tree_root(&state.latest_block_header));

    state.latest_block_header = BeaconBlockHeader {
        slot: block.slot,
        proposer_index: block.proposer_index,
        parent_root: block.parent_root,
        // `state_root` is zeroed and overwritten in the next `process_slot` call.
        body_root: hash_tree_root(&block.body),
        state_root: H256::zero(),
    };

    let proposer = &state.validators
        [usize::try_from(block.proposer_index).expect("conversion error")];
    assert!(!proposer.slashed);
}

fn process_randao<T: Config>(state: &mut BeaconState<T>, body: &BeaconBlockBody<T>) {
    let epoch = get_current_epoch(state);
    let proposer_index = get_beacon_proposer_index(state).expect("proposer error");
    let proposer = &state.validators[usize::try_from(proposer_index).expect("conversion error")];

    let signing_root = compute_signing_root(&epoch, get_domain(state, T::domain_randao(), None));
    assert!(bls_verify(
        &proposer.pubkey,
        signing_root.as_bytes(),
        &body.randao_reveal,
    )
    .expect("BLS error"));

    let previous_mix = get_randao_mix(state, epoch).expect("randao error");
    let revealed_hash = hash(body.randao_reveal.as_bytes());
    let mut mix = [0; 32];
    for i in 0..32 {
        mix[i] = previous_mix.as_bytes()[i] ^ revealed_hash[i];
    }

    let id = usize::try_from(epoch % T::EpochsPerHistoricalVector::to_u64())
        .expect("conversion error");
    state.randao_mixes[id] = H256::from(mix);
}

fn process_proposer_slashing<T: Config>(
    state: &mut BeaconState<T>,
    proposer_slashing: &ProposerSlashing,
) {
    let proposer_index = proposer_slashing.proposer_index;
    let proposer = state.validators
        [usize::try_from(proposer_index).expect("conversion error")]
    .clone();

    assert_eq!(
        proposer_slashing.signed_header_1.message.slot,
        proposer_slashing.signed_header_2.message.slot
    );
    assert_ne!(
        proposer_slashing.signed_header_1,
        proposer_slashing.signed_header_2
    );
    assert!(is_slashable_validator(&proposer, get_current_epoch(state)));

    let signed_headers: [SignedBeaconBlockHeader; 2] = [
        proposer_slashing.signed_header_1.clone(),
        proposer_slashing.signed_header_2.clone(),
    ];
    for signed_header in &signed_headers {
        let domain = get_domain(
            state,
            T::domain_beacon_proposer(),
            Some(compute_epoch_at_slot::<T>(signed_header.message.slot)),
        );
        let signing_root = compute_signing_root(&signed_header.message, domain);
        assert!(bls_verify(
            &proposer.pubkey,
            signing_root.as_bytes(),
            &signed_header.signature,
        )
        .expect("BLS error"));
    }

    slash_validator(state, proposer_index, None).expect("slash error");
}

fn process_attester_slashing<T: Config>(
    state: &mut BeaconState<T>,
    attester_slashing: &AttesterSlashing<T>,
) {
    let attestation_1 = &attester_slashing.attestation_1;
    let attestation_2 = &attester_slashing.attestation_2;
    assert!(is_slashable_attestation_data(
        &attestation_1.data,
        &attestation_2.data
    ));
    assert!(validate_indexed_attestation(state, attestation_1).is_ok());
    assert!(validate_indexed_attestation(state, attestation_2).is_ok());

    let attesting_indices_1 = attestation_1
        .attesting_indices
        .iter()
        .copied()
        .collect::<BTreeSet<_>>();
    let attesting_indices_2 = attestation_2
        .attesting_indices
        .iter()
        .copied()
        .collect::<BTreeSet<_>>();

    let mut slashed_any = false;
    for index in &attesting_indices_1 & &attesting_indices_2 {
        let validator = &state.validators[usize::try_from(index).expect("conversion error")];
        if is_slashable_validator(validator, get_current_epoch(state)) {
            slash_validator(state, index, None).expect("slash error");
            slashed_any = true;
        }
    }
    assert!(slashed_any);
}

fn process_attestation<T: Config>(
    state: &mut BeaconState<T>,
    attestation: &Attestation<T>,
    verify_signature: bool,
) {
    let data = &attestation.data;
    let attestation_slot = data.slot;
    assert!(data.index < get_committee_count_at_slot(state, attestation_slot).expect("committee error"));
    assert!(
        data.target.epoch == get_previous_epoch(state)
            || data.target.epoch == get_current_epoch(state)
    );
    assert!(
        attestation_slot + T::min_attestation_inclusion_delay() <= state.slot
            && state.slot <= attestation_slot + T::SlotsPerEpoch::to_u64()
    );

    let committee =
        get_beacon_committee(state, attestation_slot, data.index).expect("beacon committee error");
    assert_eq!(attestation.aggregation_bits.len(), committee.len());

    let pending_attestation = PendingAttestation {
        data: attestation.data.clone(),
        aggregation_bits: attestation.aggregation_bits.clone(),
        inclusion_delay: state.slot - attestation_slot,
        proposer_index: get_beacon_proposer_index(state).expect("proposer error"),
    };

    if data.target.epoch == get_current_epoch(state) {
        assert_eq!(data.source, state.current_justified_checkpoint);
        state
            .current_epoch_attestations
            .push(pending_attestation)
            .expect("push error");
    } else {
        assert_eq!(data.source, state.previous_justified_checkpoint);
        state
            .previous_epoch_attestations
            .push(pending_attestation)
            .expect("push error");
    }

    if verify_signature {
        let indexed_attestation =
            get_indexed_attestation(state, attestation).expect("attestation error");
        assert!(validate_indexed_attestation(state, &indexed_attestation).is_ok());
    }
}

fn process_eth1_data<T: Config>(state: &mut BeaconState<T>, body: &BeaconBlockBody<T>) {
    state
        .eth1_data_votes
        .push(body.eth1_data.clone())
        .expect("push error");
    let num_votes = state
        .eth1_data_votes
        .iter()
        .filter(|vote| *vote == &body.eth1_data)
        .count();

    if num_votes * 2 > T::SlotsPerEth1VotingPeriod::to_usize() {
        state.eth1_data = body.eth1_data.clone();
    }
}

fn process_operations<T: Config>(state: &mut BeaconState<T>, body: &BeaconBlockBody<T>) {
    assert_eq!(
        body.deposits.len(),
        std::cmp::min(
            T::MaxDeposits::to_usize(),
            usize::try_from(state.eth1_data.deposit_count - state.eth1_deposit_index)
                .expect("conversion error")
        )
    );

    for proposer_slashing in body.proposer_slashings.iter() {
        process_proposer_slashing(state, proposer_slashing);
    }
    for attester_slashing in body.attester_slashings.iter() {
        process_attester_slashing(state, attester_slashing);
    }
    for attestation in body.attestations.iter() {
        process_attestation(state, attestation, true);
    }
    for deposit in body.deposits.iter() {
        process_deposit(state, deposit);
    }
    for voluntary_exit in body.voluntary_exits.iter() {
        process_voluntary_exit(state, voluntary_exit);
    }
}

#[cfg(test)]
mod block_processing_tests {
    use super::*;
    use bls::{Keypair, PublicKeyBytes};
    use ssz_types::VariableList;
    use types::{config::MainnetConfig, types::BeaconBlock};

    const EPOCH_MAX: u64 = u64::max_value();

    fn default_validator() -> Validator {
        Validator {
            effective_balance: MainnetConfig::max_effective_balance(),
            slashed: false,
            activation_eligibility_epoch: EPOCH_MAX,
            activation_epoch: 0,
            exit_epoch: EPOCH_MAX,
            withdrawable_epoch: EPOCH_MAX,
            withdrawal_credentials: H256::from([0; 32]),
            pubkey: PublicKeyBytes::from(&Keypair::random().pk),
        }
    }

    #[test]
    fn process_block_header_test() {
        let mut bs: BeaconState<MainnetConfig> = BeaconState {
            slot: 0,
            latest_block_header: BeaconBlockHeader {
                slot: 0,
                parent_root: H256::zero(),
                ..BeaconBlockHeader::default()
            },
            validators: VariableList::from(vec![default_validator()]),
            ..BeaconState::default()
        };

        let block: BeaconBlock<MainnetConfig> = BeaconBlock {
            slot: 0,
            parent_root: hash_tree_root(&bs.latest_block_header),
            ..BeaconBlock::default()
        };

        process_block_header(&mut bs, &block);

        assert_eq!(bs.latest_block_header.slot, block.slot);
        assert_eq!(bs.latest_block_header.parent_root, block.parent_root);
        assert_eq!(
            bs.latest_block_header.body_root,
            hash_tree_root(&block.body)
        );
        assert_eq!(bs.latest_block_header.state_root, block.state_root);
    }
}

#[cfg(test)]
mod spec_tests {
    use std::panic::UnwindSafe;

    use ssz::Decode;
    use test_generator::test_resources;
    use types::{beacon_state::BeaconState, config::MinimalConfig};

    use super::*;

    macro_rules! tests_for_operation {
        (
            $operation_name: ident,
            $processing_function: expr,
            $mainnet_glob: literal,
            $minimal_glob: literal,
        ) => {
            mod $operation_name {
                use super::*;

                #[test_resources($mainnet_glob)]
                fn mainnet(case_directory: &str) {
                    run_case_specialized::<MainnetConfig>(case_directory);
                }

                #[test_resources($minimal_glob)]
                fn minimal(case_directory: &str) {
                    run_case_specialized::<MinimalConfig>(case_directory);
                }

                fn run_case_specialized<C: Config>(case_directory: &str) {
                    run_case::<C, _, _>(
                        case_directory,
                        stringify!($operation_name),
                        |state, operation| $processing_function(case_directory, state, operation),
                    );
                }
            }
        };
    }

    tests_for_operation! {
        // Test files for `block_header` are named `block.*` and contain `BeaconBlock`s.
        block,
        ignore_case_directory(process_block_header),
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/block_header/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/block_header/*/*",
    }

    tests_for_operation! {
        proposer_slashing,
        ignore_case_directory(process_proposer_slashing),
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/proposer_slashing/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/proposer_slashing/*/*",
    }

    tests_for_operation! {
        attester_slashing,
        ignore_case_directory(process_attester_slashing),
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/attester_slashing/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/attester_slashing/*/*",
    }

    tests_for_operation! {
        attestation,
        |case_directory, state, attestation| {
            let verify_signature = spec_test_utils::bls_setting(case_directory).unwrap_or(true);
            process_attestation(state, attestation, verify_signature)
        },
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/attestation/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/attestation/*/*",
    }

    tests_for_operation! {
        deposit,
        ignore_case_directory(process_deposit),
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/deposit/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/deposit/*/*",
    }

    tests_for_operation! {
        voluntary_exit,
        ignore_case_directory(process_voluntary_exit),
        "eth2.0-spec-tests/tests/mainnet/phase0/operations/voluntary_exit/*/*",
        "eth2.0-spec-tests/tests/minimal/phase0/operations/voluntary_exit/*/*",
    }

    fn ignore_case_directory<T, U, V>(
        processing_function: impl FnOnce(&mut U, &V),
    ) -> impl FnOnce(T, &mut U, &V) {
        |_, state, operation| processing_function(state, operation)
    }

    fn run_case<C, D, F>(case_directory: &str, operation_name: &str, processing_function: F)
    where
        C: Config,
        D: Decode,
        F: FnOnce(&mut BeaconState<C>, &D) + UnwindSafe,
    {
        let process_operation = || {
            let mut state = spec_test_utils::pre(case_directory);
            let operation = spec_test_utils::operation(case_directory, operation_name);
            processing_function(&mut state, &operation);
            state
        };
        match spec_test_utils::post(case_directory) {
            Some(expected_post) => assert_eq!(process_operation(), expected_post),
            // The state transition code as it is now panics on error instead of returning `Result`.
            // We have to use `std::panic::catch_unwind` to verify that state transitions fail.
            None => assert!(std::panic::catch_unwind(process_operation).is_err()),
        }
    }
}
