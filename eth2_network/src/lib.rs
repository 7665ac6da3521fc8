//! Transport-independent wire envelope types for the beacon-chain gossip
//! and request/response protocols. `eth2_network_libp2p` wires these onto
//! an actual transport; this crate only defines what goes over it.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use types::{
    config::Config,
    primitives::{Epoch, Version, H256, Slot},
    types::{Attestation, AttesterSlashing, ProposerSlashing, SignedBeaconBlock, SignedVoluntaryExit},
};

pub const ATTESTATION_SUBNET_COUNT: u64 = types::consts::ATTESTATION_SUBNET_COUNT;
pub const MAX_BLOCKS_BY_RANGE: u64 = types::consts::MAX_BLOCKS_BY_RANGE;
pub const MAX_BLOCKS_BY_ROOT: u64 = types::consts::MAX_BLOCKS_BY_ROOT;

/// A 4-byte tag derived from fork version and genesis validators root.
/// Scopes gossip topics and RPC protocol IDs to a single fork.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
pub struct ForkDigest(pub [u8; 4]);

impl ForkDigest {
    /// This chain's state does not carry a genesis validators root, so the
    /// digest is derived from the fork version alone rather than the full
    /// `hash(current_version ++ genesis_validators_root)[:4]` mix.
    pub fn from_fork_version(current_version: Version) -> Self {
        Self(*current_version.as_array())
    }
}

/// Mesh-style pub/sub topics, fork-scoped by a `ForkDigest`.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub enum GossipTopic {
    BeaconBlock,
    BeaconAggregateAndProof,
    AttestationSubnet(u64),
    VoluntaryExit,
    ProposerSlashing,
    AttesterSlashing,
}

impl GossipTopic {
    /// The topic name used in the pub/sub mesh, before fork-digest scoping.
    pub fn name(&self) -> String {
        match self {
            Self::BeaconBlock => "beacon_block".to_owned(),
            Self::BeaconAggregateAndProof => "beacon_aggregate_and_proof".to_owned(),
            Self::AttestationSubnet(n) => format!("attestation_subnet_{n}"),
            Self::VoluntaryExit => "voluntary_exit".to_owned(),
            Self::ProposerSlashing => "proposer_slashing".to_owned(),
            Self::AttesterSlashing => "attester_slashing".to_owned(),
        }
    }

    /// Full topic string scoped to a fork digest, e.g. `/eth2/aabbccdd/beacon_block/ssz_snappy`.
    pub fn encoded(&self, fork_digest: ForkDigest) -> String {
        format!("/eth2/{}/{}/ssz_snappy", hex::encode(fork_digest.0), self.name())
    }
}

/// Validation outcome for a single gossiped message, per the pub/sub
/// scoring rules: ACCEPT propagates, IGNORE drops silently, REJECT drops
/// and penalizes the sender.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValidationOutcome {
    Accept,
    Ignore,
    Reject,
}

/// A message received over a gossip topic, not yet decoded into its
/// concrete SSZ type.
#[derive(Clone, Debug)]
pub struct GossipMessage {
    pub topic: GossipTopic,
    pub data: Vec<u8>,
}

/// The decoded payload of a gossiped message.
#[derive(Clone, Debug)]
pub enum GossipPayload<C: Config> {
    BeaconBlock(Box<SignedBeaconBlock<C>>),
    Attestation(Box<Attestation<C>>),
    VoluntaryExit(Box<SignedVoluntaryExit>),
    ProposerSlashing(Box<ProposerSlashing>),
    AttesterSlashing(Box<AttesterSlashing<C>>),
}

/// `status` request/response payload, exchanged on every new peer and used
/// for peer chain validation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Status {
    pub fork_digest: ForkDigest,
    pub finalized_root: H256,
    pub finalized_epoch: Epoch,
    pub head_root: H256,
    pub head_slot: Slot,
}

/// Reasons a peer is disconnected, sent as the `goodbye` request payload.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum GoodbyeReason {
    ClientShutdown,
    IrrelevantNetwork,
    FaultError,
    UnableToVerifyNetwork,
    TooManyPeers,
    Unknown(u64),
}

impl GoodbyeReason {
    pub fn code(self) -> u64 {
        match self {
            Self::ClientShutdown => 1,
            Self::IrrelevantNetwork => 2,
            Self::FaultError => 3,
            Self::UnableToVerifyNetwork => 4,
            Self::TooManyPeers => 5,
            Self::Unknown(code) => code,
        }
    }

    pub fn from_code(code: u64) -> Self {
        match code {
            1 => Self::ClientShutdown,
            2 => Self::IrrelevantNetwork,
            3 => Self::FaultError,
            4 => Self::UnableToVerifyNetwork,
            5 => Self::TooManyPeers,
            other => Self::Unknown(other),
        }
    }
}

/// `beacon_blocks_by_range` request: up to `MAX_BLOCKS_BY_RANGE` blocks
/// starting at `start_slot`, every `step`-th slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlocksByRangeRequest {
    pub start_slot: Slot,
    pub count: u64,
    pub step: u64,
}

/// `beacon_blocks_by_root` request: up to `MAX_BLOCKS_BY_ROOT` explicit roots.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct BlocksByRootRequest {
    pub roots: Vec<H256>,
}

/// Request/response method envelope, tagging each outbound RPC with the
/// method it belongs to so a transport layer can route framing and
/// timeouts uniformly rather than matching on payload shape.
#[derive(Clone, Debug)]
pub enum RpcRequest {
    Status(Status),
    Goodbye(GoodbyeReason),
    Ping(u64),
    BlocksByRange(BlocksByRangeRequest),
    BlocksByRoot(BlocksByRootRequest),
}

/// A single framed response chunk: `status_byte || length(varint) || [snappy] || ssz_payload`.
/// `status_byte` 0 means success; any other value ends the stream with an error.
#[derive(Clone, Debug)]
pub struct ResponseChunk {
    pub status: u8,
    pub payload: Vec<u8>,
}

impl ResponseChunk {
    pub fn success(payload: Vec<u8>) -> Self {
        Self { status: 0, payload }
    }

    pub fn error(status: u8) -> Self {
        Self { status, payload: Vec::new() }
    }

    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Gossip message ID: first 8 bytes of SHA-256 over `domain_tag || decompressed_payload`.
pub fn gossip_message_id(domain_tag: &[u8], decompressed_payload: &[u8]) -> [u8; 8] {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(domain_tag);
    hasher.update(decompressed_payload);
    let digest = hasher.finalize();
    let mut id = [0_u8; 8];
    id.copy_from_slice(&digest[..8]);
    id
}

/// The behavior-facing API a transport (`eth2_network_libp2p`) must expose
/// to the rest of the node: publishing to gossip topics and issuing RPC
/// requests, independent of libp2p's own types.
pub trait NetworkTransport<C: Config> {
    fn publish(&mut self, topic: GossipTopic, payload: &GossipPayload<C>) -> Result<()>;
    fn send_request(&mut self, peer: PeerId, request: RpcRequest) -> Result<()>;
    fn disconnect(&mut self, peer: PeerId, reason: GoodbyeReason) -> Result<()>;
}

/// Opaque peer handle; `eth2_network_libp2p` maps this to a libp2p `PeerId`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct PeerId(pub [u8; 32]);

/// The inbound side of the wire: what a transport hands decoded gossip and
/// RPC content to. Implemented by the node's block/attestation import
/// pipeline, independent of which transport decoded the message.
pub trait Networked<C: Config> {
    fn accept_beacon_block(&mut self, block: SignedBeaconBlock<C>) -> Result<()>;
    fn accept_beacon_attestation(&mut self, attestation: Attestation<C>) -> Result<()>;
    fn get_status(&self) -> Status;
    fn get_beacon_block(&self, root: H256) -> Option<&SignedBeaconBlock<C>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gossip_topic_names_are_fork_scoped() {
        let digest = ForkDigest([0xaa, 0xbb, 0xcc, 0xdd]);
        assert_eq!(
            GossipTopic::BeaconBlock.encoded(digest),
            "/eth2/aabbccdd/beacon_block/ssz_snappy"
        );
        assert_eq!(
            GossipTopic::AttestationSubnet(7).encoded(digest),
            "/eth2/aabbccdd/attestation_subnet_7/ssz_snappy"
        );
    }

    #[test]
    fn goodbye_reason_round_trips_through_its_code() {
        for reason in [
            GoodbyeReason::ClientShutdown,
            GoodbyeReason::IrrelevantNetwork,
            GoodbyeReason::FaultError,
            GoodbyeReason::UnableToVerifyNetwork,
            GoodbyeReason::TooManyPeers,
        ] {
            assert_eq!(GoodbyeReason::from_code(reason.code()), reason);
        }
    }

    #[test]
    fn response_chunk_success_has_status_zero() {
        let chunk = ResponseChunk::success(vec![1, 2, 3]);
        assert!(chunk.is_success());
        assert_eq!(chunk.payload, vec![1, 2, 3]);
    }

    #[test]
    fn gossip_message_id_is_deterministic() {
        let a = gossip_message_id(b"domain", b"payload");
        let b = gossip_message_id(b"domain", b"payload");
        let c = gossip_message_id(b"domain", b"different");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
