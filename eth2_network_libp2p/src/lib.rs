//! Wires the transport-independent envelope types from `eth2_network` onto
//! `libp2p`: `gossipsub` for the pub/sub topics, `request_response` for the
//! RPC methods, Snappy-framed SSZ for both.

mod codec;
mod peer_validation;

pub use codec::{RpcCodec, RpcProtocol};
pub use peer_validation::{validate_peer_status, PeerValidationOutcome};

use anyhow::{Context, Result};
use libp2p::{gossipsub, identity::Keypair, request_response, swarm::NetworkBehaviour, PeerId};

use eth2_network::{ForkDigest, GossipTopic};

/// Snappy-frame-compress a payload, as used for both gossip messages and
/// RPC response chunks.
pub fn compress(payload: &[u8]) -> Result<Vec<u8>> {
    use std::io::Write as _;

    let mut encoder = snap::write::FrameEncoder::new(Vec::new());
    encoder.write_all(payload).context("snappy compression failed")?;
    encoder.into_inner().map_err(|error| error.into_error().into())
}

/// Snappy-frame-decompress a payload previously produced by `compress`.
pub fn decompress(frames: &[u8]) -> Result<Vec<u8>> {
    use std::io::Read as _;

    let mut decoder = snap::read::FrameDecoder::new(frames);
    let mut payload = Vec::new();
    decoder.read_to_end(&mut payload).context("snappy decompression failed")?;
    Ok(payload)
}

/// Gossip message ID as required by gossipsub's `message_id_fn`: the first
/// 8 bytes of SHA-256 over the fork's domain tag and the decompressed payload.
pub fn message_id(fork_digest: ForkDigest, message: &gossipsub::Message) -> gossipsub::MessageId {
    let decompressed = decompress(&message.data).unwrap_or_else(|_| message.data.clone());
    let id = eth2_network::gossip_message_id(&fork_digest.0, &decompressed);
    gossipsub::MessageId::from(id.to_vec())
}

/// The combined `libp2p` behaviour: gossipsub for pub/sub topics, a single
/// request/response protocol multiplexing every RPC method.
#[derive(NetworkBehaviour)]
pub struct Behaviour {
    pub gossipsub: gossipsub::Behaviour,
    pub rpc: request_response::Behaviour<RpcCodec>,
}

impl Behaviour {
    pub fn new(local_key: &Keypair, fork_digest: ForkDigest) -> Result<Self> {
        let gossipsub_config = gossipsub::ConfigBuilder::default()
            .message_id_fn(move |message| message_id(fork_digest, message))
            .build()
            .map_err(|error| anyhow::anyhow!(error))?;
        let gossipsub = gossipsub::Behaviour::new(
            gossipsub::MessageAuthenticity::Signed(local_key.clone()),
            gossipsub_config,
        )
        .map_err(|error| anyhow::anyhow!(error))?;

        let rpc = request_response::Behaviour::new(
            [(RpcProtocol, request_response::ProtocolSupport::Full)],
            request_response::Config::default(),
        );

        Ok(Self { gossipsub, rpc })
    }

    pub fn subscribe(&mut self, topic: &GossipTopic, fork_digest: ForkDigest) -> Result<()> {
        let ident_topic = gossipsub::IdentTopic::new(topic.encoded(fork_digest));
        self.gossipsub.subscribe(&ident_topic)?;
        Ok(())
    }

    pub fn publish(&mut self, topic: &GossipTopic, fork_digest: ForkDigest, payload: &[u8]) -> Result<()> {
        let ident_topic = gossipsub::IdentTopic::new(topic.encoded(fork_digest));
        let compressed = compress(payload)?;
        self.gossipsub.publish(ident_topic, compressed)?;
        Ok(())
    }
}

/// Maps a `libp2p::PeerId` onto the transport-independent `eth2_network::PeerId`.
pub fn to_network_peer_id(peer: &PeerId) -> eth2_network::PeerId {
    let bytes = peer.to_bytes();
    let mut array = [0_u8; 32];
    let len = bytes.len().min(32);
    array[..len].copy_from_slice(&bytes[..len]);
    eth2_network::PeerId(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compress_decompress_round_trip() {
        let payload = b"ssz encoded beacon block".to_vec();
        let compressed = compress(&payload).unwrap();
        assert_ne!(compressed, payload);
        let decompressed = decompress(&compressed).unwrap();
        assert_eq!(decompressed, payload);
    }
}
