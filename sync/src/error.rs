use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("peer {0:?} sent a block that failed import")]
    BadBlockContent(eth2_network::PeerId),
    #[error("batch {0} is contested by disagreeing peers")]
    BatchContested(u64),
    #[error("no peer available to serve batch {0}")]
    NoPeerAvailable(u64),
    #[error("sync was cancelled")]
    Cancelled,
}
