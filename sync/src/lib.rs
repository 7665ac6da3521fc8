#![allow(dead_code)]

pub mod batch_sync;
pub mod error;
pub mod single_sync;

pub use batch_sync::{Batch, BatchState, BatchSync};
pub use error::SyncError;
pub use single_sync::{SingleSync, SingleSyncStatus};
