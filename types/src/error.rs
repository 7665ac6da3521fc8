use thiserror::Error;

/// Structural errors raised by `BeaconState` accessors (spec.md §7,
/// "Structural" category). These never cross a network boundary; callers
/// translate them into the appropriate consensus/peer-behavior error where
/// relevant.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum Error {
    #[error("slot is out of the range covered by the historical-root ring")]
    SlotOutOfRange,
    #[error("index is out of range")]
    IndexOutOfRange,
    #[error("value does not fit the target integer type")]
    ConversionToUsize,
}
