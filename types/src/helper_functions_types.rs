use ssz::DecodeError;
use thiserror::Error;

/// Error type shared by the `helper_functions` and `transition_functions`
/// crates for the wider range of failure modes that show up once you get
/// past plain state accessors (predicate checks, signature verification,
/// wire decoding).
#[derive(Debug, PartialEq, Error)]
pub enum Error {
    #[error("slot is out of the range covered by the historical-root ring")]
    SlotOutOfRange,
    #[error("index is out of range")]
    IndexOutOfRange,
    #[error("attesting indices are not sorted in strictly ascending order")]
    IndicesNotSorted,
    #[error("attesting indices exceed the maximum committee size")]
    IndicesExceedMaxValidators,
    #[error("signature failed verification")]
    InvalidSignature,
    #[error("value does not fit the target integer type")]
    NumberExceedsCapacity,
    #[error("expected a non-empty collection")]
    ArrayIsEmpty,
    #[error("value is not a 32-byte hash")]
    NotAHash,
    #[error("attestation aggregation bits do not match the committee shape")]
    AttestationBitsInvalid,
    #[error("value does not fit in usize")]
    ConversionToUsize,
    #[error("validator has already initiated exit")]
    ValidatorExitAlreadyInitiated,
    #[error("could not parse BLS public key bytes")]
    PubKeyConversionError,
    #[error("could not parse BLS signature bytes")]
    SignatureConversionError,
    #[error("SSZ decoding failed: {0:?}")]
    SszDecode(DecodeError),
}

impl From<DecodeError> for Error {
    fn from(error: DecodeError) -> Self {
        Error::SszDecode(error)
    }
}
