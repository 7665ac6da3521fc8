use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Error)]
pub enum Error {
    #[error("BLS12-381 encoding is malformed or not in the subgroup")]
    InvalidBytes,
    #[error("aggregate signature verification requires at least one public key")]
    EmptyAggregate,
}
