use std::fmt;

use thiserror::Error;

/// Adapts any `Debug`-only error (library result types that don't implement
/// `std::error::Error`, e.g. `bls`'s amcl-backed errors) into one that does,
/// so it composes with `anyhow`/`?` at crate boundaries.
#[derive(Error, Debug)]
#[error("{0:?}")]
pub struct DebugAsError<E: fmt::Debug>(E);

impl<E: fmt::Debug> DebugAsError<E> {
    pub fn new(error: E) -> Self {
        Self(error)
    }

    pub fn into_inner(self) -> E {
        self.0
    }
}
