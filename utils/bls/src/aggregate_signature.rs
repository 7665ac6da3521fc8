use milagro_bls::AggregateSignature as RawAggregateSignature;

use crate::aggregate_public_key::AggregatePublicKey;
use crate::error::Error;
use crate::public_key::PublicKey;
use crate::signature::Signature;

#[derive(Clone)]
pub struct AggregateSignature(RawAggregateSignature);

impl AggregateSignature {
    pub fn new() -> Self {
        Self(RawAggregateSignature::new())
    }

    pub fn add(&mut self, signature: &Signature) {
        self.0.add(signature.as_raw());
    }

    pub fn from_signatures(signatures: &[Signature]) -> Self {
        let mut aggregate = Self::new();
        for signature in signatures {
            aggregate.add(signature);
        }
        aggregate
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        RawAggregateSignature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidBytes)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    /// Standard BLS aggregate verify: one message, one aggregated signature,
    /// one public key per signer.
    pub fn verify(&self, message: &[u8], public_keys: &[&PublicKey]) -> bool {
        if public_keys.is_empty() {
            return false;
        }
        let mut aggregate_public_key = AggregatePublicKey::new();
        for public_key in public_keys {
            aggregate_public_key.add(public_key);
        }
        self.0
            .verify(message, aggregate_public_key.as_raw())
    }

    /// `fast_aggregate_verify`: the same message is checked against the
    /// pubkeys aggregated on the fly, letting verification skip the
    /// pairing-per-signer cost of `verify_multiple`. Per spec.md §4.2,
    /// an empty `public_keys` list is defined to fail rather than
    /// vacuously succeed.
    pub fn fast_aggregate_verify(&self, message: &[u8], public_keys: &[&PublicKey]) -> bool {
        self.verify(message, public_keys)
    }
}

impl Default for AggregateSignature {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for AggregateSignature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for AggregateSignature {}
