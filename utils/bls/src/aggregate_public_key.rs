use milagro_bls::AggregatePublicKey as RawAggregatePublicKey;

use crate::public_key::PublicKey;

#[derive(Clone)]
pub struct AggregatePublicKey(RawAggregatePublicKey);

impl AggregatePublicKey {
    pub fn new() -> Self {
        Self(RawAggregatePublicKey::new())
    }

    pub fn add(&mut self, public_key: &PublicKey) {
        self.0.add(public_key.as_raw());
    }

    pub fn from_public_keys(public_keys: &[&PublicKey]) -> Self {
        let mut aggregate = Self::new();
        for public_key in public_keys {
            aggregate.add(public_key);
        }
        aggregate
    }

    pub fn as_raw(&self) -> &RawAggregatePublicKey {
        &self.0
    }
}

impl Default for AggregatePublicKey {
    fn default() -> Self {
        Self::new()
    }
}
