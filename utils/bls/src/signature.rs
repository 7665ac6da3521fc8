use milagro_bls::Signature as RawSignature;

use crate::error::Error;
use crate::public_key::PublicKey;
use crate::secret_key::SecretKey;

#[derive(Clone)]
pub struct Signature(RawSignature);

impl Signature {
    /// Signs `message` under the BLS ciphersuite fixed by
    /// `consts::BLS_SIG_DOMAIN_TAG` (hash-to-curve domain separation is
    /// baked into the `milagro_bls` build, not passed at the call site).
    pub fn new(message: &[u8], secret_key: &SecretKey) -> Self {
        Self(RawSignature::new(message, secret_key.as_raw()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        RawSignature::from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidBytes)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        self.0.verify(message, public_key.as_raw())
    }

    pub fn as_raw(&self) -> &RawSignature {
        &self.0
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for Signature {}
