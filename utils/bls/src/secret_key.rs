use milagro_bls::SecretKey as RawSecretKey;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::Error;

/// Wraps a milagro-backed BLS secret key. Never implements `Debug`/`Display`
/// so it can't end up in a log line by accident.
#[derive(Clone)]
pub struct SecretKey(RawSecretKey);

impl SecretKey {
    pub fn random() -> Self {
        Self(RawSecretKey::random(&mut rand::thread_rng()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        RawSecretKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidBytes)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn as_raw(&self) -> &RawSecretKey {
        &self.0
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for SecretKey {}

impl Serialize for SecretKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.as_bytes()))
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(|error| de::Error::custom(error.to_string()))
    }
}
