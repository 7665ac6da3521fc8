use std::fmt;

use milagro_bls::PublicKey as RawPublicKey;
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

use crate::error::Error;
use crate::secret_key::SecretKey;

#[derive(Clone)]
pub struct PublicKey(RawPublicKey);

impl PublicKey {
    pub fn from_secret_key(secret_key: &SecretKey) -> Self {
        Self(RawPublicKey::from_secret_key(secret_key.as_raw()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        RawPublicKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| Error::InvalidBytes)
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        self.0.as_bytes()
    }

    pub fn as_uncompressed_bytes(&self) -> Vec<u8> {
        self.0.as_uncompressed_bytes()
    }

    pub fn as_raw(&self) -> &RawPublicKey {
        &self.0
    }

    pub fn concatenated_hex_id(&self) -> String {
        hex::encode(self.as_bytes())
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}
impl Eq for PublicKey {}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", self.concatenated_hex_id())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{}", self.concatenated_hex_id())
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", self.concatenated_hex_id()))
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        let bytes = hex::decode(s.trim_start_matches("0x")).map_err(de::Error::custom)?;
        Self::from_bytes(&bytes).map_err(|error| de::Error::custom(error.to_string()))
    }
}
