use bls::{AggregatePublicKey, PublicKey, PublicKeyBytes, SignatureBytes};
use sha2::{Digest, Sha256};
use tree_hash::TreeHash;
use types::primitives::H256;

use crate::error::Error;

pub fn hash(input: &[u8]) -> Vec<u8> {
    Sha256::digest(input).to_vec()
}

pub fn hash_tree_root<T: TreeHash>(value: &T) -> H256 {
    value.tree_hash_root()
}

/// Alias kept for call sites that think in terms of "the signed root of a
/// container" rather than its tree-hash root; final phase-0 signs the plain
/// `hash_tree_root` of the message under a domain, not a dedicated
/// `signed_root` field.
pub fn signed_root<T: TreeHash>(value: &T) -> H256 {
    hash_tree_root(value)
}

pub fn bls_verify(
    pubkey: &PublicKeyBytes,
    message: &[u8],
    signature: &SignatureBytes,
) -> Result<bool, Error> {
    let public_key = pubkey
        .try_into_public_key()
        .map_err(|_| Error::PubKeyConversionError)?;
    let signature = signature
        .try_into_signature()
        .map_err(|_| Error::SignatureConversionError)?;

    Ok(signature.verify(message, &public_key))
}

pub fn bls_aggregate_pubkeys(pubkeys: &[&PublicKey]) -> AggregatePublicKey {
    let mut aggregated = AggregatePublicKey::new();
    for pubkey in pubkeys {
        aggregated.add(pubkey);
    }
    aggregated
}

#[cfg(test)]
mod tests {
    use super::*;
    use bls::{Keypair, Signature};

    #[test]
    fn test_hashing() {
        let input = b"lorem ipsum";
        let output = hash(input.as_ref());
        let output_bytes = output.as_ref();

        let expected_bytes = [
            0x5e, 0x2b, 0xf5, 0x7d, 0x3f, 0x40, 0xc4, 0xb6, 0xdf, 0x69, 0xda, 0xf1, 0x93, 0x6c,
            0xb7, 0x66, 0xf8, 0x32, 0x37, 0x4b, 0x4f, 0xc0, 0x25, 0x9a, 0x7c, 0xbf, 0xf0, 0x6e,
            0x2f, 0x70, 0xf2, 0x69,
        ];

        assert_eq!(expected_bytes, output_bytes);
    }

    #[test]
    fn test_bls_verify() {
        let keypair = Keypair::random();
        let message = b"test123";
        let signature = Signature::new(message, &keypair.sk);

        let pk_bytes = PublicKeyBytes::from(&keypair.pk);
        let sg_bytes = SignatureBytes::from(&signature);

        assert_eq!(bls_verify(&pk_bytes, message, &sg_bytes), Ok(true));
    }

    #[test]
    fn test_bls_verify_rejects_wrong_message() {
        let keypair = Keypair::random();
        let signature = Signature::new(b"test123", &keypair.sk);

        let pk_bytes = PublicKeyBytes::from(&keypair.pk);
        let sg_bytes = SignatureBytes::from(&signature);

        assert_eq!(bls_verify(&pk_bytes, b"other message", &sg_bytes), Ok(false));
    }
}
