mod aggregate_public_key;
mod aggregate_signature;
mod error;
mod keypair;
mod public_key;
mod public_key_bytes;
mod secret_key;
mod signature;
mod signature_bytes;

pub use aggregate_public_key::AggregatePublicKey;
pub use aggregate_signature::AggregateSignature;
pub use error::Error;
pub use keypair::Keypair;
pub use public_key::PublicKey;
pub use public_key_bytes::PublicKeyBytes;
pub use secret_key::SecretKey;
pub use signature::Signature;
pub use signature_bytes::SignatureBytes;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let keypair = Keypair::random();
        let message = b"validator attests to this block";
        let signature = Signature::new(message, &keypair.sk);

        assert!(signature.verify(message, &keypair.pk));
        assert!(!signature.verify(b"a different message", &keypair.pk));
    }

    #[test]
    fn aggregate_verify_round_trip() {
        let keypairs: Vec<Keypair> = (0..4).map(|_| Keypair::random()).collect();
        let message = b"attestation data root";

        let signatures: Vec<Signature> = keypairs
            .iter()
            .map(|keypair| Signature::new(message, &keypair.sk))
            .collect();
        let aggregate = AggregateSignature::from_signatures(&signatures);

        let public_keys: Vec<&PublicKey> = keypairs.iter().map(|keypair| &keypair.pk).collect();
        assert!(aggregate.fast_aggregate_verify(message, &public_keys));
    }

    #[test]
    fn fast_aggregate_verify_rejects_empty_public_keys() {
        let aggregate = AggregateSignature::new();
        assert!(!aggregate.fast_aggregate_verify(b"anything", &[]));
    }

    #[test]
    fn public_key_bytes_round_trip_through_ssz() {
        use ssz::{Decode, Encode};

        let keypair = Keypair::random();
        let bytes = PublicKeyBytes::from(&keypair.pk);
        let encoded = bytes.as_ssz_bytes();
        let decoded = PublicKeyBytes::from_ssz_bytes(&encoded).unwrap();
        assert_eq!(bytes, decoded);
    }
}
