//! Generate keys, sign arbitrary messages, and deterministically verify
//! EC-Schnorr signatures over secp256k1.
//!
//! This crate implements the EC-Schnorr variant standardized in BSI TR-03111
//! §4.2.3: the challenge is the SHA-256 digest of
//! `compressed(Q) ‖ compressed(P) ‖ message` reduced modulo the group order,
//! and the response is `s = k − r·d mod n`. Nonces are derived
//! deterministically (RFC 6979), so signing is a pure function of the private
//! key and the message: identical inputs always produce byte-identical
//! signatures.
//!
//! All three persistent entities use a fixed wire format: private keys are 32
//! bytes (big-endian scalar), public keys are 33 bytes (SEC1 compressed
//! point), and signatures are 64 bytes (`r ‖ s`). Public keys are totally
//! ordered by their compressed encoding so they can key deterministic address
//! tables.
//!
//! # Example
//!
//! ```rust
//! use ec_schnorr::{schnorr, PrivateKeyExt as _, Signer as _, Verifier as _};
//! use rand::rngs::OsRng;
//!
//! // Generate a new private key
//! let signer = schnorr::PrivateKey::from_rng(&mut OsRng);
//!
//! // Create a message to sign
//! let msg = b"hello, world!";
//!
//! // Sign the message
//! let signature = signer.sign(msg).expect("message is not empty");
//!
//! // Verify the signature
//! assert!(signer.public_key().verify(msg, &signature));
//! ```

use commonware_codec::{Encode, ReadExt};
use commonware_utils::Array;
use rand::SeedableRng as _;
use rand_chacha::ChaCha20Rng;
use rand_core::CryptoRngCore;
use thiserror::Error;

pub mod schnorr;
pub mod sha256;
pub use sha256::Sha256;

/// Errors that can arise when producing a [Signature].
///
/// Decoding failures are reported through [commonware_codec::Error] by the
/// entity deserializers; verification failures are collapsed into a `false`
/// verdict and never distinguished.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// The message to sign was empty.
    #[error("message is empty")]
    EmptyMessage,
}

/// Produces [Signature]s over messages that can be verified with a
/// corresponding [PublicKey].
pub trait Signer: Send + Sync + Clone + 'static {
    /// The type of [Signature] produced by this [Signer].
    type Signature: Signature;

    /// The corresponding [PublicKey] type.
    type PublicKey: PublicKey<Signature = Self::Signature>;

    /// Returns the [PublicKey] corresponding to this [Signer].
    fn public_key(&self) -> Self::PublicKey;

    /// Sign a message.
    ///
    /// The message should not be hashed prior to calling this function. If a
    /// particular scheme requires a payload to be hashed before it is signed,
    /// it will be done internally.
    ///
    /// Signing is deterministic: the nonce is derived from the private key
    /// and the message, so the same inputs always produce the same signature.
    /// The only rejected input is an empty message.
    fn sign(&self, msg: &[u8]) -> Result<Self::Signature, Error>;
}

/// A [Signer] that can be serialized/deserialized.
pub trait PrivateKey: Signer + Sized + ReadExt + Encode + PartialEq + Array {}

/// A [PrivateKey] that can be generated from a seed or RNG.
pub trait PrivateKeyExt: PrivateKey {
    /// Create a [PrivateKey] from a seed.
    ///
    /// # Warning
    ///
    /// This function is insecure and should only be used for examples
    /// and testing.
    fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::from_rng(&mut rng)
    }

    /// Create a fresh [PrivateKey] using the supplied RNG.
    fn from_rng<R: CryptoRngCore>(rng: &mut R) -> Self;
}

/// Verifies [Signature]s over messages.
pub trait Verifier {
    /// The type of [Signature] that this verifier can verify.
    type Signature: Signature;

    /// Verify that a [Signature] is valid over a given message.
    ///
    /// The message should not be hashed prior to calling this function.
    ///
    /// All rejection causes (out-of-range scalars, an identity commitment, a
    /// challenge mismatch, an empty message) collapse into `false`.
    fn verify(&self, msg: &[u8], sig: &Self::Signature) -> bool;
}

/// A [PublicKey], able to verify [Signature]s.
pub trait PublicKey: Verifier + Sized + ReadExt + Encode + PartialEq + Array {}

/// A [Signature] over a message.
pub trait Signature: Sized + Clone + ReadExt + Encode + PartialEq + Array {}

/// Specializes the [commonware_utils::Array] trait with the Copy trait for
/// cryptographic digests (which should be cheap to clone).
pub trait Digest: Array + Copy {
    /// Generate a random [Digest].
    ///
    /// # Warning
    ///
    /// This function is typically used for testing and is not recommended
    /// for production use.
    fn random<R: CryptoRngCore>(rng: &mut R) -> Self;
}

/// Streaming hash engine used by the signing and verification paths.
///
/// Inputs are concatenated raw: there is no length prefixing and no domain
/// separation, which the wire contract of the scheme depends on.
///
/// This trait is required to implement the `Clone` trait because it is often
/// part of a struct that is cloned. In practice, implementations do not
/// actually clone the hasher state but users should not rely on this behavior
/// and call `reset` after cloning.
pub trait Hasher: Default + Clone + Send + Sync + 'static {
    /// Digest generated by the hasher.
    type Digest: Digest;

    /// The digest of an empty input.
    const EMPTY: Self::Digest;

    /// Create a new, empty hasher.
    fn new() -> Self {
        Self::default()
    }

    /// Append message to previously recorded data.
    fn update(&mut self, message: &[u8]) -> &mut Self;

    /// Hash all recorded data and reset the hasher
    /// to the initial state.
    fn finalize(&mut self) -> Self::Digest;

    /// Reset the hasher without generating a hash.
    ///
    /// This function does not need to be called after `finalize`.
    fn reset(&mut self) -> &mut Self;

    /// Hash a single message with a one-time-use hasher.
    fn hash(message: &[u8]) -> Self::Digest {
        Self::new().update(message).finalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_codec::{DecodeExt, FixedSize};
    use rand::rngs::OsRng;

    fn test_validate<C: PrivateKeyExt>() {
        let private_key = C::from_rng(&mut OsRng);
        let public_key = private_key.public_key();
        assert!(C::PublicKey::decode(public_key.as_ref()).is_ok());
    }

    fn test_validate_invalid_public_key<C: Signer>() {
        let result = C::PublicKey::decode(vec![0; 1024].as_ref());
        assert!(result.is_err());
    }

    fn test_sign_and_verify<C: PrivateKeyExt>() {
        let private_key = C::from_seed(0);
        let message = b"test_message";
        let signature = private_key.sign(message).unwrap();
        let public_key = private_key.public_key();
        assert!(public_key.verify(message, &signature));
    }

    fn test_sign_and_verify_wrong_message<C: PrivateKeyExt>() {
        let private_key = C::from_seed(0);
        let message = b"test_message";
        let wrong_message = b"wrong_message";
        let signature = private_key.sign(message).unwrap();
        let public_key = private_key.public_key();
        assert!(!public_key.verify(wrong_message, &signature));
    }

    fn test_sign_empty_message<C: PrivateKeyExt>() {
        let private_key = C::from_seed(0);
        assert!(private_key.sign(&[]).is_err());
    }

    fn test_signature_determinism<C: PrivateKeyExt>() {
        let private_key_1 = C::from_seed(0);
        let private_key_2 = C::from_seed(0);
        let message = b"test_message";
        let signature_1 = private_key_1.sign(message).unwrap();
        let signature_2 = private_key_2.sign(message).unwrap();
        assert_eq!(private_key_1.public_key(), private_key_2.public_key());
        assert_eq!(signature_1, signature_2);
    }

    fn test_invalid_signature_publickey_pair<C: PrivateKeyExt>() {
        let private_key = C::from_seed(0);
        let private_key_2 = C::from_seed(1);
        let message = b"test_message";
        let signature = private_key.sign(message).unwrap();
        let public_key = private_key_2.public_key();
        assert!(!public_key.verify(message, &signature));
    }

    #[test]
    fn test_schnorr_validate() {
        test_validate::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_validate_invalid_public_key() {
        test_validate_invalid_public_key::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_sign_and_verify() {
        test_sign_and_verify::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_sign_and_verify_wrong_message() {
        test_sign_and_verify_wrong_message::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_sign_empty_message() {
        test_sign_empty_message::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_signature_determinism() {
        test_signature_determinism::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_invalid_signature_publickey_pair() {
        test_invalid_signature_publickey_pair::<schnorr::PrivateKey>();
    }

    #[test]
    fn test_schnorr_len() {
        assert_eq!(schnorr::PrivateKey::SIZE, 32);
        assert_eq!(schnorr::PublicKey::SIZE, 33);
        assert_eq!(schnorr::Signature::SIZE, 64);
    }

    fn test_hasher_multiple_runs<H: Hasher>() {
        // Generate initial hash
        let mut hasher = H::new();
        hasher.update(b"hello world");
        let digest = hasher.finalize();
        assert!(H::Digest::decode(digest.as_ref()).is_ok());
        assert_eq!(digest.as_ref().len(), H::Digest::SIZE);

        // Reuse hasher without reset
        hasher.update(b"hello world");
        let digest_again = hasher.finalize();
        assert!(H::Digest::decode(digest_again.as_ref()).is_ok());
        assert_eq!(digest, digest_again);

        // Reuse hasher with reset
        hasher.update(b"hello mars");
        hasher.reset();
        hasher.update(b"hello world");
        let digest_reset = hasher.finalize();
        assert!(H::Digest::decode(digest_reset.as_ref()).is_ok());
        assert_eq!(digest, digest_reset);

        // Hash different data
        hasher.update(b"hello mars");
        let digest_mars = hasher.finalize();
        assert!(H::Digest::decode(digest_mars.as_ref()).is_ok());
        assert_ne!(digest, digest_mars);
    }

    fn test_hasher_multiple_updates<H: Hasher>() {
        // Generate initial hash
        let mut hasher = H::new();
        hasher.update(b"hello");
        hasher.update(b" world");
        let digest = hasher.finalize();
        assert!(H::Digest::decode(digest.as_ref()).is_ok());

        // Generate hash in oneshot
        let mut hasher = H::new();
        hasher.update(b"hello world");
        let digest_oneshot = hasher.finalize();
        assert!(H::Digest::decode(digest_oneshot.as_ref()).is_ok());
        assert_eq!(digest, digest_oneshot);
    }

    fn test_hasher_empty_input<H: Hasher>() {
        let mut hasher = H::new();
        let digest = hasher.finalize();
        assert!(H::Digest::decode(digest.as_ref()).is_ok());
        assert_eq!(digest, H::EMPTY);
    }

    fn test_hasher_large_input<H: Hasher>() {
        let mut hasher = H::new();
        let data = vec![1; 1024];
        hasher.update(&data);
        let digest = hasher.finalize();
        assert!(H::Digest::decode(digest.as_ref()).is_ok());
    }

    #[test]
    fn test_sha256_hasher_multiple_runs() {
        test_hasher_multiple_runs::<Sha256>();
    }

    #[test]
    fn test_sha256_hasher_multiple_updates() {
        test_hasher_multiple_updates::<Sha256>();
    }

    #[test]
    fn test_sha256_hasher_empty_input() {
        test_hasher_empty_input::<Sha256>();
    }

    #[test]
    fn test_sha256_hasher_large_input() {
        test_hasher_large_input::<Sha256>();
    }
}
