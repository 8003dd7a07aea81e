//! EC-Schnorr (BSI TR-03111 §4.2.3) implementation over secp256k1.
//!
//! The challenge binds the nonce commitment, the public key, and the message:
//! `r = SHA-256(compressed(Q) ‖ compressed(P) ‖ m) mod n`, and the response is
//! `s = k − r·d mod n`. Both hash-input ordering and the compressed-point
//! encoding are part of the wire contract and must not change.
//!
//! Nonces are derived with RFC 6979 (HMAC-DRBG keyed by the private scalar
//! over the message digest), so signing is deterministic: a bad RNG can never
//! leak the private key, and repeated signing of the same message is
//! byte-stable.
//!
//! # Example
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

pub(crate) mod codec;
pub(crate) mod curve;
mod scheme;

pub use scheme::{PrivateKey, PublicKey, Signature};
