//! Read-only access to the secp256k1 group parameters.
//!
//! With the `k256` backend the group and its order are compile-time
//! constants, so the accessors here cannot fail and are safe to call from any
//! thread. The base point is reached through `ProjectivePoint::GENERATOR` and
//! `mul_by_generator`.

use k256::{
    elliptic_curve::{
        bigint::{ArrayEncoding, U256},
        ops::Reduce,
        Curve,
    },
    FieldBytes, Scalar, Secp256k1,
};

/// The order `n` of the secp256k1 base-point group as 32 big-endian bytes.
pub(crate) fn order() -> FieldBytes {
    Secp256k1::ORDER.to_be_byte_array()
}

/// Interpret a 32-byte digest as a big-endian integer and reduce it modulo
/// `n`.
///
/// Both the signer (building the challenge) and the verifier (rebuilding it)
/// must reduce identically: comparing an unreduced digest appears to work for
/// random inputs but rejects every signature whose raw digest is `≥ n`.
pub(crate) fn reduce_digest(digest: &[u8; 32]) -> Scalar {
    <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_utils::hex;
    use k256::elliptic_curve::Field;

    #[test]
    fn test_order() {
        // Well-known secp256k1 group order.
        assert_eq!(
            hex(&order()),
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        );
    }

    #[test]
    fn test_reduce_digest_below_order() {
        let mut digest = [0u8; 32];
        digest[31] = 0x2a;
        assert_eq!(reduce_digest(&digest), Scalar::from(0x2au64));
    }

    #[test]
    fn test_reduce_digest_wraps_at_order() {
        // n reduces to zero...
        let n: [u8; 32] = order().into();
        assert_eq!(reduce_digest(&n), Scalar::ZERO);

        // ...and n + 1 reduces to one (n ends in 0x41, so no carry).
        let mut n_plus_one = n;
        n_plus_one[31] += 1;
        assert_eq!(reduce_digest(&n_plus_one), Scalar::ONE);
    }
}
