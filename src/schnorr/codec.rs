//! Fixed-width wire encodings for scalars and compressed points.
//!
//! A scalar is 32 big-endian bytes, left-padded with zeros: no length prefix,
//! no sign byte. A point is 33 bytes in SEC1 compressed form: a parity prefix
//! (`0x02` for even `y`, `0x03` for odd) followed by the 32-byte big-endian
//! `x` coordinate. The point at infinity has no compressed encoding, so it can
//! neither be written nor read at this layer.
//!
//! Readers consume from the caller's buffer cursor and writers append at it,
//! so callers position serialization with the [Buf]/[BufMut] they pass in.

use bytes::{Buf, BufMut};
use commonware_codec::{Error as CodecError, ReadExt};
use k256::{
    elliptic_curve::{sec1::ToEncodedPoint, PrimeField},
    AffinePoint, Scalar,
};

pub(crate) const CURVE_NAME: &str = "secp256k1-schnorr";

/// Serialized length of a scalar.
pub(crate) const SCALAR_LENGTH: usize = 32;

/// Serialized length of a compressed point.
pub(crate) const POINT_LENGTH: usize = SCALAR_LENGTH + 1;

/// Write a scalar as 32 big-endian bytes.
pub(crate) fn write_scalar(scalar: &Scalar, buf: &mut impl BufMut) {
    buf.put_slice(&scalar.to_bytes());
}

/// Read a 32-byte big-endian scalar, rejecting values `>= n`.
///
/// Zero is representable at this layer; the entities impose non-zero where
/// their invariants require it.
pub(crate) fn read_scalar(buf: &mut impl Buf) -> Result<Scalar, CodecError> {
    let raw = <[u8; SCALAR_LENGTH]>::read(buf)?;
    Option::<Scalar>::from(Scalar::from_repr(raw.into()))
        .ok_or(CodecError::Invalid(CURVE_NAME, "scalar exceeds group order"))
}

/// Write a point in SEC1 compressed form (33 bytes).
///
/// The identity has no compressed encoding; callers only hold non-identity
/// points, which this module's reader enforces on the way in.
pub(crate) fn write_point(point: &AffinePoint, buf: &mut impl BufMut) {
    let encoded = point.to_encoded_point(true);
    buf.put_slice(encoded.as_bytes());
}

/// Read a SEC1 compressed point, rejecting anything that is not a
/// non-identity point on the curve.
pub(crate) fn read_point(buf: &mut impl Buf) -> Result<AffinePoint, CodecError> {
    let raw = <[u8; POINT_LENGTH]>::read(buf)?;
    let point = k256::PublicKey::from_sec1_bytes(&raw)
        .map_err(|e| CodecError::Wrapped(CURVE_NAME, e.into()))?;
    Ok(*point.as_affine())
}
