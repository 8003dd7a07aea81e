use super::{codec, codec::CURVE_NAME, curve};
use crate::{Error, Hasher as _, Sha256};
use bytes::{Buf, BufMut};
use commonware_codec::{DecodeExt, Error as CodecError, FixedSize, Read, Write};
use commonware_utils::{from_hex, hex, Array, Span};
use core::{
    fmt::{Debug, Display},
    hash::{Hash, Hasher},
    ops::Deref,
};
use k256::{
    elliptic_curve::{
        ops::{LinearCombination, MulByGenerator},
        Field, Group, PrimeField,
    },
    AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar,
};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

const PRIVATE_KEY_LENGTH: usize = codec::SCALAR_LENGTH;
const PUBLIC_KEY_LENGTH: usize = codec::POINT_LENGTH;
const SIGNATURE_LENGTH: usize = 2 * codec::SCALAR_LENGTH;

/// Challenge `r = H(compressed(Q) ‖ compressed(P) ‖ m) mod n`.
///
/// The input ordering is normative: reordering it, or inserting tags or
/// length prefixes, breaks interoperability with every other implementation
/// of the scheme. Both signing and verification build the challenge here.
fn challenge(
    commitment: &AffinePoint,
    public_key: &[u8; PUBLIC_KEY_LENGTH],
    msg: &[u8],
) -> Scalar {
    let mut staging = Zeroizing::new([0u8; codec::POINT_LENGTH]);
    let mut cursor = &mut staging[..];
    codec::write_point(commitment, &mut cursor);

    let mut hasher = Sha256::new();
    hasher.update(&staging[..]);
    hasher.update(public_key);
    hasher.update(msg);
    let digest: [u8; 32] = hasher.finalize().into();
    curve::reduce_digest(&digest)
}

/// EC-Schnorr private key over secp256k1: a scalar in `[1, n−1]`.
///
/// The scalar and its byte form are zeroized on drop. Clones are deep and
/// independent.
#[derive(Clone)]
pub struct PrivateKey {
    raw: [u8; PRIVATE_KEY_LENGTH],
    d: NonZeroScalar,
    public: PublicKey,
}

impl crate::PrivateKey for PrivateKey {}

impl crate::Signer for PrivateKey {
    type Signature = Signature;
    type PublicKey = PublicKey;

    fn public_key(&self) -> Self::PublicKey {
        self.public.clone()
    }

    fn sign(&self, msg: &[u8]) -> Result<Signature, Error> {
        if msg.is_empty() {
            return Err(Error::EmptyMessage);
        }

        // The nonce DRBG (RFC 6979) is keyed by the private scalar over the
        // message digest, so signing is a pure function of `(d, msg)`. Each
        // rejected candidate feeds the attempt counter back in as additional
        // data: the redraw stays deterministic without ever repeating.
        let d_bytes = Zeroizing::new(self.d.to_bytes());
        let n_bytes = curve::order();
        let prehash = FieldBytes::from(<[u8; 32]>::from(Sha256::hash(msg)));
        let d = *self.d;

        let mut attempt: u32 = 0;
        loop {
            let retry = attempt.to_be_bytes();
            let data: &[u8] = if attempt == 0 { &[] } else { &retry };
            attempt = attempt.wrapping_add(1);

            // 1. Draw k from [1, n-1].
            let k_bytes = Zeroizing::new(rfc6979::generate_k::<sha2::Sha256, _>(
                &d_bytes, &n_bytes, &prehash, data,
            ));
            let Some(k) = Option::<Scalar>::from(Scalar::from_repr(*k_bytes)) else {
                continue;
            };
            if bool::from(k.is_zero()) {
                continue;
            }

            // 2. Commitment Q = kG.
            let commitment = ProjectivePoint::mul_by_generator(&k).to_affine();

            // 3. Challenge r = H(Q, P, m) mod n; restart on r = 0.
            let r = challenge(&commitment, &self.public.raw, msg);
            if bool::from(r.is_zero()) {
                continue;
            }

            // 4. Response s = k - r*d mod n; restart on s = 0.
            let s = k - r * d;
            if bool::from(s.is_zero()) {
                continue;
            }

            break Ok(Signature::from_scalars(r, s));
        }
    }
}

impl PrivateKey {
    /// Decode a private key from a hex string of exactly 64 nibbles.
    pub fn from_hex(raw: &str) -> Option<Self> {
        Self::decode(from_hex(raw)?.as_ref()).ok()
    }

    fn from_scalar(d: NonZeroScalar) -> Self {
        // d is non-zero and below n, so dG can never be the identity.
        let point = ProjectivePoint::mul_by_generator(&*d).to_affine();
        Self {
            raw: d.to_bytes().into(),
            d,
            public: PublicKey::from_point(point),
        }
    }
}

impl crate::PrivateKeyExt for PrivateKey {
    fn from_rng<R: CryptoRngCore>(rng: &mut R) -> Self {
        Self::from_scalar(NonZeroScalar::random(rng))
    }
}

impl Write for PrivateKey {
    fn write(&self, buf: &mut impl BufMut) {
        self.raw.write(buf);
    }
}

impl Read for PrivateKey {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let scalar = codec::read_scalar(buf)?;
        let d = Option::<NonZeroScalar>::from(NonZeroScalar::new(scalar))
            .ok_or(CodecError::Invalid(CURVE_NAME, "private scalar is zero"))?;
        Ok(Self::from_scalar(d))
    }
}

impl FixedSize for PrivateKey {
    const SIZE: usize = PRIVATE_KEY_LENGTH;
}

impl Span for PrivateKey {}

impl Array for PrivateKey {}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.raw.zeroize();
        self.d.zeroize();
    }
}

impl ZeroizeOnDrop for PrivateKey {}

impl Eq for PrivateKey {}

impl Hash for PrivateKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Ord for PrivateKey {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl PartialOrd for PrivateKey {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<[u8]> for PrivateKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for PrivateKey {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

/// EC-Schnorr public key over secp256k1: a non-identity point in SEC1
/// compressed form (33 bytes).
///
/// Keys are totally ordered by their compressed encoding and hash over the
/// same bytes, so they can serve as deterministic map and table keys.
#[derive(Clone)]
pub struct PublicKey {
    raw: [u8; PUBLIC_KEY_LENGTH],
    point: AffinePoint,
}

impl From<PrivateKey> for PublicKey {
    fn from(value: PrivateKey) -> Self {
        value.public.clone()
    }
}

impl crate::PublicKey for PublicKey {}

impl crate::Verifier for PublicKey {
    type Signature = Signature;

    fn verify(&self, msg: &[u8], sig: &Self::Signature) -> bool {
        if msg.is_empty() {
            return false;
        }

        // r and s are in [1, n-1] by construction of Signature, so the range
        // checks of the standard are already discharged. Recompute the
        // commitment Q' = sG + rP.
        let commitment = ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            &sig.s,
            &ProjectivePoint::from(self.point),
            &sig.r,
        );
        if bool::from(commitment.is_identity()) {
            return false;
        }

        challenge(&commitment.to_affine(), &self.raw, msg) == sig.r
    }
}

impl PublicKey {
    /// Decode a public key from a hex string of exactly 66 nibbles.
    pub fn from_hex(raw: &str) -> Option<Self> {
        Self::decode(from_hex(raw)?.as_ref()).ok()
    }

    fn from_point(point: AffinePoint) -> Self {
        let mut raw = [0u8; PUBLIC_KEY_LENGTH];
        let mut cursor = &mut raw[..];
        codec::write_point(&point, &mut cursor);
        Self { raw, point }
    }
}

impl Write for PublicKey {
    fn write(&self, buf: &mut impl BufMut) {
        self.raw.write(buf);
    }
}

impl Read for PublicKey {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let point = codec::read_point(buf)?;
        Ok(Self::from_point(point))
    }
}

impl FixedSize for PublicKey {
    const SIZE: usize = PUBLIC_KEY_LENGTH;
}

impl Span for PublicKey {}

impl Array for PublicKey {}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Ord for PublicKey {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl PartialOrd for PublicKey {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for PublicKey {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

/// EC-Schnorr signature: the challenge `r` and response `s`, both scalars in
/// `[1, n−1]`, serialized as `r ‖ s` (64 bytes).
#[derive(Clone, Eq, PartialEq)]
pub struct Signature {
    raw: [u8; SIGNATURE_LENGTH],
    r: Scalar,
    s: Scalar,
}

impl crate::Signature for Signature {}

impl Signature {
    /// Decode a signature from a hex string of exactly 128 nibbles.
    pub fn from_hex(raw: &str) -> Option<Self> {
        Self::decode(from_hex(raw)?.as_ref()).ok()
    }

    fn from_scalars(r: Scalar, s: Scalar) -> Self {
        let mut raw = [0u8; SIGNATURE_LENGTH];
        let mut cursor = &mut raw[..];
        codec::write_scalar(&r, &mut cursor);
        codec::write_scalar(&s, &mut cursor);
        Self { raw, r, s }
    }
}

impl Write for Signature {
    fn write(&self, buf: &mut impl BufMut) {
        self.raw.write(buf);
    }
}

impl Read for Signature {
    type Cfg = ();

    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, CodecError> {
        let r = codec::read_scalar(buf)?;
        if bool::from(r.is_zero()) {
            return Err(CodecError::Invalid(CURVE_NAME, "challenge is zero"));
        }
        let s = codec::read_scalar(buf)?;
        if bool::from(s.is_zero()) {
            return Err(CodecError::Invalid(CURVE_NAME, "response is zero"));
        }
        Ok(Self::from_scalars(r, s))
    }
}

impl FixedSize for Signature {
    const SIZE: usize = SIGNATURE_LENGTH;
}

impl Span for Signature {}

impl Array for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.raw
    }
}

impl Deref for Signature {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.raw
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex(&self.raw))
    }
}
