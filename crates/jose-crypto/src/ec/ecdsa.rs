//! ECDSA over the NIST prime curves with the raw `r || s` signature encoding
//! used by JWS (RFC 7518, section 3.4).

use super::{curve::Curve, point::Point};
use crate::{errors::Error, math::BigInteger};

// Leftmost `order_bits` bits of the digest (SEC 1, section 4.1.3 step 5).
fn digest_to_integer(curve: Curve, digest: &[u8]) -> BigInteger {
    let order_bits = curve.params().n.bits();
    let z = BigInteger::from_bytes_be(digest);
    let digest_bits = digest.len() * 8;
    if digest_bits > order_bits {
        return z.shr(digest_bits - order_bits);
    }
    z
}

/// Sign a message digest with the private scalar `d`.
pub(crate) fn sign(curve: Curve, d: &BigInteger, digest: &[u8]) -> Result<Vec<u8>, Error> {
    let params = curve.params();
    let n = &params.n;
    let z = digest_to_integer(curve, digest);
    let len = curve.coordinate_len();

    loop {
        let k = BigInteger::random_range(&BigInteger::one(), n)?;
        let r = match params.mul_base(&k)?.x() {
            Some(x) => x.modulo(n)?,
            None => continue,
        };
        if r.is_zero() {
            continue;
        }
        let s = k.mod_inverse(n)?.mod_mul(&z.mod_add(&r.mod_mul(d, n)?, n)?, n)?;
        if s.is_zero() {
            continue;
        }

        let mut signature = r.to_bytes(len)?;
        signature.extend(s.to_bytes(len)?);
        return Ok(signature);
    }
}

/// Verify a raw `r || s` signature against the public point `q`.
///
/// Every failure, including a malformed signature, is `Error::Verification`.
pub(crate) fn verify(curve: Curve, q: &Point, digest: &[u8], signature: &[u8]) -> Result<(), Error> {
    let params = curve.params();
    let n = &params.n;
    let len = curve.coordinate_len();
    if signature.len() != 2 * len {
        return Err(Error::Verification);
    }

    let r = BigInteger::from_bytes_be(&signature[..len]);
    let s = BigInteger::from_bytes_be(&signature[len..]);
    if r.is_zero() || s.is_zero() || r >= *n || s >= *n {
        return Err(Error::Verification);
    }

    let check = || -> Result<bool, Error> {
        let z = digest_to_integer(curve, digest);
        let w = s.mod_inverse(n)?;
        let u1 = z.mod_mul(&w, n)?;
        let u2 = r.mod_mul(&w, n)?;
        let point = params.add(&params.mul_base(&u1)?, &params.mul(&u2, q)?)?;
        match point.x() {
            Some(x) => Ok(x.modulo(n)? == r),
            None => Ok(false),
        }
    };

    match check() {
        Ok(true) => Ok(()),
        _ => Err(Error::Verification),
    }
}
