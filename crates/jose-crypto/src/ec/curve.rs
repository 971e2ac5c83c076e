use once_cell::sync::Lazy;

use super::point::Point;
use crate::{hash::HashAlg, math::BigInteger};

/// Named NIST prime curves in short Weierstrass form `y^2 = x^3 + ax + b`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Curve {
    P256,
    P384,
    P521,
}

/// Domain parameters of a curve. Every supported curve has cofactor 1.
#[derive(Debug)]
pub struct CurveParams {
    /// Field prime.
    pub p: BigInteger,
    pub a: BigInteger,
    pub b: BigInteger,
    /// Order of the generator.
    pub n: BigInteger,
    /// Base point.
    pub g: Point,
}

impl Curve {
    /// JOSE curve name (`crv`).
    pub fn name(&self) -> &'static str {
        match self {
            Curve::P256 => "P-256",
            Curve::P384 => "P-384",
            Curve::P521 => "P-521",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Curve::P256),
            "P-384" => Some(Curve::P384),
            "P-521" => Some(Curve::P521),
            _ => None,
        }
    }

    /// Byte length of a coordinate, of a private scalar, and of each half of a signature.
    pub fn coordinate_len(&self) -> usize {
        match self {
            Curve::P256 => 32,
            Curve::P384 => 48,
            Curve::P521 => 66,
        }
    }

    /// Digest paired with the curve by ES256, ES384 and ES512.
    pub fn hash(&self) -> HashAlg {
        match self {
            Curve::P256 => HashAlg::Sha256,
            Curve::P384 => HashAlg::Sha384,
            Curve::P521 => HashAlg::Sha512,
        }
    }

    pub fn params(&self) -> &'static CurveParams {
        match self {
            Curve::P256 => &P256,
            Curve::P384 => &P384,
            Curve::P521 => &P521,
        }
    }
}

// Constants are checked by the tests below; a typo would put G off the curve.
fn constant(hex: &str) -> BigInteger {
    BigInteger::from_hex(hex).unwrap_or_default()
}

fn params(p: &str, b: &str, n: &str, gx: &str, gy: &str) -> CurveParams {
    let p = constant(p);
    // a = -3 mod p for all NIST prime curves
    let a = p.sub(&BigInteger::from(3u32)).unwrap_or_default();
    CurveParams {
        a,
        b: constant(b),
        n: constant(n),
        g: Point::Affine { x: constant(gx), y: constant(gy) },
        p,
    }
}

static P256: Lazy<CurveParams> = Lazy::new(|| {
    params(
        "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
        "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
        "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
        "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
    )
});

static P384: Lazy<CurveParams> = Lazy::new(|| {
    params(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeffffffff0000000000000000ffffffff",
        "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875ac656398d8a2ed19d2a85c8edd3ec2aef",
        "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf581a0db248b0a77aecec196accc52973",
        "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a385502f25dbf55296c3a545e3872760ab7",
        "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c00a60b1ce1d7e819d7a431d7c90ea0e5f",
    )
});

static P521: Lazy<CurveParams> = Lazy::new(|| {
    params(
        "01ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        "0051953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f00",
        "01fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386409",
        "00c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3dbaa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd66",
        "011839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e662c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16650",
    )
});
