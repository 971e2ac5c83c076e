use jose_crypto::{
    ec::{Curve, EcKeyPair},
    okp::{Ed25519KeyPair, X25519KeyPair},
    random_bytes,
    rsa::RsaKeyPair,
    Generate,
};

use super::{EcCurves, Jwk, Key, OkpCurves, Parameters};
use crate::error::JoseError;

/// Creates fresh keys of every supported type.
pub struct JwkFactory;

impl JwkFactory {
    /// A random symmetric key of `bits` bits.
    pub fn create_oct_key(bits: usize, prm: Parameters) -> Result<Jwk, JoseError> {
        if bits == 0 || bits % 8 != 0 {
            return Err(JoseError::invalid_key("key size must be a positive multiple of 8"));
        }
        Jwk::from_oct(random_bytes(bits / 8)?, prm)
    }

    /// A symmetric key holding the given secret, e.g. a PBES2 password.
    pub fn create_from_secret(secret: impl Into<Vec<u8>>, prm: Parameters) -> Result<Jwk, JoseError> {
        Jwk::from_oct(secret, prm)
    }

    /// A new RSA key pair with CRT parameters and `e = 65537`.
    pub fn create_rsa_key(bits: usize, prm: Parameters) -> Result<Jwk, JoseError> {
        Jwk::from_rsa_key_pair(&RsaKeyPair::generate(bits)?, prm)
    }

    pub fn create_ec_key(curve: EcCurves, prm: Parameters) -> Result<Jwk, JoseError> {
        Jwk::from_ec_key_pair(&EcKeyPair::generate(Curve::from(curve))?, prm)
    }

    pub fn create_okp_key(curve: OkpCurves, prm: Parameters) -> Result<Jwk, JoseError> {
        match curve {
            OkpCurves::Ed25519 => Jwk::from_ed25519_key_pair(&Ed25519KeyPair::new()?, prm),
            OkpCurves::X25519 => Jwk::from_x25519_key_pair(&X25519KeyPair::new()?, prm),
        }
    }

    /// The key accepted by the `none` signature algorithm.
    pub fn create_none_key(prm: Parameters) -> Result<Jwk, JoseError> {
        Jwk::new(Key::None, prm)
    }
}

/// Keys shared by the tests of this crate.
#[cfg(test)]
pub(crate) mod test_keys {
    use once_cell::sync::Lazy;

    use super::*;

    // RSA generation is slow, keep one key for the whole test binary.
    pub(crate) static RSA_2048: Lazy<Jwk> =
        Lazy::new(|| JwkFactory::create_rsa_key(2048, Parameters::default()).unwrap());
}
