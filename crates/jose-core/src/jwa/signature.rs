//! Signature and MAC algorithms (RFC 7518 section 3, RFC 8037).

use jose_crypto::{
    ec::Curve,
    hash::HashAlg,
    rsa::{pkcs1v15, pss},
    symmetric::hmac,
    CoreSign,
};

use super::{Algorithm, SignatureAlgorithm, OCT};
use crate::{error::JoseError, jwk::Jwk};

/// HMAC with SHA-2 (`HS256`, `HS384`, `HS512`).
#[derive(Debug, Clone, Copy)]
pub struct Hmac {
    name: &'static str,
    hash: HashAlg,
}

impl Hmac {
    pub const fn hs256() -> Self {
        Self { name: "HS256", hash: HashAlg::Sha256 }
    }

    pub const fn hs384() -> Self {
        Self { name: "HS384", hash: HashAlg::Sha384 }
    }

    pub const fn hs512() -> Self {
        Self { name: "HS512", hash: HashAlg::Sha512 }
    }

    /// Keys shorter than the hash output are refused.
    fn key<'a>(&self, key: &'a Jwk) -> Result<&'a [u8], JoseError> {
        let k = key.oct_key()?;
        if k.len() < self.hash.output_len() {
            return Err(JoseError::invalid_key(format!(
                "{} requires a key of at least {} bytes",
                self.name,
                self.hash.output_len()
            )));
        }
        Ok(k)
    }
}

impl Algorithm for Hmac {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        OCT
    }
}

impl SignatureAlgorithm for Hmac {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError> {
        Ok(hmac::sign(self.hash, self.key(key)?, input)?)
    }

    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        Ok(hmac::verify(self.hash, self.key(key)?, input, signature)?)
    }
}

/// RSASSA-PKCS1-v1_5 (`RS256`, `RS384`, `RS512`).
#[derive(Debug, Clone, Copy)]
pub struct RsaPkcs1 {
    name: &'static str,
    hash: HashAlg,
}

impl RsaPkcs1 {
    pub const fn rs256() -> Self {
        Self { name: "RS256", hash: HashAlg::Sha256 }
    }

    pub const fn rs384() -> Self {
        Self { name: "RS384", hash: HashAlg::Sha384 }
    }

    pub const fn rs512() -> Self {
        Self { name: "RS512", hash: HashAlg::Sha512 }
    }
}

impl Algorithm for RsaPkcs1 {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["RSA"]
    }
}

impl SignatureAlgorithm for RsaPkcs1 {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(pkcs1v15::sign(key_pair.private_key()?, self.hash, input)?)
    }

    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(pkcs1v15::verify(&key_pair.public_key, self.hash, input, signature)?)
    }
}

/// RSASSA-PSS with MGF1 and a salt as long as the hash (`PS256`, `PS384`, `PS512`).
#[derive(Debug, Clone, Copy)]
pub struct RsaPss {
    name: &'static str,
    hash: HashAlg,
}

impl RsaPss {
    pub const fn ps256() -> Self {
        Self { name: "PS256", hash: HashAlg::Sha256 }
    }

    pub const fn ps384() -> Self {
        Self { name: "PS384", hash: HashAlg::Sha384 }
    }

    pub const fn ps512() -> Self {
        Self { name: "PS512", hash: HashAlg::Sha512 }
    }
}

impl Algorithm for RsaPss {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["RSA"]
    }
}

impl SignatureAlgorithm for RsaPss {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(pss::sign(key_pair.private_key()?, self.hash, input)?)
    }

    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(pss::verify(&key_pair.public_key, self.hash, input, signature)?)
    }
}

/// ECDSA over a NIST curve (`ES256`, `ES384`, `ES512`).
#[derive(Debug, Clone, Copy)]
pub struct Ecdsa {
    name: &'static str,
    curve: Curve,
}

impl Ecdsa {
    pub const fn es256() -> Self {
        Self { name: "ES256", curve: Curve::P256 }
    }

    pub const fn es384() -> Self {
        Self { name: "ES384", curve: Curve::P384 }
    }

    pub const fn es512() -> Self {
        Self { name: "ES512", curve: Curve::P521 }
    }

    fn key_pair(&self, key: &Jwk) -> Result<jose_crypto::ec::EcKeyPair, JoseError> {
        let key_pair = key.ec_key_pair()?;
        if key_pair.curve() != self.curve {
            return Err(JoseError::invalid_key(format!(
                "{} requires a {} key",
                self.name,
                self.curve.name()
            )));
        }
        Ok(key_pair)
    }
}

impl Algorithm for Ecdsa {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["EC"]
    }
}

impl SignatureAlgorithm for Ecdsa {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError> {
        Ok(self.key_pair(key)?.sign(input)?)
    }

    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        Ok(self.key_pair(key)?.verify(input, signature)?)
    }
}

/// Ed25519 signatures (`EdDSA`).
#[derive(Debug, Clone, Copy)]
pub struct EdDsa;

impl Algorithm for EdDsa {
    fn name(&self) -> &'static str {
        "EdDSA"
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["OKP"]
    }
}

impl SignatureAlgorithm for EdDsa {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError> {
        Ok(key.ed25519_key_pair()?.sign(input)?)
    }

    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        Ok(key.ed25519_key_pair()?.verify(input, signature)?)
    }
}

/// The unsecured `none` algorithm. It only accepts `none` keys.
#[derive(Debug, Clone, Copy)]
pub struct NoneSignature;

impl Algorithm for NoneSignature {
    fn name(&self) -> &'static str {
        "none"
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["none"]
    }
}

impl NoneSignature {
    fn check_key(key: &Jwk) -> Result<(), JoseError> {
        if key.kty() != "none" {
            return Err(JoseError::invalid_key("the none algorithm requires a none key"));
        }
        Ok(())
    }
}

impl SignatureAlgorithm for NoneSignature {
    fn sign(&self, key: &Jwk, _input: &[u8]) -> Result<Vec<u8>, JoseError> {
        Self::check_key(key)?;
        Ok(Vec::new())
    }

    fn verify(&self, key: &Jwk, _input: &[u8], signature: &[u8]) -> Result<(), JoseError> {
        Self::check_key(key)?;
        if signature.is_empty() {
            Ok(())
        } else {
            Err(JoseError::Verification)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwk::{EcCurves, JwkFactory, OkpCurves, Parameters},
        util::b64_decode,
    };

    const RFC7515_HS256_KEY: &str =
        "AyM1SysPpbyDfgZld3umj1qzKObwVMkoqQ-EstJQLr_T-1qS0gZH75aKtMN3Yj0iPS4hcgUuTwjAzZr1Z9CAow";

    #[test]
    fn test_hs256_known_answer() {
        let key = Jwk::from_oct(b64_decode(RFC7515_HS256_KEY).unwrap(), Parameters::default()).unwrap();
        let input = "eyJ0eXAiOiJKV1QiLA0KICJhbGciOiJIUzI1NiJ9.eyJpc3MiOiJqb2UiLA0KICJleHAiOjEzMDA4MTkzODAsDQogImh0dHA6Ly9leGFtcGxlLmNvbS9pc19yb290Ijp0cnVlfQ";
        let expected = b64_decode("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk").unwrap();

        let hs256 = Hmac::hs256();
        assert_eq!(hs256.sign(&key, input.as_bytes()).unwrap(), expected);
        assert!(hs256.verify(&key, input.as_bytes(), &expected).is_ok());
        assert_eq!(
            hs256.verify(&key, b"other input", &expected),
            Err(JoseError::Verification)
        );
    }

    #[test]
    fn test_hmac_rejects_short_keys() {
        let key = Jwk::from_oct(vec![1u8; 32], Parameters::default()).unwrap();
        assert!(Hmac::hs256().sign(&key, b"data").is_ok());
        assert!(matches!(Hmac::hs512().sign(&key, b"data"), Err(JoseError::InvalidKey(_))));
    }

    #[test]
    fn test_ecdsa_checks_the_curve() {
        let key = JwkFactory::create_ec_key(EcCurves::P384, Parameters::default()).unwrap();
        let signature = Ecdsa::es384().sign(&key, b"payload").unwrap();
        assert_eq!(signature.len(), 96);
        assert!(Ecdsa::es384().verify(&key.to_public().unwrap(), b"payload", &signature).is_ok());
        assert!(matches!(Ecdsa::es256().sign(&key, b"payload"), Err(JoseError::InvalidKey(_))));
    }

    #[test]
    fn test_eddsa() {
        let key = JwkFactory::create_okp_key(OkpCurves::Ed25519, Parameters::default()).unwrap();
        let signature = EdDsa.sign(&key, b"payload").unwrap();
        assert!(EdDsa.verify(&key.to_public().unwrap(), b"payload", &signature).is_ok());
        assert_eq!(EdDsa.verify(&key, b"tampered", &signature), Err(JoseError::Verification));
    }

    #[test]
    fn test_rsa_signatures() {
        let key = crate::jwk::factory::test_keys::RSA_2048.clone();
        let public = key.to_public().unwrap();
        let algorithms: [&dyn SignatureAlgorithm; 2] = [&RsaPkcs1::rs256(), &RsaPss::ps384()];
        for alg in algorithms {
            let signature = alg.sign(&key, b"payload").unwrap();
            assert_eq!(signature.len(), 256);
            assert!(alg.verify(&public, b"payload", &signature).is_ok());
            assert!(alg.verify(&public, b"payload!", &signature).is_err());
            assert!(alg.sign(&public, b"payload").is_err());
        }
    }

    #[test]
    fn test_none_requires_none_key() {
        let none = JwkFactory::create_none_key(Parameters::default()).unwrap();
        assert_eq!(NoneSignature.sign(&none, b"x").unwrap(), Vec::<u8>::new());
        assert!(NoneSignature.verify(&none, b"x", &[]).is_ok());
        assert_eq!(NoneSignature.verify(&none, b"x", &[0]), Err(JoseError::Verification));

        let oct = Jwk::from_oct(vec![1u8; 32], Parameters::default()).unwrap();
        assert!(NoneSignature.sign(&oct, b"x").is_err());
    }
}
