use jose_crypto::{
    ec::EcKeyPair,
    hash::HashAlg,
    okp::{Ed25519KeyPair, X25519KeyPair},
    rsa::RsaKeyPair,
};
use serde::{Deserialize, Serialize};

use super::{okp::OkpCurves, Ec, Key, Oct, Okp, Parameters, Rsa, Secret};
use crate::{error::JoseError, util::b64_encode};

/// A JSON Web Key.
///
/// This type is defined in [RFC7517 Section 4].
///
/// A `Jwk` is validated when it is built or parsed and cannot be modified
/// afterwards; the `with_*` methods return new keys.
///
/// [RFC7517 Section 4]: https://datatracker.ietf.org/doc/html/rfc7517#section-4
#[derive(Serialize, Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(try_from = "RawJwk")]
pub struct Jwk {
    #[serde(flatten)]
    key: Key,

    /// The key parameters.
    #[serde(flatten)]
    prm: Parameters,
}

#[derive(Deserialize)]
struct RawJwk {
    #[serde(flatten)]
    key: Key,
    #[serde(flatten)]
    prm: Parameters,
}

impl TryFrom<RawJwk> for Jwk {
    type Error = JoseError;

    fn try_from(raw: RawJwk) -> Result<Self, Self::Error> {
        Jwk::new(raw.key, raw.prm)
    }
}

impl Jwk {
    /// Builds a key, checking its parameters for the key type.
    pub fn new(key: impl Into<Key>, prm: Parameters) -> Result<Self, JoseError> {
        let key = key.into();
        key.validate()?;
        Ok(Self { key, prm })
    }

    /// Parses and validates a JSON encoded key.
    pub fn from_json(json: &str) -> Result<Self, JoseError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, JoseError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn prm(&self) -> &Parameters {
        &self.prm
    }

    pub fn kty(&self) -> &'static str {
        self.key.kty()
    }

    pub fn kid(&self) -> Option<&str> {
        self.prm.kid.as_deref()
    }

    pub fn alg(&self) -> Option<&str> {
        self.prm.alg.as_deref()
    }

    pub fn is_private(&self) -> bool {
        self.key.is_private()
    }

    /// Returns a copy of the key with other parameters.
    pub fn with_prm(&self, prm: Parameters) -> Self {
        Self { key: self.key.clone(), prm }
    }

    /// Returns a copy of the key with the given key identifier.
    pub fn with_kid(&self, kid: impl Into<String>) -> Self {
        self.with_prm(self.prm.clone().with_kid(kid))
    }

    /// The public part of the key. Symmetric keys have none.
    pub fn to_public(&self) -> Result<Self, JoseError> {
        Ok(Self {
            key: self.key.to_public()?,
            prm: self.prm.clone(),
        })
    }

    /// Computes the base64url encoded thumbprint of the key (RFC 7638).
    pub fn thumbprint(&self, hash: HashAlg) -> Result<String, JoseError> {
        let members = json_canon::to_string(&self.key.thumbprint_members())?;
        Ok(b64_encode(&hash.digest(members.as_bytes())))
    }

    /// The raw bytes of a symmetric key.
    pub fn oct_key(&self) -> Result<&[u8], JoseError> {
        match &self.key {
            Key::Oct(oct) => Ok(oct.k.expose()),
            _ => Err(JoseError::invalid_key(format!("expected an oct key, got {}", self.kty()))),
        }
    }

    pub fn ec_key_pair(&self) -> Result<EcKeyPair, JoseError> {
        match &self.key {
            Key::Ec(ec) => ec.key_pair(),
            _ => Err(JoseError::invalid_key(format!("expected an EC key, got {}", self.kty()))),
        }
    }

    pub fn rsa_key_pair(&self) -> Result<RsaKeyPair, JoseError> {
        match &self.key {
            Key::Rsa(rsa) => rsa.key_pair(),
            _ => Err(JoseError::invalid_key(format!("expected an RSA key, got {}", self.kty()))),
        }
    }

    pub fn ed25519_key_pair(&self) -> Result<Ed25519KeyPair, JoseError> {
        match &self.key {
            Key::Okp(okp) => okp.ed25519_key_pair(),
            _ => Err(JoseError::invalid_key(format!("expected an OKP key, got {}", self.kty()))),
        }
    }

    pub fn x25519_key_pair(&self) -> Result<X25519KeyPair, JoseError> {
        match &self.key {
            Key::Okp(okp) => okp.x25519_key_pair(),
            _ => Err(JoseError::invalid_key(format!("expected an OKP key, got {}", self.kty()))),
        }
    }

    pub fn from_oct(key: impl Into<Vec<u8>>, prm: Parameters) -> Result<Self, JoseError> {
        Self::new(Oct { k: Secret::new(key) }, prm)
    }

    pub fn from_ec_key_pair(key_pair: &EcKeyPair, prm: Parameters) -> Result<Self, JoseError> {
        Self::new(Ec::from_key_pair(key_pair)?, prm)
    }

    pub fn from_rsa_key_pair(key_pair: &RsaKeyPair, prm: Parameters) -> Result<Self, JoseError> {
        Self::new(Rsa::from_key_pair(key_pair), prm)
    }

    pub fn from_ed25519_key_pair(key_pair: &Ed25519KeyPair, prm: Parameters) -> Result<Self, JoseError> {
        let okp = Okp::from_parts(OkpCurves::Ed25519, key_pair, key_pair.secret_key.is_some())?;
        Self::new(okp, prm)
    }

    pub fn from_x25519_key_pair(key_pair: &X25519KeyPair, prm: Parameters) -> Result<Self, JoseError> {
        let okp = Okp::from_parts(OkpCurves::X25519, key_pair, key_pair.secret_key.is_some())?;
        Self::new(okp, prm)
    }
}

#[cfg(test)]
mod tests {
    use jose_crypto::{ec::Curve, Generate};
    use serde_json::json;

    use super::*;
    use crate::jwk::{Bytes, Class, EcCurves};

    const RFC7638_KEY: &str = r#"{
        "kty": "RSA",
        "n": "0vx7agoebGcQSuuPiLJXZptN9nndrQmbXEps2aiAFbWhM78LhWx4cbbfAAtVT86zwu1RK7aPFFxuhDR1L6tSoc_BJECPebWKRXjBZCiFV4n3oknjhMstn64tZ_2W-5JsGY4Hc5n9yBXArwl93lqt7_RN5w6Cf0h4QyQ5v-65YGjQR0_FDW2QvzqY368QQMicAtaSqzs8KJZgnYb9c7d0zgdAZHzu6qMQvRL5hajrn1n91CbOpbISD08qNLyrdkt-bFTWhAI4vMQFh6WeZu0fM4lFd2NcRwr3XPksINHaQ-G_xBniIqbw0Ls1jF44-csFCur-kEgU8awapJzKnqDKgw",
        "e": "AQAB",
        "alg": "RS256",
        "kid": "2011-04-29"
    }"#;

    #[test]
    fn test_rfc7638_thumbprint() {
        let jwk = Jwk::from_json(RFC7638_KEY).unwrap();
        assert_eq!(jwk.kty(), "RSA");
        assert_eq!(jwk.kid(), Some("2011-04-29"));
        assert_eq!(
            jwk.thumbprint(HashAlg::Sha256).unwrap(),
            "NzbLsXh8uDCcd-6MNwXF4W_7noWXFZAfHkxZsRGC9Xs"
        );
    }

    #[test]
    fn test_deserialization_validates_eagerly() {
        // P-256 coordinates of the wrong length
        let short = json!({"kty": "EC", "crv": "P-256", "x": "AAEC", "y": "AAEC"});
        assert!(serde_json::from_value::<Jwk>(short).is_err());

        // point not on the curve
        let off_curve = json!({
            "kty": "EC",
            "crv": "P-256",
            "x": Bytes::new(vec![1u8; 32]),
            "y": Bytes::new(vec![2u8; 32]),
        });
        assert!(serde_json::from_value::<Jwk>(off_curve).is_err());

        let empty_oct = json!({"kty": "oct", "k": ""});
        assert!(serde_json::from_value::<Jwk>(empty_oct).is_err());

        let unknown = json!({"kty": "XYZ"});
        assert!(serde_json::from_value::<Jwk>(unknown).is_err());
    }

    #[test]
    fn test_ec_round_trip_and_public_part() {
        let key_pair = EcKeyPair::generate(Curve::P256).unwrap();
        let jwk = Jwk::from_ec_key_pair(&key_pair, Parameters::default().with_use(Class::Signing)).unwrap();
        assert!(jwk.is_private());

        let parsed = Jwk::from_json(&jwk.to_json().unwrap()).unwrap();
        assert_eq!(parsed, jwk);

        let public = jwk.to_public().unwrap();
        assert!(!public.is_private());
        assert!(!public.to_json().unwrap().contains("\"d\""));
        match public.key() {
            Key::Ec(ec) => assert_eq!(ec.crv, EcCurves::P256),
            _ => panic!("expected an EC key"),
        }
        assert_eq!(
            public.thumbprint(HashAlg::Sha256).unwrap(),
            jwk.thumbprint(HashAlg::Sha256).unwrap()
        );
    }

    #[test]
    fn test_mismatched_ec_private_key_is_rejected() {
        let a = Jwk::from_ec_key_pair(&EcKeyPair::generate(Curve::P256).unwrap(), Parameters::default()).unwrap();
        let b = Jwk::from_ec_key_pair(&EcKeyPair::generate(Curve::P256).unwrap(), Parameters::default()).unwrap();
        let (Key::Ec(a), Key::Ec(b)) = (a.key(), b.key()) else {
            panic!("expected EC keys");
        };
        let mixed = Ec { d: b.d.clone(), ..a.clone() };
        assert!(matches!(Jwk::new(mixed, Parameters::default()), Err(JoseError::InvalidKey(_))));
    }

    #[test]
    fn test_okp_keys() {
        let ed = Ed25519KeyPair::new_with_seed(b"Sample seed bytes of thirtytwo!b").unwrap();
        let jwk = Jwk::from_ed25519_key_pair(&ed, Parameters::default()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&jwk.to_json().unwrap()).unwrap();
        assert_eq!(json["kty"], "OKP");
        assert_eq!(json["crv"], "Ed25519");
        assert!(jwk.x25519_key_pair().is_err());
        assert!(jwk.ed25519_key_pair().is_ok());

        let x = X25519KeyPair::new_with_seed(b"Sample seed bytes of thirtytwo!b").unwrap();
        let jwk = Jwk::from_x25519_key_pair(&x, Parameters::default()).unwrap();
        let Key::Okp(okp) = jwk.key() else {
            panic!("expected an OKP key");
        };
        let mut tampered = okp.clone();
        tampered.x = Bytes::new(vec![9u8; 32]);
        assert!(Jwk::new(tampered, Parameters::default()).is_err());
    }

    #[test]
    fn test_oct_key_has_no_public_part() {
        let jwk = Jwk::from_oct(vec![7u8; 32], Parameters::default().with_kid("sym")).unwrap();
        assert_eq!(jwk.oct_key().unwrap(), &[7u8; 32]);
        assert!(matches!(jwk.to_public(), Err(JoseError::InvalidKey(_))));
        assert!(jwk.ec_key_pair().is_err());
        assert!(!format!("{jwk:?}").contains("7, 7"));
    }

    #[test]
    fn test_with_kid_returns_new_key() {
        let jwk = Jwk::from_oct(vec![1u8; 16], Parameters::default()).unwrap();
        let renamed = jwk.with_kid("k1");
        assert_eq!(jwk.kid(), None);
        assert_eq!(renamed.kid(), Some("k1"));
    }
}
