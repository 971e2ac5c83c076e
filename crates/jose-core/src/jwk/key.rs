use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{Ec, Oct, Okp, Rsa};
use crate::error::JoseError;

/// A key type that can be contained in a JWK.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kty")]
pub enum Key {
    /// An elliptic-curve key.
    #[serde(rename = "EC")]
    Ec(Ec),

    /// An RSA key.
    #[serde(rename = "RSA")]
    Rsa(Rsa),

    /// A symmetric key.
    #[serde(rename = "oct")]
    Oct(Oct),

    /// A CFRG-curve key.
    #[serde(rename = "OKP")]
    Okp(Okp),

    /// The key used with the `none` signature algorithm.
    #[serde(rename = "none")]
    None,
}

impl Key {
    /// The `kty` value.
    pub fn kty(&self) -> &'static str {
        match self {
            Key::Ec(_) => "EC",
            Key::Rsa(_) => "RSA",
            Key::Oct(_) => "oct",
            Key::Okp(_) => "OKP",
            Key::None => "none",
        }
    }

    pub(crate) fn validate(&self) -> Result<(), JoseError> {
        match self {
            Key::Ec(key) => key.validate(),
            Key::Rsa(key) => key.validate(),
            Key::Oct(key) => key.validate(),
            Key::Okp(key) => key.validate(),
            Key::None => Ok(()),
        }
    }

    /// Whether the key holds private material. Symmetric keys always do.
    pub fn is_private(&self) -> bool {
        match self {
            Key::Ec(key) => key.d.is_some(),
            Key::Rsa(key) => key.is_private(),
            Key::Oct(_) => true,
            Key::Okp(key) => key.d.is_some(),
            Key::None => false,
        }
    }

    pub(crate) fn to_public(&self) -> Result<Self, JoseError> {
        match self {
            Key::Ec(key) => Ok(Key::Ec(key.to_public())),
            Key::Rsa(key) => Ok(Key::Rsa(key.to_public())),
            Key::Oct(_) => Err(JoseError::invalid_key("a symmetric key has no public part")),
            Key::Okp(key) => Ok(Key::Okp(key.to_public())),
            Key::None => Ok(Key::None),
        }
    }

    /// The required members hashed by a JWK thumbprint (RFC 7638, RFC 8037).
    pub(crate) fn thumbprint_members(&self) -> Value {
        match self {
            Key::Ec(key) => json!({
                "crv": key.crv,
                "kty": "EC",
                "x": key.x,
                "y": key.y,
            }),
            Key::Rsa(key) => json!({
                "e": key.e,
                "kty": "RSA",
                "n": key.n,
            }),
            Key::Oct(key) => json!({
                "k": key.k,
                "kty": "oct",
            }),
            Key::Okp(key) => json!({
                "crv": key.crv,
                "kty": "OKP",
                "x": key.x,
            }),
            Key::None => json!({ "kty": "none" }),
        }
    }
}

impl From<Ec> for Key {
    #[inline(always)]
    fn from(key: Ec) -> Self {
        Self::Ec(key)
    }
}

impl From<Rsa> for Key {
    #[inline(always)]
    fn from(key: Rsa) -> Self {
        Self::Rsa(key)
    }
}

impl From<Oct> for Key {
    #[inline(always)]
    fn from(key: Oct) -> Self {
        Self::Oct(key)
    }
}

impl From<Okp> for Key {
    #[inline(always)]
    fn from(key: Okp) -> Self {
        Self::Okp(key)
    }
}
