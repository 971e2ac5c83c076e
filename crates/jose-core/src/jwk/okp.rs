use jose_crypto::{
    okp::{Ed25519KeyPair, X25519KeyPair},
    Generate, KeyMaterial,
};
use serde::{Deserialize, Serialize};

use super::{Bytes, Secret};
use crate::error::JoseError;

/// An octet key pair (RFC 8037).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Okp {
    /// The curve (or algorithm) of the key.
    pub crv: OkpCurves,

    /// The public key.
    pub x: Bytes,

    /// The private key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<Secret>,
}

/// The OKP sub-types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OkpCurves {
    /// Ed25519 signature key pairs.
    Ed25519,

    /// X25519 key agreement key pairs.
    X25519,
}

impl OkpCurves {
    pub fn name(&self) -> &'static str {
        match self {
            OkpCurves::Ed25519 => "Ed25519",
            OkpCurves::X25519 => "X25519",
        }
    }
}

impl Okp {
    /// Key sizes are fixed; a private key must match the public key it is paired with.
    pub(crate) fn validate(&self) -> Result<(), JoseError> {
        let public = match self.crv {
            OkpCurves::Ed25519 => Ed25519KeyPair::from_public_key(&self.x)?.public_key_bytes()?,
            OkpCurves::X25519 => X25519KeyPair::from_public_key(&self.x)?.public_key_bytes()?,
        };
        if let Some(d) = &self.d {
            let derived = match self.crv {
                OkpCurves::Ed25519 => Ed25519KeyPair::from_secret_key(d.expose())?.public_key_bytes()?,
                OkpCurves::X25519 => X25519KeyPair::from_secret_key(d.expose())?.public_key_bytes()?,
            };
            if derived != public {
                return Err(JoseError::invalid_key("OKP private key does not match the public key"));
            }
        }
        Ok(())
    }

    pub fn to_public(&self) -> Self {
        Self { d: None, ..self.clone() }
    }

    pub fn ed25519_key_pair(&self) -> Result<Ed25519KeyPair, JoseError> {
        if self.crv != OkpCurves::Ed25519 {
            return Err(JoseError::invalid_key("not an Ed25519 key"));
        }
        Ok(match &self.d {
            Some(d) => Ed25519KeyPair::from_secret_key(d.expose())?,
            None => Ed25519KeyPair::from_public_key(&self.x)?,
        })
    }

    pub fn x25519_key_pair(&self) -> Result<X25519KeyPair, JoseError> {
        if self.crv != OkpCurves::X25519 {
            return Err(JoseError::invalid_key("not an X25519 key"));
        }
        Ok(match &self.d {
            Some(d) => X25519KeyPair::from_secret_key(d.expose())?,
            None => X25519KeyPair::from_public_key(&self.x)?,
        })
    }

    pub(crate) fn from_parts<K: KeyMaterial>(crv: OkpCurves, key_pair: &K, private: bool) -> Result<Self, JoseError> {
        Ok(Self {
            crv,
            x: Bytes::new(key_pair.public_key_bytes()?),
            d: if private {
                Some(Secret::new(key_pair.private_key_bytes()?))
            } else {
                None
            },
        })
    }
}
