use jose_crypto::ec::{Curve, EcKeyPair, EcPrivateKey, EcPublicKey};
use serde::{Deserialize, Serialize};

use super::{Bytes, Secret};
use crate::error::JoseError;

/// An elliptic-curve key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ec {
    /// The elliptic curve identifier.
    pub crv: EcCurves,

    /// The public x coordinate.
    pub x: Bytes,

    /// The public y coordinate.
    pub y: Bytes,

    /// The private key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<Secret>,
}

/// The elliptic curve.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurves {
    /// P-256
    #[serde(rename = "P-256")]
    P256,

    /// P-384
    #[serde(rename = "P-384")]
    P384,

    /// P-521
    #[serde(rename = "P-521")]
    P521,
}

impl From<EcCurves> for Curve {
    fn from(crv: EcCurves) -> Self {
        match crv {
            EcCurves::P256 => Curve::P256,
            EcCurves::P384 => Curve::P384,
            EcCurves::P521 => Curve::P521,
        }
    }
}

impl From<Curve> for EcCurves {
    fn from(curve: Curve) -> Self {
        match curve {
            Curve::P256 => EcCurves::P256,
            Curve::P384 => EcCurves::P384,
            Curve::P521 => EcCurves::P521,
        }
    }
}

impl Ec {
    /// Coordinates must have the curve's exact width and the point must lie
    /// on the curve. A private scalar must produce the same point.
    pub(crate) fn validate(&self) -> Result<(), JoseError> {
        self.key_pair().map(|_| ())
    }

    pub fn to_public(&self) -> Self {
        Self { d: None, ..self.clone() }
    }

    pub fn key_pair(&self) -> Result<EcKeyPair, JoseError> {
        let curve = Curve::from(self.crv);
        let public_key = EcPublicKey::from_coordinates(curve, &self.x, &self.y)?;
        match &self.d {
            Some(d) => {
                let key_pair = EcKeyPair::from_private_key(EcPrivateKey::from_bytes(curve, d.expose())?)?;
                if key_pair.public_key != public_key {
                    return Err(JoseError::invalid_key("EC private key does not match the public point"));
                }
                Ok(key_pair)
            }
            None => Ok(EcKeyPair::from_public_key(public_key)),
        }
    }

    pub fn from_key_pair(key_pair: &EcKeyPair) -> Result<Self, JoseError> {
        let d = match &key_pair.secret_key {
            Some(secret) => Some(Secret::new(secret.to_bytes()?)),
            None => None,
        };
        Ok(Self {
            crv: key_pair.curve().into(),
            x: Bytes::new(key_pair.public_key.x_bytes()?),
            y: Bytes::new(key_pair.public_key.y_bytes()?),
            d,
        })
    }
}
