use jose_crypto::{
    math::BigInteger,
    rsa::{CrtParams, RsaKeyPair, RsaPrivateKey, RsaPublicKey},
};
use serde::{Deserialize, Serialize};

use super::{Bytes, Secret};
use crate::error::JoseError;

/// An RSA key.
///
/// The private exponent and the CRT parameters are optional. The CRT
/// parameters come as a complete set or not at all.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rsa {
    /// The modulus.
    pub n: Bytes,

    /// The public exponent.
    pub e: Bytes,

    /// The private exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub d: Option<Secret>,

    /// The first prime factor.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub p: Option<Secret>,

    /// The second prime factor.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub q: Option<Secret>,

    /// The first factor CRT exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dp: Option<Secret>,

    /// The second factor CRT exponent.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dq: Option<Secret>,

    /// The first CRT coefficient.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub qi: Option<Secret>,
}

fn int(secret: &Secret) -> BigInteger {
    BigInteger::from_bytes_be(secret.expose())
}

impl Rsa {
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    pub fn has_crt(&self) -> bool {
        self.p.is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), JoseError> {
        self.key_pair().map(|_| ())
    }

    pub fn to_public(&self) -> Self {
        Self {
            n: self.n.clone(),
            e: self.e.clone(),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }

    fn public_key(&self) -> Result<RsaPublicKey, JoseError> {
        Ok(RsaPublicKey::new(
            BigInteger::from_bytes_be(&self.n),
            BigInteger::from_bytes_be(&self.e),
        )?)
    }

    fn crt(&self) -> Result<Option<CrtParams>, JoseError> {
        match (&self.p, &self.q, &self.dp, &self.dq, &self.qi) {
            (None, None, None, None, None) => Ok(None),
            (Some(p), Some(q), Some(dp), Some(dq), Some(qi)) => {
                Ok(Some(CrtParams::new(int(p), int(q), int(dp), int(dq), int(qi))))
            }
            _ => Err(JoseError::invalid_key("RSA CRT parameters must all be present or all be absent")),
        }
    }

    pub fn key_pair(&self) -> Result<RsaKeyPair, JoseError> {
        let public = self.public_key()?;
        let crt = self.crt()?;
        match &self.d {
            Some(d) => Ok(RsaKeyPair::from_private_key(RsaPrivateKey::new(public, int(d), crt)?)),
            None if crt.is_some() => Err(JoseError::invalid_key("RSA CRT parameters without a private exponent")),
            None => Ok(RsaKeyPair::from_public_key(public)),
        }
    }

    pub fn from_key_pair(key_pair: &RsaKeyPair) -> Self {
        let public = &key_pair.public_key;
        let mut key = Self {
            n: Bytes::new(public.n().to_bytes_be()),
            e: Bytes::new(public.e().to_bytes_be()),
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        };
        if let Some(secret) = &key_pair.secret_key {
            key.d = Some(Secret::new(secret.d().to_bytes_be()));
            if let Some(crt) = secret.crt() {
                key.p = Some(Secret::new(crt.p.to_bytes_be()));
                key.q = Some(Secret::new(crt.q.to_bytes_be()));
                key.dp = Some(Secret::new(crt.dp.to_bytes_be()));
                key.dq = Some(Secret::new(crt.dq.to_bytes_be()));
                key.qi = Some(Secret::new(crt.qinv.to_bytes_be()));
            }
        }
        key
    }
}
