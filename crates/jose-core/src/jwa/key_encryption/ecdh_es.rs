use jose_crypto::{
    ec::EcKeyPair,
    okp::X25519KeyPair,
    symmetric::concat_kdf,
    Generate, ECDH,
};
use zeroize::Zeroizing;

use super::{required_cek, AesKw};
use crate::{
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey},
    jwk::{Jwk, Key, OkpCurves, Parameters},
    util::{header_bytes, Header},
};

/// Elliptic Curve Diffie-Hellman Ephemeral Static key agreement
/// (`ECDH-ES`, `ECDH-ES+A128KW`, `ECDH-ES+A192KW`, `ECDH-ES+A256KW`).
///
/// Works with NIST curve keys and X25519 keys. The ephemeral public key is
/// sent in the `epk` header parameter and `apu`/`apv` feed the Concat KDF.
#[derive(Debug, Clone, Copy)]
pub struct EcdhEs {
    name: &'static str,
    kw: Option<AesKw>,
}

impl EcdhEs {
    pub const fn direct() -> Self {
        Self { name: "ECDH-ES", kw: None }
    }

    pub const fn a128kw() -> Self {
        Self { name: "ECDH-ES+A128KW", kw: Some(AesKw::a128kw()) }
    }

    pub const fn a192kw() -> Self {
        Self { name: "ECDH-ES+A192KW", kw: Some(AesKw::a192kw()) }
    }

    pub const fn a256kw() -> Self {
        Self { name: "ECDH-ES+A256KW", kw: Some(AesKw::a256kw()) }
    }

    /// Derives the agreed key from the shared secret.
    fn derive(&self, z: &[u8], ctx: &KeyWrapContext<'_>) -> Result<Zeroizing<Vec<u8>>, JoseError> {
        let apu = header_bytes(ctx.header, "apu")?.unwrap_or_default();
        let apv = header_bytes(ctx.header, "apv")?.unwrap_or_default();
        let (algorithm_id, key_len) = match &self.kw {
            None => (ctx.enc, ctx.cek_len),
            Some(kw) => (self.name, kw.key_len()),
        };
        Ok(Zeroizing::new(concat_kdf::derive(z, algorithm_id, &apu, &apv, key_len)?))
    }
}

/// Generates an ephemeral key matching the recipient key and agrees on a secret.
fn agree_ephemeral(recipient: &Jwk) -> Result<(Jwk, Zeroizing<Vec<u8>>), JoseError> {
    match recipient.key() {
        Key::Ec(_) => {
            let their = recipient.ec_key_pair()?;
            let ephemeral = EcKeyPair::generate(their.curve())?;
            let z = ephemeral.key_exchange(&their.public_key)?;
            let epk = Jwk::from_ec_key_pair(&EcKeyPair::from_public_key(ephemeral.public_key), Parameters::default())?;
            Ok((epk, Zeroizing::new(z)))
        }
        Key::Okp(okp) if okp.crv == OkpCurves::X25519 => {
            let their = recipient.x25519_key_pair()?;
            let ephemeral = X25519KeyPair::new()?;
            let z = ephemeral.key_exchange(&their.public_key)?;
            let epk = Jwk::from_x25519_key_pair(&X25519KeyPair { secret_key: None, ..ephemeral }, Parameters::default())?;
            Ok((epk, Zeroizing::new(z)))
        }
        _ => Err(JoseError::invalid_key("ECDH-ES requires an EC or X25519 key")),
    }
}

/// Agrees on the secret with the sender's ephemeral key. The ephemeral key is
/// validated (on-curve, same curve) before any multiplication.
fn agree_static(own: &Jwk, epk: &Jwk) -> Result<Zeroizing<Vec<u8>>, JoseError> {
    match (own.key(), epk.key()) {
        (Key::Ec(own_ec), Key::Ec(epk_ec)) if own_ec.crv == epk_ec.crv => {
            let z = own.ec_key_pair()?.key_exchange(&epk.ec_key_pair()?.public_key)?;
            Ok(Zeroizing::new(z))
        }
        (Key::Okp(own_okp), Key::Okp(epk_okp))
            if own_okp.crv == OkpCurves::X25519 && epk_okp.crv == OkpCurves::X25519 =>
        {
            let z = own.x25519_key_pair()?.key_exchange(&epk.x25519_key_pair()?.public_key)?;
            Ok(Zeroizing::new(z))
        }
        _ => Err(JoseError::invalid_key("the ephemeral key does not match the recipient key")),
    }
}

impl Algorithm for EcdhEs {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["EC", "OKP"]
    }
}

impl KeyEncryptionAlgorithm for EcdhEs {
    fn mode(&self) -> KeyManagementMode {
        match self.kw {
            None => KeyManagementMode::KeyAgreement,
            Some(_) => KeyManagementMode::KeyAgreementWithKeyWrapping,
        }
    }

    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        let (epk, z) = agree_ephemeral(key)?;
        let derived = self.derive(&z, ctx)?;

        let mut header = Header::new();
        header.insert("epk".into(), serde_json::to_value(&epk)?);

        match &self.kw {
            None => Ok(WrappedKey {
                cek: Some(derived.to_vec()),
                encrypted_key: Vec::new(),
                header,
            }),
            Some(kw) => Ok(WrappedKey {
                cek: None,
                encrypted_key: kw.wrap_with(&derived, required_cek(cek)?)?,
                header,
            }),
        }
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        let epk = ctx
            .header
            .get("epk")
            .cloned()
            .ok_or_else(|| JoseError::invalid_header("missing epk"))?;
        let epk = Jwk::new(serde_json::from_value::<Key>(epk)?, Parameters::default())?;
        let z = agree_static(key, &epk)?;
        let derived = self.derive(&z, ctx)?;

        match &self.kw {
            None if encrypted_key.is_empty() => Ok(derived.to_vec()),
            None => Err(JoseError::Decryption),
            Some(kw) => kw.unwrap_with(&derived, encrypted_key),
        }
    }
}
