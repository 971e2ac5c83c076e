use jose_crypto::symmetric::aes_kw;

use super::required_cek;
use crate::{
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey, OCT},
    jwk::Jwk,
};

/// AES Key Wrap (`A128KW`, `A192KW`, `A256KW`).
#[derive(Debug, Clone, Copy)]
pub struct AesKw {
    name: &'static str,
    key_len: usize,
}

impl AesKw {
    pub const fn a128kw() -> Self {
        Self { name: "A128KW", key_len: 16 }
    }

    pub const fn a192kw() -> Self {
        Self { name: "A192KW", key_len: 24 }
    }

    pub const fn a256kw() -> Self {
        Self { name: "A256KW", key_len: 32 }
    }

    pub(crate) fn key_len(&self) -> usize {
        self.key_len
    }

    pub(crate) fn wrap_with(&self, kek: &[u8], cek: &[u8]) -> Result<Vec<u8>, JoseError> {
        self.check_kek(kek)?;
        Ok(aes_kw::wrap(kek, cek)?)
    }

    pub(crate) fn unwrap_with(&self, kek: &[u8], encrypted_key: &[u8]) -> Result<Vec<u8>, JoseError> {
        self.check_kek(kek)?;
        Ok(aes_kw::unwrap(kek, encrypted_key)?)
    }

    fn check_kek(&self, kek: &[u8]) -> Result<(), JoseError> {
        if kek.len() != self.key_len {
            return Err(JoseError::invalid_key(format!("{} requires a {}-byte key", self.name, self.key_len)));
        }
        Ok(())
    }
}

impl Algorithm for AesKw {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        OCT
    }
}

impl KeyEncryptionAlgorithm for AesKw {
    fn mode(&self) -> KeyManagementMode {
        KeyManagementMode::KeyWrapping
    }

    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, _ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        Ok(WrappedKey {
            encrypted_key: self.wrap_with(key.oct_key()?, required_cek(cek)?)?,
            ..Default::default()
        })
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], _ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        self.unwrap_with(key.oct_key()?, encrypted_key)
    }
}
