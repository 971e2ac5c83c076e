use jose_crypto::symmetric::aes_gcm_kw;
use serde_json::Value;

use super::required_cek;
use crate::{
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey, OCT},
    jwk::Jwk,
    util::{b64_encode, header_bytes, Header},
};

/// Key wrapping with AES-GCM (`A128GCMKW`, `A192GCMKW`, `A256GCMKW`).
///
/// The IV and the tag travel in the `iv` and `tag` header parameters.
#[derive(Debug, Clone, Copy)]
pub struct AesGcmKw {
    name: &'static str,
    key_len: usize,
}

impl AesGcmKw {
    pub const fn a128gcmkw() -> Self {
        Self { name: "A128GCMKW", key_len: 16 }
    }

    pub const fn a192gcmkw() -> Self {
        Self { name: "A192GCMKW", key_len: 24 }
    }

    pub const fn a256gcmkw() -> Self {
        Self { name: "A256GCMKW", key_len: 32 }
    }

    fn kek<'a>(&self, key: &'a Jwk) -> Result<&'a [u8], JoseError> {
        let kek = key.oct_key()?;
        if kek.len() != self.key_len {
            return Err(JoseError::invalid_key(format!("{} requires a {}-byte key", self.name, self.key_len)));
        }
        Ok(kek)
    }
}

impl Algorithm for AesGcmKw {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        OCT
    }
}

impl KeyEncryptionAlgorithm for AesGcmKw {
    fn mode(&self) -> KeyManagementMode {
        KeyManagementMode::KeyWrapping
    }

    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, _ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        let wrapped = aes_gcm_kw::wrap(self.kek(key)?, required_cek(cek)?)?;
        let mut header = Header::new();
        header.insert("iv".into(), Value::String(b64_encode(&wrapped.iv)));
        header.insert("tag".into(), Value::String(b64_encode(&wrapped.tag)));
        Ok(WrappedKey {
            cek: None,
            encrypted_key: wrapped.encrypted_key,
            header,
        })
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        let iv = header_bytes(ctx.header, "iv")?.ok_or_else(|| JoseError::invalid_header("missing iv"))?;
        let tag = header_bytes(ctx.header, "tag")?.ok_or_else(|| JoseError::invalid_header("missing tag"))?;
        Ok(aes_gcm_kw::unwrap(self.kek(key)?, encrypted_key, &iv, &tag)?)
    }
}
