use crate::{
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey, OCT},
    jwk::Jwk,
};

/// Direct use of a shared symmetric key as the CEK (`dir`).
#[derive(Debug, Clone, Copy)]
pub struct Direct;

impl Algorithm for Direct {
    fn name(&self) -> &'static str {
        "dir"
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        OCT
    }
}

impl KeyEncryptionAlgorithm for Direct {
    fn mode(&self) -> KeyManagementMode {
        KeyManagementMode::Direct
    }

    fn wrap(&self, key: &Jwk, _cek: Option<&[u8]>, ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        let k = key.oct_key()?;
        if k.len() != ctx.cek_len {
            return Err(JoseError::invalid_key(format!(
                "{} requires a {}-byte key",
                ctx.enc, ctx.cek_len
            )));
        }
        Ok(WrappedKey {
            cek: Some(k.to_vec()),
            ..Default::default()
        })
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], _ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        if !encrypted_key.is_empty() {
            return Err(JoseError::Decryption);
        }
        Ok(key.oct_key()?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{jwa::key_encryption::tests::round_trip, jwk::Parameters, util::Header};

    #[test]
    fn test_dir_uses_the_key() {
        let key = Jwk::from_oct(vec![9u8; 16], Parameters::default()).unwrap();
        assert_eq!(round_trip(&Direct, &key, &key, 16), vec![9u8; 16]);

        let header = Header::new();
        let ctx = KeyWrapContext { enc: "A256GCM", cek_len: 32, header: &header };
        assert!(matches!(Direct.wrap(&key, None, &ctx), Err(JoseError::InvalidKey(_))));
    }
}
