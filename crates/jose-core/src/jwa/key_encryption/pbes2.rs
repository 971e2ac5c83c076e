use jose_crypto::{hash::HashAlg, random_bytes, symmetric::pbes2};
use serde_json::{json, Value};

use super::required_cek;
use crate::{
    config::Pbes2Config,
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey, OCT},
    jwk::Jwk,
    util::{b64_encode, header_bytes, Header},
};

/// Password based encryption (`PBES2-HS256+A128KW`, `PBES2-HS384+A192KW`,
/// `PBES2-HS512+A256KW`). The password is the `k` value of an oct key.
#[derive(Debug, Clone)]
pub struct Pbes2 {
    name: &'static str,
    hash: HashAlg,
    config: Pbes2Config,
}

impl Pbes2 {
    pub fn hs256_a128kw(config: Pbes2Config) -> Self {
        Self { name: "PBES2-HS256+A128KW", hash: HashAlg::Sha256, config }
    }

    pub fn hs384_a192kw(config: Pbes2Config) -> Self {
        Self { name: "PBES2-HS384+A192KW", hash: HashAlg::Sha384, config }
    }

    pub fn hs512_a256kw(config: Pbes2Config) -> Self {
        Self { name: "PBES2-HS512+A256KW", hash: HashAlg::Sha512, config }
    }

    fn check_count(&self, p2c: u64) -> Result<u32, JoseError> {
        let min = u64::from(self.config.min_iterations);
        let max = u64::from(self.config.max_iterations);
        if p2c < min || p2c > max {
            return Err(JoseError::invalid_header(format!(
                "p2c must be between {min} and {max}, got {p2c}"
            )));
        }
        u32::try_from(p2c).map_err(|_| JoseError::invalid_header("p2c out of range"))
    }
}

impl Algorithm for Pbes2 {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        OCT
    }
}

impl KeyEncryptionAlgorithm for Pbes2 {
    fn mode(&self) -> KeyManagementMode {
        KeyManagementMode::KeyWrapping
    }

    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, _ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        let p2c = self.check_count(u64::from(self.config.iterations))?;
        let p2s = random_bytes(self.config.salt_size)?;
        let encrypted_key = pbes2::wrap(self.hash, key.oct_key()?, self.name, &p2s, p2c, required_cek(cek)?)?;

        let mut header = Header::new();
        header.insert("p2s".into(), Value::String(b64_encode(&p2s)));
        header.insert("p2c".into(), json!(p2c));
        Ok(WrappedKey {
            cek: None,
            encrypted_key,
            header,
        })
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        let p2s = header_bytes(ctx.header, "p2s")?.ok_or_else(|| JoseError::invalid_header("missing p2s"))?;
        let p2c = ctx
            .header
            .get("p2c")
            .and_then(Value::as_u64)
            .ok_or_else(|| JoseError::invalid_header("missing or invalid p2c"))?;
        let p2c = self.check_count(p2c)?;
        Ok(pbes2::unwrap(self.hash, key.oct_key()?, self.name, &p2s, p2c, encrypted_key)?)
    }
}
