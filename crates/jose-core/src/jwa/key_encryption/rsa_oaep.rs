use jose_crypto::{hash::HashAlg, rsa::oaep};

use super::required_cek;
use crate::{
    error::JoseError,
    jwa::{Algorithm, KeyEncryptionAlgorithm, KeyManagementMode, KeyWrapContext, WrappedKey},
    jwk::Jwk,
};

/// RSAES-OAEP (`RSA-OAEP` with SHA-1, `RSA-OAEP-256`, `RSA-OAEP-384`, `RSA-OAEP-512`).
#[derive(Debug, Clone, Copy)]
pub struct RsaOaep {
    name: &'static str,
    hash: HashAlg,
}

impl RsaOaep {
    pub const fn rsa_oaep() -> Self {
        Self { name: "RSA-OAEP", hash: HashAlg::Sha1 }
    }

    pub const fn rsa_oaep_256() -> Self {
        Self { name: "RSA-OAEP-256", hash: HashAlg::Sha256 }
    }

    pub const fn rsa_oaep_384() -> Self {
        Self { name: "RSA-OAEP-384", hash: HashAlg::Sha384 }
    }

    pub const fn rsa_oaep_512() -> Self {
        Self { name: "RSA-OAEP-512", hash: HashAlg::Sha512 }
    }
}

impl Algorithm for RsaOaep {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &["RSA"]
    }
}

impl KeyEncryptionAlgorithm for RsaOaep {
    fn mode(&self) -> KeyManagementMode {
        KeyManagementMode::KeyEncryption
    }

    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, _ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(WrappedKey {
            encrypted_key: oaep::encrypt(&key_pair.public_key, self.hash, required_cek(cek)?, &[])?,
            ..Default::default()
        })
    }

    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], _ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError> {
        let key_pair = key.rsa_key_pair()?;
        Ok(oaep::decrypt(key_pair.private_key()?, self.hash, encrypted_key, &[])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        jwa::key_encryption::tests::round_trip,
        jwk::factory::test_keys::RSA_2048,
        util::Header,
    };

    #[test]
    fn test_round_trip_with_every_hash() {
        let key = RSA_2048.clone();
        let public = key.to_public().unwrap();
        for alg in [
            RsaOaep::rsa_oaep(),
            RsaOaep::rsa_oaep_256(),
            RsaOaep::rsa_oaep_384(),
            RsaOaep::rsa_oaep_512(),
        ] {
            round_trip(&alg, &public, &key, 32);
        }
    }

    #[test]
    fn test_public_key_cannot_unwrap() {
        let key = RSA_2048.clone();
        let public = key.to_public().unwrap();
        let header = Header::new();
        let ctx = KeyWrapContext { enc: "A128GCM", cek_len: 16, header: &header };
        let wrapped = RsaOaep::rsa_oaep_256().wrap(&public, Some(&[7u8; 16]), &ctx).unwrap();
        assert_eq!(wrapped.encrypted_key.len(), 256);
        assert!(RsaOaep::rsa_oaep_256().unwrap(&public, &wrapped.encrypted_key, &ctx).is_err());

        let mut tampered = wrapped.encrypted_key.clone();
        tampered[10] ^= 1;
        assert_eq!(
            RsaOaep::rsa_oaep_256().unwrap(&key, &tampered, &ctx),
            Err(JoseError::Decryption)
        );
    }
}
