//! Content encryption algorithms (RFC 7518 section 5).

use jose_crypto::{
    hash::HashAlg,
    symmetric::{aes_cbc_hmac, aes_gcm},
};

use super::{Algorithm, ContentEncryptionAlgorithm};
use crate::error::JoseError;

/// AES in Galois/Counter Mode (`A128GCM`, `A192GCM`, `A256GCM`).
#[derive(Debug, Clone, Copy)]
pub struct AesGcm {
    name: &'static str,
    key_len: usize,
}

impl AesGcm {
    pub const fn a128gcm() -> Self {
        Self { name: "A128GCM", key_len: 16 }
    }

    pub const fn a192gcm() -> Self {
        Self { name: "A192GCM", key_len: 24 }
    }

    pub const fn a256gcm() -> Self {
        Self { name: "A256GCM", key_len: 32 }
    }

    fn check_key(&self, cek: &[u8]) -> Result<(), JoseError> {
        if cek.len() != self.key_len {
            return Err(JoseError::invalid_key(format!("{} requires a {}-byte key", self.name, self.key_len)));
        }
        Ok(())
    }
}

impl Algorithm for AesGcm {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &[]
    }
}

impl ContentEncryptionAlgorithm for AesGcm {
    fn cek_len(&self) -> usize {
        self.key_len
    }

    fn iv_len(&self) -> usize {
        aes_gcm::IV_LEN
    }

    fn encrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), JoseError> {
        self.check_key(cek)?;
        Ok(aes_gcm::encrypt(cek, iv, aad, plaintext)?)
    }

    fn decrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, JoseError> {
        self.check_key(cek)?;
        Ok(aes_gcm::decrypt(cek, iv, aad, ciphertext, tag)?)
    }
}

/// AES-CBC with HMAC-SHA2 (`A128CBC-HS256`, `A192CBC-HS384`, `A256CBC-HS512`).
#[derive(Debug, Clone, Copy)]
pub struct AesCbcHmac {
    name: &'static str,
    hash: HashAlg,
}

impl AesCbcHmac {
    pub const fn a128cbc_hs256() -> Self {
        Self { name: "A128CBC-HS256", hash: HashAlg::Sha256 }
    }

    pub const fn a192cbc_hs384() -> Self {
        Self { name: "A192CBC-HS384", hash: HashAlg::Sha384 }
    }

    pub const fn a256cbc_hs512() -> Self {
        Self { name: "A256CBC-HS512", hash: HashAlg::Sha512 }
    }
}

impl Algorithm for AesCbcHmac {
    fn name(&self) -> &'static str {
        self.name
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &[]
    }
}

impl ContentEncryptionAlgorithm for AesCbcHmac {
    fn cek_len(&self) -> usize {
        aes_cbc_hmac::key_len(self.hash)
    }

    fn iv_len(&self) -> usize {
        aes_cbc_hmac::IV_LEN
    }

    fn encrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), JoseError> {
        Ok(aes_cbc_hmac::encrypt(self.hash, cek, iv, aad, plaintext)?)
    }

    fn decrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, JoseError> {
        Ok(aes_cbc_hmac::decrypt(self.hash, cek, iv, aad, ciphertext, tag)?)
    }
}

#[cfg(test)]
mod tests {
    use jose_crypto::random_bytes;

    use super::*;

    fn algorithms() -> Vec<Box<dyn ContentEncryptionAlgorithm>> {
        vec![
            Box::new(AesGcm::a128gcm()),
            Box::new(AesGcm::a192gcm()),
            Box::new(AesGcm::a256gcm()),
            Box::new(AesCbcHmac::a128cbc_hs256()),
            Box::new(AesCbcHmac::a192cbc_hs384()),
            Box::new(AesCbcHmac::a256cbc_hs512()),
        ]
    }

    #[test]
    fn test_any_flipped_byte_fails_decryption() {
        let plaintext = b"Live long and prosper.";
        let aad = b"eyJhbGciOiJkaXIifQ";
        for alg in algorithms() {
            let cek = random_bytes(alg.cek_len()).unwrap();
            let iv = random_bytes(alg.iv_len()).unwrap();
            let (ciphertext, tag) = alg.encrypt(&cek, &iv, aad, plaintext).unwrap();
            assert_eq!(alg.decrypt(&cek, &iv, aad, &ciphertext, &tag).unwrap(), plaintext);

            let mut bad = ciphertext.clone();
            bad[0] ^= 1;
            assert_eq!(alg.decrypt(&cek, &iv, aad, &bad, &tag), Err(JoseError::Decryption), "{}", alg.name());

            let mut bad = tag.clone();
            bad[tag.len() - 1] ^= 1;
            assert_eq!(alg.decrypt(&cek, &iv, aad, &ciphertext, &bad), Err(JoseError::Decryption));

            let mut bad = aad.to_vec();
            bad[3] ^= 1;
            assert_eq!(alg.decrypt(&cek, &iv, &bad, &ciphertext, &tag), Err(JoseError::Decryption));
        }
    }

    #[test]
    fn test_key_sizes() {
        let iv = [0u8; 12];
        assert!(matches!(
            AesGcm::a128gcm().encrypt(&[0u8; 32], &iv, b"", b"x"),
            Err(JoseError::InvalidKey(_))
        ));
        assert!(AesCbcHmac::a128cbc_hs256().encrypt(&[0u8; 16], &[0u8; 16], b"", b"x").is_err());
        assert_eq!(AesCbcHmac::a256cbc_hs512().cek_len(), 64);
    }
}
