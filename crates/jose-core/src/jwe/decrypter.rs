use tracing::debug;
use zeroize::Zeroizing;

use super::{check_crit, check_zip, Jwe};
use crate::{
    error::JoseError,
    jwa::{KeyWrapContext, Registries},
    jwk::{Jwk, JwkSet, KeyChecker, KeyUsage},
    util::header_str,
};

/// Decrypts a [`Jwe`] for one of its recipients.
///
/// Every failure is reported as [`JoseError::Decryption`], whichever recipient,
/// key or check caused it. The cause is only logged at debug level.
pub struct JweDecrypter<'a> {
    registries: &'a Registries,
}

impl<'a> JweDecrypter<'a> {
    pub fn new(registries: &'a Registries) -> Self {
        Self { registries }
    }

    /// Returns a copy of the JWE holding the payload, and the recipient index.
    pub fn decrypt_using_key(&self, jwe: &Jwe, key: &Jwk, index: Option<usize>) -> Result<(Jwe, usize), JoseError> {
        self.decrypt(jwe, std::slice::from_ref(key), index)
    }

    pub fn decrypt_using_key_set(
        &self,
        jwe: &Jwe,
        keys: &JwkSet,
        index: Option<usize>,
    ) -> Result<(Jwe, usize), JoseError> {
        self.decrypt(jwe, keys.keys(), index)
    }

    fn decrypt(&self, jwe: &Jwe, keys: &[Jwk], index: Option<usize>) -> Result<(Jwe, usize), JoseError> {
        let indices: Vec<usize> = match index {
            Some(index) => vec![index],
            None => (0..jwe.count_recipients()).collect(),
        };

        for index in indices {
            for key in keys {
                match self.decrypt_recipient(jwe, index, key) {
                    Ok(payload) => {
                        debug!(recipient = index, kid = key.kid(), "payload decrypted");
                        return Ok((jwe.with_payload(payload), index));
                    }
                    Err(e) => debug!(recipient = index, kid = key.kid(), error = %e, "recipient skipped"),
                }
            }
        }
        Err(JoseError::Decryption)
    }

    fn decrypt_recipient(&self, jwe: &Jwe, index: usize, key: &Jwk) -> Result<Vec<u8>, JoseError> {
        let recipient = jwe.recipient(index)?;
        let header = jwe.recipient_header(index)?;
        check_zip(jwe.shared_header(), recipient.header())?;
        check_crit(&header)?;

        let enc = header_str(&header, "enc")?.ok_or_else(|| JoseError::invalid_header("missing enc"))?;
        let alg = header_str(&header, "alg")?.ok_or_else(|| JoseError::invalid_header("missing alg"))?;
        let content = self.registries.content_encryption.get(enc)?;
        let algorithm = self.registries.key_encryption.get(alg)?;
        KeyChecker::check(key, algorithm, KeyUsage::Decryption)?;

        let ctx = KeyWrapContext {
            enc,
            cek_len: content.cek_len(),
            header: &header,
        };
        let cek = Zeroizing::new(algorithm.unwrap(key, recipient.encrypted_key(), &ctx)?);
        if cek.len() != content.cek_len() {
            return Err(JoseError::Decryption);
        }

        let plaintext = content.decrypt(&cek, jwe.iv(), &jwe.authenticated_data(), jwe.ciphertext(), jwe.tag())?;
        match header_str(jwe.shared_protected_header(), "zip")? {
            Some(zip) => self.registries.compression.get(zip)?.decompress(&plaintext),
            None => Ok(plaintext),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        jwe::JweBuilder,
        jwk::{EcCurves, JwkFactory, OkpCurves, Parameters},
        util::Header,
    };

    fn header(value: Value) -> Header {
        value.as_object().cloned().unwrap_or_default()
    }

    fn encrypt(registries: &Registries, key: &Jwk, alg: &str, enc: &str) -> Jwe {
        JweBuilder::new(registries)
            .with_payload(b"Live long and prosper.".to_vec())
            .with_shared_protected_header(header(json!({"alg": alg, "enc": enc, "zip": "DEF"})))
            .add_recipient(key, Header::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_every_key_management_mode() {
        let registries = Registries::default();
        let ec = JwkFactory::create_ec_key(EcCurves::P256, Parameters::default()).unwrap();
        let x25519 = JwkFactory::create_okp_key(OkpCurves::X25519, Parameters::default()).unwrap();
        let rsa = crate::jwk::factory::test_keys::RSA_2048.clone();
        let cases = [
            (Jwk::from_oct(vec![1u8; 32], Parameters::default()).unwrap(), "dir", "A128CBC-HS256"),
            (Jwk::from_oct(vec![1u8; 24], Parameters::default()).unwrap(), "A192KW", "A192GCM"),
            (Jwk::from_oct(vec![1u8; 32], Parameters::default()).unwrap(), "A256GCMKW", "A256GCM"),
            (Jwk::from_oct(b"password".to_vec(), Parameters::default()).unwrap(), "PBES2-HS256+A128KW", "A128GCM"),
            (rsa, "RSA-OAEP-256", "A256CBC-HS512"),
            (ec, "ECDH-ES+A128KW", "A128GCM"),
            (x25519, "ECDH-ES", "A192CBC-HS384"),
        ];

        let decrypter = JweDecrypter::new(&registries);
        for (key, alg, enc) in &cases {
            let public = if key.kty() == "oct" { key.clone() } else { key.to_public().unwrap() };
            let jwe = encrypt(&registries, &public, alg, enc);
            let (decrypted, index) = decrypter.decrypt_using_key(&jwe, key, None).unwrap();
            assert_eq!(index, 0);
            assert_eq!(decrypted.payload(), Some(&b"Live long and prosper."[..]), "{alg} {enc}");
        }
    }

    #[test]
    fn test_failures_are_opaque() {
        let registries = Registries::default();
        let key = Jwk::from_oct(vec![1u8; 16], Parameters::default()).unwrap();
        let jwe = encrypt(&registries, &key, "A128KW", "A128GCM");
        let decrypter = JweDecrypter::new(&registries);

        let wrong = Jwk::from_oct(vec![2u8; 16], Parameters::default()).unwrap();
        assert_eq!(decrypter.decrypt_using_key(&jwe, &wrong, None), Err(JoseError::Decryption));

        let mut tampered = jwe.clone();
        tampered.ciphertext[0] ^= 1;
        assert_eq!(decrypter.decrypt_using_key(&tampered, &key, None), Err(JoseError::Decryption));

        let mut tampered = jwe.clone();
        tampered.tag[0] ^= 1;
        assert_eq!(decrypter.decrypt_using_key(&tampered, &key, None), Err(JoseError::Decryption));

        let narrowed = Registries {
            key_encryption: registries.key_encryption.subset(&["A256KW"]).unwrap(),
            ..registries.clone()
        };
        assert_eq!(
            JweDecrypter::new(&narrowed).decrypt_using_key(&jwe, &key, None),
            Err(JoseError::Decryption)
        );
        assert_eq!(decrypter.decrypt_using_key(&jwe, &key, Some(3)), Err(JoseError::Decryption));
    }

    #[test]
    fn test_aad_is_authenticated() {
        let registries = Registries::default();
        let key = Jwk::from_oct(vec![1u8; 16], Parameters::default()).unwrap();
        let jwe = JweBuilder::new(&registries)
            .with_payload(b"payload".to_vec())
            .with_aad(b"context".to_vec())
            .with_shared_protected_header(header(json!({"enc": "A128GCM"})))
            .add_recipient(&key, header(json!({"alg": "A128KW"})))
            .build()
            .unwrap();
        let decrypter = JweDecrypter::new(&registries);
        assert!(decrypter.decrypt_using_key(&jwe, &key, None).is_ok());

        let mut tampered = jwe.clone();
        tampered.aad = Some(b"other".to_vec());
        assert_eq!(decrypter.decrypt_using_key(&tampered, &key, None), Err(JoseError::Decryption));
    }
}
