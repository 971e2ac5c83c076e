//! Key wrapping with AES-GCM (RFC 7518, section 4.7).

use super::aes_gcm::{self, generate_iv};
use crate::errors::Error;

/// A key encrypted with AES-GCM together with the IV and tag carried in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcmWrappedKey {
    pub encrypted_key: Vec<u8>,
    pub iv: Vec<u8>,
    pub tag: Vec<u8>,
}

/// Wrap `key` under `kek` with a fresh random IV and an empty AAD.
pub fn wrap(kek: &[u8], key: &[u8]) -> Result<GcmWrappedKey, Error> {
    let iv = generate_iv()?;
    let (encrypted_key, tag) = aes_gcm::encrypt(kek, &iv, &[], key)?;
    Ok(GcmWrappedKey { encrypted_key, iv, tag })
}

pub fn unwrap(kek: &[u8], encrypted_key: &[u8], iv: &[u8], tag: &[u8]) -> Result<Vec<u8>, Error> {
    aes_gcm::decrypt(kek, iv, &[], encrypted_key, tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_uses_fresh_iv() {
        let kek = [4u8; 24];
        let a = wrap(&kek, &[1u8; 32]).unwrap();
        let b = wrap(&kek, &[1u8; 32]).unwrap();
        assert_ne!(a.iv, b.iv);
        assert_eq!(a.iv.len(), 12);
        assert_eq!(a.tag.len(), 16);
        assert_eq!(a.encrypted_key.len(), 32);
    }

    #[test]
    fn test_round_trip_and_tamper() {
        for len in [16, 24, 32] {
            let kek = vec![5u8; len];
            let wrapped = wrap(&kek, &[6u8; 16]).unwrap();
            assert_eq!(unwrap(&kek, &wrapped.encrypted_key, &wrapped.iv, &wrapped.tag).unwrap(), [6u8; 16]);

            let mut tag = wrapped.tag.clone();
            tag[0] ^= 0xff;
            assert_eq!(
                unwrap(&kek, &wrapped.encrypted_key, &wrapped.iv, &tag),
                Err(Error::Decryption)
            );
        }
    }
}
