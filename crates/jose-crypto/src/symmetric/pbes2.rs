//! Password based key wrapping (RFC 7518, section 4.8): PBKDF2 with HMAC-SHA2
//! derives an AES key that wraps the content encryption key with AES-KW.

use pbkdf2::pbkdf2_hmac;
use sha2::{Sha256, Sha384, Sha512};

use super::aes_kw;
use crate::{errors::Error, hash::HashAlg};

/// Length of the derived wrapping key: 16, 24 or 32 bytes.
pub fn derived_key_len(hash: HashAlg) -> usize {
    hash.output_len() / 2
}

/// PBKDF2 with salt `alg || 0x00 || p2s`.
pub fn derive_key(hash: HashAlg, password: &[u8], alg: &str, p2s: &[u8], p2c: u32) -> Result<Vec<u8>, Error> {
    if p2c == 0 {
        return Err(Error::invalid_key("PBES2 iteration count must be positive"));
    }
    let mut salt = Vec::with_capacity(alg.len() + 1 + p2s.len());
    salt.extend_from_slice(alg.as_bytes());
    salt.push(0x00);
    salt.extend_from_slice(p2s);

    let mut key = vec![0u8; derived_key_len(hash)];
    match hash {
        HashAlg::Sha256 => pbkdf2_hmac::<Sha256>(password, &salt, p2c, &mut key),
        HashAlg::Sha384 => pbkdf2_hmac::<Sha384>(password, &salt, p2c, &mut key),
        HashAlg::Sha512 => pbkdf2_hmac::<Sha512>(password, &salt, p2c, &mut key),
        HashAlg::Sha1 => return Err(Error::invalid_key("PBES2 is defined for SHA-2 only")),
    }
    Ok(key)
}

pub fn wrap(hash: HashAlg, password: &[u8], alg: &str, p2s: &[u8], p2c: u32, cek: &[u8]) -> Result<Vec<u8>, Error> {
    let kek = derive_key(hash, password, alg, p2s, p2c)?;
    aes_kw::wrap(&kek, cek)
}

pub fn unwrap(
    hash: HashAlg,
    password: &[u8],
    alg: &str,
    p2s: &[u8],
    p2c: u32,
    encrypted_key: &[u8],
) -> Result<Vec<u8>, Error> {
    let kek = derive_key(hash, password, alg, p2s, p2c)?;
    aes_kw::unwrap(&kek, encrypted_key)
}
