//! AES in Galois/Counter Mode with a 96-bit IV and a 128-bit tag.

use aes_gcm::{
    aead::{consts::U12, generic_array::GenericArray, AeadInPlace, KeyInit},
    aes::Aes192,
    Aes128Gcm, Aes256Gcm, AesGcm,
};

use crate::{errors::Error, utils::random_bytes};

type Aes192Gcm = AesGcm<Aes192, U12>;

/// IV length in bytes.
pub const IV_LEN: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// A fresh random 96-bit IV.
pub fn generate_iv() -> Result<Vec<u8>, Error> {
    random_bytes(IV_LEN)
}

/// Encrypt `plaintext` and return `(ciphertext, tag)`.
pub fn encrypt(key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), Error> {
    if iv.len() != IV_LEN {
        return Err(Error::Encoding(format!("AES-GCM IV must be {IV_LEN} bytes")));
    }
    match key.len() {
        16 => seal::<Aes128Gcm>(key, iv, aad, plaintext),
        24 => seal::<Aes192Gcm>(key, iv, aad, plaintext),
        32 => seal::<Aes256Gcm>(key, iv, aad, plaintext),
        len => Err(invalid_key_size(len)),
    }
}

/// Decrypt and authenticate. A wrong key, IV, AAD or tag is `Error::Decryption`;
/// no plaintext is ever returned unless the tag verifies.
pub fn decrypt(key: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, Error> {
    if iv.len() != IV_LEN || tag.len() != TAG_LEN {
        return Err(Error::Decryption);
    }
    match key.len() {
        16 => open::<Aes128Gcm>(key, iv, aad, ciphertext, tag),
        24 => open::<Aes192Gcm>(key, iv, aad, ciphertext, tag),
        32 => open::<Aes256Gcm>(key, iv, aad, ciphertext, tag),
        len => Err(invalid_key_size(len)),
    }
}

fn invalid_key_size(len: usize) -> Error {
    Error::invalid_key(format!("AES-GCM keys are 128, 192 or 256 bits, got {} bits", len * 8))
}

fn seal<C: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_size(key.len()))?;
    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(iv), aad, &mut buffer)
        .map_err(|_| Error::Encoding("plaintext too long for AES-GCM".into()))?;
    Ok((buffer, tag.to_vec()))
}

fn open<C: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, Error> {
    let cipher = C::new_from_slice(key).map_err(|_| invalid_key_size(key.len()))?;
    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(GenericArray::from_slice(iv), aad, &mut buffer, GenericArray::from_slice(tag))
        .map_err(|_| Error::Decryption)?;
    Ok(buffer)
}
