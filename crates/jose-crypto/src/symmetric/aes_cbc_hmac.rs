//! AES-CBC with HMAC-SHA2 authenticated encryption (RFC 7518, section 5.2).
//!
//! The content encryption key is `MAC_KEY || ENC_KEY`, each half as long as
//! half the hash output. The tag is the first half of
//! `HMAC(MAC_KEY, AAD || IV || ciphertext || AL)` where `AL` is the AAD
//! length in bits as a 64-bit big-endian integer.

use super::{
    block::{AesCipher, BLOCK_SIZE},
    hmac,
};
use crate::{errors::Error, hash::HashAlg, utils::constant_time_eq};

/// IV length in bytes.
pub const IV_LEN: usize = BLOCK_SIZE;

/// Key length expected for a given hash: 32, 48 or 64 bytes.
pub fn key_len(hash: HashAlg) -> usize {
    hash.output_len()
}

fn split_key(hash: HashAlg, cek: &[u8]) -> Result<(&[u8], &[u8]), Error> {
    if hash == HashAlg::Sha1 || cek.len() != key_len(hash) {
        return Err(Error::invalid_key(format!(
            "AES-CBC-HMAC requires a {}-byte key",
            key_len(hash)
        )));
    }
    Ok(cek.split_at(cek.len() / 2))
}

fn tag(hash: HashAlg, mac_key: &[u8], aad: &[u8], iv: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, Error> {
    let al = (aad.len() as u64 * 8).to_be_bytes();
    let mut full = hmac::sign_parts(hash, mac_key, &[aad, iv, ciphertext, &al])?;
    full.truncate(hash.output_len() / 2);
    Ok(full)
}

/// Encrypt and return `(ciphertext, tag)`.
pub fn encrypt(
    hash: HashAlg,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let (mac_key, enc_key) = split_key(hash, cek)?;
    if iv.len() != IV_LEN {
        return Err(Error::Encoding(format!("AES-CBC IV must be {IV_LEN} bytes")));
    }
    let cipher = AesCipher::new(enc_key)?;

    // PKCS#7 padding always adds between 1 and 16 bytes
    let pad = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut data = plaintext.to_vec();
    data.resize(plaintext.len() + pad, pad as u8);

    let mut previous = [0u8; BLOCK_SIZE];
    previous.copy_from_slice(iv);
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        for (b, p) in chunk.iter_mut().zip(previous) {
            *b ^= p;
        }
        previous.copy_from_slice(chunk);
        cipher.encrypt_block(&mut previous);
        chunk.copy_from_slice(&previous);
    }

    let tag = tag(hash, mac_key, aad, iv, &data)?;
    Ok((data, tag))
}

/// Authenticate then decrypt. Every failure is `Error::Decryption`.
pub fn decrypt(
    hash: HashAlg,
    cek: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag_value: &[u8],
) -> Result<Vec<u8>, Error> {
    let (mac_key, enc_key) = split_key(hash, cek)?;
    if iv.len() != IV_LEN || ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(Error::Decryption);
    }
    let expected = tag(hash, mac_key, aad, iv, ciphertext)?;
    if !constant_time_eq(&expected, tag_value) {
        return Err(Error::Decryption);
    }
    let cipher = AesCipher::new(enc_key)?;

    let mut plaintext = Vec::with_capacity(ciphertext.len());
    let mut previous = [0u8; BLOCK_SIZE];
    previous.copy_from_slice(iv);
    for chunk in ciphertext.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        cipher.decrypt_block(&mut block);
        for (b, p) in block.iter_mut().zip(previous) {
            *b ^= p;
        }
        plaintext.extend_from_slice(&block);
        previous.copy_from_slice(chunk);
    }

    let pad = plaintext.last().copied().unwrap_or(0) as usize;
    if pad == 0 || pad > BLOCK_SIZE || plaintext[plaintext.len() - pad..].iter().any(|b| *b as usize != pad) {
        return Err(Error::Decryption);
    }
    plaintext.truncate(plaintext.len() - pad);
    Ok(plaintext)
}
