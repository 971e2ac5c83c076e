//! AES key wrap (RFC 3394).

use super::block::{AesCipher, BLOCK_SIZE};
use crate::{errors::Error, utils::constant_time_eq};

const DEFAULT_IV: [u8; 8] = [0xa6; 8];

/// Wrap `key` under `kek`. The output is always 8 bytes longer than the input.
pub fn wrap(kek: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = AesCipher::new(kek)?;
    if key.len() < 16 || key.len() % 8 != 0 {
        return Err(Error::invalid_key("wrapped keys must be a multiple of 64 bits and at least 128 bits"));
    }
    let n = key.len() / 8;

    let mut a = DEFAULT_IV;
    let mut r: Vec<[u8; 8]> = key.chunks_exact(8).map(|c| c.try_into().unwrap_or([0; 8])).collect();
    let mut block = [0u8; BLOCK_SIZE];

    for j in 0..6 {
        for (i, ri) in r.iter_mut().enumerate() {
            block[..8].copy_from_slice(&a);
            block[8..].copy_from_slice(ri);
            cipher.encrypt_block(&mut block);

            let t = ((n * j) + i + 1) as u64;
            a.copy_from_slice(&block[..8]);
            for (ab, tb) in a.iter_mut().zip(t.to_be_bytes()) {
                *ab ^= tb;
            }
            ri.copy_from_slice(&block[8..]);
        }
    }

    let mut out = Vec::with_capacity(key.len() + 8);
    out.extend_from_slice(&a);
    for ri in r {
        out.extend_from_slice(&ri);
    }
    Ok(out)
}

/// Unwrap a key. An integrity check failure, or a malformed input, is `Error::Decryption`.
pub fn unwrap(kek: &[u8], wrapped: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = AesCipher::new(kek)?;
    if wrapped.len() < 24 || wrapped.len() % 8 != 0 {
        return Err(Error::Decryption);
    }
    let n = wrapped.len() / 8 - 1;

    let mut a = [0u8; 8];
    a.copy_from_slice(&wrapped[..8]);
    let mut r: Vec<[u8; 8]> = wrapped[8..].chunks_exact(8).map(|c| c.try_into().unwrap_or([0; 8])).collect();
    let mut block = [0u8; BLOCK_SIZE];

    for j in (0..6).rev() {
        for i in (0..n).rev() {
            let t = ((n * j) + i + 1) as u64;
            for (ab, tb) in a.iter_mut().zip(t.to_be_bytes()) {
                *ab ^= tb;
            }
            block[..8].copy_from_slice(&a);
            block[8..].copy_from_slice(&r[i]);
            cipher.decrypt_block(&mut block);

            a.copy_from_slice(&block[..8]);
            r[i].copy_from_slice(&block[8..]);
        }
    }

    if !constant_time_eq(&a, &DEFAULT_IV) {
        return Err(Error::Decryption);
    }
    Ok(r.concat())
}
