//! Single-step Concat KDF with SHA-256 as used by ECDH-ES (RFC 7518, section 4.6.2).

use crate::{errors::Error, hash::HashAlg};

fn length_prefixed(data: &[u8]) -> Result<Vec<u8>, Error> {
    let len = u32::try_from(data.len()).map_err(|_| Error::Encoding("KDF input too long".into()))?;
    let mut out = len.to_be_bytes().to_vec();
    out.extend_from_slice(data);
    Ok(out)
}

/// Derive `key_len` bytes from the shared secret `z`.
///
/// `algorithm_id` is the `enc` value for direct agreement or the `alg` value
/// when the result wraps a key; `apu` and `apv` are the decoded party infos.
pub fn derive(z: &[u8], algorithm_id: &str, apu: &[u8], apv: &[u8], key_len: usize) -> Result<Vec<u8>, Error> {
    let key_bits = u32::try_from(key_len * 8).map_err(|_| Error::Encoding("KDF output too long".into()))?;

    let mut other_info = length_prefixed(algorithm_id.as_bytes())?;
    other_info.extend(length_prefixed(apu)?);
    other_info.extend(length_prefixed(apv)?);
    other_info.extend_from_slice(&key_bits.to_be_bytes());

    let mut derived = Vec::with_capacity(key_len + 32);
    let mut counter: u32 = 1;
    while derived.len() < key_len {
        derived.extend(HashAlg::Sha256.digest_parts(&[&counter.to_be_bytes()[..], z, &other_info[..]]));
        counter += 1;
    }
    derived.truncate(key_len);
    Ok(derived)
}
