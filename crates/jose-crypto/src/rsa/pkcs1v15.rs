//! RSASSA-PKCS1-v1_5 (RFC 8017, section 8.2).

use super::key::{RsaPrivateKey, RsaPublicKey};
use crate::{errors::Error, hash::HashAlg, math::BigInteger, utils::constant_time_eq};

// EMSA-PKCS1-v1_5: 0x00 || 0x01 || PS(0xff) || 0x00 || DigestInfo
fn encode(hash: HashAlg, message: &[u8], em_len: usize) -> Result<Vec<u8>, Error> {
    let prefix = hash.digest_info_prefix();
    let t_len = prefix.len() + hash.output_len();
    if em_len < t_len + 11 {
        return Err(Error::invalid_key("modulus too small for this digest"));
    }

    let mut em = vec![0xffu8; em_len];
    em[0] = 0x00;
    em[1] = 0x01;
    em[em_len - t_len - 1] = 0x00;
    em[em_len - t_len..em_len - hash.output_len()].copy_from_slice(prefix);
    em[em_len - hash.output_len()..].copy_from_slice(&hash.digest(message));
    Ok(em)
}

pub fn sign(key: &RsaPrivateKey, hash: HashAlg, message: &[u8]) -> Result<Vec<u8>, Error> {
    let k = key.public_key().size();
    let em = encode(hash, message, k)?;
    key.private_op(&BigInteger::from_bytes_be(&em))?.to_bytes(k)
}

/// Verify by re-encoding and comparing the whole block.
pub fn verify(key: &RsaPublicKey, hash: HashAlg, message: &[u8], signature: &[u8]) -> Result<(), Error> {
    let k = key.size();
    if signature.len() != k {
        return Err(Error::Verification);
    }
    let em = key
        .public_op(&BigInteger::from_bytes_be(signature))
        .and_then(|m| m.to_bytes(k))
        .map_err(|_| Error::Verification)?;
    let expected = encode(hash, message, k).map_err(|_| Error::Verification)?;

    if constant_time_eq(&em, &expected) {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}
