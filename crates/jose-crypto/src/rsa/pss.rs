//! RSASSA-PSS (RFC 8017, section 8.1) with MGF1 over the message hash and a
//! salt as long as the hash output, as required by RFC 7518 section 3.5.

use super::{
    key::{RsaPrivateKey, RsaPublicKey},
    mgf::{mgf1, xor_in_place},
};
use crate::{
    errors::Error,
    hash::HashAlg,
    math::BigInteger,
    utils::{constant_time_eq, random_bytes},
};

pub fn sign(key: &RsaPrivateKey, hash: HashAlg, message: &[u8]) -> Result<Vec<u8>, Error> {
    let public = key.public_key();
    let em_bits = public.bits() - 1;
    let salt = random_bytes(hash.output_len())?;
    let em = encode(hash, &hash.digest(message), &salt, em_bits)?;

    let s = key.private_op(&BigInteger::from_bytes_be(&em))?;
    s.to_bytes(public.size())
}

/// Verify a signature. Every failure is `Error::Verification`.
pub fn verify(key: &RsaPublicKey, hash: HashAlg, message: &[u8], signature: &[u8]) -> Result<(), Error> {
    if signature.len() != key.size() {
        return Err(Error::Verification);
    }
    let m = key
        .public_op(&BigInteger::from_bytes_be(signature))
        .map_err(|_| Error::Verification)?;

    let em_bits = key.bits() - 1;
    let em = m.to_bytes(em_bits.div_ceil(8)).map_err(|_| Error::Verification)?;
    if verify_encoding(hash, &hash.digest(message), &em, em_bits) {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}

// EMSA-PSS-ENCODE
fn encode(hash: HashAlg, m_hash: &[u8], salt: &[u8], em_bits: usize) -> Result<Vec<u8>, Error> {
    let h_len = hash.output_len();
    let s_len = salt.len();
    let em_len = em_bits.div_ceil(8);
    if em_len < h_len + s_len + 2 {
        return Err(Error::invalid_key("modulus too small for PSS with this hash"));
    }

    let h = hash.digest_parts(&[&[0u8; 8][..], m_hash, salt]);

    // DB = PS || 0x01 || salt
    let db_len = em_len - h_len - 1;
    let mut db = vec![0u8; db_len];
    db[db_len - s_len - 1] = 0x01;
    db[db_len - s_len..].copy_from_slice(salt);
    xor_in_place(&mut db, &mgf1(hash, &h, db_len));
    db[0] &= 0xff >> (8 * em_len - em_bits);

    let mut em = db;
    em.extend(h);
    em.push(0xbc);
    Ok(em)
}

// EMSA-PSS-VERIFY with sLen = hLen
fn verify_encoding(hash: HashAlg, m_hash: &[u8], em: &[u8], em_bits: usize) -> bool {
    let h_len = hash.output_len();
    let s_len = h_len;
    let em_len = em.len();
    if em_len < h_len + s_len + 2 || em[em_len - 1] != 0xbc {
        return false;
    }

    let db_len = em_len - h_len - 1;
    let (masked_db, rest) = em.split_at(db_len);
    let h = &rest[..h_len];
    let top_mask = 0xffu8 >> (8 * em_len - em_bits);
    if masked_db[0] & !top_mask != 0 {
        return false;
    }

    let mut db = masked_db.to_vec();
    xor_in_place(&mut db, &mgf1(hash, h, db_len));
    db[0] &= top_mask;

    let ps_len = db_len - s_len - 1;
    if db[..ps_len].iter().any(|b| *b != 0) || db[ps_len] != 0x01 {
        return false;
    }
    let salt = &db[db_len - s_len..];

    let expected = hash.digest_parts(&[&[0u8; 8][..], m_hash, salt]);
    constant_time_eq(&expected, h)
}
