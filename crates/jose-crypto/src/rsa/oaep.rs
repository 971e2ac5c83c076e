//! RSAES-OAEP (RFC 8017, section 7.1).

use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use super::{
    key::{RsaPrivateKey, RsaPublicKey},
    mgf::{mgf1, xor_in_place},
};
use crate::{errors::Error, hash::HashAlg, math::BigInteger, utils::random_bytes};

/// Largest message that fits a single OAEP block.
///
/// Fails with `InvalidKey` when the modulus is too small for the hash.
pub fn max_message_len(key: &RsaPublicKey, hash: HashAlg) -> Result<usize, Error> {
    let k = key.size();
    let h_len = hash.output_len();
    match k.checked_sub(2 * h_len + 2) {
        Some(len) if len > 0 => Ok(len),
        _ => Err(Error::invalid_key(format!(
            "a {}-bit modulus is too small for OAEP with a {h_len}-byte hash",
            key.bits()
        ))),
    }
}

pub fn encrypt(key: &RsaPublicKey, hash: HashAlg, message: &[u8], label: &[u8]) -> Result<Vec<u8>, Error> {
    let max = max_message_len(key, hash)?;
    if message.len() > max {
        return Err(Error::Encoding(format!("message longer than {max} bytes")));
    }
    let k = key.size();
    let h_len = hash.output_len();

    // DB = lHash || PS || 0x01 || M
    let mut db = vec![0u8; k - h_len - 1];
    db[..h_len].copy_from_slice(&hash.digest(label));
    let marker = db.len() - message.len() - 1;
    db[marker] = 0x01;
    db[marker + 1..].copy_from_slice(message);

    let mut seed = random_bytes(h_len)?;
    xor_in_place(&mut db, &mgf1(hash, &seed, k - h_len - 1));
    xor_in_place(&mut seed, &mgf1(hash, &db, h_len));

    let mut em = Vec::with_capacity(k);
    em.push(0x00);
    em.extend(seed);
    em.extend(db);

    let c = key.public_op(&BigInteger::from_bytes_be(&em))?;
    c.to_bytes(k)
}

/// Decrypt and unpad. Every failure is the same `Error::Decryption`.
pub fn decrypt(key: &RsaPrivateKey, hash: HashAlg, ciphertext: &[u8], label: &[u8]) -> Result<Vec<u8>, Error> {
    let public = key.public_key();
    max_message_len(public, hash)?;
    let k = public.size();
    let h_len = hash.output_len();
    if ciphertext.len() != k {
        return Err(Error::Decryption);
    }

    let m = key
        .private_op(&BigInteger::from_bytes_be(ciphertext))
        .map_err(|_| Error::Decryption)?;
    let mut em = m.to_bytes(k).map_err(|_| Error::Decryption)?;

    let (y, rest) = em.split_at_mut(1);
    let (seed, db) = rest.split_at_mut(h_len);
    xor_in_place(seed, &mgf1(hash, db, h_len));
    xor_in_place(db, &mgf1(hash, seed, k - h_len - 1));

    let first_byte_is_zero = y[0].ct_eq(&0u8);
    let hashes_are_equal = db[..h_len].ct_eq(&hash.digest(label));

    // Scan the whole padding string so the timing does not depend on where the marker sits.
    let mut looking_for_index = Choice::from(1u8);
    let mut index = 0u32;
    let mut invalid = Choice::from(0u8);
    for (i, byte) in db.iter().enumerate().skip(h_len) {
        let is_zero = byte.ct_eq(&0u8);
        let is_one = byte.ct_eq(&1u8);
        index.conditional_assign(&(i as u32), looking_for_index & is_one);
        looking_for_index &= !is_one;
        invalid |= looking_for_index & !is_zero;
    }

    let valid = first_byte_is_zero & hashes_are_equal & !invalid & !looking_for_index;
    if !bool::from(valid) {
        return Err(Error::Decryption);
    }
    Ok(db[index as usize + 1..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::tests::TEST_KEY;

    const HASHES: [HashAlg; 4] = [HashAlg::Sha1, HashAlg::Sha256, HashAlg::Sha384, HashAlg::Sha512];

    #[test]
    fn test_oaep_round_trip_for_every_hash() {
        let key = &*TEST_KEY;
        for hash in HASHES {
            let max = max_message_len(key.public_key(), hash).unwrap();
            for message in [&b""[..], b"a 16 byte secret", &vec![0x5a; max]] {
                let ciphertext = encrypt(key.public_key(), hash, message, b"").unwrap();
                assert_eq!(ciphertext.len(), 256);
                assert_eq!(decrypt(key, hash, &ciphertext, b"").unwrap(), message);
            }
        }
    }

    #[test]
    fn test_oaep_rejects_too_long_message() {
        let key = &*TEST_KEY;
        let max = max_message_len(key.public_key(), HashAlg::Sha256).unwrap();
        assert_eq!(max, 256 - 2 * 32 - 2);
        assert!(encrypt(key.public_key(), HashAlg::Sha256, &vec![0; max + 1], b"").is_err());
    }

    #[test]
    fn test_oaep_failures_are_opaque() {
        let key = &*TEST_KEY;
        let ciphertext = encrypt(key.public_key(), HashAlg::Sha256, b"secret", b"").unwrap();

        let mut tampered = ciphertext.clone();
        tampered[100] ^= 0x80;
        assert_eq!(decrypt(key, HashAlg::Sha256, &tampered, b""), Err(Error::Decryption));
        assert_eq!(decrypt(key, HashAlg::Sha1, &ciphertext, b""), Err(Error::Decryption));
        assert_eq!(decrypt(key, HashAlg::Sha256, &ciphertext, b"label"), Err(Error::Decryption));
        assert_eq!(decrypt(key, HashAlg::Sha256, &ciphertext[1..], b""), Err(Error::Decryption));
        assert_eq!(decrypt(key, HashAlg::Sha256, &[0xff; 256], b""), Err(Error::Decryption));
    }
}
