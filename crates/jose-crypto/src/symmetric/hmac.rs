use hmac::{digest::KeyInit, Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384, Sha512};

use crate::{errors::Error, hash::HashAlg, utils::constant_time_eq};

fn run<M: Mac + KeyInit>(key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, Error> {
    let mut mac = <M as KeyInit>::new_from_slice(key).map_err(|_| Error::invalid_key("invalid HMAC key"))?;
    for part in parts {
        mac.update(part);
    }
    Ok(mac.finalize().into_bytes().to_vec())
}

/// HMAC over the concatenation of `parts`.
pub fn sign_parts(hash: HashAlg, key: &[u8], parts: &[&[u8]]) -> Result<Vec<u8>, Error> {
    match hash {
        HashAlg::Sha1 => run::<Hmac<Sha1>>(key, parts),
        HashAlg::Sha256 => run::<Hmac<Sha256>>(key, parts),
        HashAlg::Sha384 => run::<Hmac<Sha384>>(key, parts),
        HashAlg::Sha512 => run::<Hmac<Sha512>>(key, parts),
    }
}

pub fn sign(hash: HashAlg, key: &[u8], data: &[u8]) -> Result<Vec<u8>, Error> {
    sign_parts(hash, key, &[data])
}

/// Recompute the MAC and compare it with `tag` in constant time.
pub fn verify(hash: HashAlg, key: &[u8], data: &[u8], tag: &[u8]) -> Result<(), Error> {
    let expected = sign(hash, key, data)?;
    if constant_time_eq(&expected, tag) {
        Ok(())
    } else {
        Err(Error::Verification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc4231_case_2() {
        let tag = sign(HashAlg::Sha256, b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(tag),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_verify() {
        let tag = sign(HashAlg::Sha512, b"key", b"data").unwrap();
        assert!(verify(HashAlg::Sha512, b"key", b"data", &tag).is_ok());
        assert_eq!(verify(HashAlg::Sha512, b"key", b"datb", &tag), Err(Error::Verification));
        assert_eq!(verify(HashAlg::Sha512, b"key", b"data", &tag[..32]), Err(Error::Verification));
    }
}
