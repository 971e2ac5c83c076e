use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};

use crate::errors::Error;

pub(crate) const BLOCK_SIZE: usize = 16;

/// Raw AES block cipher for the 128, 192 and 256-bit key sizes.
pub(crate) enum AesCipher {
    Aes128(Box<Aes128>),
    Aes192(Box<Aes192>),
    Aes256(Box<Aes256>),
}

impl AesCipher {
    /// Fails with `InvalidKey` for any key that is not 16, 24 or 32 bytes long.
    pub(crate) fn new(key: &[u8]) -> Result<Self, Error> {
        let invalid = |_| Error::invalid_key("invalid AES key");
        Ok(match key.len() {
            16 => AesCipher::Aes128(Box::new(Aes128::new_from_slice(key).map_err(invalid)?)),
            24 => AesCipher::Aes192(Box::new(Aes192::new_from_slice(key).map_err(invalid)?)),
            32 => AesCipher::Aes256(Box::new(Aes256::new_from_slice(key).map_err(invalid)?)),
            len => return Err(Error::invalid_key(format!("AES keys are 128, 192 or 256 bits, got {} bits", len * 8))),
        })
    }

    pub(crate) fn encrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesCipher::Aes128(c) => c.encrypt_block(block),
            AesCipher::Aes192(c) => c.encrypt_block(block),
            AesCipher::Aes256(c) => c.encrypt_block(block),
        }
    }

    pub(crate) fn decrypt_block(&self, block: &mut [u8; BLOCK_SIZE]) {
        let block = GenericArray::from_mut_slice(block);
        match self {
            AesCipher::Aes128(c) => c.decrypt_block(block),
            AesCipher::Aes192(c) => c.decrypt_block(block),
            AesCipher::Aes256(c) => c.decrypt_block(block),
        }
    }
}
