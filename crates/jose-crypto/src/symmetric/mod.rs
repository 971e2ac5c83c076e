//! Symmetric primitives with fixed key-size contracts.

mod block;

pub mod aes_cbc_hmac;
pub mod aes_gcm;
pub mod aes_gcm_kw;
pub mod aes_kw;
pub mod concat_kdf;
pub mod hmac;
pub mod pbes2;
