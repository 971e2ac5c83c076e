//! Key management algorithms (RFC 7518 section 4).

mod aes_gcm_kw;
mod aes_kw;
mod dir;
mod ecdh_es;
mod pbes2;
mod rsa_oaep;

pub use aes_gcm_kw::AesGcmKw;
pub use aes_kw::AesKw;
pub use dir::Direct;
pub use ecdh_es::EcdhEs;
pub use pbes2::Pbes2;
pub use rsa_oaep::RsaOaep;

use crate::error::JoseError;

/// The CEK a wrapping algorithm was handed.
pub(crate) fn required_cek(cek: Option<&[u8]>) -> Result<&[u8], JoseError> {
    cek.ok_or_else(|| JoseError::invalid_input("a content encryption key is required"))
}
