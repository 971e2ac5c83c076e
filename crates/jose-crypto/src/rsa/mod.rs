//! RSA engine: key handling, OAEP encryption, PSS and PKCS#1 v1.5 signatures.

mod key;
mod mgf;
pub mod oaep;
pub mod pkcs1v15;
pub mod pss;

pub use key::{CrtParams, RsaKeyPair, RsaPrivateKey, RsaPublicKey, DEFAULT_PUBLIC_EXPONENT};

#[cfg(test)]
pub(crate) mod tests {
    use once_cell::sync::Lazy;

    use super::*;

    // Key generation is slow; share one key across the test binary.
    pub(crate) static TEST_KEY: Lazy<RsaPrivateKey> = Lazy::new(|| RsaPrivateKey::generate(2048).unwrap());
}
