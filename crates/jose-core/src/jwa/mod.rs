//! JSON Web Algorithms (RFC 7518).
//!
//! Algorithms come in four disjoint families. Each family has its own trait
//! and its own [`AlgorithmRegistry`].

use crate::{error::JoseError, jwk::Jwk, util::Header};

pub mod compression;
pub mod content_encryption;
pub mod key_encryption;
pub mod registry;
pub mod signature;

pub use registry::{AlgorithmRegistry, Registries};

/// Behaviour shared by every algorithm.
pub trait Algorithm: Send + Sync {
    /// The registered algorithm name, e.g. `HS256`.
    fn name(&self) -> &'static str;

    /// The `kty` values of the keys the algorithm can use.
    fn allowed_key_types(&self) -> &'static [&'static str];
}

pub trait SignatureAlgorithm: Algorithm {
    fn sign(&self, key: &Jwk, input: &[u8]) -> Result<Vec<u8>, JoseError>;

    /// Fails with [`JoseError::Verification`] when the signature does not match.
    fn verify(&self, key: &Jwk, input: &[u8], signature: &[u8]) -> Result<(), JoseError>;
}

/// How a key encryption algorithm determines the CEK (RFC 7516 section 2).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyManagementMode {
    /// The shared symmetric key is the CEK.
    Direct,
    /// The CEK is encrypted to the recipient's public key.
    KeyEncryption,
    /// The CEK is wrapped with a symmetric key.
    KeyWrapping,
    /// The CEK is agreed upon.
    KeyAgreement,
    /// An agreed key wraps the CEK.
    KeyAgreementWithKeyWrapping,
}

impl KeyManagementMode {
    /// Whether the algorithm determines the CEK itself.
    pub fn provides_cek(&self) -> bool {
        matches!(self, KeyManagementMode::Direct | KeyManagementMode::KeyAgreement)
    }
}

/// What key management algorithms know about the message.
#[derive(Debug)]
pub struct KeyWrapContext<'a> {
    /// The content encryption algorithm name.
    pub enc: &'a str,
    /// The CEK length in bytes.
    pub cek_len: usize,
    /// Every header parameter that applies to the recipient.
    pub header: &'a Header,
}

/// The result of a key management operation.
#[derive(Debug, Default)]
pub struct WrappedKey {
    /// The CEK, for algorithms that determine it.
    pub cek: Option<Vec<u8>>,
    /// The `encrypted_key` value. Empty for direct modes.
    pub encrypted_key: Vec<u8>,
    /// Header parameters the recipient needs, such as `epk` or `iv`.
    pub header: Header,
}

pub trait KeyEncryptionAlgorithm: Algorithm {
    fn mode(&self) -> KeyManagementMode;

    /// Wraps `cek`, or determines the CEK when [`KeyManagementMode::provides_cek`].
    fn wrap(&self, key: &Jwk, cek: Option<&[u8]>, ctx: &KeyWrapContext<'_>) -> Result<WrappedKey, JoseError>;

    /// Recovers the CEK. Failures must not reveal their cause.
    fn unwrap(&self, key: &Jwk, encrypted_key: &[u8], ctx: &KeyWrapContext<'_>) -> Result<Vec<u8>, JoseError>;
}

pub trait ContentEncryptionAlgorithm: Algorithm {
    /// CEK length in bytes.
    fn cek_len(&self) -> usize;

    /// IV length in bytes.
    fn iv_len(&self) -> usize;

    /// Returns the ciphertext and the authentication tag.
    fn encrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>), JoseError>;

    fn decrypt(&self, cek: &[u8], iv: &[u8], aad: &[u8], ciphertext: &[u8], tag: &[u8]) -> Result<Vec<u8>, JoseError>;
}

pub trait CompressionAlgorithm: Algorithm {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, JoseError>;

    /// Fails with [`JoseError::Decryption`] on malformed input.
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, JoseError>;
}

/// Key types usable with symmetric algorithms.
pub(crate) const OCT: &[&str] = &["oct"];
