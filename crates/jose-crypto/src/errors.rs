use thiserror::Error;

/// The set of errors that can occur during primitive operations.
///
/// `Decryption` and `Verification` never carry a cause: callers must not be
/// able to tell a wrong key from tampered input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Invalid modulus or a negative result where the domain forbids one
    #[error("arithmetic error: {0}")]
    Arithmetic(&'static str),
    /// A value does not fit the requested encoding
    #[error("encoding error: {0}")]
    Encoding(String),
    /// Malformed or unsuitable key material
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// Opaque decryption or key unwrap failure
    #[error("decryption failed")]
    Decryption,
    /// Opaque signature verification failure
    #[error("verification failed")]
    Verification,
    /// The operating system random source failed
    #[error("random number generator failure")]
    Rng,
}

impl Error {
    pub(crate) fn invalid_key(msg: impl Into<String>) -> Self {
        Error::InvalidKey(msg.into())
    }
}
