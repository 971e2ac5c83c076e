use thiserror::Error;

/// The set of errors surfaced by the key model and the JWS/JWE engines.
///
/// `Verification` and `Decryption` are deliberately opaque: they never say
/// which signature, recipient or check failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoseError {
    /// Malformed key or a key unsuitable for the requested algorithm
    #[error("invalid key: {0}")]
    InvalidKey(String),
    /// The requested algorithm is not registered
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
    /// Malformed base64url, JSON or serialization structure
    #[error("encoding error: {0}")]
    Encoding(String),
    /// No signature could be verified
    #[error("verification failed")]
    Verification,
    /// Key unwrap, tag check or decompression failed
    #[error("decryption failed")]
    Decryption,
    /// Signatures of one JWS disagree on the `b64` payload encoding
    #[error("inconsistent payload encoding across signatures")]
    InconsistentPayloadEncoding,
    /// Missing, duplicated or unsupported critical header parameters
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    /// Caller misuse of a builder, verifier or serializer
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl JoseError {
    pub(crate) fn invalid_key(msg: impl Into<String>) -> Self {
        JoseError::InvalidKey(msg.into())
    }

    pub(crate) fn invalid_header(msg: impl Into<String>) -> Self {
        JoseError::InvalidHeader(msg.into())
    }

    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        JoseError::InvalidInput(msg.into())
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        JoseError::Encoding(msg.into())
    }
}

impl From<jose_crypto::Error> for JoseError {
    fn from(err: jose_crypto::Error) -> Self {
        use jose_crypto::Error as E;
        match err {
            E::Arithmetic(msg) => JoseError::InvalidKey(msg.to_owned()),
            E::InvalidKey(msg) => JoseError::InvalidKey(msg),
            E::Encoding(msg) => JoseError::Encoding(msg),
            E::Decryption => JoseError::Decryption,
            E::Verification => JoseError::Verification,
            E::Rng => JoseError::InvalidInput("random number generator failure".into()),
        }
    }
}

impl From<serde_json::Error> for JoseError {
    fn from(err: serde_json::Error) -> Self {
        JoseError::Encoding(err.to_string())
    }
}

impl From<base64ct::Error> for JoseError {
    fn from(_: base64ct::Error) -> Self {
        JoseError::Encoding("invalid base64url".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_errors_map_to_taxonomy() {
        assert_eq!(
            JoseError::from(jose_crypto::Error::Arithmetic("zero modulus")),
            JoseError::InvalidKey("zero modulus".into())
        );
        assert_eq!(JoseError::from(jose_crypto::Error::Decryption), JoseError::Decryption);
        assert_eq!(JoseError::from(jose_crypto::Error::Verification), JoseError::Verification);
    }

    #[test]
    fn test_opaque_errors_carry_no_detail() {
        assert_eq!(JoseError::Decryption.to_string(), "decryption failed");
        assert_eq!(JoseError::Verification.to_string(), "verification failed");
    }
}
