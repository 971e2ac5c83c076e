use tracing::debug;

use super::{check_crit, Jws, Signature};
use crate::{
    error::JoseError,
    jwa::{AlgorithmRegistry, SignatureAlgorithm},
    jwk::{Jwk, KeyChecker, KeyUsage},
    util::{encode_header, header_str, merge_headers, Header},
};

/// Creates a [`Jws`] by signing a payload with one or more keys.
///
/// ```ignore
/// let jws = JwsBuilder::new(&registry)
///     .with_payload(b"hello".to_vec(), false)
///     .add_signature(&key, protected, Header::new())?
///     .build()?;
/// ```
pub struct JwsBuilder<'a> {
    registry: &'a AlgorithmRegistry<dyn SignatureAlgorithm>,
    payload: Option<Vec<u8>>,
    is_payload_detached: bool,
    signatures: Vec<Signature>,
}

impl<'a> JwsBuilder<'a> {
    pub fn new(registry: &'a AlgorithmRegistry<dyn SignatureAlgorithm>) -> Self {
        Self {
            registry,
            payload: None,
            is_payload_detached: false,
            signatures: Vec::new(),
        }
    }

    /// Sets the payload and drops any signature computed so far.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>, is_payload_detached: bool) -> Self {
        self.payload = Some(payload.into());
        self.is_payload_detached = is_payload_detached;
        self.signatures.clear();
        self
    }

    /// Signs the payload with `key`.
    ///
    /// `alg` must be present in one of the headers, which may not share any
    /// parameter. Every signature of an attached payload must agree on `b64`.
    pub fn add_signature(mut self, key: &Jwk, protected_header: Header, header: Header) -> Result<Self, JoseError> {
        let payload = self
            .payload
            .as_deref()
            .ok_or_else(|| JoseError::invalid_input("the payload is not set"))?;

        let merged = merge_headers(&[&protected_header, &header])?;
        check_crit(&protected_header, &header)?;
        let name = header_str(&merged, "alg")?.ok_or_else(|| JoseError::invalid_header("missing alg"))?;
        let algorithm = self.registry.get(name)?;
        KeyChecker::check(key, algorithm, KeyUsage::Signature)?;

        let encoded_protected_header = encode_header(&protected_header)?;
        let mut signature = Signature::new(encoded_protected_header, protected_header, header, Vec::new());

        if !self.is_payload_detached {
            if let Some(first) = self.signatures.first() {
                if first.is_payload_encoded() != signature.is_payload_encoded() {
                    return Err(JoseError::InconsistentPayloadEncoding);
                }
            }
        }

        signature.signature = algorithm.sign(key, &signature.signing_input(payload, None))?;
        debug!(alg = algorithm.name(), kid = key.kid(), "payload signed");
        self.signatures.push(signature);
        Ok(self)
    }

    pub fn build(self) -> Result<Jws, JoseError> {
        let payload = self.payload.ok_or_else(|| JoseError::invalid_input("the payload is not set"))?;
        if self.signatures.is_empty() {
            return Err(JoseError::invalid_input("at least one signature is required"));
        }
        Ok(Jws::new(Some(payload), None, self.is_payload_detached, self.signatures))
    }
}
