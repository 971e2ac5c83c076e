//! JSON Web Signature (RFC 7515) with unencoded payload support (RFC 7797).

use serde_json::Value;

use crate::{
    error::JoseError,
    util::{b64_encode, header_str, merge_headers, Header},
};

mod builder;
mod loader;
mod serializer;
mod verifier;

pub use builder::JwsBuilder;
pub use loader::JwsLoader;
pub use serializer::{CompactSerializer, JsonFlattenedSerializer, JsonGeneralSerializer, JwsSerializer, JwsSerializerManager};
pub use verifier::JwsVerifier;

/// Critical header parameters this implementation understands.
const UNDERSTOOD_CRIT: &[&str] = &["b64"];

/// One signature of a JWS.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    encoded_protected_header: String,
    protected_header: Header,
    header: Header,
    signature: Vec<u8>,
}

impl Signature {
    pub(crate) fn new(encoded_protected_header: String, protected_header: Header, header: Header, signature: Vec<u8>) -> Self {
        Self {
            encoded_protected_header,
            protected_header,
            header,
            signature,
        }
    }

    /// The protected header exactly as it was encoded.
    pub fn encoded_protected_header(&self) -> &str {
        &self.encoded_protected_header
    }

    pub fn protected_header(&self) -> &Header {
        &self.protected_header
    }

    /// The unprotected header.
    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Looks a parameter up in the protected header, then in the unprotected one.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.protected_header.get(name).or_else(|| self.header.get(name))
    }

    pub fn algorithm(&self) -> Result<&str, JoseError> {
        header_str(&self.protected_header, "alg")?
            .or(header_str(&self.header, "alg")?)
            .ok_or_else(|| JoseError::invalid_header("missing alg"))
    }

    /// Whether the payload is base64url encoded in the signing input (`b64`).
    pub fn is_payload_encoded(&self) -> bool {
        self.protected_header.get("b64").and_then(Value::as_bool).unwrap_or(true)
    }

    /// Both headers, which must not share a parameter.
    pub fn merged_header(&self) -> Result<Header, JoseError> {
        merge_headers(&[&self.protected_header, &self.header])
    }

    /// `ASCII(BASE64URL(protected)) || '.' || payload`, with the payload encoded
    /// unless `b64` is false.
    pub(crate) fn signing_input(&self, payload: &[u8], encoded_payload: Option<&str>) -> Vec<u8> {
        let mut input = Vec::with_capacity(self.encoded_protected_header.len() + 1 + payload.len() * 4 / 3 + 4);
        input.extend_from_slice(self.encoded_protected_header.as_bytes());
        input.push(b'.');
        if self.is_payload_encoded() {
            match encoded_payload {
                Some(encoded) => input.extend_from_slice(encoded.as_bytes()),
                None => input.extend_from_slice(b64_encode(payload).as_bytes()),
            }
        } else {
            input.extend_from_slice(payload);
        }
        input
    }
}

/// A signed payload with one or more signatures.
///
/// Values are immutable. A detached JWS carries no payload; it is supplied at
/// verification time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jws {
    payload: Option<Vec<u8>>,
    encoded_payload: Option<String>,
    is_payload_detached: bool,
    signatures: Vec<Signature>,
}

impl Jws {
    pub(crate) fn new(
        payload: Option<Vec<u8>>,
        encoded_payload: Option<String>,
        is_payload_detached: bool,
        signatures: Vec<Signature>,
    ) -> Self {
        Self {
            payload,
            encoded_payload,
            is_payload_detached,
            signatures,
        }
    }

    /// The payload, unless detached.
    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// The base64url payload as it was parsed, if it was parsed.
    pub fn encoded_payload(&self) -> Option<&str> {
        self.encoded_payload.as_deref()
    }

    pub fn is_payload_detached(&self) -> bool {
        self.is_payload_detached
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn signature(&self, index: usize) -> Result<&Signature, JoseError> {
        self.signatures
            .get(index)
            .ok_or_else(|| JoseError::invalid_input(format!("no signature at index {index}")))
    }

    pub fn count_signatures(&self) -> usize {
        self.signatures.len()
    }

    /// The payload as it appears in a serialization for `signature`.
    pub(crate) fn payload_for(&self, signature: &Signature) -> Result<Option<String>, JoseError> {
        let Some(payload) = self.payload.as_deref().filter(|_| !self.is_payload_detached) else {
            return Ok(None);
        };
        if signature.is_payload_encoded() {
            return Ok(Some(match &self.encoded_payload {
                Some(encoded) => encoded.clone(),
                None => b64_encode(payload),
            }));
        }
        String::from_utf8(payload.to_vec())
            .map(Some)
            .map_err(|_| JoseError::encoding("an unencoded payload must be valid UTF-8 to be serialized"))
    }
}

/// `b64` and `crit` rules: both live in the protected header, `b64` must be
/// listed in `crit` and every critical parameter must be understood and present.
pub(crate) fn check_crit(protected: &Header, header: &Header) -> Result<(), JoseError> {
    for name in ["crit", "b64"] {
        if header.contains_key(name) {
            return Err(JoseError::invalid_header(format!("{name} must be protected")));
        }
    }

    let crit = match protected.get("crit") {
        None => Vec::new(),
        Some(Value::Array(values)) if !values.is_empty() => values
            .iter()
            .map(|v| v.as_str().ok_or_else(|| JoseError::invalid_header("crit values must be strings")))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(JoseError::invalid_header("crit must be a non-empty array")),
    };
    for name in &crit {
        if !UNDERSTOOD_CRIT.contains(name) {
            return Err(JoseError::invalid_header(format!("unsupported critical parameter {name}")));
        }
        if !protected.contains_key(*name) {
            return Err(JoseError::invalid_header(format!("critical parameter {name} is missing")));
        }
    }

    if let Some(b64) = protected.get("b64") {
        if !b64.is_boolean() {
            return Err(JoseError::invalid_header("b64 must be a boolean"));
        }
        if !crit.contains(&"b64") {
            return Err(JoseError::invalid_header("b64 must be listed in crit"));
        }
    }
    Ok(())
}
