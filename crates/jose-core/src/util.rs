use base64ct::{Base64UrlUnpadded, Encoding};
use serde_json::Value;

use crate::error::JoseError;

/// A JOSE header: an ordered JSON object.
pub type Header = serde_json::Map<String, Value>;

/// Unpadded base64url encoding.
pub fn b64_encode(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

/// Unpadded base64url decoding. Padding or characters outside the url-safe
/// alphabet are rejected.
pub fn b64_decode(data: &str) -> Result<Vec<u8>, JoseError> {
    Ok(Base64UrlUnpadded::decode_vec(data)?)
}

/// Encode a header as base64url JSON. An empty header encodes as the empty string.
pub(crate) fn encode_header(header: &Header) -> Result<String, JoseError> {
    if header.is_empty() {
        return Ok(String::new());
    }
    Ok(b64_encode(serde_json::to_string(header)?.as_bytes()))
}

/// Decode a base64url JSON header that must be an object.
pub(crate) fn decode_header(encoded: &str) -> Result<Header, JoseError> {
    if encoded.is_empty() {
        return Ok(Header::new());
    }
    match serde_json::from_slice(&b64_decode(encoded)?)? {
        Value::Object(header) => Ok(header),
        _ => Err(JoseError::encoding("header is not a JSON object")),
    }
}

/// Merge headers, failing on a parameter present in more than one of them.
pub(crate) fn merge_headers(headers: &[&Header]) -> Result<Header, JoseError> {
    let mut merged = Header::new();
    for header in headers {
        for (name, value) in header.iter() {
            if merged.contains_key(name) {
                return Err(JoseError::invalid_header(format!("duplicated header parameter {name}")));
            }
            merged.insert(name.clone(), value.clone());
        }
    }
    Ok(merged)
}

/// Read a string parameter, if present.
pub(crate) fn header_str<'a>(header: &'a Header, name: &str) -> Result<Option<&'a str>, JoseError> {
    match header.get(name) {
        None => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(JoseError::invalid_header(format!("{name} must be a string"))),
    }
}

/// Read a base64url encoded parameter, if present.
pub(crate) fn header_bytes(header: &Header, name: &str) -> Result<Option<Vec<u8>>, JoseError> {
    header_str(header, name)?.map(b64_decode).transpose()
}
