//! JSON Web Encryption (RFC 7516).

use crate::{
    error::JoseError,
    util::{b64_encode, merge_headers, Header},
};

mod builder;
mod decrypter;
mod loader;
mod serializer;

pub use builder::JweBuilder;
pub use decrypter::JweDecrypter;
pub use loader::JweLoader;
pub use serializer::{CompactSerializer, JsonFlattenedSerializer, JsonGeneralSerializer, JweSerializer, JweSerializerManager};

/// A recipient's unprotected header and encrypted CEK.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Recipient {
    header: Header,
    encrypted_key: Vec<u8>,
}

impl Recipient {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Empty for direct encryption and direct key agreement.
    pub fn encrypted_key(&self) -> &[u8] {
        &self.encrypted_key
    }
}

/// An encrypted payload and its recipients.
///
/// A parsed JWE has no payload until it is decrypted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Jwe {
    ciphertext: Vec<u8>,
    iv: Vec<u8>,
    tag: Vec<u8>,
    aad: Option<Vec<u8>>,
    shared_protected_header: Header,
    encoded_shared_protected_header: String,
    shared_header: Header,
    recipients: Vec<Recipient>,
    payload: Option<Vec<u8>>,
}

impl Jwe {
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    pub fn tag(&self) -> &[u8] {
        &self.tag
    }

    /// Additional authenticated data, JSON serializations only.
    pub fn aad(&self) -> Option<&[u8]> {
        self.aad.as_deref()
    }

    pub fn shared_protected_header(&self) -> &Header {
        &self.shared_protected_header
    }

    pub fn encoded_shared_protected_header(&self) -> &str {
        &self.encoded_shared_protected_header
    }

    /// The shared unprotected header.
    pub fn shared_header(&self) -> &Header {
        &self.shared_header
    }

    pub fn recipients(&self) -> &[Recipient] {
        &self.recipients
    }

    pub fn recipient(&self, index: usize) -> Result<&Recipient, JoseError> {
        self.recipients
            .get(index)
            .ok_or_else(|| JoseError::invalid_input(format!("no recipient at index {index}")))
    }

    pub fn count_recipients(&self) -> usize {
        self.recipients.len()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }

    /// Every header parameter that applies to a recipient. The three headers
    /// must not share a parameter.
    pub fn recipient_header(&self, index: usize) -> Result<Header, JoseError> {
        let recipient = self.recipient(index)?;
        merge_headers(&[&self.shared_protected_header, &self.shared_header, &recipient.header])
    }

    /// The content encryption AAD: `ASCII(BASE64URL(protected))`, followed by
    /// `'.' BASE64URL(aad)` when an AAD is present.
    pub(crate) fn authenticated_data(&self) -> Vec<u8> {
        authenticated_data(&self.encoded_shared_protected_header, self.aad.as_deref())
    }

    pub(crate) fn with_payload(&self, payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
            ..self.clone()
        }
    }
}

pub(crate) fn authenticated_data(encoded_protected_header: &str, aad: Option<&[u8]>) -> Vec<u8> {
    let mut data = encoded_protected_header.as_bytes().to_vec();
    if let Some(aad) = aad {
        data.push(b'.');
        data.extend_from_slice(b64_encode(aad).as_bytes());
    }
    data
}

/// `zip` is only accepted in the protected header.
pub(crate) fn check_zip(shared_header: &Header, recipient_header: &Header) -> Result<(), JoseError> {
    if shared_header.contains_key("zip") || recipient_header.contains_key("zip") {
        return Err(JoseError::invalid_header("zip must be protected"));
    }
    Ok(())
}

/// No critical extension is understood for encryption.
pub(crate) fn check_crit(header: &Header) -> Result<(), JoseError> {
    match header.get("crit") {
        None => Ok(()),
        Some(crit) => Err(JoseError::invalid_header(format!("unsupported critical parameters {crit}"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_authenticated_data() {
        assert_eq!(authenticated_data("eyJ9", None), b"eyJ9".to_vec());
        assert_eq!(authenticated_data("eyJ9", Some(b"test")), b"eyJ9.dGVzdA".to_vec());
    }

    #[test]
    fn test_header_rules() {
        let zip = json!({"zip": "DEF"}).as_object().cloned().unwrap();
        assert!(check_zip(&zip, &Header::new()).is_err());
        assert!(check_zip(&Header::new(), &zip).is_err());
        assert!(check_zip(&Header::new(), &Header::new()).is_ok());
        assert!(check_crit(&json!({"crit": ["exp"]}).as_object().cloned().unwrap()).is_err());
    }
}
