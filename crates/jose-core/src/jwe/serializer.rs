//! Compact and JSON serializations (RFC 7516 section 7).

use serde::{Deserialize, Serialize};

use super::{Jwe, Recipient};
use crate::{
    error::JoseError,
    util::{b64_decode, b64_encode, decode_header, Header},
};

pub trait JweSerializer: Send + Sync {
    /// `jwe_compact`, `jwe_json_flattened` or `jwe_json_general`.
    fn name(&self) -> &'static str;

    /// Serializes every recipient, or for single-recipient formats the one at
    /// `index`. Without an index those formats need a JWE with one recipient.
    fn serialize(&self, jwe: &Jwe, index: Option<usize>) -> Result<String, JoseError>;

    fn unserialize(&self, input: &str) -> Result<Jwe, JoseError>;
}

#[derive(Serialize, Deserialize)]
struct JsonRecipient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encrypted_key: Option<String>,
}

/// Members shared by both JSON serializations.
#[derive(Serialize, Deserialize)]
struct JsonShared {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    protected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unprotected: Option<Header>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aad: Option<String>,
    iv: String,
    ciphertext: String,
    tag: String,
}

#[derive(Serialize, Deserialize)]
struct FlattenedJwe {
    #[serde(flatten)]
    shared: JsonShared,
    #[serde(flatten)]
    recipient: JsonRecipient,
}

#[derive(Serialize, Deserialize)]
struct GeneralJwe {
    #[serde(flatten)]
    shared: JsonShared,
    recipients: Vec<JsonRecipient>,
}

impl JsonRecipient {
    fn from_recipient(recipient: &Recipient) -> Self {
        Self {
            header: Some(recipient.header.clone()).filter(|h| !h.is_empty()),
            encrypted_key: Some(&recipient.encrypted_key)
                .filter(|k| !k.is_empty())
                .map(|k| b64_encode(k)),
        }
    }

    fn into_recipient(self) -> Result<Recipient, JoseError> {
        Ok(Recipient {
            header: self.header.unwrap_or_default(),
            encrypted_key: self.encrypted_key.as_deref().map(b64_decode).transpose()?.unwrap_or_default(),
        })
    }
}

impl JsonShared {
    fn from_jwe(jwe: &Jwe) -> Self {
        Self {
            protected: Some(jwe.encoded_shared_protected_header.clone()).filter(|p| !p.is_empty()),
            unprotected: Some(jwe.shared_header.clone()).filter(|h| !h.is_empty()),
            aad: jwe.aad.as_deref().map(b64_encode),
            iv: b64_encode(&jwe.iv),
            ciphertext: b64_encode(&jwe.ciphertext),
            tag: b64_encode(&jwe.tag),
        }
    }

    fn into_jwe(self, recipients: Vec<Recipient>) -> Result<Jwe, JoseError> {
        let encoded = self.protected.unwrap_or_default();
        Ok(Jwe {
            ciphertext: b64_decode(&self.ciphertext)?,
            iv: b64_decode(&self.iv)?,
            tag: b64_decode(&self.tag)?,
            aad: self.aad.as_deref().map(b64_decode).transpose()?,
            shared_protected_header: decode_header(&encoded)?,
            encoded_shared_protected_header: encoded,
            shared_header: self.unprotected.unwrap_or_default(),
            recipients,
            payload: None,
        })
    }
}

/// The recipient a single-recipient format carries.
fn single_recipient(jwe: &Jwe, index: Option<usize>) -> Result<&Recipient, JoseError> {
    match index {
        Some(index) => jwe.recipient(index),
        None if jwe.count_recipients() == 1 => jwe.recipient(0),
        None => Err(JoseError::invalid_input(format!(
            "{} recipients cannot share this serialization, select one by index",
            jwe.count_recipients()
        ))),
    }
}

/// `protected '.' encrypted_key '.' iv '.' ciphertext '.' tag`.
///
/// Carries a single recipient, no unprotected header and no AAD.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactSerializer;

impl JweSerializer for CompactSerializer {
    fn name(&self) -> &'static str {
        "jwe_compact"
    }

    fn serialize(&self, jwe: &Jwe, index: Option<usize>) -> Result<String, JoseError> {
        let recipient = single_recipient(jwe, index)?;
        if !jwe.shared_header.is_empty() || !recipient.header.is_empty() {
            return Err(JoseError::invalid_input(
                "the compact serialization cannot carry an unprotected header",
            ));
        }
        if jwe.aad.is_some() {
            return Err(JoseError::invalid_input("the compact serialization cannot carry an AAD"));
        }
        Ok([
            jwe.encoded_shared_protected_header.clone(),
            b64_encode(&recipient.encrypted_key),
            b64_encode(&jwe.iv),
            b64_encode(&jwe.ciphertext),
            b64_encode(&jwe.tag),
        ]
        .join("."))
    }

    fn unserialize(&self, input: &str) -> Result<Jwe, JoseError> {
        let parts: Vec<&str> = input.split('.').collect();
        let [protected, encrypted_key, iv, ciphertext, tag] = parts.as_slice() else {
            return Err(JoseError::encoding("a compact JWE has five parts"));
        };
        let shared_protected_header = decode_header(protected)?;
        if shared_protected_header.is_empty() {
            return Err(JoseError::encoding("a compact JWE needs a protected header"));
        }
        Ok(Jwe {
            ciphertext: b64_decode(ciphertext)?,
            iv: b64_decode(iv)?,
            tag: b64_decode(tag)?,
            aad: None,
            shared_protected_header,
            encoded_shared_protected_header: protected.to_string(),
            shared_header: Header::new(),
            recipients: vec![Recipient {
                header: Header::new(),
                encrypted_key: b64_decode(encrypted_key)?,
            }],
            payload: None,
        })
    }
}

/// The flattened JSON serialization, carrying one recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFlattenedSerializer;

impl JweSerializer for JsonFlattenedSerializer {
    fn name(&self) -> &'static str {
        "jwe_json_flattened"
    }

    fn serialize(&self, jwe: &Jwe, index: Option<usize>) -> Result<String, JoseError> {
        let flattened = FlattenedJwe {
            shared: JsonShared::from_jwe(jwe),
            recipient: JsonRecipient::from_recipient(single_recipient(jwe, index)?),
        };
        Ok(serde_json::to_string(&flattened)?)
    }

    fn unserialize(&self, input: &str) -> Result<Jwe, JoseError> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        if value.get("recipients").is_some() {
            return Err(JoseError::encoding("not a flattened JWE"));
        }
        let flattened: FlattenedJwe = serde_json::from_value(value)?;
        flattened.shared.into_jwe(vec![flattened.recipient.into_recipient()?])
    }
}

/// The general JSON serialization, carrying every recipient.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGeneralSerializer;

impl JweSerializer for JsonGeneralSerializer {
    fn name(&self) -> &'static str {
        "jwe_json_general"
    }

    fn serialize(&self, jwe: &Jwe, _index: Option<usize>) -> Result<String, JoseError> {
        let general = GeneralJwe {
            shared: JsonShared::from_jwe(jwe),
            recipients: jwe.recipients.iter().map(JsonRecipient::from_recipient).collect(),
        };
        Ok(serde_json::to_string(&general)?)
    }

    fn unserialize(&self, input: &str) -> Result<Jwe, JoseError> {
        let general: GeneralJwe = serde_json::from_str(input)?;
        if general.recipients.is_empty() {
            return Err(JoseError::encoding("no recipient"));
        }
        let recipients = general
            .recipients
            .into_iter()
            .map(JsonRecipient::into_recipient)
            .collect::<Result<Vec<_>, _>>()?;
        general.shared.into_jwe(recipients)
    }
}

/// Serializes with a named format and parses with whichever format fits.
pub struct JweSerializerManager {
    serializers: Vec<Box<dyn JweSerializer>>,
}

impl Default for JweSerializerManager {
    fn default() -> Self {
        Self::new(vec![
            Box::new(CompactSerializer),
            Box::new(JsonFlattenedSerializer),
            Box::new(JsonGeneralSerializer),
        ])
    }
}

impl JweSerializerManager {
    pub fn new(serializers: Vec<Box<dyn JweSerializer>>) -> Self {
        Self { serializers }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.serializers.iter().map(|s| s.name()).collect()
    }

    pub fn serialize(&self, name: &str, jwe: &Jwe, index: Option<usize>) -> Result<String, JoseError> {
        self.serializers
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| JoseError::invalid_input(format!("unknown serialization {name}")))?
            .serialize(jwe, index)
    }

    /// Returns the JWE and the name of the format it was read with.
    pub fn unserialize(&self, input: &str) -> Result<(Jwe, &'static str), JoseError> {
        self.serializers
            .iter()
            .find_map(|s| s.unserialize(input).ok().map(|jwe| (jwe, s.name())))
            .ok_or_else(|| JoseError::encoding("unsupported input"))
    }
}
