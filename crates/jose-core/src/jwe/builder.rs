use jose_crypto::random_bytes;
use tracing::debug;
use zeroize::Zeroizing;

use super::{authenticated_data, check_crit, check_zip, Jwe, Recipient};
use crate::{
    error::JoseError,
    jwa::{ContentEncryptionAlgorithm, KeyEncryptionAlgorithm, KeyWrapContext, Registries, WrappedKey},
    jwk::{Jwk, KeyChecker, KeyUsage},
    util::{encode_header, header_str, merge_headers, Header},
};

/// Creates a [`Jwe`] by encrypting a payload for one or more recipients.
///
/// `enc` must be a shared parameter and `zip` a protected one. With a single
/// recipient, parameters produced by the key management algorithm (`epk`,
/// `iv`, `p2s`...) are added to the protected header. With several, they go
/// to each recipient's header.
pub struct JweBuilder<'a> {
    registries: &'a Registries,
    payload: Option<Vec<u8>>,
    aad: Option<Vec<u8>>,
    shared_protected_header: Header,
    shared_header: Header,
    recipients: Vec<(Jwk, Header)>,
}

struct PreparedRecipient<'r> {
    key: &'r Jwk,
    header: Header,
    merged: Header,
    algorithm: &'r dyn KeyEncryptionAlgorithm,
}

impl<'a> JweBuilder<'a> {
    pub fn new(registries: &'a Registries) -> Self {
        Self {
            registries,
            payload: None,
            aad: None,
            shared_protected_header: Header::new(),
            shared_header: Header::new(),
            recipients: Vec::new(),
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Additional authenticated data. Not representable in the compact
    /// serialization.
    pub fn with_aad(mut self, aad: impl Into<Vec<u8>>) -> Self {
        self.aad = Some(aad.into());
        self
    }

    pub fn with_shared_protected_header(mut self, header: Header) -> Self {
        self.shared_protected_header = header;
        self
    }

    pub fn with_shared_header(mut self, header: Header) -> Self {
        self.shared_header = header;
        self
    }

    pub fn add_recipient(mut self, key: &Jwk, header: Header) -> Self {
        self.recipients.push((key.clone(), header));
        self
    }

    pub fn build(self) -> Result<Jwe, JoseError> {
        let registries = self.registries;
        let payload = self.payload.as_deref().ok_or_else(|| JoseError::invalid_input("the payload is not set"))?;
        if self.recipients.is_empty() {
            return Err(JoseError::invalid_input("at least one recipient is required"));
        }

        let shared = merge_headers(&[&self.shared_protected_header, &self.shared_header])?;
        check_crit(&shared)?;
        let enc = header_str(&shared, "enc")?.ok_or_else(|| JoseError::invalid_header("enc must be a shared parameter"))?;
        let content = registries.content_encryption.get(enc)?;
        let compression = header_str(&self.shared_protected_header, "zip")?
            .map(|zip| registries.compression.get(zip))
            .transpose()?;

        let mut prepared = Vec::with_capacity(self.recipients.len());
        for (key, header) in &self.recipients {
            check_zip(&self.shared_header, header)?;
            check_crit(header)?;
            let merged = merge_headers(&[&shared, header])?;
            let name = header_str(&merged, "alg")?.ok_or_else(|| JoseError::invalid_header("missing alg"))?;
            let algorithm = registries.key_encryption.get(name)?;
            KeyChecker::check(key, algorithm, KeyUsage::Encryption)?;
            prepared.push(PreparedRecipient {
                key,
                header: header.clone(),
                merged,
                algorithm,
            });
        }
        if prepared.len() > 1 && prepared.iter().any(|r| r.algorithm.mode().provides_cek()) {
            return Err(JoseError::invalid_input(
                "direct encryption and direct key agreement allow a single recipient",
            ));
        }

        let mut protected = self.shared_protected_header.clone();
        let mut recipients = Vec::with_capacity(prepared.len());
        let cek = if let [single] = prepared.as_slice() {
            let cek = if single.algorithm.mode().provides_cek() {
                None
            } else {
                Some(Zeroizing::new(random_bytes(content.cek_len())?))
            };
            let wrapped = wrap(single, enc, content, cek.as_deref().map(Vec::as_slice))?;
            add_parameters(&mut protected, &single.merged, wrapped.header)?;
            recipients.push(Recipient {
                header: single.header.clone(),
                encrypted_key: wrapped.encrypted_key,
            });
            match (cek, wrapped.cek) {
                (Some(cek), _) => cek,
                (None, Some(agreed)) => Zeroizing::new(agreed),
                (None, None) => return Err(JoseError::invalid_input("the key management algorithm did not produce a CEK")),
            }
        } else {
            let cek = Zeroizing::new(random_bytes(content.cek_len())?);
            for recipient in &prepared {
                let wrapped = wrap(recipient, enc, content, Some(cek.as_slice()))?;
                let mut header = recipient.header.clone();
                add_parameters(&mut header, &recipient.merged, wrapped.header)?;
                recipients.push(Recipient {
                    header,
                    encrypted_key: wrapped.encrypted_key,
                });
            }
            cek
        };

        let plaintext = match compression {
            Some(compression) => compression.compress(payload)?,
            None => payload.to_vec(),
        };
        let encoded_protected = encode_header(&protected)?;
        let iv = random_bytes(content.iv_len())?;
        let aad = authenticated_data(&encoded_protected, self.aad.as_deref());
        let (ciphertext, tag) = content.encrypt(&cek, &iv, &aad, &plaintext)?;
        debug!(enc, recipients = recipients.len(), "payload encrypted");

        Ok(Jwe {
            ciphertext,
            iv,
            tag,
            aad: self.aad,
            shared_protected_header: protected,
            encoded_shared_protected_header: encoded_protected,
            shared_header: self.shared_header,
            recipients,
            payload: self.payload,
        })
    }
}

fn wrap(
    recipient: &PreparedRecipient<'_>,
    enc: &str,
    content: &dyn ContentEncryptionAlgorithm,
    cek: Option<&[u8]>,
) -> Result<WrappedKey, JoseError> {
    let ctx = KeyWrapContext {
        enc,
        cek_len: content.cek_len(),
        header: &recipient.merged,
    };
    let wrapped = recipient.algorithm.wrap(recipient.key, cek, &ctx)?;
    debug!(alg = recipient.algorithm.name(), kid = recipient.key.kid(), "CEK wrapped");
    Ok(wrapped)
}

/// Adds key management parameters to `target`, refusing to shadow a parameter
/// the caller already set for that recipient.
fn add_parameters(target: &mut Header, existing: &Header, parameters: Header) -> Result<(), JoseError> {
    for (name, value) in parameters {
        if existing.contains_key(&name) {
            return Err(JoseError::invalid_header(format!("{name} is set by the key management algorithm")));
        }
        target.insert(name, value);
    }
    Ok(())
}
