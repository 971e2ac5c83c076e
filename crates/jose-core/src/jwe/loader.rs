use tracing::debug;

use super::{Jwe, JweDecrypter, JweSerializerManager};
use crate::{
    error::JoseError,
    jwa::Registries,
    jwk::{Jwk, JwkSet},
};

/// Parses a serialized JWE and decrypts it in one step.
pub struct JweLoader<'a> {
    serializers: JweSerializerManager,
    decrypter: JweDecrypter<'a>,
}

impl<'a> JweLoader<'a> {
    pub fn new(serializers: JweSerializerManager, registries: &'a Registries) -> Self {
        Self {
            serializers,
            decrypter: JweDecrypter::new(registries),
        }
    }

    pub fn serializers(&self) -> &JweSerializerManager {
        &self.serializers
    }

    /// Returns the decrypted JWE and the index of the recipient that matched.
    pub fn load_and_decrypt_with_key(&self, token: &str, key: &Jwk) -> Result<(Jwe, usize), JoseError> {
        self.load_and_decrypt_with_key_set(token, &JwkSet::new(vec![key.clone()]))
    }

    pub fn load_and_decrypt_with_key_set(&self, token: &str, keys: &JwkSet) -> Result<(Jwe, usize), JoseError> {
        let (jwe, format) = self.serializers.unserialize(token)?;
        debug!(format, recipients = jwe.count_recipients(), "JWE loaded");
        self.decrypter.decrypt_using_key_set(&jwe, keys, None)
    }
}
