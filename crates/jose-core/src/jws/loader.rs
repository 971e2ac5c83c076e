use tracing::debug;

use super::{Jws, JwsSerializerManager, JwsVerifier};
use crate::{
    error::JoseError,
    jwa::{AlgorithmRegistry, SignatureAlgorithm},
    jwk::{Jwk, JwkSet},
};

/// Parses a serialized JWS and verifies it in one step.
pub struct JwsLoader<'a> {
    serializers: JwsSerializerManager,
    verifier: JwsVerifier<'a>,
}

impl<'a> JwsLoader<'a> {
    pub fn new(serializers: JwsSerializerManager, registry: &'a AlgorithmRegistry<dyn SignatureAlgorithm>) -> Self {
        Self {
            serializers,
            verifier: JwsVerifier::new(registry),
        }
    }

    pub fn serializers(&self) -> &JwsSerializerManager {
        &self.serializers
    }

    /// Returns the JWS and the index of the verified signature.
    pub fn load_and_verify_with_key(
        &self,
        token: &str,
        key: &Jwk,
        detached_payload: Option<&[u8]>,
    ) -> Result<(Jws, usize), JoseError> {
        self.load_and_verify_with_key_set(token, &JwkSet::new(vec![key.clone()]), detached_payload)
    }

    pub fn load_and_verify_with_key_set(
        &self,
        token: &str,
        keys: &JwkSet,
        detached_payload: Option<&[u8]>,
    ) -> Result<(Jws, usize), JoseError> {
        let (jws, format) = self.serializers.unserialize(token)?;
        debug!(format, signatures = jws.count_signatures(), "JWS loaded");
        let index = self.verifier.verify_with_keys(&jws, keys, None, detached_payload)?;
        Ok((jws, index))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        jwa::registry::signature_algorithms,
        jwk::Parameters,
        jws::JwsBuilder,
        util::Header,
    };

    #[test]
    fn test_load_and_verify() {
        let registry = signature_algorithms();
        let key = Jwk::from_oct(vec![3u8; 32], Parameters::default().with_kid("k")).unwrap();
        let protected = json!({"alg": "HS256", "kid": "k"}).as_object().cloned().unwrap();
        let jws = JwsBuilder::new(&registry)
            .with_payload(b"hello".to_vec(), false)
            .add_signature(&key, protected, Header::new())
            .unwrap()
            .build()
            .unwrap();
        let manager = JwsSerializerManager::default();
        let token = manager.serialize("jws_json_flattened", &jws, None).unwrap();

        let loader = JwsLoader::new(manager, &registry);
        let (loaded, index) = loader.load_and_verify_with_key(&token, &key, None).unwrap();
        assert_eq!(index, 0);
        assert_eq!(loaded.payload(), Some(&b"hello"[..]));

        let other = Jwk::from_oct(vec![4u8; 32], Parameters::default()).unwrap();
        assert_eq!(
            loader.load_and_verify_with_key(&token, &other, None).map(|(_, i)| i),
            Err(JoseError::Verification)
        );
        assert!(loader.load_and_verify_with_key("garbage", &key, None).is_err());
    }
}
