use tracing::debug;

use super::{check_crit, Jws, Signature};
use crate::{
    error::JoseError,
    jwa::{AlgorithmRegistry, SignatureAlgorithm},
    jwk::{Jwk, JwkSet, KeyChecker, KeyUsage},
};

/// Verifies the signatures of a [`Jws`].
pub struct JwsVerifier<'a> {
    registry: &'a AlgorithmRegistry<dyn SignatureAlgorithm>,
}

impl<'a> JwsVerifier<'a> {
    pub fn new(registry: &'a AlgorithmRegistry<dyn SignatureAlgorithm>) -> Self {
        Self { registry }
    }

    pub fn verify_with_key(
        &self,
        jws: &Jws,
        key: &Jwk,
        index: Option<usize>,
        detached_payload: Option<&[u8]>,
    ) -> Result<usize, JoseError> {
        self.verify(jws, std::slice::from_ref(key), index, detached_payload)
    }

    /// Returns the index of the first signature verified by one of the keys.
    ///
    /// With an `index`, only that signature is tried and header or algorithm
    /// problems are reported. Otherwise such signatures are skipped.
    pub fn verify_with_keys(
        &self,
        jws: &Jws,
        keys: &JwkSet,
        index: Option<usize>,
        detached_payload: Option<&[u8]>,
    ) -> Result<usize, JoseError> {
        self.verify(jws, keys.keys(), index, detached_payload)
    }

    fn verify(
        &self,
        jws: &Jws,
        keys: &[Jwk],
        index: Option<usize>,
        detached_payload: Option<&[u8]>,
    ) -> Result<usize, JoseError> {
        let (payload, encoded_payload) = match (jws.payload(), detached_payload) {
            // an empty attached payload is how compact tokens carry a detached one
            (Some(attached), Some(_)) if !jws.is_payload_detached() && !attached.is_empty() => {
                return Err(JoseError::invalid_input("the JWS already carries a payload"))
            }
            (_, Some(detached)) => (detached, None),
            (Some(attached), None) => (attached, jws.encoded_payload()),
            (None, None) => return Err(JoseError::invalid_input("the payload is detached")),
        };

        if let Some(index) = index {
            let signature = jws.signature(index)?;
            return match self.verify_signature(signature, keys, payload, encoded_payload)? {
                true => Ok(index),
                false => Err(JoseError::Verification),
            };
        }

        for (index, signature) in jws.signatures().iter().enumerate() {
            match self.verify_signature(signature, keys, payload, encoded_payload) {
                Ok(true) => return Ok(index),
                Ok(false) => {}
                Err(e) => debug!(index, error = %e, "signature skipped"),
            }
        }
        Err(JoseError::Verification)
    }

    fn verify_signature(
        &self,
        signature: &Signature,
        keys: &[Jwk],
        payload: &[u8],
        encoded_payload: Option<&str>,
    ) -> Result<bool, JoseError> {
        signature.merged_header()?;
        check_crit(signature.protected_header(), signature.header())?;
        let algorithm = self.registry.get(signature.algorithm()?)?;
        let input = signature.signing_input(payload, encoded_payload);

        for key in keys {
            if KeyChecker::check(key, algorithm, KeyUsage::Verification).is_err() {
                continue;
            }
            if algorithm.verify(key, &input, signature.signature()).is_ok() {
                debug!(alg = algorithm.name(), kid = key.kid(), "signature verified");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::{
        jwa::registry::signature_algorithms,
        jwk::{EcCurves, JwkFactory, OkpCurves, Parameters},
        jws::JwsBuilder,
        util::Header,
    };

    fn header(value: Value) -> Header {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_verify_picks_the_matching_signature() {
        let registry = signature_algorithms();
        let ec = JwkFactory::create_ec_key(EcCurves::P384, Parameters::default()).unwrap();
        let ed = JwkFactory::create_okp_key(OkpCurves::Ed25519, Parameters::default()).unwrap();
        let jws = JwsBuilder::new(&registry)
            .with_payload(b"payload".to_vec(), false)
            .add_signature(&ec, header(json!({"alg": "ES384"})), Header::new())
            .unwrap()
            .add_signature(&ed, header(json!({"alg": "EdDSA"})), Header::new())
            .unwrap()
            .build()
            .unwrap();

        let verifier = JwsVerifier::new(&registry);
        let ed_public = ed.to_public().unwrap();
        assert_eq!(verifier.verify_with_key(&jws, &ed_public, None, None), Ok(1));
        assert_eq!(verifier.verify_with_key(&jws, &ed_public, Some(0), None), Err(JoseError::Verification));

        let keys = JwkSet::new(vec![ed_public, ec.to_public().unwrap()]);
        assert_eq!(verifier.verify_with_keys(&jws, &keys, None, None), Ok(0));
        assert!(verifier.verify_with_keys(&jws, &keys, Some(5), None).is_err());
    }

    #[test]
    fn test_detached_payload() {
        let registry = signature_algorithms();
        let key = Jwk::from_oct(vec![7u8; 32], Parameters::default()).unwrap();
        let jws = JwsBuilder::new(&registry)
            .with_payload(b"detached".to_vec(), true)
            .add_signature(&key, header(json!({"alg": "HS256"})), Header::new())
            .unwrap()
            .build()
            .unwrap();
        // as if it had been serialized without its payload
        let jws = Jws::new(None, None, true, jws.signatures().to_vec());

        let verifier = JwsVerifier::new(&registry);
        assert_eq!(verifier.verify_with_key(&jws, &key, None, Some(b"detached")), Ok(0));
        assert_eq!(verifier.verify_with_key(&jws, &key, None, Some(b"other")), Err(JoseError::Verification));
        assert!(matches!(verifier.verify_with_key(&jws, &key, None, None), Err(JoseError::InvalidInput(_))));
    }

    #[test]
    fn test_key_restrictions_are_honoured() {
        let registry = signature_algorithms();
        let key = Jwk::from_oct(vec![7u8; 32], Parameters::default()).unwrap();
        let jws = JwsBuilder::new(&registry)
            .with_payload(b"payload".to_vec(), false)
            .add_signature(&key, header(json!({"alg": "HS256"})), Header::new())
            .unwrap()
            .build()
            .unwrap();

        let verifier = JwsVerifier::new(&registry);
        let enc_only = key.with_prm(Parameters::default().with_use(crate::jwk::Class::Encryption));
        assert_eq!(verifier.verify_with_key(&jws, &enc_only, None, None), Err(JoseError::Verification));

        let narrowed = signature_algorithms().subset(&["HS384"]).unwrap();
        let verifier = JwsVerifier::new(&narrowed);
        assert_eq!(verifier.verify_with_key(&jws, &key, None, None), Err(JoseError::Verification));
        assert!(matches!(
            verifier.verify_with_key(&jws, &key, Some(0), None),
            Err(JoseError::UnsupportedAlgorithm(_))
        ));
    }
}
