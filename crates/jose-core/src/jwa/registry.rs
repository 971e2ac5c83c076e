use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use super::{
    compression::Deflate,
    content_encryption::{AesCbcHmac, AesGcm},
    key_encryption::{AesGcmKw, AesKw, Direct, EcdhEs, Pbes2, RsaOaep},
    signature::{Ecdsa, EdDsa, Hmac, NoneSignature, RsaPkcs1, RsaPss},
    Algorithm, CompressionAlgorithm, ContentEncryptionAlgorithm, KeyEncryptionAlgorithm, SignatureAlgorithm,
};
use crate::{config::Pbes2Config, error::JoseError};

/// Algorithms of one family, by name.
///
/// Registration is idempotent: the first algorithm registered under a name
/// is kept. Lookups never fail; unknown names resolve to `None`.
pub struct AlgorithmRegistry<A: ?Sized + Algorithm> {
    algorithms: Vec<Arc<A>>,
    index: HashMap<&'static str, usize>,
}

impl<A: ?Sized + Algorithm> Default for AlgorithmRegistry<A> {
    fn default() -> Self {
        Self {
            algorithms: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<A: ?Sized + Algorithm> Clone for AlgorithmRegistry<A> {
    fn clone(&self) -> Self {
        Self {
            algorithms: self.algorithms.clone(),
            index: self.index.clone(),
        }
    }
}

impl<A: ?Sized + Algorithm> std::fmt::Debug for AlgorithmRegistry<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<A: ?Sized + Algorithm> AlgorithmRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an algorithm. Returns `false` when the name was already taken.
    pub fn register(&mut self, algorithm: Arc<A>) -> bool {
        let name = algorithm.name();
        if self.index.contains_key(name) {
            debug!(algorithm = name, "duplicate algorithm ignored");
            return false;
        }
        debug!(algorithm = name, "algorithm registered");
        self.index.insert(name, self.algorithms.len());
        self.algorithms.push(algorithm);
        true
    }

    pub fn with(mut self, algorithm: Arc<A>) -> Self {
        self.register(algorithm);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&A> {
        self.index.get(name).map(|&i| self.algorithms[i].as_ref())
    }

    /// Like [`Self::resolve`], for callers that must fail on unknown names.
    pub fn get(&self, name: &str) -> Result<&A, JoseError> {
        self.resolve(name)
            .ok_or_else(|| JoseError::UnsupportedAlgorithm(name.to_owned()))
    }

    /// The algorithms in registration order.
    pub fn list(&self) -> impl Iterator<Item = &A> {
        self.algorithms.iter().map(|a| a.as_ref())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.algorithms.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }

    /// A new registry with the named algorithms, in the order given.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, JoseError> {
        let mut subset = Self::new();
        for name in names {
            let name = name.as_ref();
            let i = self
                .index
                .get(name)
                .ok_or_else(|| JoseError::UnsupportedAlgorithm(name.to_owned()))?;
            subset.register(Arc::clone(&self.algorithms[*i]));
        }
        Ok(subset)
    }
}

/// One registry per algorithm family.
#[derive(Clone, Debug)]
pub struct Registries {
    pub signature: AlgorithmRegistry<dyn SignatureAlgorithm>,
    pub key_encryption: AlgorithmRegistry<dyn KeyEncryptionAlgorithm>,
    pub content_encryption: AlgorithmRegistry<dyn ContentEncryptionAlgorithm>,
    pub compression: AlgorithmRegistry<dyn CompressionAlgorithm>,
}

impl Default for Registries {
    fn default() -> Self {
        Self::with_pbes2(Pbes2Config::default())
    }
}

impl Registries {
    /// Every built-in algorithm, with the given PBES2 policy.
    pub fn with_pbes2(pbes2: Pbes2Config) -> Self {
        Self {
            signature: signature_algorithms(),
            key_encryption: key_encryption_algorithms(pbes2),
            content_encryption: content_encryption_algorithms(),
            compression: compression_methods(),
        }
    }
}

pub fn signature_algorithms() -> AlgorithmRegistry<dyn SignatureAlgorithm> {
    AlgorithmRegistry::<dyn SignatureAlgorithm>::new()
        .with(Arc::new(Hmac::hs256()))
        .with(Arc::new(Hmac::hs384()))
        .with(Arc::new(Hmac::hs512()))
        .with(Arc::new(RsaPkcs1::rs256()))
        .with(Arc::new(RsaPkcs1::rs384()))
        .with(Arc::new(RsaPkcs1::rs512()))
        .with(Arc::new(RsaPss::ps256()))
        .with(Arc::new(RsaPss::ps384()))
        .with(Arc::new(RsaPss::ps512()))
        .with(Arc::new(Ecdsa::es256()))
        .with(Arc::new(Ecdsa::es384()))
        .with(Arc::new(Ecdsa::es512()))
        .with(Arc::new(EdDsa))
        .with(Arc::new(NoneSignature))
}

pub fn key_encryption_algorithms(pbes2: Pbes2Config) -> AlgorithmRegistry<dyn KeyEncryptionAlgorithm> {
    AlgorithmRegistry::<dyn KeyEncryptionAlgorithm>::new()
        .with(Arc::new(Direct))
        .with(Arc::new(AesKw::a128kw()))
        .with(Arc::new(AesKw::a192kw()))
        .with(Arc::new(AesKw::a256kw()))
        .with(Arc::new(AesGcmKw::a128gcmkw()))
        .with(Arc::new(AesGcmKw::a192gcmkw()))
        .with(Arc::new(AesGcmKw::a256gcmkw()))
        .with(Arc::new(Pbes2::hs256_a128kw(pbes2.clone())))
        .with(Arc::new(Pbes2::hs384_a192kw(pbes2.clone())))
        .with(Arc::new(Pbes2::hs512_a256kw(pbes2)))
        .with(Arc::new(RsaOaep::rsa_oaep()))
        .with(Arc::new(RsaOaep::rsa_oaep_256()))
        .with(Arc::new(RsaOaep::rsa_oaep_384()))
        .with(Arc::new(RsaOaep::rsa_oaep_512()))
        .with(Arc::new(EcdhEs::direct()))
        .with(Arc::new(EcdhEs::a128kw()))
        .with(Arc::new(EcdhEs::a192kw()))
        .with(Arc::new(EcdhEs::a256kw()))
}

pub fn content_encryption_algorithms() -> AlgorithmRegistry<dyn ContentEncryptionAlgorithm> {
    AlgorithmRegistry::<dyn ContentEncryptionAlgorithm>::new()
        .with(Arc::new(AesGcm::a128gcm()))
        .with(Arc::new(AesGcm::a192gcm()))
        .with(Arc::new(AesGcm::a256gcm()))
        .with(Arc::new(AesCbcHmac::a128cbc_hs256()))
        .with(Arc::new(AesCbcHmac::a192cbc_hs384()))
        .with(Arc::new(AesCbcHmac::a256cbc_hs512()))
}

pub fn compression_methods() -> AlgorithmRegistry<dyn CompressionAlgorithm> {
    AlgorithmRegistry::<dyn CompressionAlgorithm>::new().with(Arc::new(Deflate))
}
