//! Advisory lint passes over keys.
//!
//! Analyzers only report. A key with high-level messages can still be used.

use jose_crypto::math::BigInteger;

use super::{EcCurves, Jwk, Key};

/// How much a finding matters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Low,
    Medium,
    High,
}

/// A human readable finding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub level: Level,
    pub text: String,
}

impl Message {
    pub fn low(text: impl Into<String>) -> Self {
        Self { level: Level::Low, text: text.into() }
    }

    pub fn medium(text: impl Into<String>) -> Self {
        Self { level: Level::Medium, text: text.into() }
    }

    pub fn high(text: impl Into<String>) -> Self {
        Self { level: Level::High, text: text.into() }
    }
}

/// Findings collected over a set of analyzers.
#[derive(Clone, Debug, Default)]
pub struct MessageBag {
    messages: Vec<Message>,
}

impl MessageBag {
    pub fn add(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_level(&self, level: Level) -> bool {
        self.messages.iter().any(|m| m.level == level)
    }
}

pub trait KeyAnalyzer: Send + Sync {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag);
}

/// Reports keys without an `alg` parameter.
pub struct AlgorithmAnalyzer;

impl KeyAnalyzer for AlgorithmAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        if jwk.alg().is_none() {
            bag.add(Message::medium("The parameter \"alg\" should be added."));
        }
    }
}

/// Reports keys restricted neither by `use` nor by `key_ops`.
pub struct UsageAnalyzer;

impl KeyAnalyzer for UsageAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        if jwk.prm().cls.is_none() && jwk.prm().ops.is_none() {
            bag.add(Message::medium("The parameter \"use\" or \"key_ops\" should be added."));
        }
    }
}

pub struct KeyIdentifierAnalyzer;

impl KeyAnalyzer for KeyIdentifierAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        if jwk.kid().is_none() {
            bag.add(Message::low("The parameter \"kid\" should be added."));
        }
    }
}

pub struct RsaAnalyzer;

impl KeyAnalyzer for RsaAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        let Key::Rsa(rsa) = jwk.key() else {
            return;
        };
        let bits = BigInteger::from_bytes_be(&rsa.n).bits();
        if bits < 2048 {
            bag.add(Message::high(format!(
                "The key length is less than 2048 bits ({bits} bits)."
            )));
        }
        if rsa.is_private() && !rsa.has_crt() {
            bag.add(Message::medium(
                "The key is a private key without CRT parameters; operations will be slow.",
            ));
        }
    }
}

pub struct OctAnalyzer;

impl KeyAnalyzer for OctAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        let Key::Oct(oct) = jwk.key() else {
            return;
        };
        let bits = oct.k.len() * 8;
        if bits < 128 {
            bag.add(Message::high(format!("The key length is less than 128 bits ({bits} bits).")));
        }
    }
}

pub struct EcAnalyzer;

impl KeyAnalyzer for EcAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        let Key::Ec(ec) = jwk.key() else {
            return;
        };
        let expected = match ec.crv {
            EcCurves::P256 => "ES256",
            EcCurves::P384 => "ES384",
            EcCurves::P521 => "ES512",
        };
        if let Some(alg) = jwk.alg() {
            if alg.starts_with("ES") && alg != expected {
                bag.add(Message::high(format!(
                    "The algorithm {alg} does not match the curve of the key ({expected} expected)."
                )));
            }
        }
    }
}

pub struct NoneAnalyzer;

impl KeyAnalyzer for NoneAnalyzer {
    fn analyze(&self, jwk: &Jwk, bag: &mut MessageBag) {
        if let Key::None = jwk.key() {
            bag.add(Message::high("This key is meant to be used with the algorithm \"none\". This algorithm is not secured and should be used with care."));
        }
    }
}

/// Runs a list of analyzers over a key.
pub struct KeyAnalyzerManager {
    analyzers: Vec<Box<dyn KeyAnalyzer>>,
}

impl Default for KeyAnalyzerManager {
    fn default() -> Self {
        Self::new()
            .with_analyzer(AlgorithmAnalyzer)
            .with_analyzer(UsageAnalyzer)
            .with_analyzer(KeyIdentifierAnalyzer)
            .with_analyzer(RsaAnalyzer)
            .with_analyzer(OctAnalyzer)
            .with_analyzer(EcAnalyzer)
            .with_analyzer(NoneAnalyzer)
    }
}

impl KeyAnalyzerManager {
    /// An empty manager.
    pub fn new() -> Self {
        Self { analyzers: Vec::new() }
    }

    pub fn with_analyzer(mut self, analyzer: impl KeyAnalyzer + 'static) -> Self {
        self.analyzers.push(Box::new(analyzer));
        self
    }

    pub fn analyze(&self, jwk: &Jwk) -> MessageBag {
        let mut bag = MessageBag::default();
        for analyzer in &self.analyzers {
            analyzer.analyze(jwk, &mut bag);
        }
        tracing::debug!(kty = jwk.kty(), messages = bag.len(), "key analyzed");
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::{Class, JwkFactory, Parameters};

    #[test]
    fn test_well_described_key_has_no_message() {
        let prm = Parameters::default().with_kid("k").with_alg("HS256").with_use(Class::Signing);
        let jwk = JwkFactory::create_oct_key(256, prm).unwrap();
        assert!(KeyAnalyzerManager::default().analyze(&jwk).is_empty());
    }

    #[test]
    fn test_weak_keys_are_reported() {
        let short = Jwk::from_oct(vec![1u8; 8], Parameters::default()).unwrap();
        let bag = KeyAnalyzerManager::default().analyze(&short);
        assert!(bag.has_level(Level::High));
        assert!(bag.has_level(Level::Medium));
        assert!(bag.has_level(Level::Low));

        let none = JwkFactory::create_none_key(Parameters::default()).unwrap();
        let bag = KeyAnalyzerManager::new().with_analyzer(NoneAnalyzer).analyze(&none);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_rsa_and_ec_findings() {
        let rsa = JwkFactory::create_rsa_key(1024, Parameters::default()).unwrap();
        let bag = KeyAnalyzerManager::new().with_analyzer(RsaAnalyzer).analyze(&rsa);
        assert_eq!(bag.len(), 1);
        assert!(bag.all()[0].text.contains("1024"));

        let ec = JwkFactory::create_ec_key(EcCurves::P256, Parameters::default().with_alg("ES384")).unwrap();
        let bag = KeyAnalyzerManager::new().with_analyzer(EcAnalyzer).analyze(&ec);
        assert!(bag.has_level(Level::High));
    }
}
