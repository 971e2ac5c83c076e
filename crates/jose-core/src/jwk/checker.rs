use super::{Class, Jwk, Operations};
use crate::{error::JoseError, jwa::Algorithm};

/// The operation a key is about to be used for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyUsage {
    Signature,
    Verification,
    Encryption,
    Decryption,
}

impl KeyUsage {
    fn class(&self) -> Class {
        match self {
            KeyUsage::Signature | KeyUsage::Verification => Class::Signing,
            KeyUsage::Encryption | KeyUsage::Decryption => Class::Encryption,
        }
    }

    fn allows(&self, op: Operations) -> bool {
        match self {
            KeyUsage::Signature => op == Operations::Sign,
            KeyUsage::Verification => op == Operations::Verify,
            KeyUsage::Encryption => matches!(op, Operations::Encrypt | Operations::WrapKey | Operations::DeriveKey),
            KeyUsage::Decryption => matches!(op, Operations::Decrypt | Operations::UnwrapKey | Operations::DeriveKey),
        }
    }
}

/// Consistency checks run before a key is handed to an algorithm.
pub struct KeyChecker;

impl KeyChecker {
    /// Checks `use` and `key_ops` against the intended usage.
    pub fn check_key_usage(key: &Jwk, usage: KeyUsage) -> Result<(), JoseError> {
        if let Some(cls) = key.prm().cls {
            if cls != usage.class() {
                return Err(JoseError::invalid_key(format!("key cannot be used for {usage:?}")));
            }
        }
        if let Some(ops) = &key.prm().ops {
            if !ops.iter().any(|op| usage.allows(*op)) {
                return Err(JoseError::invalid_key(format!("key operations do not allow {usage:?}")));
            }
        }
        Ok(())
    }

    /// Checks a declared `alg` and the key type against the algorithm.
    pub fn check_key_algorithm<A: Algorithm + ?Sized>(key: &Jwk, algorithm: &A) -> Result<(), JoseError> {
        if let Some(alg) = key.alg() {
            if alg != algorithm.name() {
                return Err(JoseError::invalid_key(format!(
                    "key is restricted to {alg}, not {}",
                    algorithm.name()
                )));
            }
        }
        Self::check_key_type(key, algorithm.allowed_key_types())
    }

    pub fn check_key_type(key: &Jwk, allowed: &[&str]) -> Result<(), JoseError> {
        if allowed.contains(&key.kty()) {
            Ok(())
        } else {
            Err(JoseError::invalid_key(format!("key type {} is not allowed", key.kty())))
        }
    }

    /// Runs every check.
    pub fn check<A: Algorithm + ?Sized>(key: &Jwk, algorithm: &A, usage: KeyUsage) -> Result<(), JoseError> {
        Self::check_key_usage(key, usage)?;
        Self::check_key_algorithm(key, algorithm)
    }
}
