//! Traits for cryptographic operations.

// Every key family implements the same small set of interfaces so that the
// algorithm layer can swap curves or key types without touching its callers.

use super::errors::Error;

/// The length of a 32-byte key material.
pub const BYTES_LENGTH_32: usize = 32;

/// A trait for types that hold key material bytes.
pub trait KeyMaterial {
    /// Returns the encoded public key bytes.
    fn public_key_bytes(&self) -> Result<Vec<u8>, Error>;

    /// Returns the encoded secret key bytes.
    ///
    /// Fails with `InvalidKey` when the pair only holds a public key.
    fn private_key_bytes(&self) -> Result<Vec<u8>, Error>;
}

/// A trait for types that support deterministic key generation.
pub trait Generate: KeyMaterial {
    /// Generates a new random key.
    fn new() -> Result<Self, Error>
    where
        Self: Sized;

    /// Generates a new key deterministically using the given seed.
    ///
    /// An empty seed or one of the wrong size falls back to a random seed.
    fn new_with_seed(seed: &[u8]) -> Result<Self, Error>
    where
        Self: Sized;

    /// Generates a new instance from an existing public key.
    fn from_public_key(public_key: &[u8]) -> Result<Self, Error>
    where
        Self: Sized;

    /// Generates a new instance from an existing secret key.
    fn from_secret_key(private_key: &[u8]) -> Result<Self, Error>
    where
        Self: Sized;
}

/// A trait for types that support signing operations.
pub trait CoreSign {
    /// Performs a sign operation.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error>;

    /// Performs a verify operation.
    ///
    /// Returns `Error::Verification` when the signature does not match.
    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error>;
}

/// A trait for types that support ECDH key exchange operations.
pub trait ECDH {
    /// The public half of the other party.
    type PublicKey;

    /// Performs a key exchange operation and returns the raw shared secret.
    fn key_exchange(&self, their_public: &Self::PublicKey) -> Result<Vec<u8>, Error>;
}
