//! Octet key pairs: Ed25519 signatures and X25519 key agreement.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use x25519_dalek::{PublicKey, StaticSecret};

use super::{
    errors::Error,
    traits::{CoreSign, Generate, KeyMaterial, BYTES_LENGTH_32, ECDH},
    utils::{generate_seed, slice_to_array},
    AsymmetricKey,
};

pub type Ed25519KeyPair = AsymmetricKey<VerifyingKey, SigningKey>;

pub type X25519KeyPair = AsymmetricKey<PublicKey, StaticSecret>;

impl std::fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.public_key))
    }
}

impl std::fmt::Debug for X25519KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}", self.public_key))
    }
}

impl KeyMaterial for Ed25519KeyPair {
    fn public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(self.public_key.as_bytes().to_vec())
    }

    fn private_key_bytes(&self) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => Ok(sk.to_bytes().to_vec()),
            None => Err(Error::invalid_key("private key required")),
        }
    }
}

impl Generate for Ed25519KeyPair {
    fn new() -> Result<Ed25519KeyPair, Error> {
        Self::new_with_seed(&[])
    }

    fn new_with_seed(seed: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let secret_seed = generate_seed(seed)?;
        let sk = SigningKey::from_bytes(&secret_seed);
        Ok(Ed25519KeyPair {
            public_key: sk.verifying_key(),
            secret_key: Some(sk),
        })
    }

    fn from_public_key(public_key: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let vk = VerifyingKey::from_bytes(&slice_to_array(public_key)?)
            .map_err(|_| Error::invalid_key("invalid Ed25519 public key"))?;
        Ok(Ed25519KeyPair {
            public_key: vk,
            secret_key: None,
        })
    }

    fn from_secret_key(secret_key: &[u8]) -> Result<Ed25519KeyPair, Error> {
        let sk = SigningKey::from_bytes(&slice_to_array(secret_key)?);
        Ok(Ed25519KeyPair {
            public_key: sk.verifying_key(),
            secret_key: Some(sk),
        })
    }
}

impl CoreSign for Ed25519KeyPair {
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => sk
                .try_sign(payload)
                .map(|signature| signature.to_bytes().to_vec())
                .map_err(|_| Error::invalid_key("signing failed")),
            None => Err(Error::invalid_key("private key required")),
        }
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        let sig = Signature::from_slice(signature).map_err(|_| Error::Verification)?;
        self.public_key.verify(payload, &sig).map_err(|_| Error::Verification)
    }
}

impl KeyMaterial for X25519KeyPair {
    fn public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(self.public_key.as_bytes().to_vec())
    }

    fn private_key_bytes(&self) -> Result<Vec<u8>, Error> {
        match &self.secret_key {
            Some(sk) => Ok(sk.as_bytes().to_vec()),
            None => Err(Error::invalid_key("private key required")),
        }
    }
}

impl Generate for X25519KeyPair {
    fn new() -> Result<X25519KeyPair, Error> {
        Self::new_with_seed(&[])
    }

    fn new_with_seed(seed: &[u8]) -> Result<X25519KeyPair, Error> {
        let sk = StaticSecret::from(generate_seed(seed)?);
        Ok(X25519KeyPair {
            public_key: PublicKey::from(&sk),
            secret_key: Some(sk),
        })
    }

    fn from_public_key(public_key: &[u8]) -> Result<X25519KeyPair, Error> {
        Ok(X25519KeyPair {
            public_key: PublicKey::from(slice_to_array(public_key)?),
            secret_key: None,
        })
    }

    fn from_secret_key(secret_key: &[u8]) -> Result<X25519KeyPair, Error> {
        let sk = StaticSecret::from(slice_to_array(secret_key)?);
        Ok(X25519KeyPair {
            public_key: PublicKey::from(&sk),
            secret_key: Some(sk),
        })
    }
}

impl ECDH for X25519KeyPair {
    type PublicKey = PublicKey;

    /// Rejects low-order peer keys, which yield an all-zero shared secret.
    fn key_exchange(&self, their_public: &PublicKey) -> Result<Vec<u8>, Error> {
        let sk = self
            .secret_key
            .as_ref()
            .ok_or_else(|| Error::invalid_key("private key required"))?;
        let shared = sk.diffie_hellman(their_public);
        if !shared.was_contributory() {
            return Err(Error::invalid_key("non-contributory X25519 public key"));
        }
        Ok(shared.as_bytes().to_vec())
    }
}

/// Byte length shared by all OKP keys supported here.
pub const OKP_KEY_LENGTH: usize = BYTES_LENGTH_32;
