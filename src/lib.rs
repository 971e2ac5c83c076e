/*! # jose-rs

JSON Object Signing and Encryption for Rust.

This crate re-exports the two workspace members:

- [`crypto`] (`jose-crypto`): big integers, NIST curves, RSA, AES based
  primitives, HMAC, PBES2, Concat KDF, Ed25519 and X25519.
- [`jwk`], [`jwa`], [`jws`], [`jwe`] and [`config`] (`jose-core`): the key
  model, the algorithm registries and the signing and encryption engines.
*/
pub use jose_core::{b64_decode, b64_encode, config, jwa, jwe, jwk, jws, Header, JoseConfig, JoseError, Pbes2Config};
pub use jose_crypto as crypto;
