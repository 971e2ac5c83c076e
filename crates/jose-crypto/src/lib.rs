/*! # jose-crypto

The cryptographic primitives used by the JOSE engines.

## Features

- **Big integers**: immutable arbitrary precision arithmetic with fixed-width byte conversions.
- **Elliptic curves**: NIST P-256, P-384 and P-521 point arithmetic, ECDH and ECDSA.
- **RSA**: OAEP, PSS and PKCS#1 v1.5 padding over CRT accelerated exponentiation.
- **Symmetric primitives**: AES-GCM, AES-CBC-HMAC, AES key wrap, AES-GCM key wrap, PBES2 and HMAC.
- **OKP keys**: Ed25519 signatures and X25519 key agreement.

*/
pub mod ec;
pub mod hash;
pub mod math;
pub mod okp;
pub mod rsa;
pub mod symmetric;

mod errors;
mod traits;
mod utils;

pub use errors::Error;
pub use traits::{CoreSign, Generate, KeyMaterial, BYTES_LENGTH_32, ECDH};
pub use utils::{constant_time_eq, random_bytes};

/// A wrapper struct for an asymmetric key pair.
/// This struct holds a public key and an optional secret key.
#[derive(Clone)]
pub struct AsymmetricKey<P, S> {
    pub public_key: P,
    pub secret_key: Option<S>,
}
