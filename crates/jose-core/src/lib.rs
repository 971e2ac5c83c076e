/*! # jose-core

JSON Object Signing and Encryption built on [`jose_crypto`].

## Features

- **JWK**: key model for `EC`, `RSA`, `oct`, `OKP` and `none` keys, key sets,
  RFC 7638 thumbprints, key factory, usage checks and key analyzers.
- **JWA**: an algorithm registry per family (signature, key management,
  content encryption, compression) holding every built-in algorithm.
- **JWS**: signing and verification with compact, flattened and general JSON
  serializations, detached and unencoded (RFC 7797) payloads.
- **JWE**: encryption for one or many recipients, with compact, flattened and
  general JSON serializations.

## Example

```ignore
use jose_core::{jwa::Registries, jwk::Jwk, jws::{JwsBuilder, JwsSerializerManager}};

let registries = Registries::default();
let key = Jwk::from_json(r#"{"kty":"oct","k":"..."}"#)?;
let jws = JwsBuilder::new(&registries.signature)
    .with_payload(b"hello".to_vec(), false)
    .add_signature(&key, protected, Header::new())?
    .build()?;
let token = JwsSerializerManager::default().serialize("jws_compact", &jws, None)?;
```
*/
pub mod config;
pub mod jwa;
pub mod jwe;
pub mod jwk;
pub mod jws;

mod error;
mod util;

pub use config::{JoseConfig, Pbes2Config};
pub use error::JoseError;
pub use util::{b64_decode, b64_encode, Header};
