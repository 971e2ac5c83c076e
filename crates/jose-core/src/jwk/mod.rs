//! This module provides types and utilities for handling JSON Web Keys (JWKs).
//!
//! ## Submodules
//!
//! - [`analyzer`]: Advisory lint passes over keys.
//! - [`bytes`]:    Public byte sequences serialized as base64url.
//! - [`checker`]:  Usage and algorithm consistency checks.
//! - [`ec`]:       Elliptic-curve keys.
//! - [`factory`]:  Key generation.
//! - [`jwk`]:      The JSON Web Key type.
//! - [`key`]:      The key types that can be contained in a JWK.
//! - [`oct`]:      Octet sequence keys.
//! - [`okp`]:      Octet Key Pairs (OKP).
//! - [`prm`]:      Parameters shared by all key types.
//! - [`rsa`]:      RSA keys.
//! - [`secret`]:   Private byte sequences.
//! - [`set`]:      JSON Web Key sets and key selection.

pub mod analyzer;
pub mod bytes;
pub mod checker;
pub mod ec;
pub mod factory;
#[allow(clippy::module_inception)]
pub mod jwk;
pub mod key;
pub mod oct;
pub mod okp;
pub mod prm;
pub mod rsa;
pub mod secret;
pub mod set;

pub use analyzer::{KeyAnalyzer, KeyAnalyzerManager, Level, Message, MessageBag};
pub use bytes::Bytes;
pub use checker::{KeyChecker, KeyUsage};
pub use ec::*;
pub use factory::JwkFactory;
pub use jwk::*;
pub use key::Key;
pub use oct::Oct;
pub use okp::*;
pub use prm::*;
pub use rsa::*;
pub use secret::Secret;
pub use set::JwkSet;
