//! Elliptic-curve engine for the NIST prime curves.

mod curve;
mod ecdsa;
mod key;
mod point;

pub use curve::{Curve, CurveParams};
pub use key::{EcKeyPair, EcPrivateKey, EcPublicKey};
pub use point::Point;
