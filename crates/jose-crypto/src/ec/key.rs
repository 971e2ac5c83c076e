use super::{curve::Curve, ecdsa, point::Point};
use crate::{
    errors::Error,
    math::BigInteger,
    traits::{CoreSign, KeyMaterial, ECDH},
    AsymmetricKey,
};

/// A public point bound to its curve.
///
/// Construction always checks that the point satisfies the curve equation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: Curve,
    point: Point,
}

/// A private scalar in `[1, n)` bound to its curve.
#[derive(Clone, PartialEq, Eq)]
pub struct EcPrivateKey {
    curve: Curve,
    d: BigInteger,
}

/// A wrapper around an elliptic curve key pair.
pub type EcKeyPair = AsymmetricKey<EcPublicKey, EcPrivateKey>;

impl EcPublicKey {
    /// Build a public key from fixed-width big-endian coordinates.
    pub fn from_coordinates(curve: Curve, x: &[u8], y: &[u8]) -> Result<Self, Error> {
        let len = curve.coordinate_len();
        if x.len() != len || y.len() != len {
            return Err(Error::invalid_key(format!(
                "{} coordinates must be {len} bytes long",
                curve.name()
            )));
        }
        let point = curve
            .params()
            .point(BigInteger::from_bytes_be(x), BigInteger::from_bytes_be(y))?;
        Ok(Self { curve, point })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// The `x` coordinate, left padded to the curve's coordinate length.
    pub fn x_bytes(&self) -> Result<Vec<u8>, Error> {
        self.coordinate(self.point.x())
    }

    /// The `y` coordinate, left padded to the curve's coordinate length.
    pub fn y_bytes(&self) -> Result<Vec<u8>, Error> {
        self.coordinate(self.point.y())
    }

    fn coordinate(&self, value: Option<&BigInteger>) -> Result<Vec<u8>, Error> {
        value
            .ok_or_else(|| Error::invalid_key("point at infinity"))?
            .to_bytes(self.curve.coordinate_len())
    }
}

impl EcPrivateKey {
    pub fn from_bytes(curve: Curve, d: &[u8]) -> Result<Self, Error> {
        if d.len() != curve.coordinate_len() {
            return Err(Error::invalid_key(format!(
                "{} private key must be {} bytes long",
                curve.name(),
                curve.coordinate_len()
            )));
        }
        let d = BigInteger::from_bytes_be(d);
        if d.is_zero() || d >= curve.params().n {
            return Err(Error::invalid_key("private scalar out of range"));
        }
        Ok(Self { curve, d })
    }

    pub fn curve(&self) -> Curve {
        self.curve
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        self.d.to_bytes(self.curve.coordinate_len())
    }

    /// Derive the matching public key `d * G`.
    pub fn public_key(&self) -> Result<EcPublicKey, Error> {
        let point = self.curve.params().mul_base(&self.d)?;
        Ok(EcPublicKey { curve: self.curve, point })
    }
}

impl std::fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcPrivateKey").field("curve", &self.curve).finish_non_exhaustive()
    }
}

impl EcKeyPair {
    /// Generate a key pair with a random scalar in `[1, n)`.
    pub fn generate(curve: Curve) -> Result<Self, Error> {
        let d = BigInteger::random_range(&BigInteger::one(), &curve.params().n)?;
        Self::from_private_key(EcPrivateKey { curve, d })
    }

    pub fn from_private_key(secret_key: EcPrivateKey) -> Result<Self, Error> {
        Ok(Self {
            public_key: secret_key.public_key()?,
            secret_key: Some(secret_key),
        })
    }

    pub fn from_public_key(public_key: EcPublicKey) -> Self {
        Self {
            public_key,
            secret_key: None,
        }
    }

    pub fn curve(&self) -> Curve {
        self.public_key.curve
    }

    fn secret(&self) -> Result<&EcPrivateKey, Error> {
        self.secret_key
            .as_ref()
            .ok_or_else(|| Error::invalid_key("private key required"))
    }
}

impl KeyMaterial for EcKeyPair {
    /// Uncompressed SEC 1 encoding `0x04 || x || y`.
    fn public_key_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = vec![0x04];
        bytes.extend(self.public_key.x_bytes()?);
        bytes.extend(self.public_key.y_bytes()?);
        Ok(bytes)
    }

    fn private_key_bytes(&self) -> Result<Vec<u8>, Error> {
        self.secret()?.to_bytes()
    }
}

impl CoreSign for EcKeyPair {
    /// ECDSA with the digest paired with the curve.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let secret = self.secret()?;
        let digest = self.curve().hash().digest(payload);
        ecdsa::sign(self.curve(), &secret.d, &digest)
    }

    fn verify(&self, payload: &[u8], signature: &[u8]) -> Result<(), Error> {
        let digest = self.curve().hash().digest(payload);
        ecdsa::verify(self.curve(), &self.public_key.point, &digest, signature)
    }
}

impl ECDH for EcKeyPair {
    type PublicKey = EcPublicKey;

    /// Returns the `x` coordinate of `d * Q`.
    ///
    /// The peer point is validated against the curve equation before the multiplication.
    fn key_exchange(&self, their_public: &EcPublicKey) -> Result<Vec<u8>, Error> {
        if their_public.curve != self.curve() {
            return Err(Error::invalid_key("peer key is on a different curve"));
        }
        let params = self.curve().params();
        if !params.contains(&their_public.point) {
            return Err(Error::invalid_key("peer point is not on the curve"));
        }
        let secret = self.secret()?;
        if secret.d.is_zero() {
            return Err(Error::invalid_key("zero private scalar"));
        }

        let shared = params.mul(&secret.d, &their_public.point)?;
        match shared.x() {
            Some(x) => x.to_bytes(self.curve().coordinate_len()),
            None => Err(Error::invalid_key("shared point is at infinity")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Curve; 3] = [Curve::P256, Curve::P384, Curve::P521];

    #[test]
    fn test_ecdh_shared_secret_is_symmetric() {
        for curve in CURVES {
            let alice = EcKeyPair::generate(curve).unwrap();
            let bob = EcKeyPair::generate(curve).unwrap();

            let ab = alice.key_exchange(&bob.public_key).unwrap();
            let ba = bob.key_exchange(&alice.public_key).unwrap();
            assert_eq!(ab, ba);
            assert_eq!(ab.len(), curve.coordinate_len());
        }
    }

    #[test]
    fn test_ecdh_rejects_other_curve() {
        let alice = EcKeyPair::generate(Curve::P256).unwrap();
        let bob = EcKeyPair::generate(Curve::P384).unwrap();
        assert!(matches!(alice.key_exchange(&bob.public_key), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_ecdsa_sign_and_verify() {
        for curve in CURVES {
            let keypair = EcKeyPair::generate(curve).unwrap();
            let message = b"Hello, World!";

            let signature = keypair.sign(message).unwrap();
            assert_eq!(signature.len(), 2 * curve.coordinate_len());
            assert!(keypair.verify(message, &signature).is_ok());
            assert_eq!(keypair.verify(b"Hello, World?", &signature), Err(Error::Verification));

            let mut tampered = signature.clone();
            tampered[3] ^= 0x01;
            assert_eq!(keypair.verify(message, &tampered), Err(Error::Verification));
            assert_eq!(keypair.verify(message, &signature[1..]), Err(Error::Verification));
        }
    }

    #[test]
    fn test_verify_with_public_key_only() {
        let keypair = EcKeyPair::generate(Curve::P256).unwrap();
        let signature = keypair.sign(b"payload").unwrap();

        let public = EcKeyPair::from_public_key(keypair.public_key.clone());
        assert!(public.verify(b"payload", &signature).is_ok());
        assert!(matches!(public.sign(b"payload"), Err(Error::InvalidKey(_))));
    }

    #[test]
    fn test_private_key_round_trip() {
        let keypair = EcKeyPair::generate(Curve::P521).unwrap();
        let d = keypair.private_key_bytes().unwrap();
        assert_eq!(d.len(), 66);

        let restored = EcKeyPair::from_private_key(EcPrivateKey::from_bytes(Curve::P521, &d).unwrap()).unwrap();
        assert_eq!(restored.public_key, keypair.public_key);
    }

    #[test]
    fn test_private_scalar_range() {
        assert!(EcPrivateKey::from_bytes(Curve::P256, &[0u8; 32]).is_err());
        assert!(EcPrivateKey::from_bytes(Curve::P256, &[0xffu8; 32]).is_err());
        assert!(EcPrivateKey::from_bytes(Curve::P256, &[1u8; 31]).is_err());
    }

    #[test]
    fn test_public_key_rejects_invalid_curve_point() {
        let keypair = EcKeyPair::generate(Curve::P256).unwrap();
        let x = keypair.public_key.x_bytes().unwrap();
        let mut y = keypair.public_key.y_bytes().unwrap();
        y[31] ^= 0x01;
        assert!(matches!(
            EcPublicKey::from_coordinates(Curve::P256, &x, &y),
            Err(Error::InvalidKey(_))
        ));
    }

    #[test]
    fn test_public_key_bytes_are_uncompressed() {
        let keypair = EcKeyPair::generate(Curve::P384).unwrap();
        let bytes = keypair.public_key_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 2 * 48);
        assert_eq!(bytes[0], 0x04);
    }
}
