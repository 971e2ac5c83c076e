use crate::{errors::Error, math::BigInteger, AsymmetricKey};

/// The public exponent used for generated keys.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 65537;

/// Smallest modulus accepted for key generation.
const MIN_GENERATED_BITS: usize = 1024;

/// An RSA public key `(n, e)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    n: BigInteger,
    e: BigInteger,
}

/// Chinese Remainder Theorem parameters of a private key.
#[derive(Clone, PartialEq, Eq)]
pub struct CrtParams {
    pub p: BigInteger,
    pub q: BigInteger,
    pub dp: BigInteger,
    pub dq: BigInteger,
    pub qinv: BigInteger,
}

/// An RSA private key. CRT parameters are optional; without them the
/// private operation falls back to a single exponentiation with `d`.
#[derive(Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    public: RsaPublicKey,
    d: BigInteger,
    crt: Option<CrtParams>,
}

/// A wrapper around an RSA key pair.
pub type RsaKeyPair = AsymmetricKey<RsaPublicKey, RsaPrivateKey>;

impl RsaPublicKey {
    pub fn new(n: BigInteger, e: BigInteger) -> Result<Self, Error> {
        if !n.is_odd() || n.bits() < 512 {
            return Err(Error::invalid_key("modulus must be odd and at least 512 bits"));
        }
        if !e.is_odd() || e < BigInteger::from(3u32) || e >= n {
            return Err(Error::invalid_key("invalid public exponent"));
        }
        Ok(Self { n, e })
    }

    pub fn n(&self) -> &BigInteger {
        &self.n
    }

    pub fn e(&self) -> &BigInteger {
        &self.e
    }

    /// Modulus length in bytes.
    pub fn size(&self) -> usize {
        self.n.byte_len()
    }

    /// Modulus length in bits.
    pub fn bits(&self) -> usize {
        self.n.bits()
    }

    /// RSAEP / RSAVP1: `m^e mod n`.
    pub(crate) fn public_op(&self, m: &BigInteger) -> Result<BigInteger, Error> {
        if *m >= self.n {
            return Err(Error::Encoding("representative out of range".into()));
        }
        m.mod_pow(&self.e, &self.n)
    }
}

impl CrtParams {
    pub fn new(p: BigInteger, q: BigInteger, dp: BigInteger, dq: BigInteger, qinv: BigInteger) -> Self {
        Self { p, q, dp, dq, qinv }
    }
}

impl RsaPrivateKey {
    /// Assemble a private key, checking that CRT parameters, if any, match the modulus.
    pub fn new(public: RsaPublicKey, d: BigInteger, crt: Option<CrtParams>) -> Result<Self, Error> {
        if d.is_zero() || d >= public.n {
            return Err(Error::invalid_key("private exponent out of range"));
        }
        if let Some(crt) = &crt {
            if crt.p.mul(&crt.q) != public.n {
                return Err(Error::invalid_key("CRT primes do not match the modulus"));
            }
            if crt.dp >= crt.p || crt.dq >= crt.q || crt.qinv >= crt.p {
                return Err(Error::invalid_key("CRT parameters out of range"));
            }
        }
        Ok(Self { public, d, crt })
    }

    /// Generate a `bits`-bit key with `e = 65537` and full CRT parameters.
    pub fn generate(bits: usize) -> Result<Self, Error> {
        if bits < MIN_GENERATED_BITS || bits % 2 != 0 {
            return Err(Error::invalid_key(format!(
                "key size must be even and at least {MIN_GENERATED_BITS} bits"
            )));
        }
        let e = BigInteger::from(DEFAULT_PUBLIC_EXPONENT);
        let one = BigInteger::one();

        loop {
            let p = BigInteger::generate_prime(bits / 2)?;
            let q = BigInteger::generate_prime(bits / 2)?;
            if p == q {
                continue;
            }
            let p1 = p.sub(&one)?;
            let q1 = q.sub(&one)?;
            if !e.gcd(&p1).is_one() || !e.gcd(&q1).is_one() {
                continue;
            }

            let n = p.mul(&q);
            if n.bits() != bits {
                continue;
            }
            let d = e.mod_inverse(&p1.lcm(&q1))?;
            // keep p > q so qinv is the inverse of the smaller prime
            let (p, q, p1, q1) = if p > q { (p, q, p1, q1) } else { (q, p, q1, p1) };
            let crt = CrtParams {
                dp: d.modulo(&p1)?,
                dq: d.modulo(&q1)?,
                qinv: q.mod_inverse(&p)?,
                p,
                q,
            };
            return Self::new(RsaPublicKey::new(n, e.clone())?, d, Some(crt));
        }
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    pub fn d(&self) -> &BigInteger {
        &self.d
    }

    pub fn crt(&self) -> Option<&CrtParams> {
        self.crt.as_ref()
    }

    /// RSADP / RSASP1: `c^d mod n`, through the CRT when the primes are known.
    pub(crate) fn private_op(&self, c: &BigInteger) -> Result<BigInteger, Error> {
        let n = &self.public.n;
        if c >= n {
            return Err(Error::Encoding("representative out of range".into()));
        }
        match &self.crt {
            Some(crt) => {
                let m1 = c.mod_pow(&crt.dp, &crt.p)?;
                let m2 = c.mod_pow(&crt.dq, &crt.q)?;
                let h = crt.qinv.mod_mul(&m1.mod_sub(&m2, &crt.p)?, &crt.p)?;
                Ok(m2.add(&h.mul(&crt.q)))
            }
            None => c.mod_pow(&self.d, n),
        }
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("public", &self.public)
            .field("crt", &self.crt.is_some())
            .finish_non_exhaustive()
    }
}

impl RsaKeyPair {
    pub fn generate(bits: usize) -> Result<Self, Error> {
        Ok(Self::from_private_key(RsaPrivateKey::generate(bits)?))
    }

    pub fn from_private_key(secret_key: RsaPrivateKey) -> Self {
        Self {
            public_key: secret_key.public.clone(),
            secret_key: Some(secret_key),
        }
    }

    pub fn from_public_key(public_key: RsaPublicKey) -> Self {
        Self {
            public_key,
            secret_key: None,
        }
    }

    /// The private half, or `InvalidKey` for a public-only pair.
    pub fn private_key(&self) -> Result<&RsaPrivateKey, Error> {
        self.secret_key
            .as_ref()
            .ok_or_else(|| Error::invalid_key("private key required"))
    }
}
