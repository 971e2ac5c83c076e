//! Arbitrary precision non-negative integers.
//!
//! [`BigInteger`] is an immutable value: every operation returns a new
//! integer. It is the foundation of the RSA and elliptic-curve engines.

use std::fmt;
use std::ops::{Add, Mul, Rem};

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::{errors::Error, utils::random_bytes};

/// Small primes used to discard most composite candidates before Miller-Rabin.
const SMALL_PRIMES: [u32; 54] = [
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97, 101, 103, 107, 109,
    113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257,
];

/// An immutable arbitrary precision non-negative integer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BigInteger(BigUint);

impl BigInteger {
    /// The integer `0`.
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// The integer `1`.
    pub fn one() -> Self {
        Self(BigUint::one())
    }

    /// Parse a big-endian byte string. Leading zero bytes are ignored.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        Self(BigUint::from_bytes_be(bytes))
    }

    /// Parse a hexadecimal string, used for curve constants.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        BigUint::parse_bytes(hex.as_bytes(), 16)
            .map(Self)
            .ok_or_else(|| Error::Encoding(format!("invalid hexadecimal integer: {hex}")))
    }

    /// Minimal big-endian encoding. Zero encodes as a single `0x00` byte.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        self.0.to_bytes_be()
    }

    /// Big-endian encoding left padded with zeros to exactly `length` bytes.
    ///
    /// Fails with `Error::Encoding` if the value does not fit; it is never truncated.
    pub fn to_bytes(&self, length: usize) -> Result<Vec<u8>, Error> {
        let bytes = if self.is_zero() { Vec::new() } else { self.0.to_bytes_be() };
        if bytes.len() > length {
            return Err(Error::Encoding(format!(
                "integer needs {} bytes but only {length} are available",
                bytes.len()
            )));
        }
        let mut out = vec![0u8; length - bytes.len()];
        out.extend_from_slice(&bytes);
        Ok(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn is_odd(&self) -> bool {
        self.0.is_odd()
    }

    /// Number of significant bits.
    pub fn bits(&self) -> usize {
        self.0.bits() as usize
    }

    /// Number of bytes needed to hold [`Self::bits`].
    pub fn byte_len(&self) -> usize {
        self.bits().div_ceil(8)
    }

    /// Value of bit `index`, counting from the least significant bit.
    pub fn bit(&self, index: usize) -> bool {
        self.0.bit(index as u64)
    }

    pub fn add(&self, other: &Self) -> Self {
        Self(&self.0 + &other.0)
    }

    /// Subtraction; a negative result is an arithmetic error.
    pub fn sub(&self, other: &Self) -> Result<Self, Error> {
        if other.0 > self.0 {
            return Err(Error::Arithmetic("subtraction result would be negative"));
        }
        Ok(Self(&self.0 - &other.0))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self(&self.0 * &other.0)
    }

    /// Right shift by `bits` positions.
    pub fn shr(&self, bits: usize) -> Self {
        Self(&self.0 >> bits)
    }

    /// Quotient and remainder. Division by zero is an arithmetic error.
    pub fn div_rem(&self, divisor: &Self) -> Result<(Self, Self), Error> {
        if divisor.is_zero() {
            return Err(Error::Arithmetic("division by zero"));
        }
        let (q, r) = self.0.div_rem(&divisor.0);
        Ok((Self(q), Self(r)))
    }

    /// `self mod modulus`.
    pub fn modulo(&self, modulus: &Self) -> Result<Self, Error> {
        if modulus.is_zero() {
            return Err(Error::Arithmetic("zero modulus"));
        }
        Ok(Self(&self.0 % &modulus.0))
    }

    /// `(self + other) mod modulus`.
    pub fn mod_add(&self, other: &Self, modulus: &Self) -> Result<Self, Error> {
        self.add(other).modulo(modulus)
    }

    /// `(self - other) mod modulus`, always in `[0, modulus)`.
    pub fn mod_sub(&self, other: &Self, modulus: &Self) -> Result<Self, Error> {
        let a = self.modulo(modulus)?;
        let b = other.modulo(modulus)?;
        if a >= b {
            Ok(Self(a.0 - b.0))
        } else {
            Ok(Self(&modulus.0 - b.0 + a.0))
        }
    }

    /// `(self * other) mod modulus`.
    pub fn mod_mul(&self, other: &Self, modulus: &Self) -> Result<Self, Error> {
        self.mul(other).modulo(modulus)
    }

    /// `self ^ exponent mod modulus`.
    pub fn mod_pow(&self, exponent: &Self, modulus: &Self) -> Result<Self, Error> {
        if modulus.is_zero() {
            return Err(Error::Arithmetic("zero modulus"));
        }
        Ok(Self(self.0.modpow(&exponent.0, &modulus.0)))
    }

    /// Multiplicative inverse modulo `modulus`.
    ///
    /// Fails when the modulus is zero or when no inverse exists.
    pub fn mod_inverse(&self, modulus: &Self) -> Result<Self, Error> {
        if modulus.is_zero() {
            return Err(Error::Arithmetic("zero modulus"));
        }
        self.0
            .modinv(&modulus.0)
            .map(Self)
            .ok_or(Error::Arithmetic("value is not invertible for this modulus"))
    }

    pub fn gcd(&self, other: &Self) -> Self {
        Self(self.0.gcd(&other.0))
    }

    pub fn lcm(&self, other: &Self) -> Self {
        Self(self.0.lcm(&other.0))
    }

    /// Uniformly random integer in `[0, limit)`, drawn by rejection sampling.
    pub fn random_below(limit: &Self) -> Result<Self, Error> {
        if limit.is_zero() {
            return Err(Error::Arithmetic("empty range"));
        }
        let bits = limit.bits();
        let len = bits.div_ceil(8);
        let excess = len * 8 - bits;
        loop {
            let mut bytes = random_bytes(len)?;
            if let Some(first) = bytes.first_mut() {
                *first &= 0xff >> excess;
            }
            let candidate = Self::from_bytes_be(&bytes);
            if candidate < *limit {
                return Ok(candidate);
            }
        }
    }

    /// Uniformly random integer in `[low, high)`.
    pub fn random_range(low: &Self, high: &Self) -> Result<Self, Error> {
        let span = high.sub(low)?;
        Ok(Self::random_below(&span)?.add(low))
    }

    /// Random odd integer of exactly `bits` bits with the two top bits set.
    ///
    /// Setting both top bits keeps the product of two such values at `2 * bits` bits.
    pub(crate) fn random_odd_with_top_bits(bits: usize) -> Result<Self, Error> {
        if bits < 2 {
            return Err(Error::Arithmetic("too few bits requested"));
        }
        let len = bits.div_ceil(8);
        let excess = len * 8 - bits;
        let mut bytes = random_bytes(len)?;
        bytes[0] &= 0xff >> excess;
        let top = 7 - excess;
        bytes[0] |= 1 << top;
        if top == 0 {
            bytes[1] |= 0x80;
        } else {
            bytes[0] |= 1 << (top - 1);
        }
        bytes[len - 1] |= 1;
        Ok(Self::from_bytes_be(&bytes))
    }

    /// Miller-Rabin probabilistic primality test with `rounds` random bases,
    /// preceded by trial division against small primes.
    pub fn is_probable_prime(&self, rounds: usize) -> Result<bool, Error> {
        let two = BigUint::from(2u32);
        if self.0 < two {
            return Ok(false);
        }
        if self.0 == two {
            return Ok(true);
        }
        if self.0.is_even() {
            return Ok(false);
        }
        for p in SMALL_PRIMES {
            let p = BigUint::from(p);
            if self.0 == p {
                return Ok(true);
            }
            if (&self.0 % &p).is_zero() {
                return Ok(false);
            }
        }

        let n_minus_one = &self.0 - 1u32;
        let mut d = n_minus_one.clone();
        let mut s = 0usize;
        while d.is_even() {
            d >>= 1;
            s += 1;
        }

        // bases are drawn from [2, n - 2]
        let low = Self(two.clone());
        let high = Self(&self.0 - 1u32);
        'witness: for _ in 0..rounds {
            let a = Self::random_range(&low, &high)?;
            let mut x = a.0.modpow(&d, &self.0);
            if x.is_one() || x == n_minus_one {
                continue;
            }
            for _ in 1..s {
                x = x.modpow(&two, &self.0);
                if x == n_minus_one {
                    continue 'witness;
                }
            }
            return Ok(false);
        }
        Ok(true)
    }

    /// Generate a random probable prime of exactly `bits` bits.
    pub fn generate_prime(bits: usize) -> Result<Self, Error> {
        loop {
            let candidate = Self::random_odd_with_top_bits(bits)?;
            if candidate.is_probable_prime(prime_rounds(bits))? {
                return Ok(candidate);
            }
        }
    }

    pub(crate) fn as_biguint(&self) -> &BigUint {
        &self.0
    }
}

// Rounds giving an error probability below 2^-100 for random candidates
// (FIPS 186-5, table B.1).
fn prime_rounds(bits: usize) -> usize {
    match bits {
        0..=512 => 8,
        513..=1024 => 5,
        1025..=1536 => 4,
        _ => 3,
    }
}

impl From<u32> for BigInteger {
    fn from(value: u32) -> Self {
        Self(BigUint::from(value))
    }
}

impl From<BigUint> for BigInteger {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl fmt::Debug for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInteger(0x{:x})", self.0)
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for &BigInteger {
    type Output = BigInteger;

    fn add(self, rhs: Self) -> BigInteger {
        BigInteger::add(self, rhs)
    }
}

impl Mul for &BigInteger {
    type Output = BigInteger;

    fn mul(self, rhs: Self) -> BigInteger {
        BigInteger::mul(self, rhs)
    }
}

/// Reduction by a modulus known to be non-zero. Panics on a zero modulus like
/// the primitive integer types do; use [`BigInteger::modulo`] for untrusted values.
impl Rem for &BigInteger {
    type Output = BigInteger;

    fn rem(self, rhs: Self) -> BigInteger {
        BigInteger(&self.0 % &rhs.0)
    }
}
