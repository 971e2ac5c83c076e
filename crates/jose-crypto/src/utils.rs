use subtle::ConstantTimeEq;

use super::{errors::Error, traits::BYTES_LENGTH_32};

/// Fill a fresh buffer of `len` bytes from the operating system random source.
pub fn random_bytes(len: usize) -> Result<Vec<u8>, Error> {
    let mut buf = vec![0u8; len];
    getrandom::getrandom(&mut buf).map_err(|_| Error::Rng)?;
    Ok(buf)
}

/// Compare two byte strings without branching on their content.
///
/// Only the lengths are compared in variable time.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

// Generate a seed from an optional initial seed.
// If the initial seed is empty or invalid, generate a random seed.
pub(crate) fn generate_seed(initial_seed: &[u8]) -> Result<[u8; BYTES_LENGTH_32], Error> {
    let mut seed = [0u8; BYTES_LENGTH_32];
    if initial_seed.len() != BYTES_LENGTH_32 {
        getrandom::getrandom(&mut seed).map_err(|_| Error::Rng)?;
    } else {
        seed.copy_from_slice(initial_seed);
    }
    Ok(seed)
}

// Copy a slice into a 32-byte array.
pub(crate) fn slice_to_array(slice: &[u8]) -> Result<[u8; BYTES_LENGTH_32], Error> {
    slice
        .try_into()
        .map_err(|_| Error::invalid_key(format!("expected {BYTES_LENGTH_32} bytes, got {}", slice.len())))
}
