use std::io::{Read, Write};

use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compression};

use super::{Algorithm, CompressionAlgorithm};
use crate::error::JoseError;

/// Raw DEFLATE (RFC 1951), registered as `DEF`.
#[derive(Debug, Clone, Copy)]
pub struct Deflate;

impl Algorithm for Deflate {
    fn name(&self) -> &'static str {
        "DEF"
    }

    fn allowed_key_types(&self) -> &'static [&'static str] {
        &[]
    }
}

impl CompressionAlgorithm for Deflate {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>, JoseError> {
        let failed = |e: std::io::Error| JoseError::invalid_input(format!("compression failed: {e}"));
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).map_err(failed)?;
        encoder.finish().map_err(failed)
    }

    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>, JoseError> {
        let mut out = Vec::new();
        DeflateDecoder::new(data)
            .read_to_end(&mut out)
            .map_err(|_| JoseError::Decryption)?;
        Ok(out)
    }
}
