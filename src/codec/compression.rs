use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

use crate::constants::GZIP_MAGIC;
use crate::error::{Result, RgisfError};

/// Inflate a compressed container. Zlib streams are the norm, gzip is
/// recognised by its magic bytes.
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    let res = if data.starts_with(&GZIP_MAGIC) {
        GzDecoder::new(data).read_to_end(&mut decompressed)
    } else {
        ZlibDecoder::new(data).read_to_end(&mut decompressed)
    };
    res.map_err(|e| RgisfError::Decompression(e.to_string()))?;
    Ok(decompressed)
}

pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
