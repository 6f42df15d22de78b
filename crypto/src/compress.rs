//! Payload compression: DEFLATE inside a magic-prefixed container.
//!
//! Data below a size floor, data carrying a known compressed-format
//! signature, and data that does not actually shrink are all stored
//! uncompressed; the caller learns this from the `None` return and leaves
//! the compressed flag clear.

use flate2::write::{DeflateDecoder, DeflateEncoder};
use flate2::Compression;
use std::io::Write;
use strand_types::{CompressionAlgorithm, TxError};

/// Container magic preceding every DEFLATE stream.
pub const MAGIC: [u8; 4] = [0x57, 0x4C, 0x44, 0x01];

/// Inputs shorter than this are never compressed.
const MIN_COMPRESS_LEN: usize = 256;

/// Leading signatures of formats that are already compressed.
const COMPRESSED_SIGNATURES: &[&[u8]] = &[
    &[0x1F, 0x8B],                         // gzip
    &[0x50, 0x4B, 0x03, 0x04],             // zip
    &[0x52, 0x61, 0x72, 0x21],             // rar
    &[0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], // 7z
    &[0xFD, 0x37, 0x7A, 0x58, 0x5A],       // xz
    &[0x89, 0x50, 0x4E, 0x47],             // png
    &[0x47, 0x49, 0x46, 0x38],             // gif
    &[0xFF, 0xD8, 0xFF],                   // jpeg
    &[0x49, 0x44, 0x33],                   // mp3 (ID3)
    &[0xFF, 0xFB],                         // mp3 (bare frame)
    &[0x4F, 0x67, 0x67, 0x53],             // ogg
    &[0x25, 0x50, 0x44, 0x46],             // pdf
];

fn is_stored_compressed(data: &[u8]) -> bool {
    COMPRESSED_SIGNATURES
        .iter()
        .any(|sig| data.starts_with(sig))
}

fn level(algorithm: CompressionAlgorithm) -> Compression {
    match algorithm {
        CompressionAlgorithm::None => Compression::none(),
        CompressionAlgorithm::Fast => Compression::fast(),
        CompressionAlgorithm::Balanced => Compression::new(6),
        CompressionAlgorithm::Max => Compression::best(),
    }
}

/// Compress `data`, returning `None` when the data should be stored as-is.
pub fn compress(algorithm: CompressionAlgorithm, data: &[u8]) -> Option<Vec<u8>> {
    if algorithm == CompressionAlgorithm::None
        || data.len() < MIN_COMPRESS_LEN
        || is_stored_compressed(data)
    {
        return None;
    }
    let mut encoder = DeflateEncoder::new(Vec::from(MAGIC), level(algorithm));
    encoder.write_all(data).ok()?;
    let compressed = encoder.finish().ok()?;
    // Keep the smaller representation only.
    if compressed.len() >= data.len() {
        return None;
    }
    Some(compressed)
}

/// Reverse [`compress`]; the input must carry the container magic.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, TxError> {
    if !data.starts_with(&MAGIC) {
        return Err(TxError::malformed("missing compression magic"));
    }
    let mut decoder = DeflateDecoder::new(Vec::new());
    decoder
        .write_all(&data[MAGIC.len()..])
        .map_err(|_| TxError::malformed("corrupt deflate stream"))?;
    decoder
        .finish()
        .map_err(|_| TxError::malformed("corrupt deflate stream"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_compressible_data() {
        let data = vec![0x41u8; 4096];
        let compressed = compress(CompressionAlgorithm::Max, &data).unwrap();
        assert!(compressed.starts_with(&MAGIC));
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn short_input_not_compressed() {
        assert!(compress(CompressionAlgorithm::Max, &[0u8; 255]).is_none());
    }

    #[test]
    fn none_class_not_compressed() {
        assert!(compress(CompressionAlgorithm::None, &[0u8; 4096]).is_none());
    }

    #[test]
    fn known_signatures_skipped() {
        let mut png = vec![0x89, 0x50, 0x4E, 0x47];
        png.extend_from_slice(&[0u8; 512]);
        assert!(compress(CompressionAlgorithm::Max, &png).is_none());
    }

    #[test]
    fn incompressible_data_skipped() {
        // High-entropy input: deflate cannot shrink it.
        let data: Vec<u8> = (0..4096u32)
            .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
            .collect();
        assert!(compress(CompressionAlgorithm::Fast, &data).is_none());
    }

    #[test]
    fn missing_magic_rejected() {
        assert!(decompress(&[0u8; 16]).is_err());
    }

    #[test]
    fn all_levels_roundtrip() {
        let data = b"strand ".repeat(200);
        for alg in [
            CompressionAlgorithm::Fast,
            CompressionAlgorithm::Balanced,
            CompressionAlgorithm::Max,
        ] {
            let compressed = compress(alg, &data).unwrap();
            assert_eq!(decompress(&compressed).unwrap(), data);
        }
    }
}
