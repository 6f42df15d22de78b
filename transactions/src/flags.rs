//! Per-version bit-packed payload flags.
//!
//! Versions 2 and 3 store a 16-bit flag word. Version 4 stores two 32-bit
//! words: a type word `(payload_type << 16) | user_tag` followed by an
//! options word `(flags16 << 16) | (hash << 10) | (encryption << 5) |
//! compression`, each little-endian on the wire. Reading the eight bytes as
//! one little-endian u64 yields the combined model-level flag value.
//! Version 1 stores no flags; the encrypted bit is synthesized from the
//! access list.
//!
//! Reserved bits of the 16-bit word are preserved on round trip; only
//! algorithm ids are range-checked on decode.

use strand_types::{
    CompressionAlgorithm, EncryptionAlgorithm, HashAlgorithm, PayloadOptions, PayloadType, TxError,
};

/// Payload is stored compressed.
pub const FLAG_COMPRESSED: u16 = 0x0001;
/// Payload is stored encrypted.
pub const FLAG_ENCRYPTED: u16 = 0x0002;
/// Payload access lists may not be modified.
pub const FLAG_PROTECTED: u16 = 0x0020;

const ALGO_MASK: u32 = 0x1F;

/// Pack the version-4 options word.
pub fn pack_options(flags16: u16, options: &PayloadOptions) -> u32 {
    ((flags16 as u32) << 16)
        | ((options.hash.id() as u32 & ALGO_MASK) << 10)
        | ((options.encryption.id() as u32 & ALGO_MASK) << 5)
        | (options.compression.id() as u32 & ALGO_MASK)
}

/// Pack the version-4 type word.
pub fn pack_type(options: &PayloadOptions) -> u32 {
    ((options.payload_type.bits() as u32) << 16) | options.user_tag as u32
}

/// Unpack the version-4 options word into its flag bits and algorithms.
pub fn unpack_options(
    word: u32,
) -> Result<(u16, HashAlgorithm, EncryptionAlgorithm, CompressionAlgorithm), TxError> {
    let flags16 = (word >> 16) as u16;
    let hash_id = ((word >> 10) & ALGO_MASK) as u8;
    let enc_id = ((word >> 5) & ALGO_MASK) as u8;
    let comp_id = (word & ALGO_MASK) as u8;
    let hash = HashAlgorithm::from_id(hash_id).ok_or(TxError::UnsupportedAlgorithm(hash_id))?;
    let encryption =
        EncryptionAlgorithm::from_id(enc_id).ok_or(TxError::UnsupportedAlgorithm(enc_id))?;
    let compression =
        CompressionAlgorithm::from_id(comp_id).ok_or(TxError::UnsupportedAlgorithm(comp_id))?;
    Ok((flags16, hash, encryption, compression))
}

/// Unpack the version-4 type word.
pub fn unpack_type(word: u32) -> (PayloadType, u16) {
    (PayloadType::from_bits((word >> 16) as u16), word as u16)
}

/// Combined model-level flag value for version 4.
pub fn combined(type_word: u32, options_word: u32) -> u64 {
    (type_word as u64) | ((options_word as u64) << 32)
}

/// Split a combined model-level flag value back into its two words.
pub fn split_combined(combined: u64) -> (u32, u32) {
    (combined as u32, (combined >> 32) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_roundtrip() {
        for hash in [HashAlgorithm::Sha256, HashAlgorithm::Blake2b512] {
            for enc in [
                EncryptionAlgorithm::None,
                EncryptionAlgorithm::XChaCha20Poly1305,
            ] {
                for comp in [CompressionAlgorithm::None, CompressionAlgorithm::Fast] {
                    for flags16 in [0u16, FLAG_ENCRYPTED | FLAG_COMPRESSED, FLAG_PROTECTED] {
                        let options = PayloadOptions::v4()
                            .with_hash(hash)
                            .with_encryption(enc)
                            .with_compression(comp);
                        let word = pack_options(flags16, &options);
                        let (f, h, e, c) = unpack_options(word).unwrap();
                        assert_eq!((f, h, e, c), (flags16, hash, enc, comp));
                    }
                }
            }
        }
    }

    #[test]
    fn type_word_roundtrip() {
        let options = PayloadOptions::v4().with_user_tag(0xBEEF);
        let word = pack_type(&options);
        let (ptype, user) = unpack_type(word);
        assert_eq!(ptype, PayloadType::TRANSACTION);
        assert_eq!(user, 0xBEEF);
    }

    #[test]
    fn default_v4_combined_value() {
        // Blake2b-256 (3) << 10, XChaCha20-Poly1305 (6) << 5, compression
        // None, type Transaction: the fixture literal.
        let options = PayloadOptions::v4().with_compression(CompressionAlgorithm::None);
        let value = combined(pack_type(&options), pack_options(0, &options));
        assert_eq!(value, 0x0000_0cc0_0002_0000);
    }

    #[test]
    fn out_of_range_algorithm_rejected() {
        // Hash id 31 is unassigned.
        let word = (31u32) << 10 | (EncryptionAlgorithm::None.id() as u32) << 5;
        assert_eq!(unpack_options(word), Err(TxError::UnsupportedAlgorithm(31)));
    }

    #[test]
    fn reserved_flag_bits_preserved() {
        let options = PayloadOptions::v4();
        let word = pack_options(0x4000, &options);
        let (flags16, _, _, _) = unpack_options(word).unwrap();
        assert_eq!(flags16, 0x4000);
    }

    #[test]
    fn combined_split_inverse() {
        let (t, o) = split_combined(0x0000_0cc0_0002_0000);
        assert_eq!(t, 0x0002_0000);
        assert_eq!(o, 0x0000_0cc0);
        assert_eq!(combined(t, o), 0x0000_0cc0_0002_0000);
    }
}
