//! Per-payload build options.

use crate::algorithms::{CompressionAlgorithm, EncryptionAlgorithm, HashAlgorithm};
use serde::{Deserialize, Serialize};

/// Semantic payload-type tag, a 16-bit field of combinable bits.
///
/// Unknown bits are preserved on round trip; the codec never masks values it
/// did not set itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayloadType(u16);

impl PayloadType {
    pub const UNKNOWN: Self = Self(0);
    pub const DOCKET: Self = Self(1);
    pub const TRANSACTION: Self = Self(2);
    pub const REJECTION: Self = Self(4);
    pub const BLUEPRINT: Self = Self(8);
    pub const ACTION: Self = Self(16);
    pub const DOCUMENT: Self = Self(32);
    pub const PRODUCTION: Self = Self(64);
    pub const CHALLENGE: Self = Self(128);
    pub const PARTICIPANT: Self = Self(256);
    pub const GENESYS: Self = Self(512);

    pub fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for PayloadType {
    fn default() -> Self {
        Self::TRANSACTION
    }
}

/// Build-time configuration for a single payload (versions >= 3).
///
/// Earlier versions carry fixed algorithm choices; the resolver in the
/// envelope crate clamps options to what each version can express.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadOptions {
    pub compression: CompressionAlgorithm,
    pub encryption: EncryptionAlgorithm,
    pub hash: HashAlgorithm,
    pub payload_type: PayloadType,
    pub user_tag: u16,
    pub protected: bool,
}

impl PayloadOptions {
    /// Version-4 defaults: Blake2b-256, XChaCha20-Poly1305 when recipients
    /// exist, maximum compression.
    pub fn v4() -> Self {
        Self {
            compression: CompressionAlgorithm::Max,
            encryption: EncryptionAlgorithm::XChaCha20Poly1305,
            hash: HashAlgorithm::Blake2b256,
            payload_type: PayloadType::TRANSACTION,
            user_tag: 0,
            protected: false,
        }
    }

    /// Version-3 defaults. The cipher is fixed for this version; hash and
    /// compression are selectable.
    pub fn v3() -> Self {
        Self {
            compression: CompressionAlgorithm::Balanced,
            encryption: EncryptionAlgorithm::Aes256Gcm,
            hash: HashAlgorithm::Sha256,
            payload_type: PayloadType::TRANSACTION,
            user_tag: 0,
            protected: false,
        }
    }

    /// Versions 1 and 2: SHA-256, fixed cipher, no compression, no tags.
    pub fn legacy() -> Self {
        Self {
            compression: CompressionAlgorithm::None,
            encryption: EncryptionAlgorithm::Aes256Gcm,
            hash: HashAlgorithm::Sha256,
            payload_type: PayloadType::TRANSACTION,
            user_tag: 0,
            protected: false,
        }
    }

    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    pub fn with_encryption(mut self, encryption: EncryptionAlgorithm) -> Self {
        self.encryption = encryption;
        self
    }

    pub fn with_hash(mut self, hash: HashAlgorithm) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_user_tag(mut self, tag: u16) -> Self {
        self.user_tag = tag;
        self
    }

    pub fn protected(mut self) -> Self {
        self.protected = true;
        self
    }
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self::v4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v4_defaults() {
        let opts = PayloadOptions::v4();
        assert_eq!(opts.hash, HashAlgorithm::Blake2b256);
        assert_eq!(opts.encryption, EncryptionAlgorithm::XChaCha20Poly1305);
        assert_eq!(opts.compression, CompressionAlgorithm::Max);
        assert!(!opts.protected);
    }

    #[test]
    fn type_bits_combine() {
        let t = PayloadType::from_bits(
            PayloadType::BLUEPRINT.bits() | PayloadType::ACTION.bits(),
        );
        assert!(t.contains(PayloadType::BLUEPRINT));
        assert!(t.contains(PayloadType::ACTION));
        assert!(!t.contains(PayloadType::GENESYS));
    }

    #[test]
    fn unknown_type_bits_preserved() {
        let t = PayloadType::from_bits(0x8000);
        assert_eq!(t.bits(), 0x8000);
    }
}
