//! Algorithm identifiers carried inside bit-packed payload flags.
//!
//! The numeric ids are wire values; they must not change. Each enum decodes
//! with `from_id`, which rejects out-of-range values rather than defaulting.

use serde::{Deserialize, Serialize};

/// Payload digest algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HashAlgorithm {
    Sha256 = 0,
    Sha384 = 1,
    Sha512 = 2,
    Blake2b256 = 3,
    Blake2b512 = 4,
}

impl HashAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(HashAlgorithm::Sha256),
            1 => Some(HashAlgorithm::Sha384),
            2 => Some(HashAlgorithm::Sha512),
            3 => Some(HashAlgorithm::Blake2b256),
            4 => Some(HashAlgorithm::Blake2b512),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn digest_len(self) -> usize {
        match self {
            HashAlgorithm::Sha256 | HashAlgorithm::Blake2b256 => 32,
            HashAlgorithm::Sha384 => 48,
            HashAlgorithm::Sha512 | HashAlgorithm::Blake2b512 => 64,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha384 => "SHA-384",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Blake2b256 => "Blake2b-256",
            HashAlgorithm::Blake2b512 => "Blake2b-512",
        }
    }
}

/// Payload content cipher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EncryptionAlgorithm {
    None = 1,
    Aes128Cbc = 2,
    Aes256Cbc = 3,
    Aes256Gcm = 4,
    ChaCha20Poly1305 = 5,
    XChaCha20Poly1305 = 6,
}

impl EncryptionAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(EncryptionAlgorithm::None),
            2 => Some(EncryptionAlgorithm::Aes128Cbc),
            3 => Some(EncryptionAlgorithm::Aes256Cbc),
            4 => Some(EncryptionAlgorithm::Aes256Gcm),
            5 => Some(EncryptionAlgorithm::ChaCha20Poly1305),
            6 => Some(EncryptionAlgorithm::XChaCha20Poly1305),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn key_len(self) -> usize {
        match self {
            EncryptionAlgorithm::None => 0,
            EncryptionAlgorithm::Aes128Cbc => 16,
            _ => 32,
        }
    }

    pub fn iv_len(self) -> usize {
        match self {
            EncryptionAlgorithm::None => 0,
            EncryptionAlgorithm::Aes128Cbc | EncryptionAlgorithm::Aes256Cbc => 16,
            EncryptionAlgorithm::Aes256Gcm | EncryptionAlgorithm::ChaCha20Poly1305 => 12,
            EncryptionAlgorithm::XChaCha20Poly1305 => 24,
        }
    }
}

/// Payload compression class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CompressionAlgorithm {
    None = 0,
    Max = 1,
    Balanced = 2,
    Fast = 3,
}

impl CompressionAlgorithm {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(CompressionAlgorithm::None),
            1 => Some(CompressionAlgorithm::Max),
            2 => Some(CompressionAlgorithm::Balanced),
            3 => Some(CompressionAlgorithm::Fast),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ids_roundtrip() {
        for id in 0..=4 {
            assert_eq!(HashAlgorithm::from_id(id).unwrap().id(), id);
        }
        assert!(HashAlgorithm::from_id(5).is_none());
    }

    #[test]
    fn encryption_ids_roundtrip() {
        for id in 1..=6 {
            assert_eq!(EncryptionAlgorithm::from_id(id).unwrap().id(), id);
        }
        assert!(EncryptionAlgorithm::from_id(0).is_none());
        assert!(EncryptionAlgorithm::from_id(7).is_none());
    }

    #[test]
    fn compression_ids_roundtrip() {
        for id in 0..=3 {
            assert_eq!(CompressionAlgorithm::from_id(id).unwrap().id(), id);
        }
        assert!(CompressionAlgorithm::from_id(4).is_none());
    }

    #[test]
    fn digest_lengths() {
        assert_eq!(HashAlgorithm::Sha256.digest_len(), 32);
        assert_eq!(HashAlgorithm::Sha384.digest_len(), 48);
        assert_eq!(HashAlgorithm::Blake2b512.digest_len(), 64);
    }

    #[test]
    fn iv_lengths() {
        assert_eq!(EncryptionAlgorithm::Aes256Cbc.iv_len(), 16);
        assert_eq!(EncryptionAlgorithm::XChaCha20Poly1305.iv_len(), 24);
        assert_eq!(EncryptionAlgorithm::None.iv_len(), 0);
    }
}
