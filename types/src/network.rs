//! Wallet network discriminants.
//!
//! Every wallet address embeds a network byte identifying the signature
//! algorithm family its keys belong to. The discriminant travels on the wire
//! in version-4 records and inside the bech32m address data in every version.

use serde::{Deserialize, Serialize};

/// Signature-algorithm family a wallet's keys belong to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WalletNetwork {
    Ed25519 = 0x12,
    Rsa4096 = 0x17,
    NistP256 = 0x18,
}

impl WalletNetwork {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0x12 => Some(WalletNetwork::Ed25519),
            0x17 => Some(WalletNetwork::Rsa4096),
            0x18 => Some(WalletNetwork::NistP256),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Fixed public key length on the wire, where one exists.
    ///
    /// RSA public keys are variable-length PKCS#1 DER and have no fixed size.
    pub fn public_key_len(self) -> Option<usize> {
        match self {
            WalletNetwork::Ed25519 => Some(32),
            WalletNetwork::NistP256 => Some(65),
            WalletNetwork::Rsa4096 => None,
        }
    }

    /// Detached signature length produced by this family.
    pub fn signature_len(self) -> usize {
        match self {
            WalletNetwork::Ed25519 => 64,
            WalletNetwork::NistP256 => 64,
            WalletNetwork::Rsa4096 => 512,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_roundtrip() {
        for n in [
            WalletNetwork::Ed25519,
            WalletNetwork::Rsa4096,
            WalletNetwork::NistP256,
        ] {
            assert_eq!(WalletNetwork::from_id(n.id()), Some(n));
        }
    }

    #[test]
    fn unknown_id_rejected() {
        assert_eq!(WalletNetwork::from_id(0x00), None);
        assert_eq!(WalletNetwork::from_id(0xFF), None);
    }
}
