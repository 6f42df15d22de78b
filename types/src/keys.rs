//! Key material types, tagged with their wallet network.
//!
//! Key byte forms per network: Ed25519 public keys are raw 32 bytes and
//! private keys the 32-byte seed; NIST P-256 public keys are SEC1
//! uncompressed points and private keys the raw scalar; RSA-4096 keys are
//! PKCS#1 DER in both forms.

use crate::network::WalletNetwork;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A public key together with the network it belongs to.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicKey {
    pub network: WalletNetwork,
    pub bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(network: WalletNetwork, bytes: Vec<u8>) -> Self {
        Self { network, bytes }
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({:?}, {} bytes)", self.network, self.bytes.len())
    }
}

/// A private key; zeroed on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    #[zeroize(skip)]
    pub network: WalletNetwork,
    pub bytes: Vec<u8>,
}

impl PrivateKey {
    pub fn new(network: WalletNetwork, bytes: Vec<u8>) -> Self {
        Self { network, bytes }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey({:?}, redacted)", self.network)
    }
}

/// A matched public/private pair.
#[derive(Clone)]
pub struct KeyPair {
    pub public: PublicKey,
    pub private: PrivateKey,
}
