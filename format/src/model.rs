//! Flat structural model of a transaction.
//!
//! The model is version-independent: every field a wire version can carry
//! has a canonical slot, and fields a version cannot express are simply
//! absent. Payload attributes are held as the canonical combined flag word
//! so no version-specific packing leaks into the model.

use serde::{Deserialize, Serialize};
use strand_crypto::{decode_address, derive_address};
use strand_types::{PublicKey, TxError, TxHash, WalletAddress, WalletNetwork};

/// A wallet as carried by the model: network family plus raw public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletModel {
    pub network: u8,
    pub public_key: Vec<u8>,
}

impl WalletModel {
    pub fn from_key(key: &PublicKey) -> Self {
        Self {
            network: key.network.id(),
            public_key: key.bytes.clone(),
        }
    }

    pub fn to_key(&self) -> Result<PublicKey, TxError> {
        let network = WalletNetwork::from_id(self.network)
            .ok_or(TxError::UnsupportedAlgorithm(self.network))?;
        Ok(PublicKey::new(network, self.public_key.clone()))
    }

    pub fn address(&self) -> Result<WalletAddress, TxError> {
        Ok(derive_address(&self.to_key()?))
    }

    pub fn from_address(address: &WalletAddress) -> Result<Self, TxError> {
        Ok(Self::from_key(&decode_address(address.as_str())?))
    }
}

/// One recipient's wrapped content key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeModel {
    pub wallet: WalletModel,
    pub challenge: Vec<u8>,
}

/// One payload, flattened.
///
/// `challenges` distinguishes three states: `None` when the payload was
/// never encrypted, `Some(vec![])` for a redaction tombstone, and a
/// populated list otherwise. `iv` follows the same rule where the wire
/// version stores one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadModel {
    pub size: u64,
    /// Canonical combined flag word: type word in the low half, options
    /// word (16-bit flags, hash/encryption/compression ids) in the high.
    pub flags: u64,
    pub hash: Vec<u8>,
    pub iv: Option<Vec<u8>>,
    pub challenges: Option<Vec<ChallengeModel>>,
    pub data: Vec<u8>,
}

/// The whole transaction, flattened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionModel {
    pub version: u32,
    pub tx_id: Option<TxHash>,
    pub prev_tx_id: Option<TxHash>,
    pub sender: Option<WalletModel>,
    pub recipients: Vec<WalletModel>,
    pub timestamp: Option<u64>,
    pub metadata: Option<String>,
    pub signature: Option<Vec<u8>>,
    pub payload_count: u64,
    pub payloads: Vec<PayloadModel>,
}

impl TransactionModel {
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}
