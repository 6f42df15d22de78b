//! Immutable transaction snapshot.

use serde::{Deserialize, Serialize};
use strand_types::TxHash;

/// A frozen, fully-serialized transaction.
///
/// Produced by `TxBuilder::to_transport`; shares no state with the builder
/// that made it. `tx_id` is present only once the transaction is signed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub version: u32,
    pub tx_id: Option<TxHash>,
    pub register_id: Option<String>,
    pub data: Vec<u8>,
}

impl Transaction {
    pub fn is_signed(&self) -> bool {
        self.tx_id.is_some()
    }
}
