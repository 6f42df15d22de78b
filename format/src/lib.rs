//! Lossless conversion between wire transactions, a flat structural model,
//! and JSON.
//!
//! The JSON and model surfaces discard nothing the wire carries, so
//! `transaction_from_json(to_json(tx))` and
//! `transaction_from_model(to_model(tx))` reproduce `tx.data` byte for
//! byte, for every format version.

pub mod formatter;
mod json;
pub mod model;

pub use formatter::{
    to_json, to_json_layout, to_model, transaction_from_json, transaction_from_model,
};
pub use model::{ChallengeModel, PayloadModel, TransactionModel, WalletModel};
