//! Versioned transaction envelope: flag packing, payload encryption,
//! version-dispatched building/parsing, and signing.
//!
//! A [`TxBuilder`] is a mutable arena: payloads are added (each immediately
//! compressed, hashed, and encrypted), recipients/metadata/chain-link set,
//! the record optionally signed, and finally frozen into an immutable
//! [`Transaction`] snapshot via [`TxBuilder::to_transport`]. Parsing wire
//! bytes yields an equivalent, independent builder.

pub mod builder;
pub mod flags;
pub mod manager;
pub mod payload;
pub mod transaction;
pub mod varint;

pub use builder::{TxBuilder, TxVersion};
pub use manager::{PayloadInfo, PayloadManager};
pub use payload::{AccessEntry, Payload};
pub use transaction::Transaction;
