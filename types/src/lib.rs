//! Fundamental types for the Strand transaction envelope codec.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: errors, hashes, wallet addresses and networks, algorithm
//! identifiers, and per-payload build options.

pub mod address;
pub mod algorithms;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod options;

pub use address::WalletAddress;
pub use algorithms::{CompressionAlgorithm, EncryptionAlgorithm, HashAlgorithm};
pub use error::TxError;
pub use hash::TxHash;
pub use keys::{KeyPair, PrivateKey, PublicKey};
pub use network::WalletNetwork;
pub use options::{PayloadOptions, PayloadType};
