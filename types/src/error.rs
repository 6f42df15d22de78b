//! Top-level error type shared across crates.

use thiserror::Error;

/// Common error type for the Strand envelope codec.
///
/// Builder and envelope operations return these as statuses rather than
/// panicking, so callers can batch setup calls and check each result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("no transaction supplied")]
    NoTransaction,

    #[error("unsupported transaction version {0}")]
    UnsupportedVersion(u32),

    #[error("operation not supported by version {0}")]
    NotSupported(u32),

    #[error("malformed transaction: {0}")]
    Malformed(String),

    #[error("unsupported algorithm id {0}")]
    UnsupportedAlgorithm(u8),

    #[error("transaction is not signed")]
    NotSigned,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid wallet address: {0}")]
    InvalidWallet(String),

    #[error("invalid key material")]
    InvalidKey,

    #[error("unknown payload id {0}")]
    BadPayloadId(u32),

    #[error("payload is not encrypted")]
    NotEncrypted,

    #[error("no matching challenge for the supplied key")]
    AccessDenied,

    #[error("payload is protected")]
    PayloadProtected,

    #[error("payload hash mismatch")]
    CorruptPayload,

    #[error("cryptographic operation failed")]
    CryptoFailure,

    #[error("invalid metadata: {0}")]
    BadMetadata(String),
}

impl TxError {
    /// Shorthand for structural parse failures.
    pub fn malformed(context: &str) -> Self {
        TxError::Malformed(context.to_string())
    }
}
