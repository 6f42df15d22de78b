//! Wallet address type with `ws1` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A wallet address, always prefixed with `ws1`.
///
/// Encodes a public key plus its network discriminant in bech32m form; the
/// codec lives in the crypto crate, this type only carries the text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Human-readable part plus separator for all wallet addresses.
    pub const PREFIX: &'static str = "ws1";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for WalletAddress {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_text() {
        let addr = WalletAddress::from("ws1qqqq");
        assert_eq!(addr.as_str(), "ws1qqqq");
        assert_eq!(addr.to_string(), "ws1qqqq");
        assert_eq!(WalletAddress::from(String::from("ws1qqqq")), addr);
    }
}
