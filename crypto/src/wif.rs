//! Base58Check text form for private keys.
//!
//! Layout before encoding: network byte, key bytes, then the first four
//! bytes of the double-SHA-256 checksum over everything preceding them.

use crate::hash::double_sha256;
use strand_types::{PrivateKey, TxError, WalletNetwork};

const CHECKSUM_LEN: usize = 4;

/// Encode a private key in WIF-style Base58Check form.
pub fn encode_wif(key: &PrivateKey) -> String {
    let mut payload = Vec::with_capacity(1 + key.bytes.len() + CHECKSUM_LEN);
    payload.push(key.network.id());
    payload.extend_from_slice(&key.bytes);
    let digest = double_sha256(&payload);
    payload.extend_from_slice(&digest[..CHECKSUM_LEN]);
    bs58::encode(payload).into_string()
}

/// Decode a WIF-style string back into a network-tagged private key.
pub fn decode_wif(encoded: &str) -> Result<PrivateKey, TxError> {
    let payload = bs58::decode(encoded)
        .into_vec()
        .map_err(|_| TxError::InvalidKey)?;
    if payload.len() < 1 + CHECKSUM_LEN {
        return Err(TxError::InvalidKey);
    }
    let (body, checksum) = payload.split_at(payload.len() - CHECKSUM_LEN);
    let digest = double_sha256(body);
    if checksum != &digest[..CHECKSUM_LEN] {
        return Err(TxError::InvalidKey);
    }
    let network = WalletNetwork::from_id(body[0]).ok_or(TxError::InvalidKey)?;
    Ok(PrivateKey::new(network, body[1..].to_vec()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;
    use rand::rngs::OsRng;

    #[test]
    fn encode_decode_roundtrip() {
        for network in [WalletNetwork::Ed25519, WalletNetwork::NistP256] {
            let kp = generate_keypair(network, &mut OsRng).unwrap();
            let wif = encode_wif(&kp.private);
            let decoded = decode_wif(&wif).unwrap();
            assert_eq!(decoded.network, network);
            assert_eq!(decoded.bytes, kp.private.bytes);
        }
    }

    #[test]
    fn corrupted_checksum_rejected() {
        let kp = generate_keypair(WalletNetwork::Ed25519, &mut OsRng).unwrap();
        let mut wif = encode_wif(&kp.private);
        let last = wif.pop().unwrap();
        wif.push(if last == '1' { '2' } else { '1' });
        assert!(decode_wif(&wif).is_err());
    }

    #[test]
    fn garbage_rejected() {
        assert!(decode_wif("").is_err());
        assert!(decode_wif("0OIl").is_err());
        assert!(decode_wif("abc").is_err());
    }
}
