//! Wallet address derivation: bech32m text form of a network-tagged key.
//!
//! Address format: `ws` + `1` + data part + 6-character checksum, bech32m
//! throughout. The first data value is the network discriminant (always
//! below 32, so it fits a single 5-bit group); the rest is the public key
//! regrouped from 8-bit to 5-bit values.

use strand_types::{PublicKey, TxError, WalletAddress, WalletNetwork};

/// Bech32 character set.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup table: ASCII byte -> 5-bit value (0xFF = invalid).
const CHARSET_DECODE: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

/// bech32m checksum constant.
const BECH32M_CONST: u32 = 0x2bc8_30a3;

/// Checksum generator coefficients.
const GENERATOR: [u32; 5] = [
    0x3b6a_57b2,
    0x2650_8e6d,
    0x1ea1_19fa,
    0x3d42_33dd,
    0x2a14_62b3,
];

/// Expanded human-readable part for the `ws` prefix.
const HRP_EXPANDED: [u8; 5] = [0x03, 0x03, 0x00, 0x17, 0x13];

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ v as u32;
        for (i, gen) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= gen;
            }
        }
    }
    chk
}

/// Regroup a bit stream between arbitrary widths (the standard bech32
/// `convertbits`). `pad` appends zero bits on encode; on decode it rejects
/// non-zero padding.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    let max = (1u32 << to) - 1;
    for &value in data {
        if (value as u32) >> from != 0 {
            return None;
        }
        acc = (acc << from) | value as u32;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max) != 0 {
        return None;
    }
    Some(out)
}

fn checksum(data: &[u8]) -> [u8; 6] {
    let values = HRP_EXPANDED
        .iter()
        .copied()
        .chain(data.iter().copied())
        .chain([0u8; 6]);
    let polymod = polymod(values) ^ BECH32M_CONST;
    let mut out = [0u8; 6];
    for (i, v) in out.iter_mut().enumerate() {
        *v = ((polymod >> (5 * (5 - i))) & 0x1F) as u8;
    }
    out
}

/// Derive the `ws1` wallet address for a network-tagged public key.
pub fn derive_address(key: &PublicKey) -> WalletAddress {
    let mut data = vec![key.network.id()];
    // 8-bit key bytes always regroup to 5 bits with padding.
    data.extend(convert_bits(&key.bytes, 8, 5, true).unwrap_or_default());
    let mut address = String::from(WalletAddress::PREFIX);
    for v in data.iter().chain(checksum(&data).iter()) {
        address.push(CHARSET[*v as usize] as char);
    }
    WalletAddress::new(address)
}

/// Recover the network-tagged public key from an address.
pub fn decode_address(address: &str) -> Result<PublicKey, TxError> {
    let invalid = || TxError::InvalidWallet(address.to_string());
    let encoded = address
        .strip_prefix(WalletAddress::PREFIX)
        .ok_or_else(invalid)?;
    // network value + checksum is the minimum body.
    if encoded.len() < 7 {
        return Err(invalid());
    }
    let mut values = Vec::with_capacity(encoded.len());
    for c in encoded.bytes() {
        if c >= 128 || CHARSET_DECODE[c as usize] == 0xFF {
            return Err(invalid());
        }
        values.push(CHARSET_DECODE[c as usize]);
    }
    let body = &values[..values.len() - 6];
    if checksum(body) != values[values.len() - 6..] {
        return Err(invalid());
    }
    let network = WalletNetwork::from_id(body[0]).ok_or_else(invalid)?;
    let bytes = convert_bits(&body[1..], 5, 8, false).ok_or_else(invalid)?;
    if let Some(expected) = network.public_key_len() {
        if bytes.len() != expected {
            return Err(invalid());
        }
    }
    Ok(PublicKey::new(network, bytes))
}

/// Validate that an address is well-formed with a correct checksum.
pub fn validate_address(address: &str) -> bool {
    decode_address(address).is_ok()
}
