//! Cryptographic primitives for the Strand envelope codec.
//!
//! - **Hashing**: SHA-256/384/512 and Blake2b-256/512, dispatched by id
//! - **Signing**: Ed25519, NIST P-256 ECDSA, RSA-4096 over a common digest
//! - **Symmetric ciphers**: AES-CBC, AES-GCM, (X)ChaCha20-Poly1305
//! - **Key wrap**: per-family content-key "challenges" for envelope encryption
//! - **Wallet codec**: bech32m `ws1` addresses and Base58Check private keys
//! - **Compression**: DEFLATE with a magic-prefixed container

pub mod address;
pub mod cipher;
pub mod compress;
pub mod hash;
pub mod keys;
pub mod keywrap;
pub mod sign;
pub mod wif;

pub use address::{decode_address, derive_address, validate_address};
pub use cipher::{decrypt, encrypt, generate_key_iv};
pub use compress::{compress, decompress};
pub use hash::{blake2b_256, blake2b_256_multi, double_sha256, hash_data, sha256};
pub use keys::{
    ed25519_private_to_x25519, ed25519_public_to_x25519, generate_keypair, public_from_private,
};
pub use keywrap::{unwrap_key, wrap_key};
pub use sign::{sign_digest, verify_digest};
pub use wif::{decode_wif, encode_wif};
