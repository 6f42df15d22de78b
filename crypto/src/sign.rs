//! Signature creation and verification over a 32-byte digest.
//!
//! All three key families sign the same canonical digest (double SHA-256 of
//! the serialized record, computed by the caller). Ed25519 signs the digest
//! as a message; P-256 and RSA treat it as a prehash.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use p256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use strand_types::{PrivateKey, PublicKey, TxError, WalletNetwork};

/// Sign a digest with a private key, returning the detached signature bytes.
pub fn sign_digest(key: &PrivateKey, digest: &[u8; 32]) -> Result<Vec<u8>, TxError> {
    match key.network {
        WalletNetwork::Ed25519 => {
            let seed: [u8; 32] = key
                .bytes
                .as_slice()
                .try_into()
                .map_err(|_| TxError::InvalidKey)?;
            let signing_key = SigningKey::from_bytes(&seed);
            Ok(signing_key.sign(digest).to_bytes().to_vec())
        }
        WalletNetwork::NistP256 => {
            let signing_key = p256::ecdsa::SigningKey::from_slice(&key.bytes)
                .map_err(|_| TxError::InvalidKey)?;
            let signature: p256::ecdsa::Signature = signing_key
                .sign_prehash(digest)
                .map_err(|_| TxError::CryptoFailure)?;
            Ok(signature.to_bytes().to_vec())
        }
        WalletNetwork::Rsa4096 => {
            let signing_key =
                RsaPrivateKey::from_pkcs1_der(&key.bytes).map_err(|_| TxError::InvalidKey)?;
            signing_key
                .sign(Pkcs1v15Sign::new::<Sha256>(), digest)
                .map_err(|_| TxError::CryptoFailure)
        }
    }
}

/// Verify a detached signature over a digest.
pub fn verify_digest(key: &PublicKey, digest: &[u8; 32], signature: &[u8]) -> Result<(), TxError> {
    match key.network {
        WalletNetwork::Ed25519 => {
            let public: [u8; 32] = key
                .bytes
                .as_slice()
                .try_into()
                .map_err(|_| TxError::InvalidKey)?;
            let verifying_key =
                VerifyingKey::from_bytes(&public).map_err(|_| TxError::InvalidKey)?;
            let sig_bytes: [u8; 64] = signature
                .try_into()
                .map_err(|_| TxError::InvalidSignature)?;
            let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);
            verifying_key
                .verify(digest, &sig)
                .map_err(|_| TxError::InvalidSignature)
        }
        WalletNetwork::NistP256 => {
            let verifying_key = p256::ecdsa::VerifyingKey::from_sec1_bytes(&key.bytes)
                .map_err(|_| TxError::InvalidKey)?;
            let sig = p256::ecdsa::Signature::from_slice(signature)
                .map_err(|_| TxError::InvalidSignature)?;
            verifying_key
                .verify_prehash(digest, &sig)
                .map_err(|_| TxError::InvalidSignature)
        }
        WalletNetwork::Rsa4096 => {
            let verifying_key =
                RsaPublicKey::from_pkcs1_der(&key.bytes).map_err(|_| TxError::InvalidKey)?;
            verifying_key
                .verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
                .map_err(|_| TxError::InvalidSignature)
        }
    }
}
