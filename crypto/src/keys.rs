//! Key generation and derivation per wallet network.

use ed25519_dalek::SigningKey;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::RsaPrivateKey;
use strand_types::{KeyPair, PrivateKey, PublicKey, TxError, WalletNetwork};

use p256::elliptic_curve::sec1::ToEncodedPoint;

const RSA_BITS: usize = 4096;

/// Generate a fresh key pair for the given network family.
///
/// RSA-4096 generation takes noticeably longer than the elliptic families.
pub fn generate_keypair<R: RngCore + CryptoRng>(
    network: WalletNetwork,
    rng: &mut R,
) -> Result<KeyPair, TxError> {
    match network {
        WalletNetwork::Ed25519 => {
            let signing_key = SigningKey::generate(rng);
            Ok(KeyPair {
                public: PublicKey::new(network, signing_key.verifying_key().to_bytes().to_vec()),
                private: PrivateKey::new(network, signing_key.to_bytes().to_vec()),
            })
        }
        WalletNetwork::NistP256 => {
            let secret = p256::SecretKey::random(rng);
            let public = secret.public_key().to_encoded_point(false);
            Ok(KeyPair {
                public: PublicKey::new(network, public.as_bytes().to_vec()),
                private: PrivateKey::new(network, secret.to_bytes().to_vec()),
            })
        }
        WalletNetwork::Rsa4096 => {
            let secret = RsaPrivateKey::new(rng, RSA_BITS).map_err(|_| TxError::CryptoFailure)?;
            let public_der = secret
                .to_public_key()
                .to_pkcs1_der()
                .map_err(|_| TxError::CryptoFailure)?;
            let private_der = secret.to_pkcs1_der().map_err(|_| TxError::CryptoFailure)?;
            Ok(KeyPair {
                public: PublicKey::new(network, public_der.as_bytes().to_vec()),
                private: PrivateKey::new(network, private_der.as_bytes().to_vec()),
            })
        }
    }
}

/// Derive the public key from a private key.
pub fn public_from_private(private: &PrivateKey) -> Result<PublicKey, TxError> {
    match private.network {
        WalletNetwork::Ed25519 => {
            let seed: [u8; 32] = private
                .bytes
                .as_slice()
                .try_into()
                .map_err(|_| TxError::InvalidKey)?;
            let signing_key = SigningKey::from_bytes(&seed);
            Ok(PublicKey::new(
                private.network,
                signing_key.verifying_key().to_bytes().to_vec(),
            ))
        }
        WalletNetwork::NistP256 => {
            let secret =
                p256::SecretKey::from_slice(&private.bytes).map_err(|_| TxError::InvalidKey)?;
            let public = secret.public_key().to_encoded_point(false);
            Ok(PublicKey::new(private.network, public.as_bytes().to_vec()))
        }
        WalletNetwork::Rsa4096 => {
            let secret =
                RsaPrivateKey::from_pkcs1_der(&private.bytes).map_err(|_| TxError::InvalidKey)?;
            let public_der = secret
                .to_public_key()
                .to_pkcs1_der()
                .map_err(|_| TxError::InvalidKey)?;
            Ok(PublicKey::new(private.network, public_der.as_bytes().to_vec()))
        }
    }
}

/// Convert an Ed25519 private key (seed) to X25519 scalar bytes.
///
/// Uses `SigningKey::to_scalar_bytes()`, which produces the unclamped scalar
/// suitable for use as an `x25519_dalek::StaticSecret`.
pub fn ed25519_private_to_x25519(seed: &[u8; 32]) -> [u8; 32] {
    SigningKey::from_bytes(seed).to_scalar_bytes()
}

/// Convert an Ed25519 public key to its X25519 (Montgomery) equivalent.
///
/// Returns `None` if the public key bytes are not a valid Edwards point.
pub fn ed25519_public_to_x25519(public: &[u8; 32]) -> Option<[u8; 32]> {
    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(public).ok()?;
    Some(verifying_key.to_montgomery().to_bytes())
}
