//! Content-key wrapping for envelope encryption.
//!
//! A payload is encrypted once with a random content key; each recipient
//! gets a "challenge", that key wrapped under their public key. The wrap
//! construction is per key family:
//!
//! - **Ed25519**: ephemeral X25519 key against the recipient's converted
//!   Montgomery key, Blake2b KDF, XChaCha20-Poly1305 with a nonce derived
//!   from both public keys. Wire: ephemeral key (32) + ciphertext.
//! - **NIST P-256**: ephemeral ECDH, HKDF-SHA256, AES-256-GCM with a random
//!   nonce. Wire: ephemeral SEC1 point (65) + nonce (12) + ciphertext.
//! - **RSA-4096**: OAEP-SHA256, a single 512-byte ciphertext.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use hkdf::Hkdf;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::{Oaep, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use strand_types::{PrivateKey, PublicKey, TxError, WalletNetwork};
use x25519_dalek::{EphemeralSecret, PublicKey as X25519Public, StaticSecret};

use crate::hash::blake2b_256_multi;
use crate::keys::{ed25519_private_to_x25519, ed25519_public_to_x25519};

/// Domain separator fed into both KDFs.
const WRAP_CONTEXT: &[u8] = b"strand-challenge";

const X25519_KEY_LEN: usize = 32;
const P256_POINT_LEN: usize = 65;
const GCM_NONCE_LEN: usize = 12;

fn xchacha_nonce(ephemeral: &[u8; 32], recipient: &[u8]) -> XNonce {
    let digest = blake2b_256_multi(&[ephemeral, recipient]);
    let mut nonce = [0u8; 24];
    nonce.copy_from_slice(&digest[..24]);
    XNonce::from(nonce)
}

/// Wrap a content key for one recipient, producing their challenge bytes.
pub fn wrap_key<R: RngCore + CryptoRng>(
    recipient: &PublicKey,
    content_key: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>, TxError> {
    match recipient.network {
        WalletNetwork::Ed25519 => {
            let edwards: [u8; 32] = recipient
                .bytes
                .as_slice()
                .try_into()
                .map_err(|_| TxError::InvalidKey)?;
            let montgomery = ed25519_public_to_x25519(&edwards).ok_or(TxError::InvalidKey)?;

            let ephemeral = EphemeralSecret::random_from_rng(&mut *rng);
            let ephemeral_public = X25519Public::from(&ephemeral);
            let shared = ephemeral.diffie_hellman(&X25519Public::from(montgomery));

            let sym_key = blake2b_256_multi(&[shared.as_bytes(), WRAP_CONTEXT]);
            let cipher = XChaCha20Poly1305::new_from_slice(&sym_key)
                .map_err(|_| TxError::CryptoFailure)?;
            let nonce = xchacha_nonce(ephemeral_public.as_bytes(), &recipient.bytes);

            let mut wrapped = ephemeral_public.as_bytes().to_vec();
            wrapped.extend(
                cipher
                    .encrypt(&nonce, content_key)
                    .map_err(|_| TxError::CryptoFailure)?,
            );
            Ok(wrapped)
        }
        WalletNetwork::NistP256 => {
            let recipient_point = p256::PublicKey::from_sec1_bytes(&recipient.bytes)
                .map_err(|_| TxError::InvalidKey)?;
            let ephemeral = p256::ecdh::EphemeralSecret::random(rng);
            let ephemeral_point = ephemeral.public_key().to_encoded_point(false);
            let shared = ephemeral.diffie_hellman(&recipient_point);

            let hk = Hkdf::<Sha256>::new(None, shared.raw_secret_bytes().as_slice());
            let mut sym_key = [0u8; 32];
            hk.expand(WRAP_CONTEXT, &mut sym_key)
                .map_err(|_| TxError::CryptoFailure)?;

            let mut nonce = [0u8; GCM_NONCE_LEN];
            rng.fill_bytes(&mut nonce);

            let cipher = aes_gcm::Aes256Gcm::new_from_slice(&sym_key)
                .map_err(|_| TxError::CryptoFailure)?;
            let ciphertext = cipher
                .encrypt(aes_gcm::Nonce::from_slice(&nonce), content_key)
                .map_err(|_| TxError::CryptoFailure)?;

            let mut wrapped = ephemeral_point.as_bytes().to_vec();
            wrapped.extend_from_slice(&nonce);
            wrapped.extend(ciphertext);
            Ok(wrapped)
        }
        WalletNetwork::Rsa4096 => {
            let public =
                RsaPublicKey::from_pkcs1_der(&recipient.bytes).map_err(|_| TxError::InvalidKey)?;
            public
                .encrypt(rng, Oaep::new::<Sha256>(), content_key)
                .map_err(|_| TxError::CryptoFailure)
        }
    }
}

/// Unwrap a challenge with the recipient's private key.
pub fn unwrap_key(recipient: &PrivateKey, challenge: &[u8]) -> Result<Vec<u8>, TxError> {
    match recipient.network {
        WalletNetwork::Ed25519 => {
            if challenge.len() <= X25519_KEY_LEN {
                return Err(TxError::CryptoFailure);
            }
            let seed: [u8; 32] = recipient
                .bytes
                .as_slice()
                .try_into()
                .map_err(|_| TxError::InvalidKey)?;
            let secret = StaticSecret::from(ed25519_private_to_x25519(&seed));

            let ephemeral: [u8; 32] = challenge[..X25519_KEY_LEN]
                .try_into()
                .map_err(|_| TxError::CryptoFailure)?;
            let shared = secret.diffie_hellman(&X25519Public::from(ephemeral));

            let sym_key = blake2b_256_multi(&[shared.as_bytes(), WRAP_CONTEXT]);
            let cipher = XChaCha20Poly1305::new_from_slice(&sym_key)
                .map_err(|_| TxError::CryptoFailure)?;

            let public = crate::keys::public_from_private(recipient)?;
            let nonce = xchacha_nonce(&ephemeral, &public.bytes);
            cipher
                .decrypt(&nonce, &challenge[X25519_KEY_LEN..])
                .map_err(|_| TxError::CryptoFailure)
        }
        WalletNetwork::NistP256 => {
            if challenge.len() <= P256_POINT_LEN + GCM_NONCE_LEN {
                return Err(TxError::CryptoFailure);
            }
            let secret =
                p256::SecretKey::from_slice(&recipient.bytes).map_err(|_| TxError::InvalidKey)?;
            let ephemeral = p256::PublicKey::from_sec1_bytes(&challenge[..P256_POINT_LEN])
                .map_err(|_| TxError::CryptoFailure)?;
            let shared =
                p256::ecdh::diffie_hellman(secret.to_nonzero_scalar(), ephemeral.as_affine());

            let hk = Hkdf::<Sha256>::new(None, shared.raw_secret_bytes().as_slice());
            let mut sym_key = [0u8; 32];
            hk.expand(WRAP_CONTEXT, &mut sym_key)
                .map_err(|_| TxError::CryptoFailure)?;

            let nonce = &challenge[P256_POINT_LEN..P256_POINT_LEN + GCM_NONCE_LEN];
            let cipher = aes_gcm::Aes256Gcm::new_from_slice(&sym_key)
                .map_err(|_| TxError::CryptoFailure)?;
            cipher
                .decrypt(
                    aes_gcm::Nonce::from_slice(nonce),
                    &challenge[P256_POINT_LEN + GCM_NONCE_LEN..],
                )
                .map_err(|_| TxError::CryptoFailure)
        }
        WalletNetwork::Rsa4096 => {
            let secret =
                RsaPrivateKey::from_pkcs1_der(&recipient.bytes).map_err(|_| TxError::InvalidKey)?;
            secret
                .decrypt(Oaep::new::<Sha256>(), challenge)
                .map_err(|_| TxError::CryptoFailure)
        }
    }
}
