//! Symmetric content ciphers for payload envelope encryption.

use aes::{Aes128, Aes256};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce as GcmNonce};
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce, XChaCha20Poly1305, XNonce};
use rand::{CryptoRng, RngCore};
use strand_types::{EncryptionAlgorithm, TxError};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Draw a fresh content key and IV for the given cipher from `rng`.
pub fn generate_key_iv<R: RngCore + CryptoRng>(
    algorithm: EncryptionAlgorithm,
    rng: &mut R,
) -> (Vec<u8>, Vec<u8>) {
    let mut key = vec![0u8; algorithm.key_len()];
    let mut iv = vec![0u8; algorithm.iv_len()];
    rng.fill_bytes(&mut key);
    rng.fill_bytes(&mut iv);
    (key, iv)
}

/// Encrypt `data` with the selected cipher.
pub fn encrypt(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, TxError> {
    if key.len() != algorithm.key_len() || iv.len() != algorithm.iv_len() {
        return Err(TxError::InvalidKey);
    }
    match algorithm {
        EncryptionAlgorithm::None => Err(TxError::UnsupportedAlgorithm(algorithm.id())),
        EncryptionAlgorithm::Aes128Cbc => {
            let cipher =
                Aes128CbcEnc::new_from_slices(key, iv).map_err(|_| TxError::InvalidKey)?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
        }
        EncryptionAlgorithm::Aes256Cbc => {
            let cipher =
                Aes256CbcEnc::new_from_slices(key, iv).map_err(|_| TxError::InvalidKey)?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
        }
        EncryptionAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .encrypt(GcmNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::ChaCha20Poly1305 => {
            let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .encrypt(ChaNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => {
            let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .encrypt(XNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
    }
}

/// Decrypt `data` with the selected cipher.
///
/// AEAD variants authenticate; CBC variants only validate padding, so callers
/// must verify the payload hash after decryption.
pub fn decrypt(
    algorithm: EncryptionAlgorithm,
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, TxError> {
    if key.len() != algorithm.key_len() || iv.len() != algorithm.iv_len() {
        return Err(TxError::InvalidKey);
    }
    match algorithm {
        EncryptionAlgorithm::None => Err(TxError::UnsupportedAlgorithm(algorithm.id())),
        EncryptionAlgorithm::Aes128Cbc => {
            let cipher =
                Aes128CbcDec::new_from_slices(key, iv).map_err(|_| TxError::InvalidKey)?;
            cipher
                .decrypt_padded_vec_mut::<Pkcs7>(data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::Aes256Cbc => {
            let cipher =
                Aes256CbcDec::new_from_slices(key, iv).map_err(|_| TxError::InvalidKey)?;
            cipher
                .decrypt_padded_vec_mut::<Pkcs7>(data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::Aes256Gcm => {
            let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .decrypt(GcmNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::ChaCha20Poly1305 => {
            let cipher = ChaCha20Poly1305::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .decrypt(ChaNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
        EncryptionAlgorithm::XChaCha20Poly1305 => {
            let cipher = XChaCha20Poly1305::new_from_slice(key).map_err(|_| TxError::InvalidKey)?;
            cipher
                .decrypt(XNonce::from_slice(iv), data)
                .map_err(|_| TxError::CryptoFailure)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    const CIPHERS: [EncryptionAlgorithm; 5] = [
        EncryptionAlgorithm::Aes128Cbc,
        EncryptionAlgorithm::Aes256Cbc,
        EncryptionAlgorithm::Aes256Gcm,
        EncryptionAlgorithm::ChaCha20Poly1305,
        EncryptionAlgorithm::XChaCha20Poly1305,
    ];

    #[test]
    fn encrypt_decrypt_roundtrip() {
        for alg in CIPHERS {
            let (key, iv) = generate_key_iv(alg, &mut OsRng);
            let plaintext = b"payload content across block boundaries....";
            let ciphertext = encrypt(alg, &key, &iv, plaintext).unwrap();
            assert_ne!(&ciphertext[..], &plaintext[..]);
            let recovered = decrypt(alg, &key, &iv, &ciphertext).unwrap();
            assert_eq!(recovered, plaintext);
        }
    }

    #[test]
    fn aead_rejects_tampering() {
        for alg in [
            EncryptionAlgorithm::Aes256Gcm,
            EncryptionAlgorithm::ChaCha20Poly1305,
            EncryptionAlgorithm::XChaCha20Poly1305,
        ] {
            let (key, iv) = generate_key_iv(alg, &mut OsRng);
            let mut ciphertext = encrypt(alg, &key, &iv, b"data").unwrap();
            ciphertext[0] ^= 0xFF;
            assert!(decrypt(alg, &key, &iv, &ciphertext).is_err());
        }
    }

    #[test]
    fn wrong_key_length_rejected() {
        let (_, iv) = generate_key_iv(EncryptionAlgorithm::Aes256Gcm, &mut OsRng);
        assert_eq!(
            encrypt(EncryptionAlgorithm::Aes256Gcm, &[0u8; 16], &iv, b"x"),
            Err(TxError::InvalidKey)
        );
    }

    #[test]
    fn none_cipher_rejected() {
        assert!(encrypt(EncryptionAlgorithm::None, &[], &[], b"x").is_err());
    }
}
