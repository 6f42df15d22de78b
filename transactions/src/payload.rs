//! Payload envelope: compression, hashing, and multi-recipient encryption.
//!
//! Each payload is encrypted at most once with a fresh content key; every
//! recipient receives that key wrapped under their public key (their
//! "challenge"). Removing the last challenge leaves a redaction tombstone:
//! the ciphertext and hash survive, decryption is permanently impossible.

use rand::{CryptoRng, RngCore};
use strand_crypto::{compress, decompress, derive_address, hash_data, unwrap_key, wrap_key};
use strand_types::{
    CompressionAlgorithm, EncryptionAlgorithm, HashAlgorithm, PayloadOptions, PrivateKey,
    PublicKey, TxError, WalletAddress, WalletNetwork,
};
use tracing::debug;

use crate::builder::TxVersion;
use crate::flags::{self, FLAG_COMPRESSED, FLAG_ENCRYPTED, FLAG_PROTECTED};
use crate::varint::{write_vl, write_vl_bytes, ByteReader};

/// One recipient's entry in a payload's access list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessEntry {
    pub public: PublicKey,
    pub challenge: Vec<u8>,
}

impl AccessEntry {
    pub fn wallet(&self) -> WalletAddress {
        derive_address(&self.public)
    }
}

/// A stored payload: flags, digest, optional IV, access list, and the
/// stored (possibly compressed, possibly encrypted) bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payload {
    pub(crate) flags: u16,
    pub(crate) options: PayloadOptions,
    pub(crate) hash: Vec<u8>,
    pub(crate) iv: Vec<u8>,
    pub(crate) access: Vec<AccessEntry>,
    pub(crate) data: Vec<u8>,
}

impl Payload {
    /// Build a payload from raw bytes: compress, hash the post-compression
    /// pre-encryption form, then encrypt once per the recipient list.
    pub fn build<R: RngCore + CryptoRng>(
        data: &[u8],
        recipients: &[PublicKey],
        mut options: PayloadOptions,
        rng: &mut R,
    ) -> Result<Self, TxError> {
        let mut flags = 0u16;
        let stored = match compress(options.compression, data) {
            Some(compressed) => {
                flags |= FLAG_COMPRESSED;
                compressed
            }
            None => {
                // Record what is actually stored, not what was requested.
                options.compression = CompressionAlgorithm::None;
                data.to_vec()
            }
        };

        // The digest downstream fixtures validate; stable under redaction.
        let hash = hash_data(options.hash, &stored);

        let mut iv = Vec::new();
        let mut access = Vec::new();
        let stored = if recipients.is_empty()
            || options.encryption == EncryptionAlgorithm::None
        {
            stored
        } else {
            let (content_key, fresh_iv) =
                strand_crypto::generate_key_iv(options.encryption, rng);
            let ciphertext =
                strand_crypto::encrypt(options.encryption, &content_key, &fresh_iv, &stored)?;
            for recipient in recipients {
                access.push(AccessEntry {
                    public: recipient.clone(),
                    challenge: wrap_key(recipient, &content_key, rng)?,
                });
            }
            flags |= FLAG_ENCRYPTED;
            iv = fresh_iv;
            ciphertext
        };

        if options.protected {
            flags |= FLAG_PROTECTED;
        }

        debug!(
            size = stored.len(),
            recipients = access.len(),
            encrypted = flags & FLAG_ENCRYPTED != 0,
            compressed = flags & FLAG_COMPRESSED != 0,
            "payload built"
        );

        Ok(Self {
            flags,
            options,
            hash,
            iv,
            access,
            data: stored,
        })
    }

    /// Reassemble a payload from already-validated parts, as produced by a
    /// structural model. No hashing or encryption is performed.
    pub fn from_parts(
        flags: u16,
        options: PayloadOptions,
        hash: Vec<u8>,
        iv: Vec<u8>,
        access: Vec<AccessEntry>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            flags,
            options,
            hash,
            iv,
            access,
            data,
        }
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// The stored bytes: ciphertext when encrypted, else the possibly
    /// compressed plaintext.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn encrypted(&self) -> bool {
        self.flags & FLAG_ENCRYPTED != 0
    }

    pub fn compressed(&self) -> bool {
        self.flags & FLAG_COMPRESSED != 0
    }

    pub fn protected(&self) -> bool {
        self.flags & FLAG_PROTECTED != 0
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    pub fn iv(&self) -> Option<&[u8]> {
        if self.iv.is_empty() {
            None
        } else {
            Some(&self.iv)
        }
    }

    pub fn access(&self) -> &[AccessEntry] {
        &self.access
    }

    pub fn options(&self) -> &PayloadOptions {
        &self.options
    }

    pub fn wallets(&self) -> Vec<WalletAddress> {
        self.access.iter().map(AccessEntry::wallet).collect()
    }

    /// Remove challenges for the given wallets; order-aligned results.
    ///
    /// Removing the last challenge is deliberate, permanent redaction: the
    /// encrypted bit and hash are untouched.
    pub(crate) fn remove_wallets(&mut self, wallets: &[WalletAddress]) -> Vec<bool> {
        wallets
            .iter()
            .map(|wallet| {
                match self.access.iter().position(|entry| entry.wallet() == *wallet) {
                    Some(index) => {
                        self.access.remove(index);
                        true
                    }
                    None => false,
                }
            })
            .collect()
    }

    /// Wrap the content key for additional recipients, unwrapping it first
    /// with a key that already has access.
    pub(crate) fn add_wallets<R: RngCore + CryptoRng>(
        &mut self,
        key: &PrivateKey,
        recipients: &[PublicKey],
        rng: &mut R,
    ) -> Result<Vec<bool>, TxError> {
        if !self.encrypted() {
            return Err(TxError::NotEncrypted);
        }
        let content_key = self.content_key_for(key)?;
        let mut added = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            if self.access.iter().any(|entry| entry.public == *recipient) {
                added.push(false);
                continue;
            }
            self.access.push(AccessEntry {
                public: recipient.clone(),
                challenge: wrap_key(recipient, &content_key, rng)?,
            });
            added.push(true);
        }
        Ok(added)
    }

    /// Recover the plaintext: decrypt with `key` when encrypted, verify the
    /// stored digest, then decompress.
    pub(crate) fn plaintext(&self, key: Option<&PrivateKey>) -> Result<Vec<u8>, TxError> {
        let stored = if self.encrypted() {
            let key = key.ok_or(TxError::AccessDenied)?;
            let content_key = self.content_key_for(key)?;
            strand_crypto::decrypt(self.options.encryption, &content_key, &self.iv, &self.data)?
        } else {
            self.data.clone()
        };
        if !digest_matches(&self.hash, &stored) {
            return Err(TxError::CorruptPayload);
        }
        if self.compressed() {
            decompress(&stored)
        } else {
            Ok(stored)
        }
    }

    /// Recompute the stored digest; only possible without decryption for
    /// unencrypted payloads.
    pub(crate) fn verify_hash(&self) -> bool {
        self.encrypted() || digest_matches(&self.hash, &self.data)
    }

    fn content_key_for(&self, key: &PrivateKey) -> Result<Vec<u8>, TxError> {
        if self.access.is_empty() {
            // Redaction tombstone: nobody can recover the key.
            return Err(TxError::AccessDenied);
        }
        let own = strand_crypto::public_from_private(key)?;
        let entry = self
            .access
            .iter()
            .find(|entry| entry.public == own)
            .ok_or(TxError::AccessDenied)?;
        unwrap_key(key, &entry.challenge)
    }

    // --- wire form -------------------------------------------------------

    /// Serialize everything except the data bytes (the signing view).
    pub(crate) fn write_header(&self, version: TxVersion, out: &mut Vec<u8>) {
        match version {
            TxVersion::V1 | TxVersion::V2 => {
                if version == TxVersion::V2 {
                    out.extend_from_slice(&self.flags.to_le_bytes());
                }
                write_vl(out, self.access.len() as u64);
                for entry in &self.access {
                    out.extend_from_slice(&entry.public.bytes);
                    write_vl_bytes(out, &entry.challenge);
                }
                if !self.access.is_empty() {
                    write_vl_bytes(out, &self.iv);
                }
                write_vl(out, self.size());
                out.extend_from_slice(&self.hash);
            }
            TxVersion::V3 => {
                let mut block = Vec::new();
                block.extend_from_slice(&self.flags.to_le_bytes());
                write_vl(&mut block, self.access.len() as u64);
                for entry in &self.access {
                    write_vl_bytes(&mut block, &entry.public.bytes);
                    write_vl_bytes(&mut block, &entry.challenge);
                }
                if !self.access.is_empty() {
                    write_vl_bytes(&mut block, &self.iv);
                }
                write_vl_bytes(&mut block, &self.hash);
                write_vl(&mut block, self.size());
                write_vl_bytes(out, &block);
            }
            TxVersion::V4 => {
                let mut block = Vec::new();
                block.extend_from_slice(&flags::pack_type(&self.options).to_le_bytes());
                block.extend_from_slice(
                    &flags::pack_options(self.flags, &self.options).to_le_bytes(),
                );
                write_vl(&mut block, self.access.len() as u64);
                for entry in &self.access {
                    block.push(entry.public.network.id());
                    write_vl_bytes(&mut block, &entry.public.bytes);
                    write_vl_bytes(&mut block, &entry.challenge);
                }
                write_vl_bytes(&mut block, &self.hash);
                write_vl(&mut block, self.size());
                write_vl_bytes(out, &block);
                if self.encrypted() {
                    out.extend_from_slice(&self.iv);
                }
            }
        }
    }

    /// Serialize the full payload: header then data.
    pub(crate) fn serialize(&self, version: TxVersion, out: &mut Vec<u8>) {
        self.write_header(version, out);
        out.extend_from_slice(&self.data);
    }

    /// Parse one payload from the wire.
    pub(crate) fn parse(version: TxVersion, reader: &mut ByteReader) -> Result<Self, TxError> {
        match version {
            TxVersion::V1 | TxVersion::V2 => {
                let mut flags = 0u16;
                if version == TxVersion::V2 {
                    flags = reader.read_u16_le()?;
                }
                let count = reader.read_vl()?;
                let mut access = Vec::new();
                for _ in 0..count {
                    let public = reader.read_bytes(32)?.to_vec();
                    let challenge = reader.read_vl_bytes()?.to_vec();
                    access.push(AccessEntry {
                        public: PublicKey::new(WalletNetwork::Ed25519, public),
                        challenge,
                    });
                }
                let iv = if count > 0 {
                    reader.read_vl_bytes()?.to_vec()
                } else {
                    Vec::new()
                };
                let size = reader.read_vl()?;
                let hash = reader.read_bytes(32)?.to_vec();
                let data = reader.read_bytes(size as usize)?.to_vec();
                if count > 0 {
                    flags |= FLAG_ENCRYPTED;
                }
                Ok(Self {
                    flags,
                    options: PayloadOptions::legacy(),
                    hash,
                    iv,
                    access,
                    data,
                })
            }
            TxVersion::V3 => {
                let block = reader.read_vl_bytes()?;
                let mut block_reader = ByteReader::new(block);
                let flags = block_reader.read_u16_le()?;
                let count = block_reader.read_vl()?;
                let mut access = Vec::new();
                for _ in 0..count {
                    let public = block_reader.read_vl_bytes()?.to_vec();
                    let challenge = block_reader.read_vl_bytes()?.to_vec();
                    access.push(AccessEntry {
                        public: PublicKey::new(WalletNetwork::Ed25519, public),
                        challenge,
                    });
                }
                let iv = if count > 0 {
                    block_reader.read_vl_bytes()?.to_vec()
                } else {
                    Vec::new()
                };
                let hash = block_reader.read_vl_bytes()?.to_vec();
                let size = block_reader.read_vl()?;
                if !block_reader.is_empty() {
                    return Err(TxError::malformed("trailing bytes in payload block"));
                }
                let data = reader.read_bytes(size as usize)?.to_vec();
                let options = PayloadOptions::v3().with_hash(infer_hash(&hash)?);
                Ok(Self {
                    flags,
                    options,
                    hash,
                    iv,
                    access,
                    data,
                })
            }
            TxVersion::V4 => {
                let block = reader.read_vl_bytes()?;
                let mut block_reader = ByteReader::new(block);
                let type_word = block_reader.read_u32_le()?;
                let options_word = block_reader.read_u32_le()?;
                let (flags, hash_alg, encryption, compression) =
                    flags::unpack_options(options_word)?;
                let (payload_type, user_tag) = flags::unpack_type(type_word);
                let count = block_reader.read_vl()?;
                if count > 0 && flags & FLAG_ENCRYPTED == 0 {
                    return Err(TxError::malformed("challenges without encrypted flag"));
                }
                let mut access = Vec::new();
                for _ in 0..count {
                    let network = WalletNetwork::from_id(block_reader.read_u8()?)
                        .ok_or_else(|| TxError::malformed("unknown wallet network"))?;
                    let public = block_reader.read_vl_bytes()?.to_vec();
                    let challenge = block_reader.read_vl_bytes()?.to_vec();
                    access.push(AccessEntry {
                        public: PublicKey::new(network, public),
                        challenge,
                    });
                }
                let hash = block_reader.read_vl_bytes()?.to_vec();
                if hash.len() != hash_alg.digest_len() {
                    return Err(TxError::malformed("digest length mismatch"));
                }
                let size = block_reader.read_vl()?;
                if !block_reader.is_empty() {
                    return Err(TxError::malformed("trailing bytes in payload block"));
                }
                let iv = if flags & FLAG_ENCRYPTED != 0 {
                    reader.read_bytes(encryption.iv_len())?.to_vec()
                } else {
                    Vec::new()
                };
                let data = reader.read_bytes(size as usize)?.to_vec();
                let options = PayloadOptions {
                    compression,
                    encryption,
                    hash: hash_alg,
                    payload_type,
                    user_tag,
                    protected: flags & FLAG_PROTECTED != 0,
                };
                Ok(Self {
                    flags,
                    options,
                    hash,
                    iv,
                    access,
                    data,
                })
            }
        }
    }
}

/// Compare a stored digest against recomputed candidates of the same width.
///
/// Versions below 4 do not encode the hash algorithm, so any algorithm with
/// a matching digest length is accepted.
fn digest_matches(expected: &[u8], data: &[u8]) -> bool {
    [
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Blake2b256,
        HashAlgorithm::Blake2b512,
    ]
    .into_iter()
    .filter(|alg| alg.digest_len() == expected.len())
    .any(|alg| hash_data(alg, data) == expected)
}

/// Map a digest width back to the hash algorithm of a version-3 payload,
/// which stores no explicit algorithm id.
pub fn infer_hash(digest: &[u8]) -> Result<HashAlgorithm, TxError> {
    match digest.len() {
        32 => Ok(HashAlgorithm::Sha256),
        48 => Ok(HashAlgorithm::Sha384),
        64 => Ok(HashAlgorithm::Sha512),
        _ => Err(TxError::malformed("digest length mismatch")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use strand_crypto::generate_keypair;
    use strand_types::CompressionAlgorithm;

    fn keys(n: usize) -> Vec<strand_types::KeyPair> {
        (0..n)
            .map(|_| generate_keypair(WalletNetwork::Ed25519, &mut OsRng).unwrap())
            .collect()
    }

    fn publics(keys: &[strand_types::KeyPair]) -> Vec<PublicKey> {
        keys.iter().map(|kp| kp.public.clone()).collect()
    }

    #[test]
    fn v3_zero_byte_fixture() {
        let options = PayloadOptions::v3().with_compression(CompressionAlgorithm::None);
        let payload = Payload::build(&[0u8], &[], options, &mut OsRng).unwrap();
        assert_eq!(payload.flags, 0x0000);
        assert_eq!(
            hex::encode(&payload.hash),
            "6e340b9cffb37a989ca544e6bb780a2c78901d3fb33738768511a30617afa01d"
        );
    }

    #[test]
    fn v4_zero_byte_fixture() {
        // Version-4 defaults; the one-byte input is below the compression
        // floor, so the stored compression class is None.
        let payload = Payload::build(&[0u8], &[], PayloadOptions::v4(), &mut OsRng).unwrap();
        assert_eq!(
            hex::encode(&payload.hash),
            "03170a2e7597b7b7e3d84c05391d139a62b157e78786d8c082f29dcf4c111314"
        );
        let combined = flags::combined(
            flags::pack_type(&payload.options),
            flags::pack_options(payload.flags, &payload.options),
        );
        assert_eq!(combined, 0x0000_0cc0_0002_0000);
    }

    #[test]
    fn encrypted_payload_has_challenges_and_iv() {
        let kps = keys(3);
        let payload = Payload::build(
            &[0x42u8; 256],
            &publics(&kps),
            PayloadOptions::v4(),
            &mut OsRng,
        )
        .unwrap();
        assert!(payload.encrypted());
        assert_eq!(payload.access().len(), 3);
        assert!(payload.access().iter().all(|e| !e.challenge.is_empty()));
        assert_eq!(payload.iv().unwrap().len(), 24);
    }

    #[test]
    fn every_recipient_can_decrypt() {
        let kps = keys(3);
        let data = b"shared secret payload".repeat(20);
        let payload =
            Payload::build(&data, &publics(&kps), PayloadOptions::v4(), &mut OsRng).unwrap();
        for kp in &kps {
            assert_eq!(payload.plaintext(Some(&kp.private)).unwrap(), data);
        }
    }

    #[test]
    fn redaction_preserves_hash_and_encrypted_bit() {
        let kps = keys(1);
        let mut payload =
            Payload::build(&[7u8; 300], &publics(&kps), PayloadOptions::v4(), &mut OsRng).unwrap();
        let hash_before = payload.hash.clone();
        let removed = payload.remove_wallets(&[kps[0].public.clone()].map(|p| derive_address(&p)));
        assert_eq!(removed, vec![true]);
        assert!(payload.access().is_empty());
        assert!(payload.encrypted());
        assert_eq!(payload.hash, hash_before);
        assert_eq!(
            payload.plaintext(Some(&kps[0].private)),
            Err(TxError::AccessDenied)
        );
    }

    #[test]
    fn remove_unknown_wallet_is_noop() {
        let kps = keys(2);
        let stranger = keys(1);
        let mut payload = Payload::build(
            &[1u8; 300],
            &publics(&kps),
            PayloadOptions::v4(),
            &mut OsRng,
        )
        .unwrap();
        let removed = payload.remove_wallets(&[
            derive_address(&stranger[0].public),
            derive_address(&kps[1].public),
        ]);
        assert_eq!(removed, vec![false, true]);
        assert_eq!(payload.access().len(), 1);
    }

    #[test]
    fn add_wallets_extends_access() {
        let kps = keys(1);
        let newcomer = keys(1);
        let data = vec![9u8; 400];
        let mut payload =
            Payload::build(&data, &publics(&kps), PayloadOptions::v4(), &mut OsRng).unwrap();
        let added = payload
            .add_wallets(&kps[0].private, &publics(&newcomer), &mut OsRng)
            .unwrap();
        assert_eq!(added, vec![true]);
        assert_eq!(payload.plaintext(Some(&newcomer[0].private)).unwrap(), data);

        // Re-adding reports false.
        let again = payload
            .add_wallets(&kps[0].private, &publics(&newcomer), &mut OsRng)
            .unwrap();
        assert_eq!(again, vec![false]);
    }

    #[test]
    fn compression_roundtrips_through_plaintext() {
        let data = b"strand ".repeat(100);
        let payload = Payload::build(
            &data,
            &[],
            PayloadOptions::v4().with_compression(CompressionAlgorithm::Max),
            &mut OsRng,
        )
        .unwrap();
        assert!(payload.compressed());
        assert!(payload.size() < data.len() as u64);
        assert_eq!(payload.plaintext(None).unwrap(), data);
    }

    #[test]
    fn wire_roundtrip_all_versions() {
        let kps = keys(2);
        for version in [TxVersion::V1, TxVersion::V2, TxVersion::V3, TxVersion::V4] {
            let options = crate::manager::resolve_options(version, None);
            let payload =
                Payload::build(&[0xA5u8; 300], &publics(&kps), options, &mut OsRng).unwrap();
            let mut wire = Vec::new();
            payload.serialize(version, &mut wire);
            let mut reader = ByteReader::new(&wire);
            let parsed = Payload::parse(version, &mut reader).unwrap();
            assert!(reader.is_empty());
            let mut rewire = Vec::new();
            parsed.serialize(version, &mut rewire);
            assert_eq!(wire, rewire, "version {:?}", version);
        }
    }

    #[test]
    fn v4_tombstone_wire_roundtrip() {
        let kps = keys(1);
        let mut payload = Payload::build(
            &[3u8; 300],
            &publics(&kps),
            PayloadOptions::v4(),
            &mut OsRng,
        )
        .unwrap();
        payload.remove_wallets(&[derive_address(&kps[0].public)]);
        let mut wire = Vec::new();
        payload.serialize(TxVersion::V4, &mut wire);
        let mut reader = ByteReader::new(&wire);
        let parsed = Payload::parse(TxVersion::V4, &mut reader).unwrap();
        assert!(parsed.encrypted());
        assert!(parsed.access().is_empty());
        assert_eq!(parsed.hash, payload.hash);
    }

    #[test]
    fn truncated_wire_rejected() {
        let payload =
            Payload::build(&[1u8; 64], &[], PayloadOptions::v4(), &mut OsRng).unwrap();
        let mut wire = Vec::new();
        payload.serialize(TxVersion::V4, &mut wire);
        let mut reader = ByteReader::new(&wire[..wire.len() - 1]);
        assert!(Payload::parse(TxVersion::V4, &mut reader).is_err());
    }
}
