//! Payload collection management for a transaction under construction.
//!
//! Payload ids are 1-based and stable for the life of the builder.

use rand::{CryptoRng, RngCore};
use strand_crypto::decode_address;
use strand_types::{
    CompressionAlgorithm, EncryptionAlgorithm, HashAlgorithm, PayloadOptions, PayloadType,
    PrivateKey, PublicKey, TxError, WalletAddress,
};

use crate::builder::TxVersion;
use crate::payload::Payload;

/// Descriptive snapshot of one payload, as reported by `get_payloads_info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadInfo {
    pub payload_id: u32,
    pub size: u64,
    pub encrypted: bool,
    pub compressed: bool,
    pub protected: bool,
    pub hash: HashAlgorithm,
    pub encryption: EncryptionAlgorithm,
    pub compression: CompressionAlgorithm,
    pub payload_type: PayloadType,
    pub user_tag: u16,
    pub wallet_count: usize,
    pub wallets: Vec<WalletAddress>,
}

/// Owns the payload list of one builder.
#[derive(Clone, Debug)]
pub struct PayloadManager {
    version: TxVersion,
    payloads: Vec<Payload>,
}

/// Clamp requested options to what a format version can express.
pub(crate) fn resolve_options(version: TxVersion, options: Option<PayloadOptions>) -> PayloadOptions {
    match version {
        TxVersion::V1 | TxVersion::V2 => PayloadOptions::legacy(),
        TxVersion::V3 => {
            let requested = options.unwrap_or_else(PayloadOptions::v3);
            // Only hash and compression are selectable in version 3.
            PayloadOptions::v3()
                .with_hash(requested.hash)
                .with_compression(requested.compression)
        }
        TxVersion::V4 => options.unwrap_or_else(PayloadOptions::v4),
    }
}

impl PayloadManager {
    pub(crate) fn new(version: TxVersion) -> Self {
        Self {
            version,
            payloads: Vec::new(),
        }
    }

    pub(crate) fn from_payloads(version: TxVersion, payloads: Vec<Payload>) -> Self {
        Self { version, payloads }
    }

    pub fn version(&self) -> TxVersion {
        self.version
    }

    pub fn payload_count(&self) -> u32 {
        self.payloads.len() as u32
    }

    pub fn payloads(&self) -> &[Payload] {
        &self.payloads
    }

    /// Decode and deduplicate wallet addresses, rejecting invalid ones.
    pub(crate) fn check_wallets(
        &self,
        wallets: &[WalletAddress],
    ) -> Result<Vec<PublicKey>, TxError> {
        let mut keys: Vec<PublicKey> = Vec::with_capacity(wallets.len());
        for wallet in wallets {
            let key = decode_address(wallet.as_str())?;
            if self.version != TxVersion::V4 && key.network != strand_types::WalletNetwork::Ed25519
            {
                return Err(TxError::InvalidWallet(wallet.as_str().to_string()));
            }
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    /// Add a payload; returns its 1-based id.
    pub fn add_payload<R: RngCore + CryptoRng>(
        &mut self,
        data: &[u8],
        wallets: &[WalletAddress],
        options: Option<PayloadOptions>,
        rng: &mut R,
    ) -> Result<u32, TxError> {
        let recipients = self.check_wallets(wallets)?;
        let options = resolve_options(self.version, options);
        let payload = Payload::build(data, &recipients, options, rng)?;
        self.payloads.push(payload);
        Ok(self.payloads.len() as u32)
    }

    pub fn get_payload(&self, payload_id: u32) -> Result<&Payload, TxError> {
        self.index(payload_id).map(|i| &self.payloads[i])
    }

    /// Recover one payload's plaintext. Encrypted payloads need a private
    /// key holding a live challenge.
    pub fn get_payload_data(
        &self,
        payload_id: u32,
        key: Option<&PrivateKey>,
    ) -> Result<Vec<u8>, TxError> {
        self.get_payload(payload_id)?.plaintext(key)
    }

    /// Remove one wallet's challenge; `Ok(true)` when a challenge existed.
    pub fn remove_payload_wallet(
        &mut self,
        payload_id: u32,
        wallet: &WalletAddress,
    ) -> Result<bool, TxError> {
        Ok(self
            .remove_payload_wallets(payload_id, std::slice::from_ref(wallet))?
            .remove(0))
    }

    /// Remove challenges for several wallets; results align with the input.
    ///
    /// Removing every challenge leaves a redaction tombstone, not an error.
    pub fn remove_payload_wallets(
        &mut self,
        payload_id: u32,
        wallets: &[WalletAddress],
    ) -> Result<Vec<bool>, TxError> {
        let index = self.index(payload_id)?;
        if self.payloads[index].protected() {
            return Err(TxError::PayloadProtected);
        }
        Ok(self.payloads[index].remove_wallets(wallets))
    }

    /// Grant additional wallets access, unwrapping the content key with a
    /// key that already holds a challenge.
    pub fn add_payload_wallets<R: RngCore + CryptoRng>(
        &mut self,
        payload_id: u32,
        key: &PrivateKey,
        wallets: &[WalletAddress],
        rng: &mut R,
    ) -> Result<Vec<bool>, TxError> {
        let recipients = self.check_wallets(wallets)?;
        let index = self.index(payload_id)?;
        if self.payloads[index].protected() {
            return Err(TxError::PayloadProtected);
        }
        self.payloads[index].add_wallets(key, &recipients, rng)
    }

    /// Per-payload attribute snapshot.
    pub fn get_payloads_info(&self) -> Vec<PayloadInfo> {
        self.payloads
            .iter()
            .enumerate()
            .map(|(i, payload)| {
                let options = payload.options();
                PayloadInfo {
                    payload_id: i as u32 + 1,
                    size: payload.size(),
                    encrypted: payload.encrypted(),
                    compressed: payload.compressed(),
                    protected: payload.protected(),
                    hash: options.hash,
                    encryption: if payload.encrypted() {
                        options.encryption
                    } else {
                        EncryptionAlgorithm::None
                    },
                    compression: options.compression,
                    payload_type: options.payload_type,
                    user_tag: options.user_tag,
                    wallet_count: payload.access().len(),
                    wallets: payload.wallets(),
                }
            })
            .collect()
    }

    /// Recompute every verifiable stored digest.
    pub fn verify_all_payloads(&self) -> bool {
        self.payloads.iter().all(Payload::verify_hash)
    }

    /// Ids of payloads this wallet can currently read.
    pub fn accessible_payloads(&self, wallet: &WalletAddress) -> Vec<u32> {
        self.filter_ids(|p| !p.encrypted() || p.wallets().contains(wallet))
    }

    /// Ids of payloads this wallet cannot read (including tombstones).
    pub fn inaccessible_payloads(&self, wallet: &WalletAddress) -> Vec<u32> {
        self.filter_ids(|p| p.encrypted() && !p.wallets().contains(wallet))
    }

    fn filter_ids(&self, predicate: impl Fn(&Payload) -> bool) -> Vec<u32> {
        self.payloads
            .iter()
            .enumerate()
            .filter(|(_, p)| predicate(p))
            .map(|(i, _)| i as u32 + 1)
            .collect()
    }

    fn index(&self, payload_id: u32) -> Result<usize, TxError> {
        if payload_id == 0 || payload_id as usize > self.payloads.len() {
            return Err(TxError::BadPayloadId(payload_id));
        }
        Ok(payload_id as usize - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use strand_crypto::{derive_address, generate_keypair};
    use strand_types::WalletNetwork;

    fn wallet_keys(n: usize) -> (Vec<strand_types::KeyPair>, Vec<WalletAddress>) {
        let kps: Vec<_> = (0..n)
            .map(|_| generate_keypair(WalletNetwork::Ed25519, &mut OsRng).unwrap())
            .collect();
        let addrs = kps.iter().map(|kp| derive_address(&kp.public)).collect();
        (kps, addrs)
    }

    #[test]
    fn ids_are_one_based() {
        let mut manager = PayloadManager::new(TxVersion::V4);
        let id = manager.add_payload(b"first", &[], None, &mut OsRng).unwrap();
        assert_eq!(id, 1);
        let id = manager.add_payload(b"second", &[], None, &mut OsRng).unwrap();
        assert_eq!(id, 2);
        assert!(manager.get_payload(0).is_err());
        assert!(manager.get_payload(3).is_err());
    }

    #[test]
    fn duplicate_wallets_collapse() {
        let (_, addrs) = wallet_keys(1);
        let mut manager = PayloadManager::new(TxVersion::V4);
        let both = vec![addrs[0].clone(), addrs[0].clone()];
        let id = manager
            .add_payload(&[1u8; 300], &both, None, &mut OsRng)
            .unwrap();
        assert_eq!(manager.get_payload(id).unwrap().access().len(), 1);
    }

    #[test]
    fn invalid_wallet_rejected() {
        let mut manager = PayloadManager::new(TxVersion::V4);
        let bad = WalletAddress::new("ws1notavalidaddress");
        assert!(matches!(
            manager.add_payload(b"x", &[bad], None, &mut OsRng),
            Err(TxError::InvalidWallet(_))
        ));
    }

    #[test]
    fn remove_wallets_order_aligned() {
        let (_, addrs) = wallet_keys(3);
        let mut manager = PayloadManager::new(TxVersion::V4);
        let id = manager
            .add_payload(&[1u8; 300], &addrs, None, &mut OsRng)
            .unwrap();
        let (_, other) = wallet_keys(1);
        let removed = manager
            .remove_payload_wallets(id, &[addrs[2].clone(), other[0].clone(), addrs[0].clone()])
            .unwrap();
        assert_eq!(removed, vec![true, false, true]);
        let info = &manager.get_payloads_info()[0];
        assert_eq!(info.wallet_count, 1);
        assert_eq!(info.wallets, vec![addrs[1].clone()]);
    }

    #[test]
    fn protected_payload_refuses_access_changes() {
        let (kps, addrs) = wallet_keys(1);
        let mut manager = PayloadManager::new(TxVersion::V4);
        let id = manager
            .add_payload(
                &[1u8; 300],
                &addrs,
                Some(PayloadOptions::v4().protected()),
                &mut OsRng,
            )
            .unwrap();
        assert_eq!(
            manager.remove_payload_wallet(id, &addrs[0]),
            Err(TxError::PayloadProtected)
        );
        assert_eq!(
            manager.add_payload_wallets(id, &kps[0].private, &addrs, &mut OsRng),
            Err(TxError::PayloadProtected)
        );
    }

    #[test]
    fn info_reports_attributes() {
        let (_, addrs) = wallet_keys(2);
        let mut manager = PayloadManager::new(TxVersion::V4);
        manager
            .add_payload(&vec![0x55u8; 1024], &addrs, None, &mut OsRng)
            .unwrap();
        let info = &manager.get_payloads_info()[0];
        assert!(info.encrypted);
        assert!(!info.protected);
        assert_eq!(info.hash, HashAlgorithm::Blake2b256);
        assert_eq!(info.encryption, EncryptionAlgorithm::XChaCha20Poly1305);
        assert_eq!(info.wallet_count, 2);
    }

    #[test]
    fn unencrypted_payload_reports_no_cipher() {
        let mut manager = PayloadManager::new(TxVersion::V4);
        manager.add_payload(b"plain", &[], None, &mut OsRng).unwrap();
        let info = &manager.get_payloads_info()[0];
        assert!(!info.encrypted);
        assert_eq!(info.encryption, EncryptionAlgorithm::None);
    }

    #[test]
    fn accessibility_queries() {
        let (kps, addrs) = wallet_keys(2);
        let mut manager = PayloadManager::new(TxVersion::V4);
        manager.add_payload(b"open", &[], None, &mut OsRng).unwrap();
        let secret = manager
            .add_payload(&[2u8; 300], &addrs[..1], None, &mut OsRng)
            .unwrap();
        assert_eq!(manager.accessible_payloads(&addrs[0]), vec![1, 2]);
        assert_eq!(manager.accessible_payloads(&addrs[1]), vec![1]);
        assert_eq!(manager.inaccessible_payloads(&addrs[1]), vec![2]);

        // Redact, then nobody reaches payload 2.
        manager
            .remove_payload_wallet(secret, &addrs[0])
            .unwrap();
        assert_eq!(manager.accessible_payloads(&addrs[0]), vec![1]);
        assert!(manager
            .get_payload_data(secret, Some(&kps[0].private))
            .is_err());
    }

    #[test]
    fn verify_all_payloads_detects_corruption() {
        let mut manager = PayloadManager::new(TxVersion::V3);
        manager.add_payload(b"content", &[], None, &mut OsRng).unwrap();
        assert!(manager.verify_all_payloads());
        manager.payloads[0].data[0] ^= 0xFF;
        assert!(!manager.verify_all_payloads());
    }

    #[test]
    fn legacy_versions_clamp_options() {
        let opts = resolve_options(
            TxVersion::V2,
            Some(PayloadOptions::v4().with_hash(HashAlgorithm::Blake2b512)),
        );
        assert_eq!(opts.hash, HashAlgorithm::Sha256);
        assert_eq!(opts.compression, CompressionAlgorithm::None);
    }
}
