//! Version-dispatched transaction assembly, parsing, signing.
//!
//! The builder is a mutable arena; `to_transport` freezes it into an
//! immutable [`Transaction`]. Version differences are dispatched by pattern
//! match on [`TxVersion`], never by trait objects.
//!
//! Wire version tag: versions 1 and 2 are a plain little-endian u32;
//! versions 3 and 4 byte-swap the u32 and set the transaction transport bit.

use rand::{CryptoRng, RngCore};
use strand_crypto::{derive_address, public_from_private, sha256, sign_digest, verify_digest};
use strand_types::{
    PayloadOptions, PrivateKey, PublicKey, TxError, TxHash, WalletAddress, WalletNetwork,
};
use tracing::{debug, warn};

use crate::manager::PayloadManager;
use crate::payload::Payload;
use crate::transaction::Transaction;
use crate::varint::{write_vl, write_vl_bytes, ByteReader};

/// Transport-class bit OR'd into the swapped version word (versions >= 3).
const TRANSPORT_TRANSACTION: u32 = 0x8000_0000;

/// Format version of a transaction record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TxVersion {
    V1,
    V2,
    V3,
    V4,
}

impl TxVersion {
    pub const LATEST: TxVersion = TxVersion::V4;

    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(TxVersion::V1),
            2 => Some(TxVersion::V2),
            3 => Some(TxVersion::V3),
            4 => Some(TxVersion::V4),
            _ => None,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            TxVersion::V1 => 1,
            TxVersion::V2 => 2,
            TxVersion::V3 => 3,
            TxVersion::V4 => 4,
        }
    }

    /// Versions 3 and up carry metadata and the chain link.
    pub fn has_metadata(self) -> bool {
        matches!(self, TxVersion::V3 | TxVersion::V4)
    }

    /// Version 4 tags wallets with an explicit network discriminant.
    pub fn network_tagged(self) -> bool {
        self == TxVersion::V4
    }
}

/// Which serialization view to produce.
#[derive(Clone, Copy, PartialEq, Eq)]
enum View {
    /// Canonical pre-image: excludes the signature block entirely.
    Signing,
    /// Full record: includes the signature block (zero-length when unsigned).
    Hashing,
}

/// Mutable, version-tagged transaction under construction.
#[derive(Clone, Debug)]
pub struct TxBuilder {
    version: TxVersion,
    recipients: Vec<PublicKey>,
    prev_tx_hash: TxHash,
    metadata: Option<String>,
    timestamp: u64,
    signature: Option<Vec<u8>>,
    sender: Option<PublicKey>,
    tx_id: Option<TxHash>,
    manager: PayloadManager,
}

impl TxBuilder {
    /// Allocate an empty builder for the given version.
    pub fn build(version: TxVersion) -> Self {
        Self {
            version,
            recipients: Vec::new(),
            prev_tx_hash: TxHash::ZERO,
            metadata: None,
            timestamp: 0,
            signature: None,
            sender: None,
            tx_id: None,
            manager: PayloadManager::new(version),
        }
    }

    /// Reassemble a builder from already-decoded parts, as produced by a
    /// structural model. The id is recomputed; the signature is stored as
    /// given and can be checked with [`TxBuilder::verify`].
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        version: TxVersion,
        recipients: Vec<PublicKey>,
        prev_tx_hash: TxHash,
        metadata: Option<String>,
        timestamp: u64,
        signature: Option<Vec<u8>>,
        sender: Option<PublicKey>,
        payloads: Vec<Payload>,
    ) -> Result<Self, TxError> {
        if signature.is_some() != (timestamp > 0) || signature.is_some() != sender.is_some() {
            return Err(TxError::malformed("signature, sender and timestamp disagree"));
        }
        let mut builder = Self {
            version,
            recipients,
            prev_tx_hash,
            metadata,
            timestamp,
            signature,
            sender,
            tx_id: None,
            manager: PayloadManager::from_payloads(version, payloads),
        };
        if builder.signature.is_some() {
            builder.tx_id = Some(TxHash::new(sha256(&builder.serialize(View::Hashing))));
        }
        Ok(builder)
    }

    pub fn version(&self) -> TxVersion {
        self.version
    }

    pub fn payload_manager(&self) -> &PayloadManager {
        &self.manager
    }

    /// Mutable payload access; any change invalidates an existing signature.
    pub fn payload_manager_mut(&mut self) -> &mut PayloadManager {
        self.reset_signed_fields();
        &mut self.manager
    }

    /// Add a payload. Version 1 has no per-payload recipient override: the
    /// access list is always the transaction-level recipient set and the
    /// `wallets` argument must be empty.
    pub fn add_payload<R: RngCore + CryptoRng>(
        &mut self,
        data: &[u8],
        wallets: &[WalletAddress],
        options: Option<PayloadOptions>,
        rng: &mut R,
    ) -> Result<u32, TxError> {
        self.reset_signed_fields();
        if self.version == TxVersion::V1 {
            if !wallets.is_empty() {
                return Err(TxError::NotSupported(1));
            }
            let recipients: Vec<WalletAddress> =
                self.recipients.iter().map(derive_address).collect();
            return self.manager.add_payload(data, &recipients, options, rng);
        }
        self.manager.add_payload(data, wallets, options, rng)
    }

    /// Set the transaction-level recipient list.
    ///
    /// For version 1 this also fixes payload access, so it must happen
    /// before any payload is added.
    pub fn set_recipients(&mut self, wallets: &[WalletAddress]) -> Result<(), TxError> {
        if self.version == TxVersion::V1 && self.manager.payload_count() > 0 {
            return Err(TxError::NotSupported(1));
        }
        let recipients = self.manager.check_wallets(wallets)?;
        self.reset_signed_fields();
        self.recipients = recipients;
        Ok(())
    }

    pub fn recipients(&self) -> Vec<WalletAddress> {
        self.recipients.iter().map(derive_address).collect()
    }

    pub fn recipient_keys(&self) -> &[PublicKey] {
        &self.recipients
    }

    /// Link this transaction to its predecessor by hash (versions >= 3).
    pub fn set_prev_tx_hash(&mut self, hash: TxHash) -> Result<(), TxError> {
        if !self.version.has_metadata() {
            return Err(TxError::NotSupported(self.version.as_u32()));
        }
        self.reset_signed_fields();
        self.prev_tx_hash = hash;
        Ok(())
    }

    pub fn prev_tx_hash(&self) -> TxHash {
        self.prev_tx_hash
    }

    /// Attach opaque JSON metadata (versions >= 3). The value is stored in
    /// compact form so later serializations are byte-stable.
    pub fn set_metadata(&mut self, metadata: &str) -> Result<(), TxError> {
        if !self.version.has_metadata() {
            return Err(TxError::NotSupported(self.version.as_u32()));
        }
        let value: serde_json::Value = serde_json::from_str(metadata)
            .map_err(|e| TxError::BadMetadata(e.to_string()))?;
        if !value.is_object() {
            return Err(TxError::BadMetadata("expected a JSON object".into()));
        }
        let compact =
            serde_json::to_string(&value).map_err(|e| TxError::BadMetadata(e.to_string()))?;
        self.reset_signed_fields();
        self.metadata = Some(compact);
        Ok(())
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// The `RegisterId` field of the metadata, when present.
    pub fn register_id(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(self.metadata.as_deref()?).ok()?;
        Some(value.get("RegisterId")?.as_str()?.to_string())
    }

    pub fn timestamp(&self) -> Option<u64> {
        if self.signature.is_some() {
            Some(self.timestamp)
        } else {
            None
        }
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn sender(&self) -> Option<&PublicKey> {
        self.sender.as_ref()
    }

    pub fn tx_id(&self) -> Option<TxHash> {
        self.tx_id
    }

    /// Sign the canonical pre-image: stamp the timestamp, sign the double
    /// SHA-256 digest, derive the sender wallet, then fix the id as the
    /// SHA-256 of the fully assembled record.
    pub fn sign(&mut self, key: &PrivateKey) -> Result<(), TxError> {
        self.timestamp = unix_now();
        let digest = strand_crypto::double_sha256(&self.serialize(View::Signing));
        self.signature = Some(sign_digest(key, &digest)?);
        self.sender = Some(public_from_private(key)?);
        let id = TxHash::new(sha256(&self.serialize(View::Hashing)));
        self.tx_id = Some(id);
        debug!(version = self.version.as_u32(), tx_id = %id, "transaction signed");
        Ok(())
    }

    /// Verify the embedded signature against the recomputed pre-image.
    pub fn verify(&self) -> Result<(), TxError> {
        let signature = self.signature.as_ref().ok_or(TxError::NotSigned)?;
        let sender = self.sender.as_ref().ok_or(TxError::NotSigned)?;
        let digest = strand_crypto::double_sha256(&self.serialize(View::Signing));
        verify_digest(sender, &digest, signature)
    }

    /// Freeze the builder state into an immutable transport snapshot.
    pub fn to_transport(&self) -> Transaction {
        Transaction {
            version: self.version.as_u32(),
            tx_id: self.tx_id,
            register_id: self.register_id(),
            data: self.serialize(View::Hashing),
        }
    }

    fn reset_signed_fields(&mut self) {
        if self.signature.is_some() {
            debug!("mutation after signing; signature discarded");
        }
        self.signature = None;
        self.sender = None;
        self.tx_id = None;
        self.timestamp = 0;
    }

    // --- serialization ---------------------------------------------------

    fn write_version(&self, out: &mut Vec<u8>) {
        let word = match self.version {
            TxVersion::V1 | TxVersion::V2 => self.version.as_u32(),
            TxVersion::V3 | TxVersion::V4 => {
                (self.version.as_u32() | TRANSPORT_TRANSACTION).swap_bytes()
            }
        };
        out.extend_from_slice(&word.to_le_bytes());
    }

    fn write_signature_block(&self, out: &mut Vec<u8>) {
        match (&self.signature, &self.sender) {
            (Some(signature), Some(sender)) => {
                write_vl_bytes(out, signature);
                if self.version.network_tagged() {
                    out.push(sender.network.id());
                    write_vl_bytes(out, &sender.bytes);
                } else if self.version == TxVersion::V3 {
                    write_vl_bytes(out, &sender.bytes);
                } else {
                    out.extend_from_slice(&sender.bytes);
                }
            }
            _ => write_vl(out, 0),
        }
    }

    fn serialize(&self, view: View) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_version(&mut out);
        match self.version {
            TxVersion::V1 | TxVersion::V2 => {
                write_vl(&mut out, self.recipients.len() as u64);
                for recipient in &self.recipients {
                    out.extend_from_slice(&recipient.bytes);
                }
                out.extend_from_slice(&self.timestamp.to_le_bytes());
                if view == View::Hashing {
                    self.write_signature_block(&mut out);
                }
            }
            TxVersion::V3 => {
                write_vl_bytes(&mut out, self.prev_tx_hash.as_bytes());
                write_vl(&mut out, self.recipients.len() as u64);
                for recipient in &self.recipients {
                    write_vl_bytes(&mut out, &recipient.bytes);
                }
                out.extend_from_slice(&self.timestamp.to_le_bytes());
                write_vl_bytes(
                    &mut out,
                    self.metadata.as_deref().unwrap_or_default().as_bytes(),
                );
                if view == View::Hashing {
                    self.write_signature_block(&mut out);
                }
            }
            TxVersion::V4 => {
                let mut header = Vec::new();
                write_vl_bytes(&mut header, self.prev_tx_hash.as_bytes());
                write_vl(&mut header, self.recipients.len() as u64);
                for recipient in &self.recipients {
                    header.push(recipient.network.id());
                    write_vl_bytes(&mut header, &recipient.bytes);
                }
                header.extend_from_slice(&self.timestamp.to_le_bytes());
                write_vl_bytes(
                    &mut header,
                    self.metadata.as_deref().unwrap_or_default().as_bytes(),
                );
                write_vl_bytes(&mut out, &header);
                if view == View::Hashing {
                    self.write_signature_block(&mut out);
                }
            }
        }
        write_vl(&mut out, self.manager.payload_count() as u64);
        for payload in self.manager.payloads() {
            payload.serialize(self.version, &mut out);
        }
        out
    }

    // --- parsing ---------------------------------------------------------

    /// Parse wire bytes back into an equivalent, independent builder.
    ///
    /// All-or-nothing: any structural violation rejects the whole record.
    pub fn parse(data: &[u8]) -> Result<Self, TxError> {
        if data.is_empty() {
            return Err(TxError::NoTransaction);
        }
        let mut reader = ByteReader::new(data);
        let raw = reader.read_u32_le()?;
        let version = match raw {
            1 | 2 => TxVersion::from_u32(raw),
            _ => {
                let swapped = raw.swap_bytes();
                if swapped & TRANSPORT_TRANSACTION == 0 {
                    None
                } else {
                    TxVersion::from_u32(swapped & !TRANSPORT_TRANSACTION)
                }
            }
        }
        .ok_or_else(|| {
            warn!(word = raw, "unknown version tag");
            TxError::UnsupportedVersion(raw.swap_bytes() & !TRANSPORT_TRANSACTION)
        })?;

        let mut builder = TxBuilder::build(version);
        match version {
            TxVersion::V1 | TxVersion::V2 => {
                let count = reader.read_vl()?;
                for _ in 0..count {
                    let bytes = reader.read_bytes(32)?.to_vec();
                    builder
                        .recipients
                        .push(PublicKey::new(WalletNetwork::Ed25519, bytes));
                }
                builder.timestamp = reader.read_u64_le()?;
                let signature = reader.read_vl_bytes()?.to_vec();
                if !signature.is_empty() {
                    let sender = reader.read_bytes(32)?.to_vec();
                    builder.signature = Some(signature);
                    builder.sender = Some(PublicKey::new(WalletNetwork::Ed25519, sender));
                }
            }
            TxVersion::V3 => {
                builder.prev_tx_hash = TxHash::from_slice(reader.read_vl_bytes()?)
                    .ok_or_else(|| TxError::malformed("bad previous hash length"))?;
                let count = reader.read_vl()?;
                for _ in 0..count {
                    let bytes = reader.read_vl_bytes()?.to_vec();
                    builder
                        .recipients
                        .push(PublicKey::new(WalletNetwork::Ed25519, bytes));
                }
                builder.timestamp = reader.read_u64_le()?;
                builder.metadata = read_metadata(&mut reader)?;
                let signature = reader.read_vl_bytes()?.to_vec();
                if !signature.is_empty() {
                    let sender = reader.read_vl_bytes()?.to_vec();
                    builder.signature = Some(signature);
                    builder.sender = Some(PublicKey::new(WalletNetwork::Ed25519, sender));
                }
            }
            TxVersion::V4 => {
                let header = reader.read_vl_bytes()?;
                let mut header_reader = ByteReader::new(header);
                builder.prev_tx_hash = TxHash::from_slice(header_reader.read_vl_bytes()?)
                    .ok_or_else(|| TxError::malformed("bad previous hash length"))?;
                let count = header_reader.read_vl()?;
                for _ in 0..count {
                    let network = WalletNetwork::from_id(header_reader.read_u8()?)
                        .ok_or_else(|| TxError::malformed("unknown wallet network"))?;
                    let bytes = header_reader.read_vl_bytes()?.to_vec();
                    builder.recipients.push(PublicKey::new(network, bytes));
                }
                builder.timestamp = header_reader.read_u64_le()?;
                builder.metadata = read_metadata(&mut header_reader)?;
                if !header_reader.is_empty() {
                    return Err(TxError::malformed("trailing bytes in header block"));
                }
                let signature = reader.read_vl_bytes()?.to_vec();
                if !signature.is_empty() {
                    let network = WalletNetwork::from_id(reader.read_u8()?)
                        .ok_or_else(|| TxError::malformed("unknown wallet network"))?;
                    let bytes = reader.read_vl_bytes()?.to_vec();
                    builder.signature = Some(signature);
                    builder.sender = Some(PublicKey::new(network, bytes));
                }
            }
        }

        // A signature needs its timestamp and vice versa.
        if builder.signature.is_some() != (builder.timestamp > 0) {
            return Err(TxError::malformed("signature and timestamp disagree"));
        }

        let payload_count = reader.read_vl()?;
        let mut payloads = Vec::new();
        for _ in 0..payload_count {
            payloads.push(Payload::parse(version, &mut reader)?);
        }
        if !reader.is_empty() {
            return Err(TxError::malformed("trailing bytes after payloads"));
        }
        builder.manager = PayloadManager::from_payloads(version, payloads);

        if builder.signature.is_some() {
            builder.verify()?;
            builder.tx_id = Some(TxHash::new(sha256(data)));
        }
        Ok(builder)
    }

    /// Parse the wire bytes of a transport snapshot.
    pub fn from_transaction(tx: &Transaction) -> Result<Self, TxError> {
        let builder = Self::parse(&tx.data)?;
        if builder.version.as_u32() != tx.version {
            return Err(TxError::malformed("version field disagrees with wire tag"));
        }
        Ok(builder)
    }
}

fn read_metadata(reader: &mut ByteReader) -> Result<Option<String>, TxError> {
    let bytes = reader.read_vl_bytes()?;
    if bytes.is_empty() {
        return Ok(None);
    }
    let text =
        String::from_utf8(bytes.to_vec()).map_err(|_| TxError::malformed("metadata not utf-8"))?;
    Ok(Some(text))
}

fn unix_now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;
    use strand_crypto::generate_keypair;

    fn wallets(n: usize) -> (Vec<strand_types::KeyPair>, Vec<WalletAddress>) {
        let kps: Vec<_> = (0..n)
            .map(|_| generate_keypair(WalletNetwork::Ed25519, &mut OsRng).unwrap())
            .collect();
        let addrs = kps.iter().map(|kp| derive_address(&kp.public)).collect();
        (kps, addrs)
    }

    #[test]
    fn empty_builder_roundtrips_every_version() {
        for version in [TxVersion::V1, TxVersion::V2, TxVersion::V3, TxVersion::V4] {
            let builder = TxBuilder::build(version);
            let tx = builder.to_transport();
            assert_eq!(tx.version, version.as_u32());
            assert!(tx.tx_id.is_none());
            let parsed = TxBuilder::parse(&tx.data).unwrap();
            assert_eq!(parsed.to_transport().data, tx.data);
        }
    }

    #[test]
    fn unknown_version_rejected() {
        let mut data = 9u32.to_le_bytes().to_vec();
        data.push(0);
        assert!(matches!(
            TxBuilder::parse(&data),
            Err(TxError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn empty_input_is_no_transaction() {
        assert!(matches!(
            TxBuilder::parse(&[]),
            Err(TxError::NoTransaction)
        ));
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let (kps, addrs) = wallets(2);
        let mut builder = TxBuilder::build(TxVersion::V4);
        builder.set_recipients(&addrs).unwrap();
        builder
            .add_payload(&[1u8; 300], &addrs, None, &mut OsRng)
            .unwrap();
        builder
            .set_metadata(r#"{"RegisterId":"reg-7"}"#)
            .unwrap();
        builder.sign(&kps[0].private).unwrap();
        assert!(builder.verify().is_ok());
        assert!(builder.tx_id().is_some());
        assert_eq!(builder.sender().unwrap(), &kps[0].public);

        let tx = builder.to_transport();
        assert_eq!(tx.register_id.as_deref(), Some("reg-7"));
        let parsed = TxBuilder::parse(&tx.data).unwrap();
        assert!(parsed.verify().is_ok());
        assert_eq!(parsed.tx_id(), tx.tx_id);
        assert_eq!(parsed.to_transport().data, tx.data);
    }

    #[test]
    fn unsigned_verify_reports_not_signed() {
        let builder = TxBuilder::build(TxVersion::V3);
        assert_eq!(builder.verify(), Err(TxError::NotSigned));
    }

    #[test]
    fn mutation_resets_signature() {
        let (kps, addrs) = wallets(1);
        let mut builder = TxBuilder::build(TxVersion::V4);
        builder.sign(&kps[0].private).unwrap();
        assert!(builder.tx_id().is_some());
        builder.set_recipients(&addrs).unwrap();
        assert!(builder.tx_id().is_none());
        assert_eq!(builder.verify(), Err(TxError::NotSigned));
        assert!(builder.timestamp().is_none());
    }

    #[test]
    fn tampered_wire_fails_verification() {
        let (kps, _) = wallets(1);
        let mut builder = TxBuilder::build(TxVersion::V4);
        builder
            .add_payload(b"payload body", &[], None, &mut OsRng)
            .unwrap();
        builder.sign(&kps[0].private).unwrap();
        let mut data = builder.to_transport().data;
        let last = data.len() - 1;
        data[last] ^= 0xFF;
        assert!(TxBuilder::parse(&data).is_err());
    }

    #[test]
    fn prev_hash_only_from_v3() {
        let mut builder = TxBuilder::build(TxVersion::V2);
        assert!(builder.set_prev_tx_hash(TxHash::new([1u8; 32])).is_err());
        let mut builder = TxBuilder::build(TxVersion::V3);
        builder.set_prev_tx_hash(TxHash::new([1u8; 32])).unwrap();
        let tx = builder.to_transport();
        let parsed = TxBuilder::parse(&tx.data).unwrap();
        assert_eq!(parsed.prev_tx_hash(), TxHash::new([1u8; 32]));
    }

    #[test]
    fn metadata_rejected_below_v3() {
        let mut builder = TxBuilder::build(TxVersion::V1);
        assert!(builder.set_metadata(r#"{"RegisterId":"x"}"#).is_err());
    }

    #[test]
    fn metadata_must_be_json_object() {
        let mut builder = TxBuilder::build(TxVersion::V4);
        assert!(matches!(
            builder.set_metadata("not json"),
            Err(TxError::BadMetadata(_))
        ));
        assert!(matches!(
            builder.set_metadata("[1,2]"),
            Err(TxError::BadMetadata(_))
        ));
    }

    #[test]
    fn v1_payload_access_follows_recipients() {
        let (_, addrs) = wallets(2);
        let mut builder = TxBuilder::build(TxVersion::V1);
        builder.set_recipients(&addrs).unwrap();
        let id = builder.add_payload(&[5u8; 64], &[], None, &mut OsRng).unwrap();
        let info = &builder.payload_manager().get_payloads_info()[id as usize - 1];
        assert_eq!(info.wallets, addrs);

        // Recipients are frozen once payloads exist.
        assert!(builder.set_recipients(&addrs[..1]).is_err());
        // And per-payload overrides are not a version-1 concept.
        assert!(builder
            .add_payload(&[5u8; 64], &addrs[..1], None, &mut OsRng)
            .is_err());
    }

    #[test]
    fn signed_wire_roundtrips_for_all_versions() {
        let (kps, addrs) = wallets(2);
        for version in [TxVersion::V1, TxVersion::V2, TxVersion::V3, TxVersion::V4] {
            let mut builder = TxBuilder::build(version);
            builder.set_recipients(&addrs).unwrap();
            if version == TxVersion::V1 {
                builder.add_payload(&[9u8; 128], &[], None, &mut OsRng).unwrap();
            } else {
                builder
                    .add_payload(&[9u8; 128], &addrs[..1], None, &mut OsRng)
                    .unwrap();
            }
            builder.sign(&kps[0].private).unwrap();
            let tx = builder.to_transport();
            let parsed = TxBuilder::parse(&tx.data).unwrap();
            assert_eq!(parsed.to_transport().data, tx.data, "version {:?}", version);
            assert!(parsed.verify().is_ok());
        }
    }

    #[test]
    fn signature_without_timestamp_rejected() {
        let (kps, _) = wallets(1);
        let mut builder = TxBuilder::build(TxVersion::V4);
        builder.sign(&kps[0].private).unwrap();
        let mut data = builder.to_transport().data;
        // Zero the timestamp inside the header block; layout: version(4) +
        // header VL prefix(1) + prev hash VL(1+32) + recipient count(1).
        let ts_offset = 4 + 1 + 33 + 1;
        for b in &mut data[ts_offset..ts_offset + 8] {
            *b = 0;
        }
        assert!(TxBuilder::parse(&data).is_err());
    }
}
