//! Version-aware JSON rendering and parsing of the structural model.
//!
//! The JSON key set is conditional: `Signature`, `SenderWallet` and
//! `TimeStamp` appear only on signed transactions, `MetaData` only when
//! metadata was set, while `TxId` and `PrevTxId` are always present
//! (explicitly null / zero-hash when unassigned). Payload data is hex for
//! versions 1 and 2 and base64 from version 3 on; version 4 wallets carry
//! an explicit network discriminant.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use strand_transactions::flags::{
    combined, pack_options, pack_type, split_combined, unpack_options, unpack_type,
    FLAG_COMPRESSED, FLAG_ENCRYPTED, FLAG_PROTECTED,
};
use strand_transactions::payload::infer_hash;
use strand_transactions::TxVersion;
use strand_types::{PayloadOptions, TxError, TxHash, WalletAddress};

use crate::model::{ChallengeModel, PayloadModel, TransactionModel, WalletModel};

// --- rendering -----------------------------------------------------------

pub(crate) fn value_from_model(model: &TransactionModel) -> Result<Value, TxError> {
    let version = version_of(model.version)?;
    let mut root = Map::new();
    root.insert("Version".into(), json!(model.version));
    root.insert(
        "TxId".into(),
        model
            .tx_id
            .map(|id| json!(id.to_string()))
            .unwrap_or(Value::Null),
    );
    if version.has_metadata() {
        let prev = model.prev_tx_id.unwrap_or(TxHash::ZERO);
        root.insert("PrevTxId".into(), json!(prev.to_string()));
    }
    if let Some(sender) = &model.sender {
        root.insert("SenderWallet".into(), wallet_value(version, sender)?);
    }
    let recipients = model
        .recipients
        .iter()
        .map(|w| wallet_value(version, w))
        .collect::<Result<Vec<_>, _>>()?;
    root.insert("RecipientsWallets".into(), Value::Array(recipients));
    if let Some(ts) = model.timestamp {
        root.insert("TimeStamp".into(), json!(render_timestamp(ts)?));
    }
    if let Some(metadata) = &model.metadata {
        let value: Value = serde_json::from_str(metadata)
            .map_err(|e| TxError::BadMetadata(e.to_string()))?;
        root.insert("MetaData".into(), value);
    }
    if let Some(signature) = &model.signature {
        root.insert("Signature".into(), json!(hex::encode(signature)));
    }
    root.insert("PayloadCount".into(), json!(model.payload_count));
    let payloads = model
        .payloads
        .iter()
        .map(|p| payload_value(version, p))
        .collect::<Result<Vec<_>, _>>()?;
    root.insert("Payloads".into(), Value::Array(payloads));
    Ok(Value::Object(root))
}

fn wallet_value(version: TxVersion, wallet: &WalletModel) -> Result<Value, TxError> {
    match version {
        TxVersion::V1 | TxVersion::V2 => Ok(json!(hex::encode(&wallet.public_key))),
        TxVersion::V3 => Ok(json!(wallet.address()?.as_str())),
        TxVersion::V4 => Ok(json!({
            "Wallet": wallet.address()?.as_str(),
            "Network": wallet.network,
        })),
    }
}

fn payload_value(version: TxVersion, payload: &PayloadModel) -> Result<Value, TxError> {
    let (type_word, options_word) = split_combined(payload.flags);
    let (flags16, hash_alg, _, _) = unpack_options(options_word)?;
    let (payload_type, user_tag) = unpack_type(type_word);
    let mut out = Map::new();
    out.insert("Size".into(), json!(payload.size));
    match version {
        TxVersion::V1 | TxVersion::V2 | TxVersion::V3 => {
            out.insert("Flags".into(), json!(format!("0x{:04x}", flags16)));
            out.insert("Hash".into(), json!(hex::encode(&payload.hash)));
        }
        TxVersion::V4 => {
            out.insert(
                "PayloadFlags".into(),
                json!({
                    "Protected": flags16 & FLAG_PROTECTED != 0,
                    "Compressed": flags16 & FLAG_COMPRESSED != 0,
                    "Encrypted": flags16 & FLAG_ENCRYPTED != 0,
                }),
            );
            out.insert(
                "PayloadOptions".into(),
                json!(format!("0x{:016x}", payload.flags)),
            );
            out.insert("TypeField".into(), json!(payload_type.bits()));
            out.insert("UserField".into(), json!(user_tag));
            out.insert(
                "Hash".into(),
                json!({
                    "Type": hash_alg.id(),
                    "Digest": hex::encode(&payload.hash),
                }),
            );
        }
    }
    if let Some(iv) = &payload.iv {
        out.insert("IV".into(), json!(encode_bytes(version, iv)));
    }
    if let Some(challenges) = &payload.challenges {
        let access = challenges
            .iter()
            .map(|c| challenge_value(version, c))
            .collect::<Result<Vec<_>, _>>()?;
        out.insert("WalletAccess".into(), Value::Array(access));
    }
    out.insert("Data".into(), json!(encode_bytes(version, &payload.data)));
    Ok(Value::Object(out))
}

fn challenge_value(version: TxVersion, challenge: &ChallengeModel) -> Result<Value, TxError> {
    let mut out = Map::new();
    match version {
        TxVersion::V1 | TxVersion::V2 => {
            out.insert(
                "Wallet".into(),
                json!(hex::encode(&challenge.wallet.public_key)),
            );
        }
        TxVersion::V3 => {
            out.insert("Wallet".into(), json!(challenge.wallet.address()?.as_str()));
        }
        TxVersion::V4 => {
            out.insert("Wallet".into(), json!(challenge.wallet.address()?.as_str()));
            out.insert("Network".into(), json!(challenge.wallet.network));
        }
    }
    out.insert(
        "Challenge".into(),
        json!(encode_bytes(version, &challenge.challenge)),
    );
    Ok(Value::Object(out))
}

fn encode_bytes(version: TxVersion, bytes: &[u8]) -> String {
    match version {
        TxVersion::V1 | TxVersion::V2 => hex::encode(bytes),
        TxVersion::V3 | TxVersion::V4 => BASE64.encode(bytes),
    }
}

fn render_timestamp(ts: u64) -> Result<String, TxError> {
    let when = DateTime::<Utc>::from_timestamp(ts as i64, 0)
        .ok_or_else(|| TxError::malformed("timestamp out of range"))?;
    Ok(when.to_rfc3339_opts(SecondsFormat::Secs, true))
}

// --- parsing -------------------------------------------------------------

pub(crate) fn model_from_value(value: &Value) -> Result<TransactionModel, TxError> {
    let root = value
        .as_object()
        .ok_or_else(|| TxError::malformed("top-level JSON value is not an object"))?;
    let raw_version = get_u64(root, "Version")? as u32;
    let version = version_of(raw_version)?;

    let tx_id = match root.get("TxId") {
        None | Some(Value::Null) => None,
        Some(v) => Some(parse_hash(as_str(v, "TxId")?)?),
    };
    let prev_tx_id = if version.has_metadata() {
        Some(parse_hash(as_str(require(root, "PrevTxId")?, "PrevTxId")?)?)
    } else {
        None
    };
    let sender = root
        .get("SenderWallet")
        .map(|v| wallet_from_value(version, v))
        .transpose()?;
    let recipients = require(root, "RecipientsWallets")?
        .as_array()
        .ok_or_else(|| TxError::malformed("RecipientsWallets is not an array"))?
        .iter()
        .map(|v| wallet_from_value(version, v))
        .collect::<Result<Vec<_>, _>>()?;
    let timestamp = root
        .get("TimeStamp")
        .map(|v| parse_timestamp(as_str(v, "TimeStamp")?))
        .transpose()?;
    let metadata = root
        .get("MetaData")
        .map(|v| serde_json::to_string(v).map_err(|e| TxError::BadMetadata(e.to_string())))
        .transpose()?;
    let signature = root
        .get("Signature")
        .map(|v| decode_hex(as_str(v, "Signature")?))
        .transpose()?;
    let payload_count = get_u64(root, "PayloadCount")?;
    let payloads = require(root, "Payloads")?
        .as_array()
        .ok_or_else(|| TxError::malformed("Payloads is not an array"))?
        .iter()
        .map(|v| payload_from_value(version, v))
        .collect::<Result<Vec<_>, _>>()?;
    if payload_count != payloads.len() as u64 {
        return Err(TxError::malformed("payload count disagrees with list"));
    }

    Ok(TransactionModel {
        version: raw_version,
        tx_id,
        prev_tx_id,
        sender,
        recipients,
        timestamp,
        metadata,
        signature,
        payload_count,
        payloads,
    })
}

fn wallet_from_value(version: TxVersion, value: &Value) -> Result<WalletModel, TxError> {
    match version {
        TxVersion::V1 | TxVersion::V2 => {
            let bytes = decode_hex(as_str(value, "wallet")?)?;
            Ok(WalletModel {
                network: strand_types::WalletNetwork::Ed25519.id(),
                public_key: bytes,
            })
        }
        TxVersion::V3 => {
            let address = WalletAddress::new(as_str(value, "wallet")?);
            WalletModel::from_address(&address)
        }
        TxVersion::V4 => {
            let obj = value
                .as_object()
                .ok_or_else(|| TxError::malformed("wallet is not an object"))?;
            let address = WalletAddress::new(as_str(require(obj, "Wallet")?, "Wallet")?);
            let wallet = WalletModel::from_address(&address)?;
            if wallet.network != get_u64(obj, "Network")? as u8 {
                return Err(TxError::malformed("wallet network disagrees with address"));
            }
            Ok(wallet)
        }
    }
}

fn payload_from_value(version: TxVersion, value: &Value) -> Result<PayloadModel, TxError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TxError::malformed("payload is not an object"))?;
    let size = get_u64(obj, "Size")?;
    let data = decode_bytes(version, as_str(require(obj, "Data")?, "Data")?)?;

    let (hash, flags) = match version {
        TxVersion::V1 | TxVersion::V2 | TxVersion::V3 => {
            let flags16 = parse_hex_word(as_str(require(obj, "Flags")?, "Flags")?)? as u16;
            let hash = decode_hex(as_str(require(obj, "Hash")?, "Hash")?)?;
            let options = match version {
                TxVersion::V3 => PayloadOptions::v3().with_hash(infer_hash(&hash)?),
                _ => PayloadOptions::legacy(),
            };
            let word = combined(pack_type(&options), pack_options(flags16, &options));
            (hash, word)
        }
        TxVersion::V4 => {
            let word = parse_hex_word(as_str(require(obj, "PayloadOptions")?, "PayloadOptions")?)?;
            let (_, options_word) = split_combined(word);
            let (_, hash_alg, _, _) = unpack_options(options_word)?;
            let hash_obj = require(obj, "Hash")?
                .as_object()
                .ok_or_else(|| TxError::malformed("Hash is not an object"))?;
            if get_u64(hash_obj, "Type")? as u8 != hash_alg.id() {
                return Err(TxError::malformed("hash type disagrees with options word"));
            }
            let hash = decode_hex(as_str(require(hash_obj, "Digest")?, "Digest")?)?;
            if hash.len() != hash_alg.digest_len() {
                return Err(TxError::malformed("digest length mismatch"));
            }
            (hash, word)
        }
    };

    let iv = obj
        .get("IV")
        .map(|v| decode_bytes(version, as_str(v, "IV")?))
        .transpose()?;
    let challenges = obj
        .get("WalletAccess")
        .map(|v| {
            v.as_array()
                .ok_or_else(|| TxError::malformed("WalletAccess is not an array"))?
                .iter()
                .map(|c| challenge_from_value(version, c))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(PayloadModel {
        size,
        flags,
        hash,
        iv,
        challenges,
        data,
    })
}

fn challenge_from_value(version: TxVersion, value: &Value) -> Result<ChallengeModel, TxError> {
    let obj = value
        .as_object()
        .ok_or_else(|| TxError::malformed("access entry is not an object"))?;
    let wallet = match version {
        TxVersion::V4 => wallet_from_value(version, value)?,
        _ => wallet_from_value(version, require(obj, "Wallet")?)?,
    };
    let challenge = decode_bytes(version, as_str(require(obj, "Challenge")?, "Challenge")?)?;
    Ok(ChallengeModel { wallet, challenge })
}

fn decode_bytes(version: TxVersion, text: &str) -> Result<Vec<u8>, TxError> {
    match version {
        TxVersion::V1 | TxVersion::V2 => decode_hex(text),
        TxVersion::V3 | TxVersion::V4 => BASE64
            .decode(text)
            .map_err(|_| TxError::malformed("invalid base64")),
    }
}

fn parse_timestamp(text: &str) -> Result<u64, TxError> {
    let when = DateTime::parse_from_rfc3339(text)
        .map_err(|_| TxError::malformed("invalid timestamp"))?;
    Ok(when.timestamp() as u64)
}

fn parse_hash(text: &str) -> Result<TxHash, TxError> {
    TxHash::from_hex(text).ok_or_else(|| TxError::malformed("invalid hash"))
}

fn parse_hex_word(text: &str) -> Result<u64, TxError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| TxError::malformed("flag word missing 0x prefix"))?;
    u64::from_str_radix(digits, 16).map_err(|_| TxError::malformed("invalid flag word"))
}

fn decode_hex(text: &str) -> Result<Vec<u8>, TxError> {
    hex::decode(text).map_err(|_| TxError::malformed("invalid hex"))
}

fn version_of(raw: u32) -> Result<TxVersion, TxError> {
    TxVersion::from_u32(raw).ok_or(TxError::UnsupportedVersion(raw))
}

fn as_str<'a>(value: &'a Value, key: &str) -> Result<&'a str, TxError> {
    value
        .as_str()
        .ok_or_else(|| TxError::Malformed(format!("{key} is not a string")))
}

fn get_u64(obj: &Map<String, Value>, key: &str) -> Result<u64, TxError> {
    require(obj, key)?
        .as_u64()
        .ok_or_else(|| TxError::Malformed(format!("{key} is not an integer")))
}

fn require<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a Value, TxError> {
    obj.get(key)
        .ok_or_else(|| TxError::Malformed(format!("missing {key}")))
}
