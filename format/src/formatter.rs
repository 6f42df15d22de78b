//! Conversions between wire transactions, the structural model, and JSON.
//!
//! The central property: converting a transaction to JSON or to a model and
//! back reproduces the wire bytes exactly, for every version and payload
//! combination, signed or not. Absent input is a typed empty result, never
//! an error.

use serde_json::{json, Map, Value};
use strand_transactions::flags::{combined, pack_options, pack_type, split_combined, unpack_options, unpack_type, FLAG_ENCRYPTED, FLAG_PROTECTED};
use strand_transactions::{AccessEntry, Payload, Transaction, TxBuilder, TxVersion};
use strand_types::{PayloadOptions, TxError, TxHash};
use tracing::debug;

use crate::json::{model_from_value, value_from_model};
use crate::model::{ChallengeModel, PayloadModel, TransactionModel, WalletModel};

/// Flatten a transaction into the structural model. `None` in, `None` out;
/// an empty transaction also yields `None`.
pub fn to_model(tx: Option<&Transaction>) -> Result<Option<TransactionModel>, TxError> {
    let Some(tx) = tx else { return Ok(None) };
    if tx.data.is_empty() {
        return Ok(None);
    }
    let builder = TxBuilder::from_transaction(tx)?;
    Ok(Some(model_from_builder(&builder)))
}

/// Rebuild a wire transaction from the structural model.
pub fn transaction_from_model(
    model: Option<&TransactionModel>,
) -> Result<Option<Transaction>, TxError> {
    let Some(model) = model else { return Ok(None) };
    let builder = builder_from_model(model)?;
    Ok(Some(builder.to_transport()))
}

/// Render a transaction as JSON. `None` or an empty transaction renders as
/// the empty object.
pub fn to_json(tx: Option<&Transaction>) -> Result<String, TxError> {
    match to_model(tx)? {
        None => Ok("{}".to_string()),
        Some(model) => {
            let value = value_from_model(&model)?;
            serde_json::to_string(&value).map_err(|e| TxError::Malformed(e.to_string()))
        }
    }
}

/// Rebuild a wire transaction from its JSON rendering. The empty object
/// (and blank input) yields `None`.
pub fn transaction_from_json(text: &str) -> Result<Option<Transaction>, TxError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: Value =
        serde_json::from_str(trimmed).map_err(|e| TxError::Malformed(e.to_string()))?;
    let is_empty = value.as_object().map(Map::is_empty).unwrap_or(false);
    if is_empty {
        return Ok(None);
    }
    let model = model_from_value(&value)?;
    transaction_from_model(Some(&model))
}

/// Minimal inspection view: id, register and the exact signed bytes.
pub fn to_json_layout(tx: Option<&Transaction>) -> Result<String, TxError> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let Some(tx) = tx else { return Ok("{}".to_string()) };
    if tx.data.is_empty() {
        return Ok("{}".to_string());
    }
    let mut root = Map::new();
    root.insert(
        "TxId".into(),
        tx.tx_id.map(|id| json!(id.to_string())).unwrap_or(Value::Null),
    );
    root.insert(
        "RegisterId".into(),
        tx.register_id
            .as_deref()
            .map(|r| json!(r))
            .unwrap_or(Value::Null),
    );
    root.insert("Data".into(), json!(BASE64.encode(&tx.data)));
    serde_json::to_string(&Value::Object(root)).map_err(|e| TxError::Malformed(e.to_string()))
}

// --- builder <-> model ---------------------------------------------------

fn model_from_builder(builder: &TxBuilder) -> TransactionModel {
    let version = builder.version();
    let manager = builder.payload_manager();
    debug!(
        version = version.as_u32(),
        payloads = manager.payload_count(),
        "flattening transaction"
    );
    TransactionModel {
        version: version.as_u32(),
        tx_id: builder.tx_id(),
        prev_tx_id: version.has_metadata().then(|| builder.prev_tx_hash()),
        sender: builder.sender().map(WalletModel::from_key),
        recipients: builder
            .recipient_keys()
            .iter()
            .map(WalletModel::from_key)
            .collect(),
        timestamp: builder.timestamp(),
        metadata: builder.metadata().map(str::to_string),
        signature: builder.signature().map(<[u8]>::to_vec),
        payload_count: manager.payload_count() as u64,
        payloads: manager.payloads().iter().map(model_payload).collect(),
    }
}

fn model_payload(payload: &Payload) -> PayloadModel {
    let word = combined(
        pack_type(payload.options()),
        pack_options(payload.flags(), payload.options()),
    );
    let challenges = payload.encrypted().then(|| {
        payload
            .access()
            .iter()
            .map(|entry| ChallengeModel {
                wallet: WalletModel::from_key(&entry.public),
                challenge: entry.challenge.clone(),
            })
            .collect()
    });
    PayloadModel {
        size: payload.size(),
        flags: word,
        hash: payload.hash().to_vec(),
        iv: payload.iv().map(<[u8]>::to_vec),
        challenges,
        data: payload.data().to_vec(),
    }
}

fn builder_from_model(model: &TransactionModel) -> Result<TxBuilder, TxError> {
    let version =
        TxVersion::from_u32(model.version).ok_or(TxError::UnsupportedVersion(model.version))?;
    let recipients = model
        .recipients
        .iter()
        .map(WalletModel::to_key)
        .collect::<Result<Vec<_>, _>>()?;
    let payloads = model
        .payloads
        .iter()
        .map(payload_from_model)
        .collect::<Result<Vec<_>, _>>()?;
    if model.payload_count != payloads.len() as u64 {
        return Err(TxError::malformed("payload count disagrees with list"));
    }
    TxBuilder::from_parts(
        version,
        recipients,
        model.prev_tx_id.unwrap_or(TxHash::ZERO),
        model.metadata.clone(),
        model.timestamp.unwrap_or(0),
        model.signature.clone(),
        model.sender.as_ref().map(WalletModel::to_key).transpose()?,
        payloads,
    )
}

fn payload_from_model(model: &PayloadModel) -> Result<Payload, TxError> {
    let (type_word, options_word) = split_combined(model.flags);
    let (flags16, hash_alg, encryption, compression) = unpack_options(options_word)?;
    let (payload_type, user_tag) = unpack_type(type_word);
    if model.hash.len() != hash_alg.digest_len() {
        return Err(TxError::malformed("digest length mismatch"));
    }
    if model.size != model.data.len() as u64 {
        return Err(TxError::malformed("size disagrees with data length"));
    }
    let encrypted = flags16 & FLAG_ENCRYPTED != 0;
    if encrypted != model.challenges.is_some() {
        return Err(TxError::malformed(
            "challenge list disagrees with encrypted flag",
        ));
    }
    let access = model
        .challenges
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| {
            Ok(AccessEntry {
                public: c.wallet.to_key()?,
                challenge: c.challenge.clone(),
            })
        })
        .collect::<Result<Vec<_>, TxError>>()?;
    let options = PayloadOptions {
        compression,
        encryption,
        hash: hash_alg,
        payload_type,
        user_tag,
        protected: flags16 & FLAG_PROTECTED != 0,
    };
    Ok(Payload::from_parts(
        flags16,
        options,
        model.hash.clone(),
        model.iv.clone().unwrap_or_default(),
        access,
        model.data.clone(),
    ))
}
