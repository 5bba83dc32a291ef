//! Record model and the tolerant parsing rules for the persisted collection.
//!
//! Collections written by older builds may contain partial or malformed
//! entries. Parsing never fails outright: unusable entries are dropped,
//! missing fields are defaulted, and duplicate ids keep the first occurrence.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use givre_shared::constants::{ENCRYPTED_PLACEHOLDER, MAX_RECORDS};
use givre_shared::Essence;

/// One crystallized whisper as persisted in the local collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SnowflakeRecord {
    /// `preset_<n>`, `user_<ms>_<rand>`, or `legacy_<ms>_<index>` for
    /// repaired entries.
    pub id: String,
    /// Plaintext whisper, or the lock placeholder for protected records.
    pub message: String,
    /// Password-encrypted payload; present only on protected records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_message: Option<String>,
    /// Whether the plaintext is withheld behind a password.
    pub has_password: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    /// Cosmetic category tag.
    pub essence: Essence,
}

/// Parse a raw collection blob, dropping whatever cannot be repaired.
///
/// `now_ms` anchors the fallback timestamps handed to entries that lost
/// theirs (each such entry is backdated one second per array position so
/// repaired entries keep their relative order).
pub(crate) fn parse_records(raw: &str, now_ms: i64) -> Vec<SnowflakeRecord> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };
    let items = match parsed.as_array() {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if let Some(record) = normalize_record(item, index, now_ms) {
            if seen.insert(record.id.clone()) {
                records.push(record);
            }
        }
    }
    records
}

/// Sort newest-first and truncate to the collection cap.
pub(crate) fn limit_records(mut records: Vec<SnowflakeRecord>) -> Vec<SnowflakeRecord> {
    // Stable sort: equal timestamps keep their insertion order.
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records.truncate(MAX_RECORDS);
    records
}

fn normalize_record(raw: &Value, index: usize, now_ms: i64) -> Option<SnowflakeRecord> {
    let entry = raw.as_object()?;

    let encrypted_message = entry
        .get("encryptedMessage")
        .and_then(Value::as_str)
        .filter(|ct| !ct.is_empty())
        .map(str::to_owned);

    // A surviving ciphertext marks the record protected even when the flag
    // itself was lost.
    let has_password = entry
        .get("hasPassword")
        .and_then(Value::as_bool)
        .unwrap_or(false)
        || encrypted_message.is_some();

    let message_source = entry
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    let message = if !message_source.is_empty() {
        message_source.to_owned()
    } else if has_password {
        ENCRYPTED_PLACEHOLDER.to_owned()
    } else {
        return None;
    };

    let id = match entry.get("id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => format!("legacy_{now_ms}_{index}"),
    };

    let timestamp = entry
        .get("timestamp")
        .and_then(Value::as_i64)
        .or_else(|| {
            entry
                .get("timestamp")
                .and_then(Value::as_f64)
                .map(|ts| ts as i64)
        })
        .unwrap_or(now_ms - index as i64 * 1000);

    let essence = match entry.get("essence").and_then(Value::as_str) {
        Some("stardust") => Essence::Stardust,
        _ => Essence::Aurora,
    };

    Some(SnowflakeRecord {
        id,
        message,
        encrypted_message,
        has_password,
        timestamp,
        essence,
    })
}
