//! Building and parsing share links.
//!
//! A share link carries the whole whisper: the encrypted payload travels in
//! the query string while the decryption key rides in the URL fragment, which
//! browsers never transmit to the server. Parsing is fail-closed: any
//! malformed, truncated, or tampered link answers `None`, never a partial
//! whisper.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use url::Url;

use givre_shared::constants::MAX_SHARE_MESSAGE_LEN;
use givre_shared::crypto::{decrypt, encrypt, generate_share_key};
use givre_shared::hash::utf16_len;

use crate::error::{Result, ShareError};
use crate::payload::{PayloadV1, PayloadV2, SharePayload};

/// Query parameter carrying the encoded payload.
const SHARE_PARAM: &str = "s";
/// Fragment parameter carrying the per-link key.
const SHARE_KEY_PARAM: &str = "k";

/// base64url, unpadded on encode. Decoding tolerates stray padding because
/// links issued by early builds carried trailing `=`.
const PAYLOAD_B64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A whisper recovered from a share link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedShare {
    pub message: String,
    pub signature: String,
    pub timestamp: i64,
    pub snowflake_id: String,
}

/// Build a share link for `message` on top of `base_url`.
///
/// The message is validated (non-blank, at most 500 UTF-16 code units, the
/// unit existing links were measured in), encrypted under a fresh random key,
/// and packed into the `s` query parameter; the key goes into the `#k=`
/// fragment. Any query or fragment already on `base_url` is dropped.
pub async fn build_share_url(
    message: &str,
    signature: &str,
    timestamp: i64,
    base_url: &str,
) -> Result<String> {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ShareError::EmptyMessage);
    }
    if utf16_len(trimmed) > MAX_SHARE_MESSAGE_LEN {
        return Err(ShareError::MessageTooLong);
    }

    let share_key = generate_share_key();
    let ciphertext = encrypt(trimmed, &share_key).await?;

    let mut url = Url::parse(base_url)?;
    url.set_fragment(None);
    url.set_query(None);

    let payload = PayloadV2::new(ciphertext, signature, timestamp);
    let encoded = PAYLOAD_B64.encode(serde_json::to_vec(&payload)?);
    url.query_pairs_mut().append_pair(SHARE_PARAM, &encoded);
    url.set_fragment(Some(&format!("{SHARE_KEY_PARAM}={share_key}")));

    Ok(url.into())
}

/// Recover a whisper from a share link.
///
/// Fail-closed: `None` for anything other than a well-formed link whose
/// checksum and display id verify and (for v2) whose fragment key decrypts
/// the payload to a valid message.
pub async fn parse_share_url(url_value: &str) -> Option<ParsedShare> {
    let url = Url::parse(url_value).ok()?;
    let token = url
        .query_pairs()
        .find(|(name, _)| name == SHARE_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let decoded = PAYLOAD_B64.decode(token.as_bytes()).ok()?;
    let raw = String::from_utf8(decoded).ok()?;

    match SharePayload::from_json(&raw)? {
        SharePayload::V1(legacy) => parse_legacy(legacy),
        SharePayload::V2(payload) => parse_current(&url, payload).await,
    }
}

/// Pre-encryption links: the plaintext sits in the payload itself.
fn parse_legacy(payload: PayloadV1) -> Option<ParsedShare> {
    if payload.m.trim().is_empty() || utf16_len(&payload.m) > MAX_SHARE_MESSAGE_LEN {
        return None;
    }
    if !payload.verify() {
        tracing::debug!("legacy share link failed integrity checks");
        return None;
    }

    Some(ParsedShare {
        message: payload.m,
        signature: payload.sig,
        timestamp: payload.ts,
        snowflake_id: payload.id,
    })
}

async fn parse_current(url: &Url, payload: PayloadV2) -> Option<ParsedShare> {
    if !payload.verify() {
        tracing::debug!("share link failed integrity checks");
        return None;
    }

    let share_key = fragment_share_key(url)?;
    let message = decrypt(&payload.ct, &share_key).await.ok()?;
    if message.trim().is_empty() || utf16_len(&message) > MAX_SHARE_MESSAGE_LEN {
        return None;
    }

    Some(ParsedShare {
        message,
        signature: payload.sig,
        timestamp: payload.ts,
        snowflake_id: payload.id,
    })
}

/// Extract the per-link key from the `#k=` fragment parameter.
fn fragment_share_key(url: &Url) -> Option<String> {
    let fragment = url.fragment().filter(|f| !f.is_empty())?;
    let key = url::form_urlencoded::parse(fragment.as_bytes())
        .find(|(name, _)| name == SHARE_KEY_PARAM)
        .map(|(_, value)| value.into_owned())?;

    let len = utf16_len(&key);
    if !(10..=128).contains(&len) {
        tracing::debug!("share key length out of bounds");
        return None;
    }
    Some(key)
}

/// Strip the share payload (`s`) and key (`k`) parameters from a URL,
/// leaving every other component alone. Unparseable input comes back
/// unchanged; this runs on address-bar cleanup paths where failing loudly
/// helps nobody.
pub fn remove_share_param(url_value: &str) -> String {
    let mut url = match Url::parse(url_value) {
        Ok(url) => url,
        Err(_) => return url_value.to_owned(),
    };

    // Rewrite each component only when its parameter is actually present, so
    // URLs with nothing to scrub round-trip byte-identical.
    if url.query_pairs().any(|(name, _)| name == SHARE_PARAM) {
        let remaining: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(name, _)| name != SHARE_PARAM)
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();
        if remaining.is_empty() {
            url.set_query(None);
        } else {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (name, value) in &remaining {
                pairs.append_pair(name, value);
            }
        }
    }

    let next_fragment = match url.fragment() {
        Some(fragment)
            if url::form_urlencoded::parse(fragment.as_bytes())
                .any(|(name, _)| name == SHARE_KEY_PARAM) =>
        {
            let rest = url::form_urlencoded::parse(fragment.as_bytes())
                .filter(|(name, _)| name != SHARE_KEY_PARAM);
            Some(
                url::form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(rest)
                    .finish(),
            )
        }
        _ => None,
    };
    match next_fragment.as_deref() {
        Some("") => url.set_fragment(None),
        Some(fragment) => url.set_fragment(Some(fragment)),
        None => {}
    }

    url.into()
}
