//! Share payload versions and their integrity checksum.
//!
//! Struct field order here is a wire contract: the checksum is computed over
//! the serialized JSON consumers re-derive, so `v` must serialize first and
//! `c` last, exactly as issued links have always been laid out.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use givre_shared::hash::{hash_string, to_base36};

use crate::signature::display_id;

/// Version tag written into newly built links.
pub const SHARE_VERSION: u8 = 2;

/// Legacy plaintext payload. Still parsed for links issued before payloads
/// were encrypted; never produced anymore.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadV1 {
    pub v: u8,
    /// Plaintext message.
    pub m: String,
    /// Whisper signature.
    pub sig: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    /// Display id, re-derivable from `sig`.
    pub id: String,
    /// Integrity checksum over the other five fields.
    pub c: String,
}

/// Current payload: the message travels encrypted under a key that lives in
/// the URL fragment, outside the payload itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PayloadV2 {
    pub v: u8,
    /// Encrypted message blob.
    pub ct: String,
    /// Whisper signature.
    pub sig: String,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
    /// Display id, re-derivable from `sig`.
    pub id: String,
    /// Integrity checksum over the other five fields.
    pub c: String,
}

/// A version-dispatched payload recovered from a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SharePayload {
    V1(PayloadV1),
    V2(PayloadV2),
}

impl SharePayload {
    /// Decode a payload, dispatching on the `v` tag.
    ///
    /// Unknown versions, a non-numeric tag, or a shape mismatch for the
    /// claimed version all answer `None`.
    pub(crate) fn from_json(raw: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(raw).ok()?;
        match value.get("v").and_then(Value::as_u64) {
            Some(1) => serde_json::from_value(value).ok().map(SharePayload::V1),
            Some(2) => serde_json::from_value(value).ok().map(SharePayload::V2),
            _ => None,
        }
    }
}

impl PayloadV1 {
    /// Re-derive the checksum and display id; both must match.
    pub(crate) fn verify(&self) -> bool {
        self.c == payload_checksum(self.v, &self.m, &self.sig, self.ts, &self.id)
            && display_id(&self.sig) == self.id
    }
}

impl PayloadV2 {
    /// Assemble a payload for `ciphertext`, deriving the display id and
    /// checksum.
    pub(crate) fn new(ciphertext: String, signature: &str, timestamp: i64) -> Self {
        let id = display_id(signature);
        let c = payload_checksum(SHARE_VERSION, &ciphertext, signature, timestamp, &id);
        Self {
            v: SHARE_VERSION,
            ct: ciphertext,
            sig: signature.to_owned(),
            ts: timestamp,
            id,
            c,
        }
    }

    /// Re-derive the checksum and display id; both must match.
    pub(crate) fn verify(&self) -> bool {
        self.c == payload_checksum(self.v, &self.ct, &self.sig, self.ts, &self.id)
            && display_id(&self.sig) == self.id
    }
}

/// Checksum over the pipe-joined payload fields (`body` is `m` or `ct`).
///
/// Tamper detection for casual corruption, not an authenticator: anyone can
/// recompute it. The AEAD tag inside the ciphertext is what guards v2
/// integrity.
fn payload_checksum(version: u8, body: &str, sig: &str, ts: i64, id: &str) -> String {
    to_base36(u64::from(hash_string(&format!(
        "{version}|{body}|{sig}|{ts}|{id}"
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_payload() -> PayloadV1 {
        let m = "Meet me where we first saw the stars".to_owned();
        let sig = "sg_test".to_owned();
        let ts = 1_700_000_000_000;
        let id = display_id(&sig);
        let c = payload_checksum(1, &m, &sig, ts, &id);
        PayloadV1 { v: 1, m, sig, ts, id, c }
    }

    #[test]
    fn test_checksum_matches_issued_links() {
        let payload = legacy_payload();
        assert_eq!(payload.id, "SN-0JTIP8R");
        assert_eq!(payload.c, "3anopi");
        assert!(payload.verify());
    }

    #[test]
    fn test_field_order_is_the_wire_order() {
        let payload = PayloadV2 {
            v: 2,
            ct: "CT".to_owned(),
            sig: "S".to_owned(),
            ts: 1,
            id: "I".to_owned(),
            c: "C".to_owned(),
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"v":2,"ct":"CT","sig":"S","ts":1,"id":"I","c":"C"}"#
        );

        let legacy = legacy_payload();
        let json = serde_json::to_string(&legacy).unwrap();
        assert!(json.starts_with(r#"{"v":1,"m":"#));
        assert!(json.ends_with(r#","c":"3anopi"}"#));
    }

    #[test]
    fn test_version_tag_dispatches_parsing() {
        let v1 = serde_json::to_string(&legacy_payload()).unwrap();
        assert!(matches!(
            SharePayload::from_json(&v1),
            Some(SharePayload::V1(_))
        ));

        let v2 = r#"{"v":2,"ct":"x","sig":"s","ts":1,"id":"i","c":"c"}"#;
        assert!(matches!(
            SharePayload::from_json(v2),
            Some(SharePayload::V2(_))
        ));

        // Unknown, missing, or non-numeric versions are rejected outright.
        assert_eq!(SharePayload::from_json(r#"{"v":3,"ct":"x"}"#), None);
        assert_eq!(SharePayload::from_json(r#"{"ct":"x"}"#), None);
        assert_eq!(SharePayload::from_json(r#"{"v":"2","ct":"x"}"#), None);
        assert_eq!(SharePayload::from_json("[]"), None);
        assert_eq!(SharePayload::from_json("not json"), None);
    }

    #[test]
    fn test_shape_mismatch_for_claimed_version_is_rejected() {
        // v2 tag but v1 body.
        let crossed = r#"{"v":2,"m":"plain","sig":"s","ts":1,"id":"i","c":"c"}"#;
        assert_eq!(SharePayload::from_json(crossed), None);
        // Wrong field type.
        let bad_ts = r#"{"v":2,"ct":"x","sig":"s","ts":"soon","id":"i","c":"c"}"#;
        assert_eq!(SharePayload::from_json(bad_ts), None);
    }

    #[test]
    fn test_verify_rejects_any_field_swap() {
        let good = legacy_payload();

        let mut wrong_message = good.clone();
        wrong_message.m = "Meet me where we first saw the stars!".to_owned();
        assert!(!wrong_message.verify());

        let mut wrong_checksum = good.clone();
        wrong_checksum.c = "3anopj".to_owned();
        assert!(!wrong_checksum.verify());

        // Consistent checksum but a foreign signature: the display id check
        // catches the swap.
        let mut swapped_sig = good.clone();
        swapped_sig.sig = "sg_other".to_owned();
        swapped_sig.c =
            payload_checksum(1, &swapped_sig.m, &swapped_sig.sig, swapped_sig.ts, &swapped_sig.id);
        assert!(!swapped_sig.verify());
    }
}
