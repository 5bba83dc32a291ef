//! Whisper signatures and the public id displayed on share cards.
//!
//! A signature is minted once per whisper and travels inside the share
//! payload. The display id is a pure function of the signature, which is what
//! lets the parser verify that the id in a link was not swapped out.

use chrono::Utc;

use givre_shared::crypto::random_base36;
use givre_shared::hash::{hash_string, to_base36};

/// Mint a fresh whisper signature: `sg_<now-ms in base36>_<8 random base36>`.
pub fn mint_signature() -> String {
    let now = Utc::now().timestamp_millis();
    format!("sg_{}_{}", to_base36(now as u64), random_base36(8))
}

/// Derive the public display id for a signature, e.g. `SN-0JTIP8R`.
///
/// Always `SN-` plus exactly seven base-36 digits, zero-padded on the left.
pub fn display_id(signature: &str) -> String {
    let numeric = hash_string(&format!("snowflake::{signature}"));
    let padded = format!("{:0>7}", to_base36(u64::from(numeric)).to_uppercase());
    // A u32 never exceeds seven base-36 digits, so the tail is the whole id.
    format!("SN-{}", &padded[padded.len() - 7..])
}
