//! Deterministic string hashing and base-36 rendering.
//!
//! These are format constants, not general-purpose utilities: issued share
//! links embed checksums of exactly this recurrence, and every snowflake's
//! geometry is seeded from it. Changing a single bit here changes which
//! links validate and what every stored whisper looks like.

/// 32-bit rolling hash over the UTF-16 code units of `s`.
///
/// Accumulates `h = h * 31 + unit` with two's-complement wraparound and
/// returns the unsigned magnitude of the final signed value. Not
/// cryptographically secure; used only for seeding and checksums.
pub fn hash_string(s: &str) -> u32 {
    let mut h: i32 = 0;
    for unit in s.encode_utf16() {
        // h * 31 == (h << 5) - h
        h = h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit));
    }
    h.unsigned_abs()
}

/// Lowercase base-36 rendering of `n` (digits `0-9a-z`).
pub fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    // u64::MAX needs 13 base-36 digits
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

/// Length of `s` in UTF-16 code units.
///
/// Message length limits count these units, matching the hash above.
pub fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}
