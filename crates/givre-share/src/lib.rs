//! # givre-share
//!
//! Share links for crystallized whispers.
//!
//! A link carries the encrypted whisper in its `s` query parameter and the
//! per-link decryption key in its `#k=` fragment, so the key never reaches
//! the host serving the link. Payloads are integrity-checked (checksum plus
//! re-derived display id) and parsing is strictly fail-closed; plaintext v1
//! links from early builds remain readable but are never produced.

mod codec;
mod error;
mod payload;
mod signature;

pub use codec::{build_share_url, parse_share_url, remove_share_param, ParsedShare};
pub use error::{Result, ShareError};
pub use signature::{display_id, mint_signature};
