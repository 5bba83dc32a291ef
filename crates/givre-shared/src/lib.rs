//! # givre-shared
//!
//! Primitives shared by every givre crate: the deterministic rolling hash
//! and base-36 rendering that seed the generator and checksum share links,
//! the password-based crypto codec, common types, and format constants.

pub mod constants;
pub mod crypto;
pub mod hash;
pub mod types;

mod error;

pub use error::CryptoError;
pub use types::Essence;
