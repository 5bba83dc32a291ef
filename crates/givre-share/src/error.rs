use thiserror::Error;

use givre_shared::CryptoError;

/// Errors raised when building a share link.
///
/// Parsing a share link never produces these: [`crate::parse_share_url`]
/// answers `None` for anything it will not accept.
#[derive(Error, Debug)]
pub enum ShareError {
    /// The message was empty after trimming.
    #[error("Empty message can not be shared")]
    EmptyMessage,

    /// The message exceeds the share length cap.
    #[error("Message is too long to share")]
    MessageTooLong,

    /// The supplied base URL did not parse.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// Encrypting the message for the link failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The payload could not be serialized.
    #[error("Payload encoding error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShareError>;
