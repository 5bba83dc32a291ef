use thiserror::Error;

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,

    /// Deliberately covers both causes so callers cannot tell which one
    /// occurred (no padding/password oracle).
    #[error("Decryption failed: wrong password or corrupted data")]
    DecryptionFailed,
}
