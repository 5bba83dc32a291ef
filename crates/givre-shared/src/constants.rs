/// Application name
pub const APP_NAME: &str = "Givre";

/// Storage slot (file stem) holding the whisper collection
pub const STORAGE_KEY: &str = "snowflake_whispers";

/// Maximum number of records kept in the local store
pub const MAX_RECORDS: usize = 50;

/// Stored in place of the plaintext for password-protected records
pub const ENCRYPTED_PLACEHOLDER: &str = "🔒 ENCRYPTED_WHISPER";

/// Maximum shareable message length, in UTF-16 code units
pub const MAX_SHARE_MESSAGE_LEN: usize = 500;

/// Seed source used when the caller hands the generator empty text
pub const FALLBACK_SEED_TEXT: &str = "snowflake";

/// PBKDF2-HMAC-SHA256 iteration count for password-derived keys
pub const PBKDF2_ITERATIONS: u32 = 100_000;

/// Salt size in bytes (prepended to every ciphertext blob)
pub const SALT_SIZE: usize = 16;

/// ChaCha20-Poly1305 nonce size in bytes
pub const NONCE_SIZE: usize = 12;

/// Symmetric key size in bytes
pub const KEY_SIZE: usize = 32;
