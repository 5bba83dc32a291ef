use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::{Rng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::constants::{KEY_SIZE, NONCE_SIZE, PBKDF2_ITERATIONS, SALT_SIZE};
use crate::error::CryptoError;

/// Derive a 256-bit key from a password and salt.
///
/// PBKDF2-HMAC-SHA256 with 100k iterations; deliberately slow. The key never
/// leaves this module and is wiped when dropped.
fn derive_key(password: &str, salt: &[u8]) -> Zeroizing<[u8; KEY_SIZE]> {
    let mut key = Zeroizing::new([0u8; KEY_SIZE]);
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut key[..]);
    key
}

// Blob layout: salt (16) || nonce (12) || ciphertext+tag
fn encrypt_blocking(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    let mut salt = [0u8; SALT_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut salt);
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(password, &salt);
    let cipher = ChaCha20Poly1305::new((&*key).into());
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut blob = Vec::with_capacity(SALT_SIZE + NONCE_SIZE + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce_bytes);
    blob.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(blob))
}

fn decrypt_blocking(blob: &str, password: &str) -> Result<String, CryptoError> {
    let data = STANDARD
        .decode(blob.trim())
        .map_err(|_| CryptoError::DecryptionFailed)?;
    if data.len() < SALT_SIZE + NONCE_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let (salt, rest) = data.split_at(SALT_SIZE);
    let (nonce_bytes, ciphertext) = rest.split_at(NONCE_SIZE);

    let key = derive_key(password, salt);
    let cipher = ChaCha20Poly1305::new((&*key).into());
    let nonce = Nonce::from_slice(nonce_bytes);

    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::DecryptionFailed)
}

/// Encrypt `plaintext` under `password`, returning a base64 blob.
///
/// A fresh salt and nonce are drawn per call, so encrypting the same input
/// twice yields different blobs. The KDF is CPU-heavy and runs on the
/// blocking pool.
pub async fn encrypt(plaintext: &str, password: &str) -> Result<String, CryptoError> {
    let plaintext = plaintext.to_string();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || encrypt_blocking(&plaintext, &password))
        .await
        .map_err(|_| CryptoError::EncryptionFailed)?
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Every failure mode (bad base64, truncated blob, failed authentication,
/// invalid UTF-8) collapses into [`CryptoError::DecryptionFailed`].
pub async fn decrypt(blob: &str, password: &str) -> Result<String, CryptoError> {
    let blob = blob.to_string();
    let password = password.to_string();
    tokio::task::spawn_blocking(move || decrypt_blocking(&blob, &password))
        .await
        .map_err(|_| CryptoError::DecryptionFailed)?
}

/// Ephemeral per-link key: 32 OS-random bytes, base64, non-alphanumerics
/// stripped, truncated to 32 chars. Independent of any user password.
pub fn generate_share_key() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    STANDARD
        .encode(bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(32)
        .collect()
}

/// Random lowercase base-36 string of length `len`, for record ids and
/// signature suffixes.
pub fn random_base36(len: usize) -> String {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_encrypt_decrypt_roundtrip() {
        let plaintext = "Meet me where we first saw the stars";
        let blob = encrypt(plaintext, "secret1").await.unwrap();
        let recovered = decrypt(&blob, "secret1").await.unwrap();
        assert_eq!(recovered, plaintext);
    }

    #[tokio::test]
    async fn test_same_input_different_blobs() {
        let a = encrypt("whisper", "pw").await.unwrap();
        let b = encrypt("whisper", "pw").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_wrong_password_fails() {
        let blob = encrypt("whisper", "right").await.unwrap();
        let err = decrypt(&blob, "wrong").await.unwrap_err();
        assert!(matches!(err, CryptoError::DecryptionFailed));
    }

    #[tokio::test]
    async fn test_tampered_blob_fails() {
        let blob = encrypt("whisper", "pw").await.unwrap();
        let mut bytes = STANDARD.decode(&blob).unwrap();
        let len = bytes.len();
        bytes[len - 1] ^= 0xFF;
        let tampered = STANDARD.encode(bytes);
        assert!(decrypt(&tampered, "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_blob_fails() {
        assert!(decrypt("not base64 at all!!!", "pw").await.is_err());
        // valid base64 but shorter than salt + nonce
        assert!(decrypt(&STANDARD.encode([0u8; 8]), "pw").await.is_err());
    }

    #[tokio::test]
    async fn test_unicode_roundtrip() {
        let plaintext = "时间冻结的瞬间，像掌心的雪花";
        let blob = encrypt(plaintext, "密码").await.unwrap();
        assert_eq!(decrypt(&blob, "密码").await.unwrap(), plaintext);
    }

    #[test]
    fn test_share_key_shape() {
        let key = generate_share_key();
        assert!(key.len() <= 32);
        assert!(key.len() >= 10);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));

        let other = generate_share_key();
        assert_ne!(key, other);
    }

    #[test]
    fn test_random_base36_shape() {
        let s = random_base36(8);
        assert_eq!(s.len(), 8);
        assert!(s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
