//! The whisper collection itself.
//!
//! [`RecordStore`] owns a [`StorageBackend`] behind a mutex, so every
//! operation is a single atomic read-modify-write of the collection. Storage
//! failures never reach the caller: the store logs, swaps in a
//! [`MemoryBackend`] for the rest of the session, and keeps going with
//! volatile data.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use directories::ProjectDirs;
use zeroize::Zeroize;

use givre_shared::constants::{ENCRYPTED_PLACEHOLDER, STORAGE_KEY};
use givre_shared::crypto::random_base36;
use givre_shared::Essence;

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::{Result, StoreError};
use crate::presets::preset_records;
use crate::records::{limit_records, parse_records, SnowflakeRecord};

/// Handle to the local whisper collection.
pub struct RecordStore {
    inner: Mutex<Inner>,
}

struct Inner {
    backend: Box<dyn StorageBackend>,
    degraded: bool,
}

impl RecordStore {
    /// Open the collection at the platform data directory:
    /// - Linux:   `~/.local/share/givre/snowflake_whispers.json`
    /// - macOS:   `~/Library/Application Support/com.givre.givre/…`
    /// - Windows: `{FOLDERID_RoamingAppData}\givre\givre\data\…`
    ///
    /// When no data directory can be determined the store starts directly on
    /// the volatile in-memory backend.
    pub fn open() -> Self {
        match default_store_path() {
            Ok(path) => {
                tracing::info!(path = %path.display(), "opening whisper store");
                Self::open_at(path)
            }
            Err(err) => {
                tracing::warn!(error = %err, "falling back to in-memory whisper store");
                Self::with_backend(MemoryBackend::new())
            }
        }
    }

    /// Open the collection file at an explicit path.
    ///
    /// Useful for tests and for embedding the store inside custom directory
    /// layouts.
    pub fn open_at(path: impl Into<PathBuf>) -> Self {
        Self::with_backend(FileBackend::new(path))
    }

    /// Build a store over any backend implementation.
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Self {
        Self {
            inner: Mutex::new(Inner {
                backend: Box::new(backend),
                degraded: false,
            }),
        }
    }

    /// Crystallize a whisper into the collection.
    ///
    /// Returns `None` without touching storage when there is neither trimmed
    /// plaintext nor a non-empty ciphertext to keep. `has_password` without a
    /// ciphertext is treated as not protected. For protected records the
    /// plaintext is replaced by the lock placeholder and only the ciphertext
    /// is persisted.
    pub fn save(
        &self,
        message: &str,
        essence: Essence,
        encrypted_message: Option<String>,
        has_password: bool,
    ) -> Option<SnowflakeRecord> {
        let normalized = message.trim();
        let ciphertext = encrypted_message.filter(|ct| !ct.is_empty());
        let password_enabled = has_password && ciphertext.is_some();
        if normalized.is_empty() && !password_enabled {
            return None;
        }

        let mut inner = self.lock();
        let records = inner.load_or_seed();

        let now = Utc::now().timestamp_millis();
        let record = SnowflakeRecord {
            id: format!("user_{now}_{}", random_base36(6)),
            message: if password_enabled {
                ENCRYPTED_PLACEHOLDER.to_owned()
            } else {
                normalized.to_owned()
            },
            encrypted_message: if password_enabled { ciphertext } else { None },
            has_password: password_enabled,
            timestamp: now,
            essence,
        };

        let mut next = Vec::with_capacity(records.len() + 1);
        next.push(record.clone());
        next.extend(records);
        inner.persist(&limit_records(next));
        Some(record)
    }

    /// Return the collection, newest first.
    ///
    /// An empty store is seeded with the preset gallery on first read, so
    /// callers never observe an empty collection. Repeated calls return the
    /// same set.
    pub fn list(&self) -> Vec<SnowflakeRecord> {
        self.lock().load_or_seed()
    }

    /// Remove one record by id.
    ///
    /// The record's plaintext and ciphertext are zeroized in place before the
    /// shrunken collection is persisted. That scrub is best-effort: earlier
    /// copies held by the runtime or the filesystem are out of reach.
    pub fn delete(&self, id: &str) {
        if id.is_empty() {
            return;
        }

        let mut inner = self.lock();
        let mut records = inner.load_or_seed();
        records.retain_mut(|record| {
            if record.id == id {
                record.message.zeroize();
                if let Some(ct) = record.encrypted_message.as_mut() {
                    ct.zeroize();
                }
                false
            } else {
                true
            }
        });
        inner.persist(&records);
    }

    /// Merge the preset gallery back into the collection.
    ///
    /// Idempotent: does nothing when any preset record is still present.
    pub fn force_load_presets(&self) {
        let mut inner = self.lock();
        let existing = inner.load_or_seed();
        if existing.iter().any(|r| r.id.starts_with("preset_")) {
            return;
        }

        let mut merged = preset_records(Utc::now().timestamp_millis());
        merged.extend(existing);
        inner.persist(&limit_records(merged));
    }

    /// Drop the whole collection. The next read seeds presets again.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if let Err(err) = inner.backend.remove() {
            inner.degrade("remove", &err);
        }
    }

    /// Number of records [`RecordStore::list`] would return.
    pub fn count(&self) -> usize {
        self.list().len()
    }

    /// Whether the store has fallen back to the volatile backend.
    pub fn is_degraded(&self) -> bool {
        self.lock().degraded
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicked writer leaves the collection no more inconsistent than
        // a process kill would; recover the guard and keep serving.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    /// Load the collection, seeding the preset gallery (through the cap) into
    /// an empty or unreadable store.
    fn load_or_seed(&mut self) -> Vec<SnowflakeRecord> {
        let now = Utc::now().timestamp_millis();
        let records = match self.read_raw() {
            Some(raw) => parse_records(&raw, now),
            None => Vec::new(),
        };
        if !records.is_empty() {
            return limit_records(records);
        }

        let presets = limit_records(preset_records(now));
        self.persist(&presets);
        presets
    }

    fn persist(&mut self, records: &[SnowflakeRecord]) {
        match serde_json::to_string(records) {
            Ok(raw) => self.write_raw(&raw),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize whisper collection")
            }
        }
    }

    fn read_raw(&mut self) -> Option<String> {
        match self.backend.read() {
            Ok(value) => value,
            Err(err) => {
                self.degrade("read", &err);
                None
            }
        }
    }

    fn write_raw(&mut self, value: &str) {
        if let Err(err) = self.backend.write(value) {
            self.degrade("write", &err);
            // The in-memory fallback cannot fail.
            let _ = self.backend.write(value);
        }
    }

    /// Swap in a volatile backend for the rest of the session.
    fn degrade(&mut self, op: &str, err: &StoreError) {
        tracing::warn!(
            error = %err,
            op,
            "storage backend failed; keeping whispers in memory for this session"
        );
        self.backend = Box::new(MemoryBackend::new());
        self.degraded = true;
    }
}

fn default_store_path() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("com", "givre", "givre").ok_or(StoreError::NoDataDir)?;
    Ok(project_dirs.data_dir().join(format!("{STORAGE_KEY}.json")))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Backend that fails every operation, for exercising degraded mode.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn read(&self) -> Result<Option<String>> {
            Err(std::io::Error::other("disk on fire").into())
        }
        fn write(&mut self, _value: &str) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
        fn remove(&mut self) -> Result<()> {
            Err(std::io::Error::other("disk on fire").into())
        }
    }

    fn store_with_raw(raw: &str) -> RecordStore {
        let mut backend = MemoryBackend::new();
        backend.write(raw).unwrap();
        RecordStore::with_backend(backend)
    }

    #[test]
    fn test_empty_store_bootstraps_presets_once() {
        let store = RecordStore::with_backend(MemoryBackend::new());

        let first = store.list();
        assert_eq!(first.len(), 50);
        assert!(first.iter().all(|r| r.id.starts_with("preset_")));
        // Newest first; the oldest preset fell off the cap.
        assert!(first.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert!(first.iter().all(|r| r.id != "preset_0"));

        let second = store.list();
        let ids: Vec<_> = first.iter().map(|r| &r.id).collect();
        let ids_again: Vec<_> = second.iter().map(|r| &r.id).collect();
        assert_eq!(ids, ids_again);
    }

    #[test]
    fn test_save_prepends_and_caps_at_fifty() {
        let store = RecordStore::with_backend(MemoryBackend::new());

        let mut last_id = String::new();
        for i in 0..55 {
            let record = store
                .save(&format!("whisper {i}"), Essence::Aurora, None, false)
                .unwrap();
            last_id = record.id;
        }

        let records = store.list();
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].id, last_id);
        // All presets were pushed out by newer user records.
        assert!(records.iter().all(|r| r.id.starts_with("user_")));
        assert_eq!(records[0].message, "whisper 54");
        assert_eq!(records[49].message, "whisper 5");
    }

    #[test]
    fn test_save_rejects_blank_unprotected_messages() {
        let store = RecordStore::with_backend(MemoryBackend::new());
        assert!(store.save("", Essence::Aurora, None, false).is_none());
        assert!(store.save("   ", Essence::Aurora, None, true).is_none());
        // The rejection happened before any storage touch, so the gallery
        // seeds on the first successful read only.
        assert_eq!(store.list().len(), 50);
    }

    #[test]
    fn test_protected_save_withholds_the_plaintext() {
        let store = RecordStore::with_backend(MemoryBackend::new());

        let record = store
            .save(
                "  meet me at midnight  ",
                Essence::Stardust,
                Some("c2VjcmV0".to_owned()),
                true,
            )
            .unwrap();
        assert_eq!(record.message, ENCRYPTED_PLACEHOLDER);
        assert_eq!(record.encrypted_message.as_deref(), Some("c2VjcmV0"));
        assert!(record.has_password);
        assert_eq!(record.essence, Essence::Stardust);

        // Flag without ciphertext downgrades to an open record.
        let open = store
            .save("visible", Essence::Aurora, None, true)
            .unwrap();
        assert!(!open.has_password);
        assert_eq!(open.message, "visible");

        // Blank plaintext is fine as long as a ciphertext is kept.
        let sealed = store
            .save("", Essence::Aurora, Some("Y2lwaGVy".to_owned()), true)
            .unwrap();
        assert_eq!(sealed.message, ENCRYPTED_PLACEHOLDER);
    }

    #[test]
    fn test_delete_removes_and_survives_unknown_ids() {
        let store = RecordStore::with_backend(MemoryBackend::new());
        let record = store.save("goner", Essence::Aurora, None, false).unwrap();
        assert_eq!(store.count(), 50);

        store.delete(&record.id);
        assert_eq!(store.count(), 49);
        assert!(store.list().iter().all(|r| r.id != record.id));

        store.delete("no_such_id");
        store.delete("");
        assert_eq!(store.count(), 49);
    }

    #[test]
    fn test_force_load_presets_is_idempotent() {
        let store = store_with_raw(
            r#"[{"id":"user_1_abc","message":"mine","hasPassword":false,"timestamp":99999999999999,"essence":"aurora"}]"#,
        );
        assert_eq!(store.count(), 1);

        store.force_load_presets();
        let records = store.list();
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].id, "user_1_abc");
        assert!(records[1..].iter().all(|r| r.id.starts_with("preset_")));

        // Running again must not duplicate or reshuffle anything.
        store.force_load_presets();
        assert_eq!(store.list(), records);
    }

    #[test]
    fn test_clear_empties_then_reseeds_on_next_read() {
        let store = RecordStore::with_backend(MemoryBackend::new());
        store.save("one", Essence::Aurora, None, false).unwrap();
        store.clear();

        let records = store.list();
        assert_eq!(records.len(), 50);
        assert!(records.iter().all(|r| r.id.starts_with("preset_")));
    }

    #[test]
    fn test_file_store_round_trips_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whispers.json");

        let record = {
            let store = RecordStore::open_at(&path);
            store
                .save("persisted across drops", Essence::Stardust, None, false)
                .unwrap()
        };

        let store = RecordStore::open_at(&path);
        let records = store.list();
        assert_eq!(records[0].id, record.id);
        assert_eq!(records[0].message, "persisted across drops");
        assert!(!store.is_degraded());
    }

    #[test]
    fn test_broken_backend_degrades_to_memory_and_keeps_working() {
        let store = RecordStore::with_backend(BrokenBackend);

        let record = store.save("still here", Essence::Aurora, None, false);
        assert!(record.is_some());
        assert!(store.is_degraded());

        // Data written after degradation is readable for the session.
        let records = store.list();
        assert_eq!(records[0].message, "still here");
    }

    #[tokio::test]
    async fn test_protected_round_trip_through_real_ciphertext() {
        let ciphertext = givre_shared::crypto::encrypt("Meet me at midnight", "secret1")
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whispers.json");
        {
            let store = RecordStore::open_at(&path);
            store
                .save("Meet me at midnight", Essence::Aurora, Some(ciphertext), true)
                .unwrap();
        }

        // Reopen: the plaintext must be gone from disk, the ciphertext must
        // still decrypt with the original password.
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("Meet me at midnight"));

        let store = RecordStore::open_at(&path);
        let records = store.list();
        let sealed = records
            .iter()
            .find(|r| r.has_password)
            .expect("protected record survives reopen");
        assert_eq!(sealed.message, ENCRYPTED_PLACEHOLDER);

        let ct = sealed.encrypted_message.clone().unwrap();
        let plain = givre_shared::crypto::decrypt(&ct, "secret1").await.unwrap();
        assert_eq!(plain, "Meet me at midnight");

        let wrong = givre_shared::crypto::decrypt(&ct, "secret2").await;
        assert!(wrong.is_err());
    }

    #[test]
    fn test_legacy_blob_is_repaired_on_load() {
        let store = store_with_raw(
            r#"[
                {"id": 111, "message": "numeric id", "timestamp": 5},
                {"message": "lost id and time"},
                {"id": "dup", "message": "first", "timestamp": 3},
                {"id": "dup", "message": "second", "timestamp": 4},
                "garbage",
                {"id": "sealed", "encryptedMessage": "QUJD", "timestamp": 2}
            ]"#,
        );

        let records = store.list();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert!(ids.contains(&"111"));
        assert!(ids.contains(&"dup"));
        assert!(ids.contains(&"sealed"));
        assert_eq!(records.len(), 4);

        let dup = records.iter().find(|r| r.id == "dup").unwrap();
        assert_eq!(dup.message, "first");

        let sealed = records.iter().find(|r| r.id == "sealed").unwrap();
        assert!(sealed.has_password);
        assert_eq!(sealed.message, ENCRYPTED_PLACEHOLDER);
    }
}
