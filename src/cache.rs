//! Ephemeral invite-code store.
//!
//! Invite codes are short-lived mappings from a code string to the issuing
//! user id. They are never persisted in the relational store: the key-value
//! store holding them is the sole owner of expiry, and the core only issues
//! and consumes keys. [`InviteCodeStore`] is the narrow contract the couple
//! subsystem depends on; [`InMemoryInviteCodeStore`] is the in-process
//! adapter used by default and in tests. A Redis-backed adapter would
//! implement the same three operations.

use crate::errors::Result;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Namespace under which codes are stored, kept distinct from any other
/// tenant of the key-value store.
const KEY_PREFIX: &str = "invite:code:";

/// Contract for the ephemeral store holding live invite codes.
///
/// `get` returning `None` means the code was never stored, was consumed, or
/// expired - the three cases are indistinguishable by design.
#[allow(async_fn_in_trait)]
pub trait InviteCodeStore {
    /// Stores `code -> user_id` for at most `ttl`. Overwrites any previous
    /// mapping under the same code.
    async fn put(&self, code: &str, user_id: i64, ttl: Duration) -> Result<()>;

    /// Resolves a code to its issuing user id, if the mapping is still live.
    async fn get(&self, code: &str) -> Result<Option<i64>>;

    /// Deletes the mapping for `code`. Idempotent.
    async fn remove(&self, code: &str) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    user_id: i64,
    deadline: Instant,
}

/// In-process implementation of [`InviteCodeStore`].
///
/// Entries carry an eviction deadline and are dropped lazily when read past
/// it, so a never-redeemed code occupies memory only until the next lookup
/// of that code.
#[derive(Debug, Default)]
pub struct InMemoryInviteCodeStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryInviteCodeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(code: &str) -> String {
        format!("{KEY_PREFIX}{code}")
    }
}

impl InviteCodeStore for InMemoryInviteCodeStore {
    async fn put(&self, code: &str, user_id: i64, ttl: Duration) -> Result<()> {
        let entry = Entry {
            user_id,
            deadline: Instant::now() + ttl,
        };
        self.entries.write().await.insert(Self::key(code), entry);
        Ok(())
    }

    async fn get(&self, code: &str) -> Result<Option<i64>> {
        let key = Self::key(code);

        {
            let entries = self.entries.read().await;
            match entries.get(&key) {
                None => return Ok(None),
                Some(entry) if Instant::now() < entry.deadline => {
                    return Ok(Some(entry.user_id));
                }
                Some(_) => {} // expired, fall through to evict
            }
        }

        // Re-check under the write lock: the entry may have been replaced
        // with a fresh deadline since the read lock was released.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(&key) {
            if Instant::now() < entry.deadline {
                return Ok(Some(entry.user_id));
            }
            entries.remove(&key);
            debug!("Evicted expired invite code entry");
        }
        Ok(None)
    }

    async fn remove(&self, code: &str) -> Result<()> {
        self.entries.write().await.remove(&Self::key(code));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() -> Result<()> {
        let store = InMemoryInviteCodeStore::new();

        store.put("AB12CD", 42, Duration::from_secs(600)).await?;
        assert_eq!(store.get("AB12CD").await?, Some(42));

        Ok(())
    }

    #[tokio::test]
    async fn test_get_unknown_code() -> Result<()> {
        let store = InMemoryInviteCodeStore::new();
        assert_eq!(store.get("NOPE99").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() -> Result<()> {
        let store = InMemoryInviteCodeStore::new();

        store.put("AB12CD", 42, Duration::from_secs(600)).await?;
        store.remove("AB12CD").await?;
        assert_eq!(store.get("AB12CD").await?, None);

        // Removing again must not fail
        store.remove("AB12CD").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_expired_entry_is_evicted_on_read() -> Result<()> {
        let store = InMemoryInviteCodeStore::new();

        store.put("AB12CD", 42, Duration::from_millis(20)).await?;
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert_eq!(store.get("AB12CD").await?, None);
        assert!(store.entries.read().await.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_overwrite_refreshes_mapping() -> Result<()> {
        let store = InMemoryInviteCodeStore::new();

        store.put("AB12CD", 1, Duration::from_secs(600)).await?;
        store.put("AB12CD", 2, Duration::from_secs(600)).await?;
        assert_eq!(store.get("AB12CD").await?, Some(2));
        Ok(())
    }
}
