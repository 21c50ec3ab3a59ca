//! Display name lookup for user ids
//!
//! Outbound room messages embed the creator's display name, resolved at the
//! time the message is built. The user store itself lives outside this crate;
//! [`UsernameStore`] is the in-process implementation and
//! [`CachedUserDirectory`] puts an in-memory cache in front of any directory.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::{config::UserDirectoryConfig, models::UserId, Result};

/// Shown in place of a display name that cannot be resolved
pub const UNKNOWN_USERNAME: &str = "Unknown User";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// `Ok(None)` when the id is unknown
    async fn display_name(&self, user_id: &UserId) -> Result<Option<String>>;
}

/// Resolve a display name, falling back to [`UNKNOWN_USERNAME`].
///
/// Never fails: an unknown id or a directory error only degrades the name.
pub async fn resolve_display_name(directory: &dyn UserDirectory, user_id: &UserId) -> String {
    match directory.display_name(user_id).await {
        Ok(Some(name)) => name,
        Ok(None) => {
            tracing::debug!(user_id = %user_id, "Display name not found");
            UNKNOWN_USERNAME.to_string()
        }
        Err(e) => {
            tracing::warn!(user_id = %user_id, error = %e, "Display name lookup failed");
            UNKNOWN_USERNAME.to_string()
        }
    }
}

/// In-memory user id -> display name map
#[derive(Debug, Clone, Default)]
pub struct UsernameStore {
    names: Arc<DashMap<UserId, String>>,
}

impl UsernameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: UserId, username: impl Into<String>) {
        self.names.insert(user_id, username.into());
    }

    pub fn remove(&self, user_id: &UserId) -> Option<String> {
        self.names.remove(user_id).map(|(_, name)| name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[async_trait]
impl UserDirectory for UsernameStore {
    async fn display_name(&self, user_id: &UserId) -> Result<Option<String>> {
        Ok(self.names.get(user_id).map(|entry| entry.value().clone()))
    }
}

/// Caches resolved names in front of another directory.
///
/// Misses are not cached, so a user created after a failed lookup resolves
/// on the next message.
#[derive(Clone)]
pub struct CachedUserDirectory {
    inner: Arc<dyn UserDirectory>,
    cache: moka::future::Cache<UserId, String>,
}

impl std::fmt::Debug for CachedUserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedUserDirectory")
            .field("entries", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl CachedUserDirectory {
    #[must_use]
    pub fn new(inner: Arc<dyn UserDirectory>, config: &UserDirectoryConfig) -> Self {
        Self {
            inner,
            cache: moka::future::CacheBuilder::new(config.cache_capacity)
                .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
                .build(),
        }
    }

    /// Drop a cached name, e.g. after a rename.
    pub async fn invalidate(&self, user_id: &UserId) {
        self.cache.invalidate(user_id).await;
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl UserDirectory for CachedUserDirectory {
    async fn display_name(&self, user_id: &UserId) -> Result<Option<String>> {
        if let Some(name) = self.cache.get(user_id).await {
            tracing::trace!(user_id = %user_id, "Display name cache hit");
            return Ok(Some(name));
        }

        let name = self.inner.display_name(user_id).await?;
        if let Some(ref name) = name {
            self.cache.insert(user_id.clone(), name.clone()).await;
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[tokio::test]
    async fn test_store_lookup() {
        let store = UsernameStore::new();
        let alice = UserId::new();
        store.set(alice.clone(), "alice");

        assert_eq!(store.display_name(&alice).await.unwrap().as_deref(), Some("alice"));
        assert_eq!(store.display_name(&UserId::new()).await.unwrap(), None);
        assert_eq!(store.remove(&alice).as_deref(), Some("alice"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_unknown_id_uses_placeholder() {
        let store = UsernameStore::new();
        let name = resolve_display_name(&store, &UserId::new()).await;
        assert_eq!(name, UNKNOWN_USERNAME);
    }

    #[tokio::test]
    async fn test_resolve_directory_error_uses_placeholder() {
        let mut directory = MockUserDirectory::new();
        directory
            .expect_display_name()
            .returning(|_| Err(Error::Internal("user store offline".to_string())));

        let name = resolve_display_name(&directory, &UserId::new()).await;
        assert_eq!(name, UNKNOWN_USERNAME);
    }

    #[tokio::test]
    async fn test_cache_hits_skip_inner_directory() {
        let mut inner = MockUserDirectory::new();
        inner
            .expect_display_name()
            .times(1)
            .returning(|_| Ok(Some("bob".to_string())));

        let cached = CachedUserDirectory::new(Arc::new(inner), &UserDirectoryConfig::default());
        let bob = UserId::new();
        assert_eq!(cached.display_name(&bob).await.unwrap().as_deref(), Some("bob"));
        assert_eq!(cached.display_name(&bob).await.unwrap().as_deref(), Some("bob"));
    }

    #[tokio::test]
    async fn test_cache_does_not_remember_misses() {
        let store = UsernameStore::new();
        let cached =
            CachedUserDirectory::new(Arc::new(store.clone()), &UserDirectoryConfig::default());
        let carol = UserId::new();

        assert_eq!(cached.display_name(&carol).await.unwrap(), None);
        store.set(carol.clone(), "carol");
        assert_eq!(cached.display_name(&carol).await.unwrap().as_deref(), Some("carol"));
    }

    #[tokio::test]
    async fn test_invalidate_refetches() {
        let store = UsernameStore::new();
        let cached =
            CachedUserDirectory::new(Arc::new(store.clone()), &UserDirectoryConfig::default());
        let dave = UserId::new();
        store.set(dave.clone(), "dave");
        assert_eq!(cached.display_name(&dave).await.unwrap().as_deref(), Some("dave"));

        store.set(dave.clone(), "david");
        assert_eq!(cached.display_name(&dave).await.unwrap().as_deref(), Some("dave"));
        cached.invalidate(&dave).await;
        assert_eq!(cached.display_name(&dave).await.unwrap().as_deref(), Some("david"));
    }
}
