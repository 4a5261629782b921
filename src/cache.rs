//! Stale-while-revalidate cache for rendered pages.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// How long rendered output may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPolicy {
    /// Reuse for the given time, then refresh in the background.
    Revalidate(Duration),
    /// Render on every request.
    Dynamic,
    /// Render once and reuse for the life of the process.
    Static,
}

impl RenderPolicy {
    pub fn revalidate_secs(secs: u64) -> Self {
        RenderPolicy::Revalidate(Duration::from_secs(secs))
    }

    /// `Cache-Control` value advertising this policy to downstream caches.
    pub fn cache_control(&self) -> String {
        match self {
            RenderPolicy::Revalidate(ttl) => format!(
                "public, s-maxage={}, stale-while-revalidate",
                ttl.as_secs()
            ),
            RenderPolicy::Dynamic => "no-store".to_string(),
            RenderPolicy::Static => "public, max-age=3600".to_string(),
        }
    }

    fn is_fresh(&self, age: Duration) -> bool {
        match self {
            RenderPolicy::Revalidate(ttl) => age < *ttl,
            RenderPolicy::Dynamic => false,
            RenderPolicy::Static => true,
        }
    }
}

/// Values that know whether they may be stored.
pub trait Cacheable {
    fn cacheable(&self) -> bool;
}

/// How a lookup was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Stale,
    Miss,
    Bypass,
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
    refreshing: bool,
}

impl<V> Entry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            refreshing: false,
        }
    }
}

/// Rendered output keyed by route path.
///
/// A stale entry is still served while a single background task refreshes
/// it. Output that reports itself as not cacheable is never stored, so a
/// failed render is retried on the next request instead of being pinned
/// for a whole interval.
pub struct RevalidationCache<V> {
    entries: Arc<RwLock<HashMap<String, Entry<V>>>>,
}

impl<V> Clone for RevalidationCache<V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<V> Default for RevalidationCache<V> {
    fn default() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<V> RevalidationCache<V>
where
    V: Cacheable + Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, rendering with `render` when there is nothing usable.
    pub async fn get_or_render<F, Fut>(
        &self,
        key: &str,
        policy: RenderPolicy,
        render: F,
    ) -> (V, CacheStatus)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = V> + Send + 'static,
    {
        if policy == RenderPolicy::Dynamic {
            return (render().await, CacheStatus::Bypass);
        }

        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key) {
                if policy.is_fresh(entry.stored_at.elapsed()) {
                    return (entry.value.clone(), CacheStatus::Hit);
                }
                if entry.refreshing {
                    return (entry.value.clone(), CacheStatus::Stale);
                }
            }
        }

        // Re-checked under the write lock: another request may have stored
        // or started refreshing the entry in between.
        {
            let mut entries = self.entries.write().await;
            if let Some(entry) = entries.get_mut(key) {
                if policy.is_fresh(entry.stored_at.elapsed()) {
                    return (entry.value.clone(), CacheStatus::Hit);
                }
                if !entry.refreshing {
                    entry.refreshing = true;
                    self.spawn_refresh(key.to_owned(), render);
                }
                return (entry.value.clone(), CacheStatus::Stale);
            }
        }

        let value = render().await;
        self.store(key, &value).await;
        (value, CacheStatus::Miss)
    }

    /// Render and store `key` unconditionally, e.g. to warm the cache.
    pub async fn prime<F, Fut>(&self, key: &str, render: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let value = render().await;
        self.store(key, &value).await
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    async fn store(&self, key: &str, value: &V) -> bool {
        if !value.cacheable() {
            debug!(key, "not caching render output");
            return false;
        }
        self.entries
            .write()
            .await
            .insert(key.to_owned(), Entry::new(value.clone()));
        true
    }

    fn spawn_refresh<F, Fut>(&self, key: String, render: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = V> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        tokio::spawn(async move {
            debug!(key = %key, "revalidating stale entry");
            let value = render().await;
            let mut entries = entries.write().await;
            if value.cacheable() {
                entries.insert(key, Entry::new(value));
            } else if let Some(entry) = entries.get_mut(&key) {
                entry.refreshing = false;
            }
        });
    }
}
