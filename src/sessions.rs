// src/sessions.rs
//
// In-memory component instances keyed by an opaque session id. Each booking
// modal, calendar and reports panel lives here between browser requests.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;
use uuid::Uuid;

struct Entry<T> {
    value: T,
    last_seen: Instant,
}

pub struct SessionStore<T> {
    inner: Arc<RwLock<HashMap<Uuid, Entry<T>>>>,
    ttl: Duration,
}

impl<T> Clone for SessionStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            ttl: self.ttl,
        }
    }
}

impl<T> SessionStore<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Stores `value` under a fresh id; idle entries are purged first.
    pub async fn insert(&self, value: T) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut map = self.inner.write().await;

        let before = map.len();
        map.retain(|_, e| now.duration_since(e.last_seen) < self.ttl);
        let purged = before - map.len();
        if purged > 0 {
            tracing::debug!(purged, "expired sessions removed");
        }

        map.insert(
            id,
            Entry {
                value,
                last_seen: now,
            },
        );
        id
    }

    /// Runs `f` against a live entry and refreshes its idle timer.
    /// Returns `None` for unknown or expired ids.
    pub async fn with_mut<R>(&self, id: Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let now = Instant::now();
        let mut map = self.inner.write().await;
        let expired = match map.get(&id) {
            Some(e) => now.duration_since(e.last_seen) >= self.ttl,
            None => return None,
        };
        if expired {
            map.remove(&id);
            return None;
        }
        let entry = map.get_mut(&id)?;
        entry.last_seen = now;
        Some(f(&mut entry.value))
    }

    /// Read-only access; does not refresh the idle timer.
    pub async fn with<R>(&self, id: Uuid, f: impl FnOnce(&T) -> R) -> Option<R> {
        let map = self.inner.read().await;
        map.get(&id)
            .filter(|e| e.last_seen.elapsed() < self.ttl)
            .map(|e| f(&e.value))
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
