//! In-Memory Reservation Session Store
//!
//! Each session sits behind its own `tokio::sync::Mutex`; the map itself is
//! behind an `RwLock` that is only held long enough to clone an `Arc`.
//! Sessions idle longer than the TTL behave as missing and are reclaimed
//! by [`InMemorySessionStore::purge_expired`].

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};

use crate::domain::foundation::{ReservationSessionId, Timestamp};
use crate::domain::reservation::ReservationSession;
use crate::ports::{ReservationSessionStore, SessionGuard, SessionStoreError};

type Slot = Arc<Mutex<ReservationSession>>;

#[derive(Debug, Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<ReservationSessionId, Slot>>>,
    ttl: chrono::Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(365)),
        }
    }

    fn is_expired(&self, session: &ReservationSession) -> bool {
        Timestamp::now().duration_since(session.updated_at()) > self.ttl
    }

    async fn slot(&self, id: &ReservationSessionId) -> Result<Slot, SessionStoreError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(SessionStoreError::NotFound(*id))
    }

    async fn evict(&self, id: &ReservationSessionId) {
        self.sessions.write().await.remove(id);
        tracing::debug!(session_id = %id, "evicted expired reservation session");
    }
}

#[async_trait]
impl ReservationSessionStore for InMemorySessionStore {
    async fn insert(&self, session: ReservationSession) -> Result<(), SessionStoreError> {
        let id = session.id();
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(SessionStoreError::AlreadyExists(id));
        }
        sessions.insert(id, Arc::new(Mutex::new(session)));
        Ok(())
    }

    async fn acquire(&self, id: &ReservationSessionId) -> Result<SessionGuard, SessionStoreError> {
        let slot = self.slot(id).await?;
        let guard = slot
            .try_lock_owned()
            .map_err(|_| SessionStoreError::Busy(*id))?;

        if self.is_expired(&guard) {
            drop(guard);
            self.evict(id).await;
            return Err(SessionStoreError::NotFound(*id));
        }
        Ok(guard)
    }

    async fn snapshot(&self, id: &ReservationSessionId) -> Result<ReservationSession, SessionStoreError> {
        let slot = self.slot(id).await?;
        let session = slot.lock().await.clone();

        if self.is_expired(&session) {
            self.evict(id).await;
            return Err(SessionStoreError::NotFound(*id));
        }
        Ok(session)
    }

    async fn remove(&self, id: &ReservationSessionId) -> Result<ReservationSession, SessionStoreError> {
        let slot = self.slot(id).await?;
        let guard = slot
            .try_lock_owned()
            .map_err(|_| SessionStoreError::Busy(*id))?;
        let expired = self.is_expired(&guard);
        let session = guard.clone();
        drop(guard);

        self.sessions.write().await.remove(id);
        if expired {
            return Err(SessionStoreError::NotFound(*id));
        }
        Ok(session)
    }

    async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        // Busy sessions are in use, so never expired.
        sessions.retain(|_, slot| match slot.try_lock() {
            Ok(session) => !self.is_expired(&session),
            Err(_) => true,
        });
        before - sessions.len()
    }

    async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
