//! Reservation Session Store Port - live sessions with per-key exclusion.
//!
//! `acquire` hands out an owned lock guard for one session. While the
//! guard is alive no other request can acquire that session; the caller
//! commits by assigning through the guard.

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::ReservationSessionId;
use crate::domain::reservation::ReservationSession;

/// Exclusive handle on one stored session.
pub type SessionGuard = OwnedMutexGuard<ReservationSession>;

/// Errors from the session store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionStoreError {
    /// Unknown or expired id.
    #[error("reservation session not found: {0}")]
    NotFound(ReservationSessionId),

    /// Another request holds the session.
    #[error("reservation session busy: {0}")]
    Busy(ReservationSessionId),

    #[error("reservation session already exists: {0}")]
    AlreadyExists(ReservationSessionId),
}

/// Port for storing reservation sessions.
#[async_trait]
pub trait ReservationSessionStore: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the id is taken.
    async fn insert(&self, session: ReservationSession) -> Result<(), SessionStoreError>;

    /// Locks a session for one step without waiting.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown or expired ids
    /// - `Busy` if another request holds the lock
    async fn acquire(&self, id: &ReservationSessionId) -> Result<SessionGuard, SessionStoreError>;

    /// Returns a copy of the committed session state.
    async fn snapshot(&self, id: &ReservationSessionId) -> Result<ReservationSession, SessionStoreError>;

    /// Removes a session that is not in use.
    ///
    /// # Errors
    ///
    /// - `NotFound` for unknown or expired ids
    /// - `Busy` if a step is in flight
    async fn remove(&self, id: &ReservationSessionId) -> Result<ReservationSession, SessionStoreError>;

    /// Drops idle sessions past their TTL. Returns how many were dropped.
    async fn purge_expired(&self) -> usize;

    /// Number of stored sessions, expired ones included until purged.
    async fn len(&self) -> usize;
}
