//! Session Handles
//!
//! Serializes turns on one session. A second turn submitted while one is in
//! flight is rejected with [`AppError::SessionBusy`] rather than queued, so
//! two answers can never interleave on the same state.

use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};

use crate::services::interview::InterviewSession;
use crate::services::quiz::QuizSession;
use crate::utils::error::{AppError, AppResult};

/// Anything a handle can wrap.
pub trait Session: Send {
    fn session_id(&self) -> &str;
}

impl Session for InterviewSession {
    fn session_id(&self) -> &str {
        self.id()
    }
}

impl Session for QuizSession {
    fn session_id(&self) -> &str {
        self.id()
    }
}

/// Shared handle to one exclusively-owned session.
pub struct SessionHandle<S> {
    id: String,
    inner: Arc<Mutex<S>>,
}

impl<S> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Session> SessionHandle<S> {
    pub fn new(session: S) -> Self {
        Self {
            id: session.session_id().to_string(),
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Begin a turn. The guard keeps the session locked until dropped, so
    /// hold it across the whole `submit_answer(..).await`.
    pub fn turn(&self) -> AppResult<MutexGuard<'_, S>> {
        self.inner.try_lock().map_err(|_| {
            AppError::session_busy(format!("session {} already has a turn in flight", self.id))
        })
    }

    /// Wait for any in-flight turn, then read the session.
    pub async fn read(&self) -> MutexGuard<'_, S> {
        self.inner.lock().await
    }

    /// Take the session back once every other handle is gone.
    pub fn into_inner(self) -> Result<S, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(mutex) => Ok(mutex.into_inner()),
            Err(inner) => Err(Self { id: self.id, inner }),
        }
    }
}
