//! Session identity capability.
//!
//! Login and logout only need to read, store and clear one identity value,
//! so services take `&dyn IdentitySession` instead of a concrete session.
//! [`tower_sessions::Session`] is the production implementation.

use async_trait::async_trait;
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::models::{SessionIdentity, session_keys};

/// Storage for the logged-in member of one browser session.
#[async_trait]
pub trait IdentitySession: Send + Sync {
    /// The current identity, if any.
    async fn identity(&self) -> Result<Option<SessionIdentity>, SessionError>;

    /// Store `identity`, issuing a fresh session id first.
    async fn establish(&self, identity: &SessionIdentity) -> Result<(), SessionError>;

    /// Forget the identity.
    async fn clear_identity(&self) -> Result<(), SessionError>;
}

#[async_trait]
impl IdentitySession for Session {
    async fn identity(&self) -> Result<Option<SessionIdentity>, SessionError> {
        self.get(session_keys::CURRENT_MEMBER).await
    }

    async fn establish(&self, identity: &SessionIdentity) -> Result<(), SessionError> {
        // Prevent session fixation
        self.cycle_id().await?;
        self.insert(session_keys::CURRENT_MEMBER, identity).await
    }

    async fn clear_identity(&self) -> Result<(), SessionError> {
        self.remove::<SessionIdentity>(session_keys::CURRENT_MEMBER)
            .await
            .map(|_| ())
    }
}

/// In-process session holding at most one identity.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySession {
    identity: tokio::sync::Mutex<Option<SessionIdentity>>,
    pub establish_count: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
#[async_trait]
impl IdentitySession for MemorySession {
    async fn identity(&self) -> Result<Option<SessionIdentity>, SessionError> {
        Ok(self.identity.lock().await.clone())
    }

    async fn establish(&self, identity: &SessionIdentity) -> Result<(), SessionError> {
        self.establish_count
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        *self.identity.lock().await = Some(identity.clone());
        Ok(())
    }

    async fn clear_identity(&self) -> Result<(), SessionError> {
        *self.identity.lock().await = None;
        Ok(())
    }
}
