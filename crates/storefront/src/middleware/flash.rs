//! One-shot confirmation messages.
//!
//! A write stores its message in the session; the next listing takes it, so
//! it is shown exactly once.

use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::models::session_keys;

/// Queue `message` for the next listing, replacing any unread one.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(session: &Session, message: &str) -> Result<(), SessionError> {
    session.insert(session_keys::FLASH_MESSAGE, message).await
}

/// Remove and return the pending message.
///
/// # Errors
///
/// Returns an error if the session cannot be read.
pub async fn take_flash(session: &Session) -> Result<Option<String>, SessionError> {
    session.remove(session_keys::FLASH_MESSAGE).await
}
