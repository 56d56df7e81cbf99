//! Member directory error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::validation::ValidationErrors;

/// Errors that can occur during registration, login and logout.
#[derive(Debug, Error)]
pub enum MemberError {
    /// Registration fields were rejected, including already-taken
    /// usernames and emails.
    #[error("invalid registration: {0}")]
    Validation(ValidationErrors),

    /// Login failed. Deliberately says nothing about which part was wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Session store error.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
