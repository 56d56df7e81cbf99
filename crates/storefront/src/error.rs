//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::{CatalogError, MemberError, ValidationErrors};

/// Shown for every failed login, whatever the cause.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid username/email or password";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Member operation failed.
    #[error("Member error: {0}")]
    Member(#[from] MemberError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Member is not logged in.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

enum Body<'a> {
    Fields(&'a ValidationErrors),
    Message(String),
}

impl AppError {
    /// Whether this is our fault rather than the client's.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::Session(_) => true,
            Self::Catalog(err) => matches!(err, CatalogError::Repository(_)),
            Self::Member(err) => matches!(
                err,
                MemberError::Repository(_) | MemberError::Session(_) | MemberError::PasswordHash
            ),
            Self::NotFound(_) | Self::Unauthorized(_) => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::Validation(_)) | Self::Member(MemberError::Validation(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Catalog(CatalogError::NotFound(_)) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Member(MemberError::InvalidCredentials) | Self::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Don't expose internal error details to clients
    fn body(&self) -> Body<'_> {
        match self {
            Self::Catalog(CatalogError::Validation(errors))
            | Self::Member(MemberError::Validation(errors)) => Body::Fields(errors),
            Self::Catalog(CatalogError::NotFound(id)) => {
                Body::Message(format!("Product {id} not found"))
            }
            Self::Member(MemberError::InvalidCredentials) => {
                Body::Message(INVALID_LOGIN_MESSAGE.to_string())
            }
            Self::NotFound(what) => Body::Message(format!("{what} not found")),
            Self::Unauthorized(msg) => Body::Message(msg.clone()),
            _ => Body::Message("Internal server error".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = match self.body() {
            Body::Fields(errors) => json!({ "errors": errors.errors() }),
            Body::Message(message) => json!({ "error": message }),
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context for a logged-in member.
///
/// Call this after successful authentication to associate errors with members.
pub fn set_sentry_user(member_id: &impl ToString, username: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(member_id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the member.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("catalog", "Product created", Some(&[("product_id", "12")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
