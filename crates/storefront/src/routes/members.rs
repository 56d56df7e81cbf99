//! Member route handlers: registration, login, logout.

use axum::{Form, Json, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireMember;
use crate::models::SessionIdentity;
use crate::services::{Registration, logout as clear_identity};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub date_of_birth: String,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            confirm_password: form.confirm_password,
            date_of_birth: form.date_of_birth,
        }
    }
}

/// Login form data.
#[derive(Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct LoginForm {
    pub username_or_email: String,
    pub password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle registration.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect> {
    state.members().register(&form.into()).await?;
    Ok(Redirect::to("/products"))
}

/// Handle login.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect> {
    let identity = state
        .members()
        .login(&session, &form.username_or_email, &form.password)
        .await?;
    set_sentry_user(&identity.member_id, &identity.username);
    Ok(Redirect::to("/products"))
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_identity(&session).await?;
    clear_sentry_user();
    Ok(Redirect::to("/products"))
}

/// The logged-in member's identity.
pub async fn me(RequireMember(identity): RequireMember) -> Json<SessionIdentity> {
    Json(identity)
}
