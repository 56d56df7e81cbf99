//! Session middleware configuration.
//!
//! Sessions live in `PostgreSQL` via tower-sessions in production; tests hand
//! in a `MemoryStore` and get identical cookie settings.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "shop_session";

/// Create the session layer over `store`.
///
/// Sessions expire after `config.session_idle_minutes` without a request.
/// The session is saved on every request, so reads refresh the cookie and
/// push the idle deadline back just like writes do.
///
/// # Arguments
///
/// * `store` - Session store, normally `tower_sessions_sqlx_store::PostgresStore`
///   (the `tower_sessions.session` table must be created via migration)
/// * `config` - Storefront configuration (idle timeout, https detection)
#[must_use]
pub fn create_session_layer<S: SessionStore + Clone>(
    store: S,
    config: &StorefrontConfig,
) -> SessionManagerLayer<S> {
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_always_save(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(
            config.session_idle_minutes,
        )))
        .with_secure(config.is_https())
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
