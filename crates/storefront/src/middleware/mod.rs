//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (hub per request, capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! Handlers reach the session through the `auth` extractors and `flash`.

pub mod auth;
pub mod flash;
pub mod session;

pub use auth::{OptionalMember, RequireMember};
pub use flash::{set_flash, take_flash};
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
