//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use ecommerce_core::MemberId;

/// Session-stored member identity.
///
/// Created on a successful login and removed on logout or once the session
/// idles out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    /// The logged-in member's username.
    pub username: String,
    /// The logged-in member's ID.
    pub member_id: MemberId,
}

/// Session keys.
pub mod keys {
    /// Key for the logged-in member identity.
    pub const CURRENT_MEMBER: &str = "current_member";

    /// Key for the one-shot confirmation message shown on the next listing.
    pub const FLASH_MESSAGE: &str = "flash_message";
}
