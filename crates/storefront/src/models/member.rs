//! Member domain types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use ecommerce_core::{Email, MemberId, Username};

/// A registered website member.
///
/// The password hash is deliberately absent; it only travels inside
/// [`MemberCredentials`] during login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Datastore-generated identifier.
    pub id: MemberId,
    /// Unique public username.
    pub username: Username,
    /// Unique email address.
    pub email: Email,
    /// Date of birth (no time component).
    pub date_of_birth: NaiveDate,
    /// When the member registered.
    pub created_at: DateTime<Utc>,
}

/// A member ready to be written: fields validated, password already hashed.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub username: Username,
    pub email: Email,
    pub password_hash: String,
    pub date_of_birth: NaiveDate,
}

/// A member paired with its stored password hash, used only for login.
#[derive(Debug, Clone)]
pub struct MemberCredentials {
    pub member: Member,
    pub password_hash: String,
}
