//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types in
//! [`crate::db`]. Every field is already parsed into its core type, so code
//! holding a `Product` or `Member` never re-checks field rules.

pub mod member;
pub mod product;
pub mod session;

pub use member::{Member, MemberCredentials, NewMember};
pub use product::{Product, ProductFilter, ProductInput};
pub use session::{SessionIdentity, keys as session_keys};
