//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Product listing, paging and maintenance
//! - `members` - Member registration, login and logout
//! - `session` - The session identity capability used by `members`
//! - `validation` - Field-level error collection shared by both

pub mod catalog;
pub mod members;
pub mod session;
pub mod validation;

pub use catalog::{CatalogError, CatalogQuery, CatalogService, Confirmed, ProductDraft, ProductPage};
pub use members::{
    Argon2Verifier, CredentialVerifier, MemberDirectory, MemberError, Registration,
    current_identity, logout,
};
pub use session::IdentitySession;
pub use validation::{FieldError, ValidationErrors};
