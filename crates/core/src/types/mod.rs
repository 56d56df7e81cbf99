//! Core types for the storefront.
//!
//! Type-safe wrappers for the product and member domain.

pub mod email;
pub mod id;
pub mod price;
pub mod title;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use title::{ProductTitle, TitleError};
pub use username::{Username, UsernameError};
