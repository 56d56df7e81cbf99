//! eCommerce Core - Shared domain types.
//!
//! This crate provides the validated value types used across the workspace:
//! - `storefront` - Catalog, member directory and HTTP surface
//! - `cli` - Migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and their parsing rules - no I/O, no
//! database access, no HTTP. Every constructor validates, so a value of one of
//! these types is always well-formed.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, usernames, titles and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
