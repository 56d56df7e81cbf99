//! Datastore gateway for the storefront.
//!
//! # Database: `PostgreSQL`
//!
//! ## Tables
//!
//! - `storefront.product` - Catalog products
//! - `storefront.member` - Registered members (unique `username`, unique `email`)
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p ecommerce-cli -- migrate
//! ```
//!
//! # Repositories
//!
//! Services talk to the datastore only through [`ProductRepository`] and
//! [`MemberRepository`]. [`PgProductRepository`] / [`PgMemberRepository`] are
//! the production implementations; [`MemoryDatastore`] implements both with
//! the same unique-index behaviour for tests and local tooling.

pub mod members;
pub mod memory;
pub mod products;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use ecommerce_core::{Email, ProductId, Username};

use crate::models::{Member, MemberCredentials, NewMember, Product, ProductFilter, ProductInput};

pub use members::PgMemberRepository;
pub use memory::MemoryDatastore;
pub use products::PgProductRepository;

/// A unique index on the members table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Username,
    Email,
}

impl UniqueKey {
    /// Name of the form field this index protects.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A unique index rejected the write.
    #[error("unique constraint violated on {}", .0.field())]
    Conflict(UniqueKey),
}

/// Product collection.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Count products passing `filter`.
    async fn count(&self, filter: &ProductFilter) -> Result<u64, RepositoryError>;

    /// Products passing `filter`, ordered by title then id, windowed by
    /// `offset`/`limit`.
    async fn list(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Fetch one product.
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// Insert a product; the datastore assigns the id.
    async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError>;

    /// Replace a product's fields. `None` if the id does not exist.
    async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError>;

    /// Delete a product, returning what was removed. `None` if it did not exist.
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;
}

/// Member collection.
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Whether any member already uses `username`.
    async fn username_exists(&self, username: &Username) -> Result<bool, RepositoryError>;

    /// Whether any member already uses `email`.
    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError>;

    /// Insert a member.
    ///
    /// Returns `RepositoryError::Conflict` when a unique index rejects it.
    async fn create(&self, member: &NewMember) -> Result<Member, RepositoryError>;

    /// Members whose username or email equals `identifier`, ordered by id.
    async fn find_by_login(
        &self,
        identifier: &str,
    ) -> Result<Vec<MemberCredentials>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
