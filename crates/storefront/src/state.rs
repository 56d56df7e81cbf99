//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::db::{MemberRepository, PgMemberRepository, PgProductRepository, ProductRepository};
use crate::services::{Argon2Verifier, CatalogService, CredentialVerifier, MemberDirectory};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like repositories and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    products: Arc<dyn ProductRepository>,
    members: Arc<dyn MemberRepository>,
    verifier: Arc<dyn CredentialVerifier>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create application state backed by `PostgreSQL`.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products: Arc::new(PgProductRepository::new(pool.clone())),
                members: Arc::new(PgMemberRepository::new(pool.clone())),
                verifier: Arc::new(Argon2Verifier::new()),
                pool: Some(pool),
            }),
        }
    }

    /// Create application state over arbitrary repositories, e.g.
    /// [`crate::db::MemoryDatastore`] in tests.
    #[must_use]
    pub fn with_repositories(
        config: StorefrontConfig,
        products: Arc<dyn ProductRepository>,
        members: Arc<dyn MemberRepository>,
        verifier: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                products,
                members,
                verifier,
                pool: None,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// The database pool, when running against `PostgreSQL`.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    /// Catalog service using the configured page size.
    #[must_use]
    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self.inner.products.as_ref(), self.inner.config.page_size)
    }

    /// Member directory over the member repository.
    #[must_use]
    pub fn members(&self) -> MemberDirectory<'_> {
        MemberDirectory::new(self.inner.members.as_ref(), self.inner.verifier.as_ref())
    }
}
