//! Seed the catalog with products from a YAML file.
//!
//! # File Format
//!
//! ```yaml
//! products:
//!   - title: Widget
//!     price: 9.99
//!   - title: Gadget
//!     price: "20.00"
//! ```
//!
//! Each entry goes through the same validation as the product form; invalid
//! entries are logged and skipped, the rest are inserted.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use ecommerce_storefront::db::{self, MemoryDatastore, PgProductRepository, ProductRepository};
use ecommerce_storefront::services::{CatalogError, CatalogService, ProductDraft};

use super::{CommandError, database_url};

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Could not read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Top-level seed document.
#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub products: Vec<SeedProduct>,
}

/// One product entry.
#[derive(Debug, Deserialize)]
pub struct SeedProduct {
    pub title: String,
    pub price: SeedPrice,
}

/// A price written either as a YAML number or a quoted string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SeedPrice {
    Number(serde_yaml::Number),
    Text(String),
}

impl From<&SeedProduct> for ProductDraft {
    fn from(entry: &SeedProduct) -> Self {
        let price = match &entry.price {
            SeedPrice::Number(n) => n.to_string(),
            SeedPrice::Text(s) => s.clone(),
        };
        Self::new(entry.title.clone(), price)
    }
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub rejected: usize,
}

/// Seed products from a YAML file.
///
/// With `dry_run`, entries are validated and inserted into a throwaway
/// in-memory catalog instead of the database.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the database
/// fails. Invalid entries are counted, not treated as errors.
pub async fn products(file_path: &str, dry_run: bool) -> Result<SeedReport, SeedError> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(SeedError::FileNotFound(file_path.to_owned()));
    }

    info!(path = %file_path, "Loading products from file");
    let content = tokio::fs::read_to_string(path).await?;
    let file: SeedFile = serde_yaml::from_str(&content)?;
    info!(products = file.products.len(), "Parsed seed file");

    let report = if dry_run {
        info!("Dry run: using an in-memory catalog");
        seed(&MemoryDatastore::new(), &file.products).await?
    } else {
        let pool = db::create_pool(&database_url()?).await?;
        info!("Connected to database");
        seed(&PgProductRepository::new(pool), &file.products).await?
    };

    info!(
        inserted = report.inserted,
        rejected = report.rejected,
        "Seeding complete"
    );
    Ok(report)
}

/// Insert every valid entry through the catalog service.
async fn seed(
    products: &dyn ProductRepository,
    entries: &[SeedProduct],
) -> Result<SeedReport, SeedError> {
    let catalog = CatalogService::new(products, 1);
    let mut report = SeedReport::default();

    for entry in entries {
        match catalog.create_product(&entry.into()).await {
            Ok(confirmed) => {
                info!(product_id = %confirmed.product.id, title = %confirmed.product.title, "Inserted");
                report.inserted += 1;
            }
            Err(CatalogError::Validation(errors)) => {
                for e in errors.errors() {
                    warn!(title = %entry.title, field = e.field, "Rejected: {}", e.message);
                }
                report.rejected += 1;
            }
            Err(other) => return Err(other.into()),
        }
    }

    Ok(report)
}
