//! Catalog browsing and product maintenance.

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use ecommerce_core::{Price, ProductId, ProductTitle};

use super::validation::ValidationErrors;
use crate::db::{ProductRepository, RepositoryError};
use crate::models::{Product, ProductFilter, ProductInput};

/// Products per listing page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// Errors from catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The submitted product fields were rejected.
    #[error("invalid product: {0}")]
    Validation(ValidationErrors),

    /// No product with this id.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Listing request as the shopper expressed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub search_term: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// 1-based page; anything outside the available pages is clamped.
    pub page: Option<i64>,
}

impl CatalogQuery {
    fn filter(&self) -> ProductFilter {
        ProductFilter {
            search_term: self
                .search_term
                .clone()
                .filter(|term| !term.trim().is_empty()),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// One page of the filtered, title-ordered catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub page_size: u64,
}

/// Raw product fields as submitted by a form or seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub price: String,
}

impl ProductDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: price.into(),
        }
    }

    /// Check every field, reporting all failures together.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors for `title` and `price`.
    pub fn validate(&self) -> Result<ProductInput, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let title = errors.check("title", ProductTitle::parse(&self.title));
        let price = match self.price.trim() {
            "" => {
                errors.add("price", "Price is required");
                None
            }
            raw => match raw.parse::<Decimal>() {
                Ok(amount) => errors.check("price", Price::new(amount)),
                Err(_) => {
                    errors.add("price", "Price must be a number");
                    None
                }
            },
        };

        match (title, price) {
            (Some(title), Some(price)) => errors.into_result(ProductInput { title, price }),
            _ => Err(errors),
        }
    }
}

/// A completed write plus the confirmation to show on the next listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmed {
    pub product: Product,
    pub message: String,
}

impl Confirmed {
    fn new(product: Product, verb: &str) -> Self {
        let message = format!("{} has been {verb} successfully!", product.title);
        Self { product, message }
    }
}

/// Number of pages needed for `total_items`.
#[must_use]
pub const fn total_pages(total_items: u64, page_size: u64) -> u64 {
    total_items.div_ceil(page_size)
}

/// Clamp a requested page into `[1, total_pages]`, with an empty catalog
/// showing page 1.
#[must_use]
pub fn clamp_page(requested: Option<i64>, total_pages: u64) -> u64 {
    let requested = requested.map_or(1, |p| u64::try_from(p).unwrap_or(0));
    requested.clamp(1, total_pages.max(1))
}

/// Catalog operations over a product repository.
pub struct CatalogService<'a> {
    products: &'a dyn ProductRepository,
    page_size: u64,
}

impl<'a> CatalogService<'a> {
    /// Create a catalog service. A `page_size` of zero is treated as 1.
    #[must_use]
    pub fn new(products: &'a dyn ProductRepository, page_size: u64) -> Self {
        Self {
            products,
            page_size: page_size.max(1),
        }
    }

    /// Filter, order by title and page the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the datastore fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, query: &CatalogQuery) -> Result<ProductPage, CatalogError> {
        let filter = query.filter();
        let total_items = self.products.count(&filter).await?;
        let total_pages = total_pages(total_items, self.page_size);
        let current_page = clamp_page(query.page, total_pages);

        let items = if total_items == 0 {
            Vec::new()
        } else {
            let offset = (current_page - 1) * self.page_size;
            self.products.list(&filter, offset, self.page_size).await?
        };

        Ok(ProductPage {
            items,
            current_page,
            total_pages,
            total_items,
            page_size: self.page_size,
        })
    }

    /// Fetch one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if no product has this id.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get(id)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    /// Validate and insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` without writing anything if a field
    /// is rejected.
    #[instrument(skip(self))]
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Confirmed, CatalogError> {
        let input = draft.validate().map_err(CatalogError::Validation)?;
        let product = self.products.create(&input).await?;
        tracing::info!(product_id = %product.id, "product created");
        Ok(Confirmed::new(product, "added"))
    }

    /// Validate and replace an existing product's fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` if a field is rejected and
    /// `CatalogError::NotFound` if the product does not exist.
    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        draft: &ProductDraft,
    ) -> Result<Confirmed, CatalogError> {
        let input = draft.validate().map_err(CatalogError::Validation)?;
        let product = self
            .products
            .update(id, &input)
            .await?
            .ok_or(CatalogError::NotFound(id))?;
        tracing::info!(product_id = %product.id, "product updated");
        Ok(Confirmed::new(product, "updated"))
    }

    /// Delete a product. Deleting an id that does not exist is not an error
    /// and yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the datastore fails.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ProductId) -> Result<Option<Confirmed>, CatalogError> {
        let deleted = self.products.delete(id).await?;
        if deleted.is_none() {
            tracing::debug!(product_id = %id, "delete of missing product ignored");
        }
        Ok(deleted.map(|product| Confirmed::new(product, "deleted")))
    }
}
