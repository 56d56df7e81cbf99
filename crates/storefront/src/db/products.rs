//! Product repository for `PostgreSQL`.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;

use ecommerce_core::{Price, ProductId, ProductTitle};

use super::{ProductRepository, RepositoryError};
use crate::models::{Product, ProductFilter, ProductInput};

const PRODUCT_COLUMNS: &str = "id, title, price";

/// Raw `storefront.product` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    price: Decimal,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let title = ProductTitle::parse(&row.title).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid title for product {}: {e}", row.id))
        })?;
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title,
            price,
        })
    }
}

/// Append the `WHERE` clause for `filter`.
///
/// `strpos` keeps the title match a plain case-sensitive substring test, with
/// no `LIKE` wildcard interpretation of `%` or `_` in the search term.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    builder.push(" WHERE TRUE");
    if let Some(term) = &filter.search_term {
        builder
            .push(" AND strpos(title, ")
            .push_bind(term.clone())
            .push(") > 0");
    }
    if let Some(min) = filter.min_price {
        builder.push(" AND price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        builder.push(" AND price <= ").push_bind(max);
    }
}

/// `PostgreSQL`-backed product collection.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> Result<u64, RepositoryError> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM storefront.product");
        push_filter(&mut builder, filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        filter: &ProductFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let mut builder =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM storefront.product"));
        push_filter(&mut builder, filter);
        builder
            .push(r#" ORDER BY title COLLATE "C", id LIMIT "#)
            .push_bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));

        let rows: Vec<ProductRow> = builder.build_query_as().fetch_all(&self.pool).await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM storefront.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self, input), fields(title = %input.title))]
    async fn create(&self, input: &ProductInput) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO storefront.product (title, price) VALUES ($1, $2) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.title.as_str())
        .bind(input.price.amount())
        .fetch_one(&self.pool)
        .await?;

        Product::try_from(row)
    }

    #[instrument(skip(self, input), fields(product_id = %id))]
    async fn update(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE storefront.product SET title = $1, price = $2 WHERE id = $3 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(input.title.as_str())
        .bind(input.price.amount())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM storefront.product WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }
}
