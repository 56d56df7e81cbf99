//! Product route handlers.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use ecommerce_core::ProductId;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{set_flash, take_flash};
use crate::models::Product;
use crate::services::{CatalogQuery, Confirmed, ProductDraft};
use crate::state::AppState;

/// Listing query parameters.
///
/// Kept as strings so a malformed value is ignored instead of rejecting the
/// whole request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub search_term: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    fn to_catalog_query(&self) -> CatalogQuery {
        CatalogQuery {
            search_term: self.search_term.clone(),
            min_price: parse_lenient(self.min_price.as_deref()),
            max_price: parse_lenient(self.max_price.as_deref()),
            page: parse_lenient(self.page.as_deref()),
        }
    }
}

/// Product id from the path. Anything that is not an integer names no product.
fn parse_id(raw: &str) -> Option<ProductId> {
    raw.parse().ok().map(ProductId::new)
}

fn missing_product(raw: &str) -> AppError {
    AppError::NotFound(format!("Product {raw}"))
}

fn parse_lenient<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Product form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProductForm {
    pub title: String,
    pub price: String,
}

impl From<ProductForm> for ProductDraft {
    fn from(form: ProductForm) -> Self {
        Self::new(form.title, form.price)
    }
}

/// Product listing page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListView {
    pub products: Vec<Product>,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub search_term: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Confirmation left by the previous write, shown once.
    pub message: Option<String>,
}

/// Display product listing page.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ProductListView>> {
    let query = query.to_catalog_query();
    let page = state.catalog().list_products(&query).await?;
    let message = take_flash(&session).await?;

    Ok(Json(ProductListView {
        products: page.items,
        current_page: page.current_page,
        total_pages: page.total_pages,
        page_size: page.page_size,
        total_items: page.total_items,
        search_term: query.search_term,
        min_price: query.min_price,
        max_price: query.max_price,
        message,
    }))
}

/// Display a single product (the edit and delete confirmation view).
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(raw): Path<String>) -> Result<Json<Product>> {
    let id = parse_id(&raw).ok_or_else(|| missing_product(&raw))?;
    let product = state.catalog().get_product(id).await?;
    Ok(Json(product))
}

/// Handle product creation.
#[instrument(skip(state, session))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let confirmed = state.catalog().create_product(&form.into()).await?;
    finish_write(&session, "Product created", confirmed).await
}

/// Handle product update.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Path(raw): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let id = parse_id(&raw).ok_or_else(|| missing_product(&raw))?;
    let confirmed = state.catalog().update_product(id, &form.into()).await?;
    finish_write(&session, "Product updated", confirmed).await
}

/// Handle product deletion. Deleting a product that is already gone, or an
/// id that could never exist, just returns to the listing.
#[instrument(skip(state, session))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    Path(raw): Path<String>,
) -> Result<Redirect> {
    let Some(id) = parse_id(&raw) else {
        return Ok(Redirect::to("/products"));
    };
    match state.catalog().delete_product(id).await? {
        Some(confirmed) => finish_write(&session, "Product deleted", confirmed).await,
        None => Ok(Redirect::to("/products")),
    }
}

async fn finish_write(session: &Session, action: &str, confirmed: Confirmed) -> Result<Redirect> {
    add_breadcrumb(
        "catalog",
        action,
        Some(&[("product_id", &confirmed.product.id.to_string())]),
    );
    set_flash(session, &confirmed.message).await?;
    Ok(Redirect::to("/products"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_query_values_are_ignored() {
        let query = ListingQuery {
            search_term: Some("Wid".to_string()),
            min_price: Some("cheap".to_string()),
            max_price: Some(" 20.5 ".to_string()),
            page: Some("two".to_string()),
        }
        .to_catalog_query();

        assert_eq!(query.search_term.as_deref(), Some("Wid"));
        assert_eq!(query.min_price, None);
        assert_eq!(query.max_price, Some(Decimal::new(205, 1)));
        assert_eq!(query.page, None);
    }

    #[test]
    fn test_parse_id_rejects_non_integers() {
        assert_eq!(parse_id("7"), Some(ProductId::new(7)));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("99999999999"), None);
    }
}
