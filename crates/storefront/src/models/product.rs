//! Product domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use ecommerce_core::{Price, ProductId, ProductTitle};

/// An individual product for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Datastore-generated identifier, immutable after creation.
    pub id: ProductId,
    /// User-facing title.
    pub title: ProductTitle,
    /// Current sales price.
    pub price: Price,
}

/// Validated field values for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub title: ProductTitle,
    pub price: Price,
}

/// Catalog filter, applied conjunctively.
///
/// A `search_term` here is already known to be non-blank and is matched as a
/// case-sensitive substring of the title, exactly as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search_term: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl ProductFilter {
    /// Whether a product passes every filter that is set.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let price = product.price.amount();
        self.search_term
            .as_deref()
            .is_none_or(|term| product.title.as_str().contains(term))
            && self.min_price.is_none_or(|min| price >= min)
            && self.max_price.is_none_or(|max| price <= max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(title: &str, price: &str) -> Product {
        Product {
            id: ProductId::new(1),
            title: ProductTitle::parse(title).unwrap(),
            price: Price::new(price.parse().unwrap()).unwrap(),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ProductFilter::default().matches(&product("Widget", "9.99")));
    }

    #[test]
    fn test_search_is_case_sensitive() {
        let filter = ProductFilter {
            search_term: Some("widget".to_owned()),
            ..ProductFilter::default()
        };
        assert!(!filter.matches(&product("Widget", "1")));
        assert!(filter.matches(&product("Blue widget", "1")));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let filter = ProductFilter {
            search_term: None,
            min_price: Some("5".parse().unwrap()),
            max_price: Some("10".parse().unwrap()),
        };
        assert!(filter.matches(&product("A", "5")));
        assert!(filter.matches(&product("A", "10.00")));
        assert!(!filter.matches(&product("A", "4.99")));
        assert!(!filter.matches(&product("A", "10.01")));
    }
}
