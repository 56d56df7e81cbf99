//! Router tests for the storefront.
//!
//! These drive the full axum router (session layer included) with the
//! in-memory datastore, so no database is needed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

use std::sync::Arc;

use argon2::Params;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use serde_json::Value;
use tower::ServiceExt;
use tower_sessions::MemoryStore;

use ecommerce_storefront::config::StorefrontConfig;
use ecommerce_storefront::db::MemoryDatastore;
use ecommerce_storefront::middleware::create_session_layer;
use ecommerce_storefront::routes;
use ecommerce_storefront::services::Argon2Verifier;
use ecommerce_storefront::state::AppState;

// =============================================================================
// Harness
// =============================================================================

/// A browser: one router plus the session cookie it was last given.
struct Client {
    router: Router,
    cookie: Option<String>,
}

impl Client {
    fn new() -> Self {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "STOREFRONT_DATABASE_URL" => Some("postgres://localhost/unused".to_string()),
            "STOREFRONT_BASE_URL" => Some("http://localhost:3000".to_string()),
            _ => None,
        })
        .unwrap();

        let store = Arc::new(MemoryDatastore::new());
        let verifier = Arc::new(Argon2Verifier::with_params(
            Params::new(1024, 1, 1, None).unwrap(),
        ));
        let state = AppState::with_repositories(config.clone(), store.clone(), store, verifier);

        let router = routes::routes()
            .layer(create_session_layer(MemoryStore::default(), &config))
            .with_state(state);

        Self {
            router,
            cookie: None,
        }
    }

    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> Response {
        let builder = match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        };
        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }
        response
    }

    async fn get(&mut self, uri: &str) -> Response {
        self.send(Request::get(uri), Body::empty()).await
    }

    async fn post(&mut self, uri: &str, form: &[(&str, &str)]) -> Response {
        let body = form
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        self.send(
            Request::post(uri).header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
            Body::from(body),
        )
        .await
    }

    async fn json(&mut self, uri: &str) -> (StatusCode, Value) {
        let response = self.get(uri).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn add_product(&mut self, title: &str, price: &str) {
        let response = self
            .post("/products", &[("Title", title), ("Price", price)])
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{title}");
    }

    async fn register(&mut self, username: &str, email: &str) -> Response {
        self.post(
            "/members/register",
            &[
                ("Username", username),
                ("Email", email),
                ("Password", "secret1"),
                ("ConfirmPassword", "secret1"),
                ("DateOfBirth", "1990-04-01"),
            ],
        )
        .await
    }

    async fn login(&mut self, who: &str, password: &str) -> Response {
        self.post(
            "/members/login",
            &[("UsernameOrEmail", who), ("Password", password)],
        )
        .await
    }
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn error_fields(body: &Value) -> Vec<&str> {
    body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let mut client = Client::new();
    assert_eq!(client.get("/health").await.status(), StatusCode::OK);
    assert_eq!(client.get("/health/ready").await.status(), StatusCode::OK);
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_create_redirects_and_flashes_once() {
    let mut client = Client::new();

    let response = client
        .post("/products", &[("Title", "Widget"), ("Price", "9.99")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let (status, listing) = client.json("/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["message"], "Widget has been added successfully!");
    assert_eq!(listing["products"][0]["title"], "Widget");
    assert_eq!(listing["products"][0]["price"], "9.99");

    let (_, again) = client.json("/products").await;
    assert!(again["message"].is_null());
}

#[tokio::test]
async fn test_create_then_show_round_trips() {
    let mut client = Client::new();
    client.add_product("Widget", "9.99").await;

    let (_, listing) = client.json("/products").await;
    let id = listing["products"][0]["id"].as_i64().unwrap();

    let (status, product) = client.json(&format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["title"], "Widget");
    assert_eq!(product["price"], "9.99");
}

#[tokio::test]
async fn test_invalid_product_reports_fields() {
    let mut client = Client::new();

    let response = client
        .post("/products", &[("Title", ""), ("Price", "10001")])
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body_json(response).await), ["title", "price"]);

    let (_, listing) = client.json("/products").await;
    assert_eq!(listing["totalItems"], 0);
}

#[tokio::test]
async fn test_missing_product() {
    let mut client = Client::new();

    assert_eq!(client.get("/products/999").await.status(), StatusCode::NOT_FOUND);

    let response = client
        .post("/products/999", &[("Title", "Gizmo"), ("Price", "1")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting something already gone is not an error
    let response = client.post("/products/999/delete", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let (_, listing) = client.json("/products").await;
    assert!(listing["message"].is_null());
}

#[tokio::test]
async fn test_non_numeric_product_id_is_missing() {
    let mut client = Client::new();
    client.add_product("Widget", "9.99").await;

    let (status, body) = client.json("/products/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product abc not found");

    let response = client
        .post("/products/abc", &[("Title", "Gizmo"), ("Price", "1")])
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.post("/products/abc/delete", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    // Nothing was touched
    let (_, listing) = client.json("/products").await;
    assert_eq!(listing["totalItems"], 1);
    assert_eq!(listing["products"][0]["title"], "Widget");
}

#[tokio::test]
async fn test_update_and_delete() {
    let mut client = Client::new();
    client.add_product("Widget", "9.99").await;
    let (_, listing) = client.json("/products").await;
    let id = listing["products"][0]["id"].as_i64().unwrap();

    client
        .post(&format!("/products/{id}"), &[("Title", "Gizmo"), ("Price", "5")])
        .await;
    let (_, listing) = client.json("/products").await;
    assert_eq!(listing["message"], "Gizmo has been updated successfully!");
    assert_eq!(listing["products"][0]["title"], "Gizmo");

    client.post(&format!("/products/{id}/delete"), &[]).await;
    let (_, listing) = client.json("/products").await;
    assert_eq!(listing["message"], "Gizmo has been deleted successfully!");
    assert_eq!(listing["totalItems"], 0);
}

#[tokio::test]
async fn test_listing_pages_and_filters() {
    let mut client = Client::new();
    for (title, price) in [
        ("Gadget", "20"),
        ("Anvil", "150"),
        ("Widget", "9.99"),
        ("Bolt", "0.25"),
        ("Crate", "12"),
        ("Egg", "1"),
        ("Fan", "45"),
    ] {
        client.add_product(title, price).await;
    }

    let (_, first) = client.json("/products").await;
    assert_eq!(first["pageSize"], 3);
    assert_eq!(first["totalPages"], 3);
    assert_eq!(first["currentPage"], 1);
    assert_eq!(first["products"][0]["title"], "Anvil");

    let (_, last) = client.json("/products?page=99").await;
    assert_eq!(last["currentPage"], 3);
    assert_eq!(last["products"][0]["title"], "Widget");

    let (_, window) = client.json("/products?minPrice=1&maxPrice=20").await;
    assert_eq!(window["totalItems"], 4);
    assert_eq!(window["minPrice"], "1");

    let (status, lenient) = client.json("/products?minPrice=abc&page=x").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lenient["totalItems"], 7);
    assert!(lenient["minPrice"].is_null());

    let (_, search) = client.json("/products?searchTerm=dget").await;
    assert_eq!(search["totalItems"], 2);
    assert_eq!(search["searchTerm"], "dget");
}

// =============================================================================
// Members
// =============================================================================

#[tokio::test]
async fn test_duplicate_registration() {
    let mut client = Client::new();

    let response = client.register("bob", "bob@x.com").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = client.register("bob", "bob@x.com").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(error_fields(&body), ["username", "email"]);
    assert_eq!(body["errors"][0]["message"], "already taken");
}

#[tokio::test]
async fn test_login_me_logout() {
    let mut client = Client::new();
    client.register("bob", "bob@x.com").await;

    assert_eq!(client.get("/members/me").await.status(), StatusCode::UNAUTHORIZED);

    let response = client.login("bob", "wrong!!").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client.login("bob@x.com", "secret1").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/products");

    let (status, me) = client.json("/members/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "bob");

    let response = client.post("/members/logout", &[]).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(client.get("/members/me").await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reading_identity_refreshes_idle_timeout() {
    let mut client = Client::new();
    client.register("bob", "bob@x.com").await;
    client.login("bob", "secret1").await;

    for _ in 0..2 {
        let response = client.get("/members/me").await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("read-only request should re-issue the session cookie")
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("shop_session="), "{set_cookie}");
        assert!(set_cookie.contains("Max-Age=1200"), "{set_cookie}");
    }
}

#[tokio::test]
async fn test_failed_login_is_generic() {
    let mut client = Client::new();
    client.register("bob", "bob@x.com").await;

    let unknown = body_json(client.login("nobody", "secret1").await).await;
    let wrong = body_json(client.login("bob", "nope123").await).await;

    assert_eq!(unknown, wrong);
    assert!(unknown["errors"].is_null());
}
