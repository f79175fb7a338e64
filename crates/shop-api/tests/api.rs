use axum::http::{header, Method, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};
use shop_api::{create_router, prerender, AppConfig, AppState};
use shop_core::fake::FakeProvider;
use shop_core::{CheckoutLineItem, ProviderPrice, ProviderProduct, Storefront};
use std::sync::Arc;

fn products() -> Vec<ProviderProduct> {
    vec![
        ProviderProduct::new("prod_explorer", "Camiseta Explorer")
            .with_description("Camiseta 100% algodão")
            .with_image("https://files.stripe.com/links/explorer.png")
            .with_default_price(ProviderPrice::new("price_explorer", 7990, "brl")),
        ProviderProduct::new("prod_ignite", "Camiseta Ignite Lab")
            .with_image("https://files.stripe.com/links/ignite.png")
            .with_default_price(ProviderPrice::new("price_ignite", 12990, "brl")),
    ]
}

fn setup_with(provider: Arc<FakeProvider>, storefront: Storefront) -> (TestServer, AppState) {
    let state = AppState::with_provider(provider, storefront, AppConfig::default());
    let server = TestServer::new(create_router(state.clone())).unwrap();
    (server, state)
}

fn setup(provider: Arc<FakeProvider>) -> TestServer {
    setup_with(provider, Storefront::default()).0
}

#[tokio::test]
async fn health_reports_service() {
    let server = setup(Arc::new(FakeProvider::new()));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "ignite-shop");
}

#[tokio::test]
async fn checkout_rejects_get_even_with_payload() {
    let provider = Arc::new(FakeProvider::new());
    let server = setup(provider.clone());

    let response = server
        .get("/api/checkout")
        .json(&json!({ "priceId": "price_123" }))
        .await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    response.assert_json(&json!({ "error": "Method Not Allowed" }));
    assert_eq!(response.header(header::ALLOW), "POST");
    assert!(provider.checkout_calls().is_empty());
}

#[tokio::test]
async fn checkout_rejects_other_methods() {
    let server = setup(Arc::new(FakeProvider::new()));

    let response = server.method(Method::PUT, "/api/checkout").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn checkout_without_body_is_bad_request() {
    let provider = Arc::new(FakeProvider::new());
    let server = setup(provider.clone());

    let response = server.post("/api/checkout").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Price not provided" }));
    assert!(provider.checkout_calls().is_empty());
}

#[tokio::test]
async fn checkout_with_blank_price_is_bad_request() {
    let server = setup(Arc::new(FakeProvider::new()));

    let response = server
        .post("/api/checkout")
        .json(&json!({ "priceId": "  " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Price not provided" }));
}

#[tokio::test]
async fn checkout_with_malformed_json_is_bad_request() {
    let server = setup(Arc::new(FakeProvider::new()));

    let response = server.post("/api/checkout").text("{\"priceId\":").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid JSON payload");
}

#[tokio::test]
async fn checkout_creates_single_item_session() {
    let provider = Arc::new(FakeProvider::new());
    let server = setup(provider.clone());

    let response = server
        .post("/api/checkout")
        .json(&json!({ "priceId": "price_123" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    let url = body["checkoutUrl"].as_str().unwrap();
    assert!(!url.is_empty());

    let calls = provider.checkout_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].line_items,
        vec![CheckoutLineItem {
            price: "price_123".to_string(),
            quantity: 1
        }]
    );
    assert_eq!(calls[0].success_url, "http://localhost:3000/success");
    assert_eq!(calls[0].cancel_url, "http://localhost:3000/");
}

#[tokio::test]
async fn checkout_provider_failure_is_bad_gateway() {
    let provider = Arc::new(FakeProvider::new().failing_checkout("No such price"));
    let server = setup(provider);

    let response = server
        .post("/api/checkout")
        .json(&json!({ "priceId": "price_gone" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    response.assert_json(&json!({ "error": "Checkout session could not be created" }));
}

#[tokio::test]
async fn catalog_lists_products_with_prices() {
    let server = setup(Arc::new(FakeProvider::new().with_products(products())));

    let response = server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Camiseta Explorer"));
    assert!(html.contains("R$ 79,90"));
    assert!(html.contains("R$ 129,90"));
    assert!(html.contains(r#"href="/products/prod_ignite""#));
}

#[tokio::test]
async fn catalog_failure_without_cache_is_server_error() {
    let provider = Arc::new(FakeProvider::new());
    provider.set_list_error(Some("stripe down".to_string()));
    let server = setup(provider);

    let response = server.get("/").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn fresh_catalog_is_served_from_cache() {
    let provider = Arc::new(FakeProvider::new().with_products(products()));
    let server = setup(provider.clone());

    server.get("/").await.assert_status_ok();
    server.get("/").await.assert_status_ok();

    assert_eq!(provider.list_calls(), 1);
}

#[tokio::test]
async fn stale_catalog_is_regenerated() {
    let provider = Arc::new(FakeProvider::new().with_products(products()));
    let storefront = Storefront {
        catalog_revalidate_secs: 0,
        ..Storefront::default()
    };
    let (server, _) = setup_with(provider.clone(), storefront);

    server.get("/").await.assert_status_ok();
    provider.set_products(vec![ProviderProduct::new("prod_new", "Camiseta Nova")
        .with_default_price(ProviderPrice::new("price_new", 5000, "brl"))]);

    let html = server.get("/").await.text();

    assert!(html.contains("Camiseta Nova"));
    assert!(!html.contains("Camiseta Explorer"));
    assert_eq!(provider.list_calls(), 2);
}

#[tokio::test]
async fn stale_catalog_survives_provider_outage() {
    let provider = Arc::new(FakeProvider::new().with_products(products()));
    let storefront = Storefront {
        catalog_revalidate_secs: 0,
        ..Storefront::default()
    };
    let (server, _) = setup_with(provider.clone(), storefront);

    server.get("/").await.assert_status_ok();
    provider.set_list_error(Some("stripe down".to_string()));

    let response = server.get("/").await;

    response.assert_status_ok();
    assert!(response.text().contains("Camiseta Explorer"));
}

#[tokio::test]
async fn product_page_shows_buy_button() {
    let server = setup(Arc::new(FakeProvider::new().with_products(products())));

    let response = server.get("/products/prod_explorer").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Camiseta 100% algodão"));
    assert!(html.contains("Comprar agora"));
    assert!(html.contains(r#"data-price-id="price_explorer""#));
}

#[tokio::test]
async fn unknown_product_redirects_home() {
    let server = setup(Arc::new(FakeProvider::new().with_products(products())));

    let response = server.get("/products/unknown").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header(header::LOCATION), "/");
}

#[tokio::test]
async fn prerender_fills_cache() {
    let provider = Arc::new(FakeProvider::new().with_products(products()));
    let (server, state) = setup_with(provider.clone(), Storefront::default());

    assert_eq!(prerender(&state).await.unwrap(), 3);
    let calls_after_prerender = provider.list_calls();

    server.get("/").await.assert_status_ok();
    server.get("/products/prod_ignite").await.assert_status_ok();

    assert_eq!(provider.list_calls(), calls_after_prerender);
}

#[tokio::test]
async fn success_page_renders() {
    let server = setup(Arc::new(FakeProvider::new()));

    let response = server.get("/success").await;

    response.assert_status_ok();
    assert!(response.text().contains("Compra efetuada"));
}
