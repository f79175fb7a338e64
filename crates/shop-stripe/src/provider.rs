//! # Stripe Catalog Provider
//!
//! Implementation of the storefront's provider trait over the Stripe REST
//! API: Products (with the default price expanded) and Checkout Sessions.

use crate::config::StripeConfig;
use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use shop_core::{
    CatalogProvider, CheckoutSession, CheckoutSessionParams, ProviderPrice, ProviderProduct,
    ShopError, ShopResult,
};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe-backed catalog and checkout provider
pub struct StripeCatalogProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCatalogProvider {
    /// Create a new Stripe provider
    pub fn new(config: StripeConfig) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ShopError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ShopResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    /// Build an API URL, percent-encoding each path segment
    fn endpoint(&self, segments: &[&str]) -> ShopResult<Url> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| ShopError::Configuration(format!("Invalid Stripe API URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| ShopError::Configuration("Stripe API URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Read a Stripe response, mapping non-2xx statuses to errors.
    ///
    /// A 404 is reported as `ProductNotFound` when `product_id` is given.
    async fn read_response<T: DeserializeOwned>(
        response: Response,
        product_id: Option<&str>,
    ) -> ShopResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            if status == reqwest::StatusCode::NOT_FOUND {
                if let Some(id) = product_id {
                    debug!("Stripe has no product {}", id);
                    return Err(ShopError::ProductNotFound {
                        product_id: id.to_string(),
                    });
                }
            }

            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ShopError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ShopError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            ShopError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })
    }

    /// Form fields for a checkout session request
    fn session_form(params: &CheckoutSessionParams) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("mode".to_string(), params.mode.as_str().to_string()),
            ("success_url".to_string(), params.success_url.clone()),
            ("cancel_url".to_string(), params.cancel_url.clone()),
        ];

        for (i, item) in params.line_items.iter().enumerate() {
            form_params.push((format!("line_items[{}][price]", i), item.price.clone()));
            form_params.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        form_params
    }
}

#[async_trait]
impl CatalogProvider for StripeCatalogProvider {
    #[instrument(skip(self))]
    async fn list_products(&self) -> ShopResult<Vec<ProviderProduct>> {
        let url = self.endpoint(&["v1", "products"])?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .query(&[("expand[]", "data.default_price")])
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let list: StripeList<StripeProduct> = Self::read_response(response, None).await?;

        debug!(
            "Listed {} Stripe products (has_more={})",
            list.data.len(),
            list.has_more
        );

        Ok(list.data.into_iter().map(ProviderProduct::from).collect())
    }

    #[instrument(skip(self))]
    async fn retrieve_product(&self, product_id: &str) -> ShopResult<ProviderProduct> {
        if product_id.is_empty() {
            return Err(ShopError::ProductNotFound {
                product_id: String::new(),
            });
        }

        let url = self.endpoint(&["v1", "products", product_id])?;

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .query(&[("expand[]", "default_price")])
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let product: StripeProduct = Self::read_response(response, Some(product_id)).await?;
        Ok(product.into())
    }

    #[instrument(skip(self, params), fields(items = params.line_items.len()))]
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> ShopResult<CheckoutSession> {
        let url = self.endpoint(&["v1", "checkout", "sessions"])?;
        let form_params = Self::session_form(params);

        debug!(
            "Creating Stripe checkout session: {} items, mode={}",
            params.line_items.len(),
            params.mode.as_str()
        );

        let mut request = self
            .client
            .post(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version);

        if let Some(key) = &params.idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ShopError::NetworkError(e.to_string()))?;

        let session: StripeCheckoutSessionResponse = Self::read_response(response, None).await?;

        let checkout_url = session.url.ok_or_else(|| {
            ShopError::CheckoutCreationFailed(format!("Session {} has no redirect URL", session.id))
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CheckoutSession::new(session.id, checkout_url))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeList<T> {
    data: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

/// Expandable field: a bare ID unless `expand[]` asked for the object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Expandable<T> {
    Object(T),
    Id(String),
}

#[derive(Debug, Deserialize)]
struct StripeProduct {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    default_price: Option<Expandable<StripePrice>>,
}

#[derive(Debug, Deserialize)]
struct StripePrice {
    id: String,
    #[serde(default)]
    unit_amount: Option<i64>,
    currency: String,
}

impl From<StripeProduct> for ProviderProduct {
    fn from(product: StripeProduct) -> Self {
        let default_price = match product.default_price {
            Some(Expandable::Object(price)) => Some(ProviderPrice {
                id: price.id,
                unit_amount: price.unit_amount,
                currency: price.currency,
            }),
            Some(Expandable::Id(price_id)) => {
                debug!(
                    "Default price {} of product {} was not expanded",
                    price_id, product.id
                );
                None
            }
            None => None,
        };

        ProviderProduct {
            id: product.id,
            name: product.name,
            description: product.description,
            images: product.images,
            default_price,
        }
    }
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shop_core::{CheckoutUrls, ProductDisplay};
    use wiremock::matchers::{
        body_string_contains, header, header_exists, method, path, query_param,
    };
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> StripeCatalogProvider {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripeCatalogProvider::new(config).unwrap()
    }

    fn product_json(id: &str, price_id: &str, amount: i64) -> serde_json::Value {
        json!({
            "id": id,
            "object": "product",
            "name": format!("Camiseta {}", id),
            "description": null,
            "images": [format!("https://files.stripe.com/links/{}.png", id)],
            "default_price": {
                "id": price_id,
                "object": "price",
                "unit_amount": amount,
                "currency": "brl"
            }
        })
    }

    #[test]
    fn test_session_form() {
        let urls = CheckoutUrls::new("http://localhost:3000");
        let params = CheckoutSessionParams::single_payment("price_123", &urls);
        let form = StripeCatalogProvider::session_form(&params);

        assert!(form.contains(&("mode".to_string(), "payment".to_string())));
        assert!(form.contains(&("line_items[0][price]".to_string(), "price_123".to_string())));
        assert!(form.contains(&("line_items[0][quantity]".to_string(), "1".to_string())));
        assert!(!form.iter().any(|(k, _)| k.starts_with("line_items[1]")));
    }

    #[test]
    fn test_unexpanded_default_price() {
        let product: StripeProduct = serde_json::from_value(json!({
            "id": "prod_1",
            "name": "Camiseta",
            "images": [],
            "default_price": "price_1"
        }))
        .unwrap();

        assert_eq!(ProviderProduct::from(product).default_price, None);
    }

    #[tokio::test]
    async fn test_list_products_expands_default_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products"))
            .and(query_param("expand[]", "data.default_price"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "has_more": false,
                "data": [
                    product_json("prod_1", "price_1", 7990),
                    product_json("prod_2", "price_2", 12990)
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let products = provider(&server).list_products().await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].id, "prod_1");
        let display = ProductDisplay::from_provider(&products[0]).unwrap();
        assert_eq!(display.formatted_price, "R$ 79,90");
        assert_eq!(display.default_price_id, "price_1");
    }

    #[tokio::test]
    async fn test_retrieve_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products/prod_1"))
            .and(query_param("expand[]", "default_price"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(product_json("prod_1", "price_1", 7990)),
            )
            .mount(&server)
            .await;

        let product = provider(&server).retrieve_product("prod_1").await.unwrap();

        assert_eq!(product.name, "Camiseta prod_1");
        assert_eq!(product.default_price.unwrap().unit_amount, Some(7990));
    }

    #[tokio::test]
    async fn test_retrieve_missing_product() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products/prod_gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": "resource_missing",
                    "message": "No such product: 'prod_gone'",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&server)
            .await;

        let err = provider(&server)
            .retrieve_product("prod_gone")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_checkout_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(header_exists("Idempotency-Key"))
            .and(body_string_contains("mode=payment"))
            .and(body_string_contains("line_items%5B0%5D%5Bprice%5D=price_123"))
            .and(body_string_contains("line_items%5B0%5D%5Bquantity%5D=1"))
            .and(body_string_contains(
                "success_url=http%3A%2F%2Flocalhost%3A3000%2Fsuccess",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "object": "checkout.session",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let urls = CheckoutUrls::new("http://localhost:3000");
        let params = CheckoutSessionParams::single_payment("price_123", &urls);
        let session = provider(&server)
            .create_checkout_session(&params)
            .await
            .unwrap();

        assert_eq!(session.session_id, "cs_test_1");
        assert_eq!(
            session.checkout_url,
            "https://checkout.stripe.com/c/pay/cs_test_1"
        );
    }

    #[tokio::test]
    async fn test_create_checkout_session_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "message": "No such price: 'price_bad'",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&server)
            .await;

        let urls = CheckoutUrls::default();
        let params = CheckoutSessionParams::single_payment("price_bad", &urls);
        let err = provider(&server)
            .create_checkout_session(&params)
            .await
            .unwrap_err();

        match err {
            ShopError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "No such price: 'price_bad'");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        // Nothing listens on a port whose listener was closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(base_url);
        let err = StripeCatalogProvider::new(config)
            .unwrap()
            .list_products()
            .await
            .unwrap_err();

        assert!(matches!(err, ShopError::NetworkError(_)), "got {}", err);
    }

    #[tokio::test]
    async fn test_undecodable_body_is_serialization_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/products"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bogus": 1 })))
            .mount(&server)
            .await;

        let err = provider(&server).list_products().await.unwrap_err();

        assert!(matches!(err, ShopError::Serialization(_)), "got {}", err);
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        let urls = CheckoutUrls::default();
        let params = CheckoutSessionParams::single_payment("price_123", &urls);
        let err = provider(&server)
            .create_checkout_session(&params)
            .await
            .unwrap_err();

        match err {
            ShopError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert!(message.starts_with("HTTP 500"), "message: {}", message);
                assert!(message.ends_with("upstream exploded"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
