//! # Request Handlers
//!
//! Axum request handlers for the storefront pages and the checkout API.

use crate::cache::Rendered;
use crate::generate;
use crate::pages;
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use shop_core::{
    initiate_checkout, CheckoutOutcome, CheckoutRequest, RequestMethod, ShopError,
    ShopResult,
};
use tracing::{error, instrument};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Checkout request body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[serde(default)]
    pub price_id: Option<String>,
}

/// Create checkout response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    /// Hosted payment page (redirect the shopper here)
    pub checkout_url: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn error_response(status: StatusCode, body: ErrorResponse) -> Response {
    (status, Json(body)).into_response()
}

/// Decode the checkout body. An empty body is a payload without a price.
fn parse_payload(body: &[u8]) -> Result<CheckoutPayload, serde_json::Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CheckoutPayload::default());
    }
    serde_json::from_slice(body)
}

fn provider_failure_status(err: &ShopError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY)
}

fn render_page(rendered: ShopResult<Rendered>, state: &AppState) -> Response {
    match rendered {
        Ok(Rendered::Page(html)) => Html(html).into_response(),
        Ok(Rendered::Redirect(destination)) => Redirect::temporary(destination).into_response(),
        Err(e) => {
            error!("Page generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(pages::render_unavailable(&state.storefront)),
            )
                .into_response()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ignite-shop",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Catalog listing page
pub async fn catalog_page(State(state): State<AppState>) -> Response {
    let rendered = generate::catalog(&state).await;
    render_page(rendered, &state)
}

/// Product detail page, or a temporary redirect to the catalog
#[instrument(skip(state))]
pub async fn product_page(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Response {
    let rendered = generate::product(&state, &product_id).await;
    render_page(rendered, &state)
}

/// Page shown after a completed payment
pub async fn success_page(State(state): State<AppState>) -> Html<String> {
    Html(pages::render_success(&state.storefront))
}

/// Create a checkout session for one price.
///
/// Mounted for every method; anything but POST gets 405.
#[instrument(skip(state, body), fields(method = %method))]
pub async fn create_checkout(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> Response {
    let method = if method == Method::POST {
        RequestMethod::Post
    } else {
        RequestMethod::Other
    };

    let price_id = if method == RequestMethod::Post {
        match parse_payload(&body) {
            Ok(payload) => payload.price_id,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("Invalid JSON payload").with_details(e.to_string()),
                );
            }
        }
    } else {
        None
    };

    let request = CheckoutRequest { method, price_id };

    match initiate_checkout(state.provider.as_ref(), &state.urls, request).await {
        CheckoutOutcome::Created { checkout_url } => (
            StatusCode::CREATED,
            Json(CreateCheckoutResponse { checkout_url }),
        )
            .into_response(),
        CheckoutOutcome::MethodNotAllowed => (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "POST")],
            Json(ErrorResponse::new("Method Not Allowed")),
        )
            .into_response(),
        CheckoutOutcome::BadRequest => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("Price not provided"),
        ),
        CheckoutOutcome::ProviderFailed(e) => error_response(
            provider_failure_status(&e),
            ErrorResponse::new("Checkout session could not be created"),
        ),
    }
}
