//! # Checkout
//!
//! Checkout session types and the checkout initiator: validates the
//! buyer's request and asks the provider for a one-item payment session.

use crate::error::ShopError;
use crate::provider::CatalogProvider;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;

/// Checkout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutMode {
    /// One-time payment
    Payment,
    /// Subscription
    Subscription,
    /// Setup (save card for later)
    Setup,
}

impl CheckoutMode {
    /// Provider wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutMode::Payment => "payment",
            CheckoutMode::Subscription => "subscription",
            CheckoutMode::Setup => "setup",
        }
    }
}

impl Default for CheckoutMode {
    fn default() -> Self {
        CheckoutMode::Payment
    }
}

/// A line item referencing an existing provider price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLineItem {
    /// Provider price ID
    pub price: String,
    pub quantity: u32,
}

/// Everything the provider needs to open a checkout session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSessionParams {
    pub mode: CheckoutMode,
    pub line_items: Vec<CheckoutLineItem>,
    pub success_url: String,
    pub cancel_url: String,
    /// Sent as the provider's idempotency key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl CheckoutSessionParams {
    /// Single-item payment session for one unit of `price_id`
    pub fn single_payment(price_id: impl Into<String>, urls: &CheckoutUrls) -> Self {
        Self {
            mode: CheckoutMode::Payment,
            line_items: vec![CheckoutLineItem {
                price: price_id.into(),
                quantity: 1,
            }],
            success_url: urls.success_url(),
            cancel_url: urls.cancel_url(),
            idempotency_key: Some(Uuid::new_v4().to_string()),
        }
    }
}

/// A checkout session created by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,
    /// URL to redirect the shopper to
    pub checkout_url: String,
    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(session_id: impl Into<String>, checkout_url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            checkout_url: checkout_url.into(),
            created_at: Utc::now(),
        }
    }
}

/// Redirect targets built from the storefront's base URL
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Base URL of the storefront (e.g., "https://shop.example.com")
    pub base_url: String,
    /// Success page path
    pub success_path: String,
    /// Cancel destination path
    pub cancel_path: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success_path: "/success".to_string(),
            cancel_path: "/".to_string(),
        }
    }

    pub fn success_url(&self) -> String {
        format!("{}{}", self.base_url, self.success_path)
    }

    pub fn cancel_url(&self) -> String {
        format!("{}{}", self.base_url, self.cancel_path)
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

/// HTTP method of the inbound checkout request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Post,
    Other,
}

/// Inbound checkout request after transport decoding
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub method: RequestMethod,
    pub price_id: Option<String>,
}

/// Result of a checkout attempt
#[derive(Debug)]
pub enum CheckoutOutcome {
    /// Session opened; send the shopper here
    Created { checkout_url: String },
    /// Only POST creates sessions
    MethodNotAllowed,
    /// No price ID in the payload
    BadRequest,
    /// Provider refused or could not be reached
    ProviderFailed(ShopError),
}

/// Validate the request and create a one-item payment session.
///
/// The method is checked before the payload, so a non-POST request is
/// rejected whatever it carries.
#[instrument(skip(provider, urls, request), fields(provider_name = provider.provider_name()))]
pub async fn initiate_checkout(
    provider: &dyn CatalogProvider,
    urls: &CheckoutUrls,
    request: CheckoutRequest,
) -> CheckoutOutcome {
    if request.method != RequestMethod::Post {
        return CheckoutOutcome::MethodNotAllowed;
    }

    let price_id = match request.price_id {
        Some(id) if !id.trim().is_empty() => id,
        _ => return CheckoutOutcome::BadRequest,
    };

    let params = CheckoutSessionParams::single_payment(price_id, urls);

    match provider.create_checkout_session(&params).await {
        Ok(session) => {
            info!("Created checkout session: {}", session.session_id);
            CheckoutOutcome::Created {
                checkout_url: session.checkout_url,
            }
        }
        Err(e) => {
            error!("Failed to create checkout session: {}", e);
            CheckoutOutcome::ProviderFailed(e)
        }
    }
}
