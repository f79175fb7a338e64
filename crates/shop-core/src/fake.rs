//! # In-memory Provider
//!
//! A [`CatalogProvider`] backed by a product list held in memory. It records
//! every checkout request so tests can assert on what would have been sent
//! to the real provider.

use crate::checkout::{CheckoutSession, CheckoutSessionParams};
use crate::error::{ShopError, ShopResult};
use crate::product::ProviderProduct;
use crate::provider::CatalogProvider;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct FakeState {
    products: Vec<ProviderProduct>,
    list_error: Option<String>,
    checkout_error: Option<String>,
    checkout_calls: Vec<CheckoutSessionParams>,
    list_calls: usize,
}

/// In-memory stand-in for the payments provider
#[derive(Debug, Default)]
pub struct FakeProvider {
    state: Mutex<FakeState>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed the catalog
    pub fn with_products(self, products: Vec<ProviderProduct>) -> Self {
        self.set_products(products);
        self
    }

    /// Builder: make checkout session creation fail with `message`
    pub fn failing_checkout(self, message: impl Into<String>) -> Self {
        self.lock().checkout_error = Some(message.into());
        self
    }

    /// Replace the catalog
    pub fn set_products(&self, products: Vec<ProviderProduct>) {
        self.lock().products = products;
    }

    /// Make subsequent list calls fail (`None` restores them)
    pub fn set_list_error(&self, message: Option<String>) {
        self.lock().list_error = message;
    }

    /// Checkout requests received so far
    pub fn checkout_calls(&self) -> Vec<CheckoutSessionParams> {
        self.lock().checkout_calls.clone()
    }

    /// Number of list calls received so far
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn provider_error(message: &str) -> ShopError {
        ShopError::ProviderError {
            provider: "fake".to_string(),
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl CatalogProvider for FakeProvider {
    async fn list_products(&self) -> ShopResult<Vec<ProviderProduct>> {
        let mut state = self.lock();
        state.list_calls += 1;
        if let Some(message) = &state.list_error {
            return Err(Self::provider_error(message));
        }
        Ok(state.products.clone())
    }

    async fn retrieve_product(&self, product_id: &str) -> ShopResult<ProviderProduct> {
        self.lock()
            .products
            .iter()
            .find(|p| p.id == product_id)
            .cloned()
            .ok_or_else(|| ShopError::ProductNotFound {
                product_id: product_id.to_string(),
            })
    }

    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> ShopResult<CheckoutSession> {
        let mut state = self.lock();
        state.checkout_calls.push(params.clone());
        if let Some(message) = &state.checkout_error {
            return Err(Self::provider_error(message));
        }
        let session_id = format!("cs_test_{}", state.checkout_calls.len());
        let checkout_url = format!("https://checkout.stripe.com/c/pay/{}", session_id);
        Ok(CheckoutSession::new(session_id, checkout_url))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
