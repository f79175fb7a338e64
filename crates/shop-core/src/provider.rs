//! # Catalog Provider Trait
//!
//! The payments provider is an opaque collaborator with three operations:
//! list the catalog, retrieve one product, and create a checkout session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   CatalogProvider (trait)                   │
//! │  ├── list_products()                                        │
//! │  ├── retrieve_product()                                     │
//! │  └── create_checkout_session()                              │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!              ┌─────────────┴─────────────┐
//!              │                           │
//!      ┌───────┴───────┐           ┌───────┴───────┐
//!      │StripeCatalog  │           │ FakeProvider  │
//!      │   Provider    │           │   (tests)     │
//!      └───────────────┘           └───────────────┘
//! ```

use crate::checkout::{CheckoutSession, CheckoutSessionParams};
use crate::error::ShopResult;
use crate::product::ProviderProduct;
use async_trait::async_trait;
use std::sync::Arc;

/// Outbound surface of the payments provider.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// List every product with its default price expanded, in provider order.
    async fn list_products(&self) -> ShopResult<Vec<ProviderProduct>>;

    /// Retrieve a single product with its default price expanded.
    ///
    /// Returns `ShopError::ProductNotFound` when the provider does not know
    /// the ID.
    async fn retrieve_product(&self, product_id: &str) -> ShopResult<ProviderProduct>;

    /// Create a hosted checkout session and return its redirect URL.
    async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams,
    ) -> ShopResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedCatalogProvider = Arc<dyn CatalogProvider>;
