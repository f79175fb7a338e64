//! # shop-core
//!
//! Core types and traits for the ignite-shop storefront.
//!
//! This crate provides:
//! - `CatalogProvider` trait for the payments provider (list, retrieve, checkout)
//! - `ProductDisplay` and `Price` for the display model
//! - `fetch_catalog`, `product_paths` and `resolve_product` for page generation
//! - `initiate_checkout` for the buy flow
//! - `Storefront` settings and `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use shop_core::{fetch_catalog, resolve_product, ProductOutcome, Storefront};
//!
//! let store = Storefront::default();
//! let page = fetch_catalog(provider.as_ref(), &store).await?;
//!
//! match resolve_product(provider.as_ref(), &store, "prod_123").await {
//!     ProductOutcome::Found(page) => render(page),
//!     ProductOutcome::NotFoundRedirect { destination, .. } => redirect(destination),
//! }
//! ```

pub mod catalog;
pub mod checkout;
pub mod error;
#[cfg(any(test, feature = "fake"))]
pub mod fake;
pub mod product;
pub mod provider;
pub mod storefront;

// Re-exports for convenience
pub use catalog::{
    fetch_catalog, product_paths, resolve_product, CatalogPage, Fallback, ProductOutcome,
    ProductPage, StaticPaths,
};
pub use checkout::{
    initiate_checkout, CheckoutLineItem, CheckoutMode, CheckoutOutcome, CheckoutRequest,
    CheckoutSession, CheckoutSessionParams, CheckoutUrls, RequestMethod,
};
pub use error::{ShopError, ShopResult};
pub use product::{Currency, Price, ProductDisplay, ProviderPrice, ProviderProduct};
pub use provider::{BoxedCatalogProvider, CatalogProvider};
pub use storefront::Storefront;
