//! # shop-stripe
//!
//! Stripe provider for the ignite-shop storefront.
//!
//! `StripeCatalogProvider` implements `shop_core::CatalogProvider` on top of
//! the Stripe REST API:
//!
//! - **Products API** - catalog listing and product lookup, with each
//!   product's default price expanded
//! - **Checkout Sessions API** - hosted payment page for a single price
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_core::{CatalogProvider, CheckoutSessionParams, CheckoutUrls};
//! use shop_stripe::StripeCatalogProvider;
//!
//! // Create provider from environment
//! let provider = StripeCatalogProvider::from_env()?;
//!
//! let products = provider.list_products().await?;
//!
//! let urls = CheckoutUrls::new("https://shop.example.com");
//! let params = CheckoutSessionParams::single_payment(&price_id, &urls);
//! let session = provider.create_checkout_session(&params).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod config;
pub mod provider;

// Re-exports
pub use config::StripeConfig;
pub use provider::StripeCatalogProvider;
