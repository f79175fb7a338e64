//! # shop-api
//!
//! HTTP server for the ignite-shop storefront.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Server-rendered catalog and product pages behind a revalidating cache
//! - The checkout endpoint used by the buy button
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Catalog page |
//! | GET | `/products/{id}` | Product page |
//! | ANY | `/api/checkout` | Create checkout session |
//! | GET | `/success` | Purchase confirmation |
//! | GET | `/health` | Health check |

pub mod cache;
pub mod generate;
pub mod handlers;
pub mod pages;
pub mod routes;
pub mod state;

pub use generate::prerender;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
