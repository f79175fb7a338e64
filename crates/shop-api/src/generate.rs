//! # Page Generation
//!
//! Glue between the core resolvers, the templates and the page cache.

use crate::cache::{Generation, Rendered};
use crate::pages;
use crate::state::AppState;
use shop_core::{fetch_catalog, product_paths, resolve_product, ProductOutcome, ShopResult};
use tracing::{info, instrument, warn};

/// Cache key of the catalog page
pub const CATALOG_KEY: &str = "/";

/// Cache key of a product detail page
pub fn product_key(product_id: &str) -> String {
    format!("/products/{}", product_id)
}

/// Fetch the catalog and render the listing page
pub async fn generate_catalog(state: &AppState) -> ShopResult<Generation> {
    let page = fetch_catalog(state.provider.as_ref(), &state.storefront).await?;

    Ok(Generation::Page {
        html: pages::render_catalog(&page, &state.storefront),
        revalidate: page.revalidate,
    })
}

/// Resolve one product and render its detail page, or redirect
pub async fn generate_product(state: &AppState, product_id: &str) -> ShopResult<Generation> {
    let outcome = resolve_product(state.provider.as_ref(), &state.storefront, product_id).await;

    Ok(match outcome {
        ProductOutcome::Found(page) => Generation::Page {
            html: pages::render_product(&page, &state.storefront),
            revalidate: page.revalidate,
        },
        ProductOutcome::NotFoundRedirect { destination, .. } => Generation::Redirect(destination),
    })
}

/// Serve the catalog page through the cache
pub async fn catalog(state: &AppState) -> ShopResult<Rendered> {
    state
        .pages
        .render_with(CATALOG_KEY, || generate_catalog(state))
        .await
}

/// Serve a product page through the cache
pub async fn product(state: &AppState, product_id: &str) -> ShopResult<Rendered> {
    state
        .pages
        .render_with(&product_key(product_id), || generate_product(state, product_id))
        .await
}

/// Render the catalog and every enumerated product page ahead of time.
///
/// Returns the number of pages cached. A catalog failure is returned to the
/// caller; a product that fails to render is skipped and left to be
/// generated on first request.
#[instrument(skip(state))]
pub async fn prerender(state: &AppState) -> ShopResult<usize> {
    if let Generation::Page { html, revalidate } = generate_catalog(state).await? {
        state.pages.insert(CATALOG_KEY, html, revalidate).await;
    }

    let paths = product_paths(state.provider.as_ref()).await?;
    for product_id in &paths.paths {
        match generate_product(state, product_id).await? {
            Generation::Page { html, revalidate } => {
                state.pages.insert(product_key(product_id), html, revalidate).await;
            }
            Generation::Redirect(_) => {
                warn!("Skipping prerender of product {}", product_id);
            }
        }
    }

    let cached = state.pages.len().await;
    info!("Prerendered {} pages", cached);
    Ok(cached)
}
