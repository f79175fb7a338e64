//! # Catalog
//!
//! Page-generation side of the storefront: the catalog fetcher that feeds
//! the listing page, and the resolver behind the product detail pages.

use crate::error::ShopResult;
use crate::product::ProductDisplay;
use crate::provider::CatalogProvider;
use crate::storefront::Storefront;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Data for the catalog listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPage {
    /// Display records in provider order
    pub products: Vec<ProductDisplay>,
    /// How long the generated page stays fresh
    pub revalidate: Duration,
}

/// What to do with product IDs that were not enumerated up front
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Generate on first request; the request waits and the page is cached
    Blocking,
}

/// Product IDs to generate ahead of time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPaths {
    pub paths: Vec<String>,
    pub fallback: Fallback,
}

/// Data for one product detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub product: ProductDisplay,
    pub revalidate: Duration,
}

/// Result of resolving a product detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductOutcome {
    Found(ProductPage),
    /// Send the shopper back to the catalog instead of rendering an error
    NotFoundRedirect {
        destination: &'static str,
        permanent: bool,
    },
}

impl ProductOutcome {
    fn redirect_home() -> Self {
        ProductOutcome::NotFoundRedirect {
            destination: "/",
            permanent: false,
        }
    }
}

/// Fetch the full catalog and project it for the listing page.
///
/// Provider and mapping failures propagate to the caller.
#[instrument(skip(provider, storefront), fields(provider_name = provider.provider_name()))]
pub async fn fetch_catalog(
    provider: &dyn CatalogProvider,
    storefront: &Storefront,
) -> ShopResult<CatalogPage> {
    let products = provider
        .list_products()
        .await?
        .iter()
        .map(ProductDisplay::from_provider)
        .collect::<ShopResult<Vec<_>>>()?;

    debug!("Fetched {} catalog products", products.len());

    Ok(CatalogPage {
        products,
        revalidate: storefront.catalog_revalidate(),
    })
}

/// Enumerate the product pages to generate ahead of time.
#[instrument(skip(provider), fields(provider_name = provider.provider_name()))]
pub async fn product_paths(provider: &dyn CatalogProvider) -> ShopResult<StaticPaths> {
    let paths = provider
        .list_products()
        .await?
        .into_iter()
        .map(|product| product.id)
        .collect();

    Ok(StaticPaths {
        paths,
        fallback: Fallback::Blocking,
    })
}

/// Resolve one product for its detail page.
///
/// Never fails: any retrieval or mapping error becomes a redirect to the
/// catalog root.
#[instrument(skip(provider, storefront), fields(provider_name = provider.provider_name()))]
pub async fn resolve_product(
    provider: &dyn CatalogProvider,
    storefront: &Storefront,
    product_id: &str,
) -> ProductOutcome {
    let product = match provider.retrieve_product(product_id).await {
        Ok(product) => product,
        Err(e) if e.is_not_found() => {
            debug!("Redirecting to catalog, no product {}", product_id);
            return ProductOutcome::redirect_home();
        }
        Err(e) => {
            warn!("Redirecting to catalog, retrieve failed: {}", e);
            return ProductOutcome::redirect_home();
        }
    };

    match ProductDisplay::from_provider(&product) {
        Ok(product) => ProductOutcome::Found(ProductPage {
            product,
            revalidate: storefront.product_revalidate(),
        }),
        Err(e) => {
            warn!("Redirecting to catalog, product unusable: {}", e);
            ProductOutcome::redirect_home()
        }
    }
}
