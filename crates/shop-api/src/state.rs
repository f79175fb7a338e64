//! # Application State
//!
//! Shared state for the Axum application.
//! Holds the catalog provider, storefront settings and the page cache.

use crate::cache::PageCache;
use shop_core::{BoxedCatalogProvider, CheckoutUrls, Storefront};
use shop_stripe::StripeCatalogProvider;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Public URL of the shop, used for checkout return URLs
    pub base_url: String,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Render pages at startup
    pub prerender: bool,
    /// Explicit storefront settings file
    pub storefront_config: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            base_url: std::env::var("NEXT_URL").unwrap_or(defaults.base_url),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            prerender: std::env::var("PRERENDER")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.prerender),
            storefront_config: std::env::var("STOREFRONT_CONFIG").ok().map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            environment: "development".to_string(),
            prerender: true,
            storefront_config: None,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog and checkout provider
    pub provider: BoxedCatalogProvider,
    /// Storefront settings
    pub storefront: Arc<Storefront>,
    /// Checkout return URLs
    pub urls: CheckoutUrls,
    /// Application config
    pub config: AppConfig,
    /// Generated pages
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let storefront = load_storefront(config.storefront_config.as_deref())?;

        let provider = StripeCatalogProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(Arc::new(provider), storefront, config))
    }

    /// Create state around any provider
    pub fn with_provider(
        provider: BoxedCatalogProvider,
        storefront: Storefront,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            storefront: Arc::new(storefront),
            urls: CheckoutUrls::new(&config.base_url),
            config,
            pages: Arc::new(PageCache::new()),
        }
    }
}

/// Load storefront settings from the configured file or the usual locations
fn load_storefront(explicit: Option<&Path>) -> anyhow::Result<Storefront> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        return parse_storefront(&content, &path.display().to_string());
    }

    let config_paths = [
        "config/storefront.toml",
        "../config/storefront.toml",
        "../../config/storefront.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            return parse_storefront(&content, path);
        }
    }

    tracing::info!("No storefront config found, using defaults");
    Ok(Storefront::default())
}

fn parse_storefront(content: &str, source: &str) -> anyhow::Result<Storefront> {
    let storefront = Storefront::from_toml(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", source, e))?;
    tracing::info!("Loaded storefront \"{}\" from {}", storefront.name, source);
    Ok(storefront)
}
