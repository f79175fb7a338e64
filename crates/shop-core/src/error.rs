//! # Storefront Error Types
//!
//! Typed error handling for the ignite-shop storefront.
//! Provider calls and display mapping return `Result<T, ShopError>`.

use thiserror::Error;

/// Core error type for catalog and checkout operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Product unknown to the provider
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: String },

    /// Product was returned without an expanded default price
    #[error("Product {product_id} has no default price")]
    MissingDefaultPrice { product_id: String },

    /// Currency not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider accepted the session request but returned no redirect URL
    #[error("Checkout creation failed: {0}")]
    CheckoutCreationFailed(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ShopError {
    /// Returns true if the provider reported the product as missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ShopError::ProductNotFound { .. })
    }

    /// HTTP status for this error when it surfaces from a provider call.
    ///
    /// Misconfiguration is the server's fault (500), a missing product is
    /// 404, and everything the provider did or failed to do is 502.
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Configuration(_) => 500,
            ShopError::ProductNotFound { .. } => 404,
            ShopError::MissingDefaultPrice { .. }
            | ShopError::UnsupportedCurrency { .. }
            | ShopError::ProviderError { .. }
            | ShopError::NetworkError(_)
            | ShopError::CheckoutCreationFailed(_)
            | ShopError::Serialization(_) => 502,
        }
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
