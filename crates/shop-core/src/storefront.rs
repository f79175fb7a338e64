//! # Storefront Settings
//!
//! Store-wide presentation and regeneration settings.
//! Loaded from `config/storefront.toml` when present.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a single storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Storefront {
    /// Display name used in the header and page titles
    pub name: String,

    /// Seconds before the catalog page is regenerated
    pub catalog_revalidate_secs: u64,

    /// Seconds before a product page is regenerated
    pub product_revalidate_secs: u64,

    /// Alert shown when the buy button cannot reach checkout
    pub checkout_error_message: String,
}

impl Default for Storefront {
    fn default() -> Self {
        Self {
            name: "Ignite Shop".to_string(),
            catalog_revalidate_secs: 60 * 60 * 2,
            product_revalidate_secs: 60 * 60 * 12,
            checkout_error_message: "Falha ao redirecionar ao checkout!".to_string(),
        }
    }
}

impl Storefront {
    /// Load settings from a TOML string; missing keys keep their defaults
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    pub fn catalog_revalidate(&self) -> Duration {
        Duration::from_secs(self.catalog_revalidate_secs)
    }

    pub fn product_revalidate(&self) -> Duration {
        Duration::from_secs(self.product_revalidate_secs)
    }
}
