//! # Product Types
//!
//! Provider-side product/price shapes and the display record the
//! storefront renders. Amounts are kept in the smallest currency unit
//! and only turned into text by [`Price::display`].

use crate::error::{ShopError, ShopResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    BRL,
    USD,
    EUR,
    GBP,
    JPY,
}

/// Separator conventions of the locale a currency is displayed in
struct NumberStyle {
    symbol: &'static str,
    thousands: char,
    decimal: char,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::BRL => "brl",
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
        }
    }

    /// Parse a provider currency code (case-insensitive)
    pub fn from_code(code: &str) -> ShopResult<Self> {
        match code.to_ascii_lowercase().as_str() {
            "brl" => Ok(Currency::BRL),
            "usd" => Ok(Currency::USD),
            "eur" => Ok(Currency::EUR),
            "gbp" => Ok(Currency::GBP),
            "jpy" => Ok(Currency::JPY),
            _ => Err(ShopError::UnsupportedCurrency {
                currency: code.to_string(),
            }),
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, the others have 2)
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    fn style(&self) -> NumberStyle {
        match self {
            Currency::BRL => NumberStyle {
                symbol: "R$ ",
                thousands: '.',
                decimal: ',',
            },
            Currency::EUR => NumberStyle {
                symbol: "€ ",
                thousands: '.',
                decimal: ',',
            },
            Currency::USD => NumberStyle {
                symbol: "$",
                thousands: ',',
                decimal: '.',
            },
            Currency::GBP => NumberStyle {
                symbol: "£",
                thousands: ',',
                decimal: '.',
            },
            Currency::JPY => NumberStyle {
                symbol: "¥",
                thousands: ',',
                decimal: '.',
            },
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::BRL
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (centavos for BRL)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit
    pub fn from_minor(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Format for display in the currency's locale (e.g., "R$ 79,90")
    pub fn display(&self) -> String {
        let style = self.currency.style();
        let places = self.currency.decimal_places();
        let divisor = 10_u64.pow(places);

        let magnitude = self.amount.unsigned_abs();
        let mut text = group_thousands(magnitude / divisor, style.thousands);
        if places > 0 {
            text.push(style.decimal);
            text.push_str(&format!(
                "{:0width$}",
                magnitude % divisor,
                width = places as usize
            ));
        }

        let sign = if self.amount < 0 { "-" } else { "" };
        format!("{}{}{}", sign, style.symbol, text)
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

/// A price object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPrice {
    /// Provider price ID (price_...)
    pub id: String,
    /// Amount in smallest unit; absent for customer-chosen amounts
    #[serde(default)]
    pub unit_amount: Option<i64>,
    /// Lowercase ISO currency code
    pub currency: String,
}

impl ProviderPrice {
    pub fn new(id: impl Into<String>, unit_amount: i64, currency: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit_amount: Some(unit_amount),
            currency: currency.into(),
        }
    }

    /// Convert to a typed price; a missing amount counts as zero
    pub fn to_price(&self) -> ShopResult<Price> {
        let currency = Currency::from_code(&self.currency)?;
        Ok(Price::from_minor(self.unit_amount.unwrap_or(0), currency))
    }
}

/// A product object as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProduct {
    /// Provider product ID (prod_...)
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Expanded default price, `None` when missing or not expanded
    #[serde(default)]
    pub default_price: Option<ProviderPrice>,
}

impl ProviderProduct {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            images: Vec::new(),
            default_price: None,
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Builder: append an image URL
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.images.push(url.into());
        self
    }

    /// Builder: set the expanded default price
    pub fn with_default_price(mut self, price: ProviderPrice) -> Self {
        self.default_price = Some(price);
        self
    }
}

/// Normalized product shown on the catalog and detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDisplay {
    pub id: String,
    pub name: String,
    pub description: String,
    /// First provider image, empty when the product has none
    pub image_url: String,
    /// Raw price at the source
    pub price: Price,
    /// Locale-formatted price text
    pub formatted_price: String,
    /// Price ID handed to checkout
    pub default_price_id: String,
}

impl ProductDisplay {
    /// Project a provider product into the display shape
    pub fn from_provider(product: &ProviderProduct) -> ShopResult<Self> {
        let default_price =
            product
                .default_price
                .as_ref()
                .ok_or_else(|| ShopError::MissingDefaultPrice {
                    product_id: product.id.clone(),
                })?;
        let price = default_price.to_price()?;

        Ok(Self {
            id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone().unwrap_or_default(),
            image_url: product.images.first().cloned().unwrap_or_default(),
            formatted_price: price.display(),
            price,
            default_price_id: default_price.id.clone(),
        })
    }
}
