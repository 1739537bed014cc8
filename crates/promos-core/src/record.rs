use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currency assigned to products whose source record does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// One flat promotion entry as produced by a parser, typed for ingestion.
///
/// Every entry describes a product and a single promotion on it. Product
/// fields are only used when the product does not exist yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromotionRecord {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub shipping_discount: f64,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl PromotionRecord {
    /// Decodes a raw parser entry.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when a required key is missing or a
    /// value has the wrong shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    /// A promotion must discount either the price or the shipping.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn has_valid_discount(&self) -> bool {
        !(self.discount == 0.0 && self.shipping_discount == 0.0)
    }
}
