use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use intake_core::{DomainError, Sku};

/// Product price as submitted.
///
/// JSON clients send a number; form-style clients may send text. Either way the
/// value is carried and rendered verbatim, never rounded or re-parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(serde_json::Number),
    Text(String),
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Price::Number(n) => core::fmt::Display::fmt(n, f),
            Price::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Price {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(Price::Number)
            .unwrap_or_else(|| Price::Text(value.to_string()))
    }
}

/// Product record forwarded to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub sku: Sku,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<JsonValue>,
}

impl Product {
    pub fn new(sku: Sku) -> Self {
        Self {
            sku,
            name: None,
            price: None,
            metadata: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<Price>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Name as rendered into prompts and rows (empty when absent).
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Price as rendered into prompts and rows (empty when absent).
    pub fn display_price(&self) -> String {
        self.price.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}

/// Unvalidated product payload as it arrives over HTTP.
///
/// Only `sku`, `name`, `price` and `metadata` are read; anything else in the
/// payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

impl TryFrom<ProductInput> for Product {
    type Error = DomainError;

    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let sku = Sku::parse(input.sku.unwrap_or_default())?;
        Ok(Self {
            sku,
            name: input.name,
            price: input.price,
            metadata: input.metadata.filter(|m| !m.is_null()),
        })
    }
}
