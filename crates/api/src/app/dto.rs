use serde::{Deserialize, Serialize};

use intake_core::Sku;
use intake_products::{Product, ProductInput};

// -------------------------
// Request DTOs
// -------------------------

/// `{ "product": { ... } }`; a missing `product` reads as an empty payload.
#[derive(Debug, Default, Deserialize)]
pub struct ProductEnvelope {
    #[serde(default)]
    pub product: Option<ProductInput>,
}

impl ProductEnvelope {
    pub fn into_input(self) -> ProductInput {
        self.product.unwrap_or_default()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: Product,
}

pub fn already_exists_message(sku: &Sku) -> String {
    format!("Product with SKU {sku} already exists.")
}
