//! Product store abstraction (lookup by SKU, append).
//!
//! The store is the source of truth for which SKUs exist. This crate does not
//! enforce uniqueness; callers check with `find_by_sku` before `add_product`.

pub mod in_memory;
pub mod sheets;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use intake_core::Sku;
use intake_products::Product;

pub use in_memory::InMemoryProductStore;
pub use sheets::{GoogleSheetsStore, SHEETS_BASE_URL, SheetsConfig};

/// Store failure. The display text is surfaced to HTTP clients as-is.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("spreadsheet request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("spreadsheet API error: {status} {body}")]
    Status { status: u16, body: String },

    #[error("spreadsheet response unreadable: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError>;
    async fn add_product(&self, product: &Product) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        (**self).find_by_sku(sku).await
    }

    async fn add_product(&self, product: &Product) -> Result<(), StoreError> {
        (**self).add_product(product).await
    }
}
