use std::sync::RwLock;

use async_trait::async_trait;

use intake_core::Sku;
use intake_products::Product;

use super::{ProductStore, StoreError};

/// In-memory product list for tests/dev.
///
/// Rows are kept in insertion order like a sheet; lookups return the first match.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    rows: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            rows: RwLock::new(products.into_iter().collect()),
        }
    }

    pub fn products(&self) -> Vec<Product> {
        match self.rows.read() {
            Ok(rows) => rows.clone(),
            Err(_) => vec![],
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_sku(&self, sku: &Sku) -> Result<Option<Product>, StoreError> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::Unavailable("product store lock poisoned".to_string()))?;
        Ok(rows.iter().find(|p| p.sku == *sku).cloned())
    }

    async fn add_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::Unavailable("product store lock poisoned".to_string()))?;
        rows.push(product.clone());
        Ok(())
    }
}
