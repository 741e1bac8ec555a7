//! Infrastructure layer: the external spreadsheet store and its adapters.

pub mod store;

pub use store::{
    GoogleSheetsStore, InMemoryProductStore, ProductStore, SHEETS_BASE_URL, SheetsConfig, StoreError,
};
