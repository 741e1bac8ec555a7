//! Products domain module.
//!
//! A product here is a transient, request-scoped record forwarded to the
//! external spreadsheet store. Identity is the SKU; uniqueness is the store's job.

pub mod product;

pub use product::{Price, Product, ProductInput};
