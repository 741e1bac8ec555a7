//! `intake-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no storage).

pub mod error;
pub mod sku;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use sku::Sku;
pub use value_object::ValueObject;
