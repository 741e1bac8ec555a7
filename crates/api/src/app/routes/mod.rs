use axum::{Router, routing::post};

pub mod ai_products;
pub mod products;
pub mod system;

/// Router for all product endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/ai/products/check", post(ai_products::check))
        .route("/api/v1/products", post(products::create_product))
}
