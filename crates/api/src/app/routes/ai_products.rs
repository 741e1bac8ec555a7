use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use intake_ai::confirmation_prompt;
use intake_products::Product;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

/// `POST /ai/products/check`
///
/// Looks the SKU up; on a miss asks the generator for a confirmation message
/// and appends the product to the store.
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ProductEnvelope>, JsonRejection>,
) -> axum::response::Response {
    match check_product(&services, body).await {
        Ok(message) => (StatusCode::OK, Json(dto::MessageResponse { message })).into_response(),
        Err(e) => errors::respond(services.reporter.as_ref(), "POST /ai/products/check", e),
    }
}

async fn check_product(
    services: &AppServices,
    body: Result<Json<dto::ProductEnvelope>, JsonRejection>,
) -> Result<String, ApiError> {
    let Json(envelope) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let product = Product::try_from(envelope.into_input())?;

    if services.store.find_by_sku(&product.sku).await?.is_some() {
        tracing::info!(sku = %product.sku, "product already exists");
        return Ok(dto::already_exists_message(&product.sku));
    }

    let prompt = confirmation_prompt(&product);
    let generation = services.generator.generate(&prompt).await;
    if generation.is_fallback() {
        tracing::warn!(sku = %product.sku, "using fallback confirmation message");
    }

    // Not atomic with the lookup: a concurrent request may append the same SKU.
    services.store.add_product(&product).await?;
    tracing::info!(sku = %product.sku, "product added");

    Ok(generation.into_message())
}
