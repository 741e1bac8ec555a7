use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use intake_products::Product;

use crate::app::dto;
use crate::app::errors::{self, ApiError};
use crate::app::services::AppServices;

/// `POST /api/v1/products`: plain append, no generated message.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::ProductEnvelope>, JsonRejection>,
) -> axum::response::Response {
    match create(&services, body).await {
        Ok(product) => {
            (StatusCode::CREATED, Json(dto::ProductResponse { product })).into_response()
        }
        Err(e) => errors::respond(services.reporter.as_ref(), "POST /api/v1/products", e),
    }
}

async fn create(
    services: &AppServices,
    body: Result<Json<dto::ProductEnvelope>, JsonRejection>,
) -> Result<Product, ApiError> {
    let Json(envelope) = body.map_err(|e| ApiError::Validation(e.body_text()))?;
    let product = Product::try_from(envelope.into_input())?;

    if services.store.find_by_sku(&product.sku).await?.is_some() {
        return Err(ApiError::Conflict(dto::already_exists_message(&product.sku)));
    }

    services.store.add_product(&product).await?;
    tracing::info!(sku = %product.sku, "product created");
    Ok(product)
}
