use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::handlers;
use crate::error::ErrorBody;
use crate::models::Record;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contactscan API",
        version = "1.0.0",
        description = "Extracts name and phone-number pairs from uploaded images with OCR.",
    ),
    paths(
        handlers::health::health_check,
        handlers::extract::extract_records,
    ),
    components(schemas(
        Record,
        ErrorBody,
        handlers::health::HealthData,
        handlers::health::OcrStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "extract", description = "Record extraction from images"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
