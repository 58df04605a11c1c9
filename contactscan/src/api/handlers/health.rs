use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;

/// Health data for `GET /health`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub ocr: OcrStatus,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct OcrStatus {
    pub status: String,
    pub backend: String,
    pub model: String,
}

/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthData),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthData> {
    let ocr = state.pipeline.ocr();
    let ocr_status = OcrStatus {
        status: if ocr.is_available() {
            "available".to_string()
        } else {
            "unavailable".to_string()
        },
        backend: ocr.backend_name().to_string(),
        model: ocr.config().model.clone(),
    };

    Json(HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ocr: ocr_status,
    })
}
