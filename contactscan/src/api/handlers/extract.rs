//! `POST /extract`: the only write-shaped endpoint. Nothing is persisted;
//! uploads live exactly as long as the request.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::AppState;
use crate::error::{Result, ScanError};
use crate::ingest::collect_images;
use crate::models::Record;

/// `POST /extract`
///
/// Accepts up to the configured number of images in the multipart field
/// `images` and returns every extracted record, image by image, in upload
/// order. Any image that fails recognition fails the whole request.
#[utoipa::path(
    post,
    path = "/extract",
    tag = "extract",
    request_body(content_type = "multipart/form-data", content = String, description = "One or more image files in the `images` field"),
    responses(
        (status = 200, description = "Extracted name/number records", body = [Record]),
        (status = 400, description = "Missing, malformed or too many uploads", body = crate::error::ErrorBody),
        (status = 413, description = "An uploaded file is too large", body = crate::error::ErrorBody),
        (status = 415, description = "An uploaded file is not an image", body = crate::error::ErrorBody),
        (status = 500, description = "Recognition failed", body = crate::error::ErrorBody),
        (status = 503, description = "No OCR engine available", body = crate::error::ErrorBody),
    )
)]
pub async fn extract_records(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<Record>>> {
    let multipart =
        multipart.map_err(|e| ScanError::Validation(format!("Expected multipart/form-data: {e}")))?;

    let ocr = state.pipeline.ocr();
    if !ocr.is_available() {
        return Err(ScanError::OcrUnavailable(format!(
            "OCR backend '{}' is not available",
            ocr.config().model
        )));
    }

    // Dropping `images` on any exit path removes spooled temp files.
    let images = collect_images(multipart, &state.config.upload).await?;
    let records = state.pipeline.run(&images).await?;

    tracing::info!(
        images = images.len(),
        records = records.len(),
        "Extraction complete"
    );

    Ok(Json(records))
}
