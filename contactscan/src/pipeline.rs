use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, instrument};

use crate::error::{Result, ScanError};
use crate::extraction::extract;
use crate::ingest::UploadedImage;
use crate::models::Record;
use crate::ocr::{preprocess_image, OcrProvider};

/// Runs uploaded images through preprocessing, OCR and record extraction.
///
/// Images are recognized with bounded concurrency but results are always
/// concatenated in upload order. The first failing image aborts the run.
#[derive(Clone)]
pub struct ExtractionPipeline {
    ocr: OcrProvider,
}

impl ExtractionPipeline {
    pub fn new(ocr: OcrProvider) -> Self {
        Self { ocr }
    }

    pub fn ocr(&self) -> &OcrProvider {
        &self.ocr
    }

    pub async fn run(&self, images: &[UploadedImage]) -> Result<Vec<Record>> {
        let concurrency = self.ocr.config().concurrency.max(1);

        let uploads: Vec<_> = images
            .iter()
            .enumerate()
            .map(|(index, image)| self.process_upload(index, image))
            .collect();
        let per_image: Vec<Vec<Record>> = stream::iter(uploads)
            .buffered(concurrency)
            .try_collect()
            .await?;

        Ok(per_image.into_iter().flatten().collect())
    }

    async fn process_upload(&self, index: usize, image: &UploadedImage) -> Result<Vec<Record>> {
        let bytes = image.read_bytes().await?;
        let records = self.recognize(&bytes).await.map_err(|e| {
            tracing::warn!(
                index,
                file_name = image.file_name().unwrap_or("<unnamed>"),
                error = %e,
                "Image recognition failed"
            );
            e
        })?;
        debug!(
            index,
            bytes = image.len(),
            records = records.len(),
            "Image processed"
        );
        Ok(records)
    }

    /// Recognize a single image and extract its records.
    #[instrument(skip_all, fields(bytes = image_bytes.len()))]
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<Vec<Record>> {
        let prepared = if self.ocr.config().preprocess {
            let bytes = image_bytes.to_vec();
            let config = self.ocr.config().clone();
            tokio::task::spawn_blocking(move || preprocess_image(&bytes, &config))
                .await
                .map_err(|e| ScanError::Internal(format!("Preprocessing task panicked: {e}")))??
        } else {
            image_bytes.to_vec()
        };

        let text = self.ocr.ocr(&prepared).await?;
        Ok(extract(&text))
    }
}
