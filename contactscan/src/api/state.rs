use std::sync::Arc;

use crate::config::Config;
use crate::ocr::OcrProvider;
use crate::pipeline::ExtractionPipeline;

/// Shared, read-only request state. Built once at startup; nothing in here
/// is mutated while serving.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: ExtractionPipeline,
}

impl AppState {
    pub fn new(config: Config, ocr: OcrProvider) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: ExtractionPipeline::new(ocr),
        }
    }
}
