use std::sync::Arc;
use std::time::Duration;

use leptess::{LepTess, Variable};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{Result, ScanError};

use super::api::VisionOcrClient;

enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Api { client: VisionOcrClient },
    Unavailable { reason: String },
}

/// Text recognizer used by the extraction pipeline: image bytes in, one
/// block of whitelisted text out.
pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    let mut lt = LepTess::new(None, &config.languages).map_err(|e| e.to_string())?;
    if !config.char_whitelist.is_empty() {
        lt.set_variable(Variable::TesseditCharWhitelist, &config.char_whitelist)
            .map_err(|e| format!("Failed to set character whitelist: {e:?}"))?;
    }
    Ok(lt)
}

/// Keep only whitelisted characters and line breaks. Remote models cannot be
/// constrained the way Tesseract can, so their output is filtered afterwards.
pub fn apply_char_whitelist(text: &str, whitelist: &str) -> String {
    if whitelist.is_empty() {
        return text.to_string();
    }
    text.chars()
        .filter(|c| *c == '\n' || whitelist.contains(*c))
        .collect()
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, _) = parse_ocr_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "local" => match create_tesseract(config) {
                Ok(lt) => {
                    info!(languages = %config.languages, "Tesseract OCR initialized");
                    OcrBackend::Local {
                        tesseract: Arc::new(Mutex::new(lt)),
                    }
                }
                Err(e) => {
                    let reason = format!("Tesseract not available: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
            _ => match VisionOcrClient::new(config) {
                Ok(client) => {
                    info!(model = %config.model, "Vision OCR API backend initialized");
                    OcrBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("Vision OCR backend unavailable: {e}");
                    warn!("{}", reason);
                    OcrBackend::Unavailable { reason }
                }
            },
        };

        Ok(Self {
            backend,
            config: config.clone(),
        })
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Short backend label for health reporting.
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            OcrBackend::Local { .. } => "tesseract",
            OcrBackend::Api { .. } => "vision-api",
            OcrBackend::Unavailable { .. } => "unavailable",
        }
    }

    pub async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result = tokio::time::timeout(timeout_duration, self.ocr_internal(image_bytes)).await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(ScanError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn ocr_internal(&self, image_bytes: &[u8]) -> Result<String> {
        match &self.backend {
            OcrBackend::Local { tesseract } => {
                let bytes = image_bytes.to_vec();
                let tesseract = Arc::clone(tesseract);

                let text = tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&bytes)
                        .map_err(|e| ScanError::Ocr(format!("Failed to set image: {e}")))?;
                    lt.get_utf8_text()
                        .map_err(|e| ScanError::Ocr(format!("Failed to extract text: {e}")))
                })
                .await
                .map_err(|e| ScanError::Ocr(format!("OCR task panicked: {e}")))??;

                Ok(text.trim().to_string())
            }
            OcrBackend::Api { client } => {
                let text = client.ocr(image_bytes).await?;
                Ok(apply_char_whitelist(&text, &self.config.char_whitelist)
                    .trim()
                    .to_string())
            }
            OcrBackend::Unavailable { reason } => Err(ScanError::OcrUnavailable(reason.clone())),
        }
    }
}

impl Clone for OcrProvider {
    fn clone(&self) -> Self {
        let backend = match &self.backend {
            OcrBackend::Local { tesseract } => OcrBackend::Local {
                tesseract: Arc::clone(tesseract),
            },
            OcrBackend::Api { client } => OcrBackend::Api {
                client: client.clone(),
            },
            OcrBackend::Unavailable { reason } => OcrBackend::Unavailable {
                reason: reason.clone(),
            },
        };
        Self {
            backend,
            config: self.config.clone(),
        }
    }
}
