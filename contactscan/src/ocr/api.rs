use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{parse_ocr_provider_model, OcrConfig};
use crate::error::{Result, ScanError};

const OCR_PROMPT: &str = "Transcribe all text in this image exactly as it appears. \
Keep each line of the image on its own line. Return only the transcribed text \
without any explanations or formatting.";

const MAX_RETRIES: u32 = 3;

/// OCR through an OpenAI-compatible vision chat-completions endpoint.
#[derive(Clone, Debug)]
pub struct VisionOcrClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

fn default_base_url(provider: &str) -> &'static str {
    match provider {
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1",
    }
}

fn requires_api_key(provider: &str) -> bool {
    matches!(provider, "openai" | "openrouter")
}

/// Best-effort media type for the data URL; the API only needs a plausible one.
fn sniff_mime(image_bytes: &[u8]) -> &'static str {
    infer::get(image_bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or("image/png")
}

impl VisionOcrClient {
    pub fn new(config: &OcrConfig) -> Result<Self> {
        let (provider, model) = parse_ocr_provider_model(&config.model);
        let provider = provider.to_lowercase();

        if requires_api_key(&provider) && config.api_key.is_none() {
            return Err(ScanError::Ocr(format!(
                "API key required for {provider} vision OCR"
            )));
        }

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&provider).to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScanError::Ocr(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    pub async fn ocr(&self, image_bytes: &[u8]) -> Result<String> {
        let base64_image = STANDARD.encode(image_bytes);
        let data_url = format!("data:{};base64,{base64_image}", sniff_mime(image_bytes));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text {
                        text: OCR_PROMPT.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            max_tokens: 4096,
        };

        self.make_request(&request).await
    }

    async fn make_request(&self, request: &ChatRequest) -> Result<String> {
        let mut retries = 0;

        loop {
            let mut builder = self
                .client
                .post(format!("{}/chat/completions", self.base_url))
                .header("Content-Type", "application/json")
                .json(request);
            if let Some(api_key) = &self.api_key {
                builder = builder.header("Authorization", format!("Bearer {api_key}"));
            }

            match builder.send().await {
                Ok(resp) => {
                    if resp.status().is_success() {
                        let chat_response: ChatResponse = resp.json().await.map_err(|e| {
                            ScanError::Ocr(format!("Failed to parse response: {e}"))
                        })?;

                        return chat_response
                            .choices
                            .first()
                            .map(|c| c.message.content.clone())
                            .ok_or_else(|| ScanError::Ocr("No response from API".to_string()));
                    } else if resp.status().as_u16() == 429 || resp.status().is_server_error() {
                        retries += 1;
                        if retries >= MAX_RETRIES {
                            return Err(ScanError::Ocr(format!(
                                "API request failed after {} retries: {}",
                                MAX_RETRIES,
                                resp.status()
                            )));
                        }
                        let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                        tokio::time::sleep(delay).await;
                        continue;
                    } else {
                        let status = resp.status();
                        let body = resp.text().await.unwrap_or_default();
                        return Err(ScanError::Ocr(format!(
                            "API request failed: {status} - {body}"
                        )));
                    }
                }
                Err(e) => {
                    retries += 1;
                    if retries >= MAX_RETRIES {
                        return Err(ScanError::Ocr(format!(
                            "API request failed after {MAX_RETRIES} retries: {e}"
                        )));
                    }
                    let delay = Duration::from_millis(100 * (2_u64.pow(retries)));
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
