#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Once;

use contactscan::api::{create_router, AppState};
use contactscan::config::{AllowedOrigins, Config, OcrConfig, ServerConfig, UploadConfig};
use contactscan::ocr::OcrProvider;

static INIT: Once = Once::new();

pub const BOUNDARY: &str = "contactscan-test-boundary";

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

pub fn test_config(ocr: OcrConfig) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: AllowedOrigins::Any,
        },
        upload: UploadConfig {
            max_files: 3,
            max_file_size: 1024 * 1024,
            spool_dir: None,
        },
        ocr,
    }
}

/// A vision backend that needs no API key, pointed at `base_url`.
pub fn vision_ocr_config(base_url: &str) -> OcrConfig {
    OcrConfig {
        model: "ollama/llava".to_string(),
        api_key: None,
        base_url: Some(format!("{base_url}/v1")),
        timeout_secs: 5,
        preprocess: false,
        ..OcrConfig::default()
    }
}

/// A remote backend that is missing its API key and therefore unavailable.
pub fn unavailable_ocr_config() -> OcrConfig {
    OcrConfig {
        model: "openai/gpt-4o".to_string(),
        api_key: None,
        ..OcrConfig::default()
    }
}

pub fn test_router(config: Config) -> axum::Router {
    init_test_logger();
    let ocr = OcrProvider::new(&config.ocr).expect("provider construction never fails");
    create_router(AppState::new(config, ocr))
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::GrayImage::from_pixel(width, height, image::Luma([255u8]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode png");
    out.into_inner()
}

/// One part of a hand-built multipart body.
pub struct Part<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> Part<'a> {
    pub fn image(file_name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            field: "images",
            file_name,
            content_type: "image/png",
            bytes,
        }
    }
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.field, part.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.content_type).as_bytes());
        body.extend_from_slice(part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
}
