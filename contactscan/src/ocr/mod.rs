//! Text recognition for uploaded images.
//!
//! `OcrProvider` hides the engine behind one call, `ocr(&[u8]) -> String`:
//! - `local/*` runs Tesseract in-process via leptess with the configured
//!   character whitelist
//! - `openai/*`, `openrouter/*`, `ollama/*` and `lmstudio/*` call an
//!   OpenAI-compatible vision endpoint and filter the reply to the same
//!   whitelist
//!
//! When the selected engine cannot start the provider is still constructed,
//! reports `is_available() == false`, and every call fails with
//! `ScanError::OcrUnavailable`.

mod api;
mod preprocessing;
mod provider;

pub use preprocessing::preprocess_image;
pub use provider::{apply_char_whitelist, OcrProvider};
