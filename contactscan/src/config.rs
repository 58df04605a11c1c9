use std::env;
use std::path::PathBuf;

/// Characters Tesseract is allowed to emit. Mirrors what the extraction
/// rules need: names, digits and the odd email-ish token.
pub const DEFAULT_CHAR_WHITELIST: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789.@ ";

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) if val.trim().is_empty() => None,
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

/// Parse `CORS_ALLOWED_ORIGINS`.
/// Format: comma-separated origins, e.g. `https://a.example,http://localhost:5173`.
/// Unset, empty or `*` means any origin.
fn parse_allowed_origins() -> AllowedOrigins {
    match env::var("CORS_ALLOWED_ORIGINS") {
        Ok(val) => AllowedOrigins::parse(&val),
        Err(_) => AllowedOrigins::Any,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub upload: UploadConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

impl AllowedOrigins {
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            AllowedOrigins::Any
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

/// Limits applied while reading the multipart `images` field.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub max_files: usize,
    pub max_file_size: usize,
    /// When set, uploads are spooled to temporary files in this directory
    /// instead of being held in memory.
    pub spool_dir: Option<PathBuf>,
}

impl UploadConfig {
    /// Upper bound for a whole `/extract` request body. Leaves headroom for
    /// multipart boundaries and part headers.
    pub fn request_body_limit(&self) -> usize {
        self.max_files
            .saturating_mul(self.max_file_size)
            .saturating_add(64 * 1024)
    }
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    pub char_whitelist: String,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
    pub preprocess: bool,
    pub concurrency: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_files: 50,
            max_file_size: 10 * 1024 * 1024,
            spool_dir: None,
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            char_whitelist: DEFAULT_CHAR_WHITELIST.to_string(),
            timeout_secs: 60,
            max_image_dimension: 4096,
            min_image_dimension: 50,
            preprocess: true,
            concurrency: 4,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let upload_defaults = UploadConfig::default();
        let ocr_defaults = OcrConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("CONTACTSCAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("PORT", 5500),
                allowed_origins: parse_allowed_origins(),
            },
            upload: UploadConfig {
                max_files: parse_env_or("UPLOAD_MAX_FILES", upload_defaults.max_files),
                max_file_size: parse_env_or("UPLOAD_MAX_FILE_SIZE", upload_defaults.max_file_size),
                spool_dir: parse_env_opt("UPLOAD_SPOOL_DIR"),
            },
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or(ocr_defaults.model),
                api_key: env::var("OCR_API_KEY").ok(),
                base_url: env::var("OCR_BASE_URL").ok(),
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr_defaults.languages),
                char_whitelist: env::var("OCR_CHAR_WHITELIST")
                    .unwrap_or(ocr_defaults.char_whitelist),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
                min_image_dimension: parse_env_or(
                    "OCR_MIN_DIMENSION",
                    ocr_defaults.min_image_dimension,
                ),
                preprocess: parse_env_or("OCR_PREPROCESS", ocr_defaults.preprocess),
                concurrency: parse_env_or("OCR_CONCURRENCY", ocr_defaults.concurrency).max(1),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known remote OCR providers that speak the OpenAI chat-completions dialect.
pub const KNOWN_OCR_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an OCR model name into (provider, model) tuple.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_OCR_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
        if prefix_lower == "local" {
            return ("local", rest);
        }
    }
    // Default to local tesseract
    ("local", model)
}
