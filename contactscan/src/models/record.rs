use serde::{Deserialize, Serialize};

/// One extracted contact: a free-form name line paired with a normalized
/// 10-digit mobile number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Record {
    /// Line of recognized text that preceded the number. Never empty.
    #[schema(example = "Alice")]
    pub name: String,
    /// Always matches `^[6-9]\d{9}$`; any `+91` / `91` prefix is stripped.
    #[schema(example = "9876543210")]
    pub number: String,
}

impl Record {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Line format used by the web client's "Copy All" button.
    pub fn to_clipboard_line(&self) -> String {
        format!("{} - {}", self.name, self.number)
    }
}
