use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
    pub created_by: String,
    pub version: u32,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Template the notification was rendered from.
pub struct TemplateRef {
    pub id: String,
    pub uri: String,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SmsContent {
    pub body: String,
    #[serde(default)]
    pub from_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentSms {
    pub id: String,
    pub uri: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    pub content: SmsContent,
    pub template: TemplateRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub from_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SentEmail {
    pub id: String,
    pub uri: String,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub scheduled_for: Option<String>,
    pub content: EmailContent,
    pub template: TemplateRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TemplatePreview {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub template_type: String,
    pub version: u32,
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `{error, message}` entry of an API error body.
pub struct ApiErrorItem {
    /// Error kind, e.g. `ValidationError` or `BadRequestError`.
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rejection returned by the API with an HTTP status of 400 or above.
///
/// `body` holds the raw response text when it was not the documented
/// `{status_code, errors}` shape (for example a proxy error page).
pub struct ApiError {
    pub status: u16,
    /// Response headers as received, names lowercased.
    pub headers: Vec<(String, String)>,
    pub errors: Vec<ApiErrorItem>,
    pub body: Option<String>,
}

impl ApiError {
    /// First value of response header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            return match self.body.as_deref() {
                Some(body) => write!(f, "HTTP {}: {body}", self.status),
                None => write!(f, "HTTP {}", self.status),
            };
        }

        let messages = self
            .errors
            .iter()
            .map(|item| item.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&messages)
    }
}

impl std::error::Error for ApiError {}
