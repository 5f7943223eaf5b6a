use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::value::RawValue;

use crate::domain::{ApiError, ApiErrorItem};

#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response has no `{field}` field")]
    MissingField { field: String },
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonBody {
    #[serde(default)]
    errors: Vec<ErrorJsonItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorJsonItem {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

/// Build an [`ApiError`] for a response with status >= 400.
///
/// The HTTP status is authoritative; the body's own `status_code` is ignored.
/// Bodies that are not the documented shape are kept verbatim.
pub fn decode_api_error(status: u16, headers: Vec<(String, String)>, body: &str) -> ApiError {
    let errors = serde_json::from_str::<ErrorJsonBody>(body)
        .map(|parsed| {
            parsed
                .errors
                .into_iter()
                .map(|item| ApiErrorItem {
                    error: item.error,
                    message: item.message,
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let body = if errors.is_empty() && !body.trim().is_empty() {
        Some(body.to_owned())
    } else {
        None
    };

    ApiError {
        status,
        headers,
        errors,
        body,
    }
}

/// Decode a success body, first descending through the wrapper objects named in `at`.
pub fn decode_json_at<T: DeserializeOwned>(body: &str, at: &[&str]) -> Result<T, DecodeError> {
    let mut raw: &RawValue = serde_json::from_str(body)?;
    for field in at {
        let nested: HashMap<String, &RawValue> = serde_json::from_str(raw.get())?;
        raw = nested
            .get(*field)
            .copied()
            .ok_or_else(|| DecodeError::MissingField {
                field: (*field).to_owned(),
            })?;
    }
    Ok(serde_json::from_str(raw.get())?)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    #[test]
    fn api_error_collects_items() {
        let body = r#"{"status_code":400,"errors":[{"error":"ValidationError","message":"bad template"}]}"#;
        let err = decode_api_error(400, Vec::new(), body);
        assert_eq!(err.status, 400);
        assert_eq!(
            err.errors,
            vec![ApiErrorItem {
                error: "ValidationError".to_owned(),
                message: "bad template".to_owned(),
            }]
        );
        assert_eq!(err.body, None);
        assert!(err.to_string().contains("bad template"));
    }

    #[test]
    fn api_error_uses_http_status_over_body_status() {
        let body = r#"{"status_code":400,"errors":[{"error":"AuthError","message":"expired"}]}"#;
        assert_eq!(decode_api_error(403, Vec::new(), body).status, 403);
    }

    #[test]
    fn api_error_keeps_unstructured_body() {
        let err = decode_api_error(502, Vec::new(), "<html>Bad Gateway</html>");
        assert!(err.errors.is_empty());
        assert_eq!(err.body.as_deref(), Some("<html>Bad Gateway</html>"));
    }

    #[test]
    fn api_error_with_blank_body() {
        let err = decode_api_error(500, Vec::new(), "  ");
        assert!(err.errors.is_empty());
        assert_eq!(err.body, None);
    }

    #[test]
    fn decode_without_wrapper() {
        let item: Item = decode_json_at(r#"{"id":"x","uri":"y"}"#, &[]).unwrap();
        assert_eq!(item.id, "x");
    }

    #[test]
    fn decode_unwraps_nested_field() {
        let items: Vec<Item> =
            decode_json_at(r#"{"templates":[{"id":"a"},{"id":"b"}]}"#, &["templates"]).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id, "b");

        let item: Item = decode_json_at(r#"{"data":{"id":"z"}}"#, &["data"]).unwrap();
        assert_eq!(item.id, "z");
    }

    #[test]
    fn decode_reports_missing_wrapper() {
        let err = decode_json_at::<Vec<Item>>(r#"{"other":[]}"#, &["templates"]).unwrap_err();
        assert!(matches!(err, DecodeError::MissingField { field } if field == "templates"));
    }

    #[test]
    fn decode_reports_malformed_json() {
        let err = decode_json_at::<Item>("{ not json }", &[]).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
