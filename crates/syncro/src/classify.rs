//! Maps failed responses onto the [`ApiErrorKind`] taxonomy.
//!
//! Classification is a pure function of the status code and the decoded
//! body. The executor decides separately whether a classified failure is
//! retried.

use serde_json::Value;
use syncro_error::{ApiError, ApiErrorKind, FieldError};

/// Field name used for record-level validation messages.
pub const BASE_FIELD: &str = "base";

/// Classify a non-success response.
///
/// `retry_after_ms` is reported on [`ApiErrorKind::RateLimit`] errors.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use syncro::classify;
/// use syncro_error::ApiErrorKind;
///
/// let err = classify(404, json!({"error": "Not found"}), 5_000);
/// assert_eq!(err.kind, ApiErrorKind::NotFound);
/// assert_eq!(err.status, 404);
/// ```
#[track_caller]
pub fn classify(status: u16, body: Value, retry_after_ms: u64) -> ApiError {
    let kind = match status {
        401 | 403 => ApiErrorKind::Authentication,
        404 => ApiErrorKind::NotFound,
        422 => ApiErrorKind::Validation(parse_validation_errors(&body)),
        429 => ApiErrorKind::RateLimit { retry_after_ms },
        500.. => ApiErrorKind::Server,
        _ => ApiErrorKind::Generic,
    };
    ApiError::new(kind, status, body)
}

/// Extract field-level messages from a validation failure body.
///
/// Two shapes are recognized:
/// - `{"errors": {"field": ["msg", ...] | "msg"}}` gives one entry per message,
/// - `{"error": "msg"}` gives a single entry on the `base` field.
///
/// Anything else yields an empty list.
pub fn parse_validation_errors(body: &Value) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if let Some(fields) = body.get("errors").and_then(Value::as_object) {
        for (field, messages) in fields {
            match messages {
                Value::Array(list) => {
                    errors.extend(
                        list.iter()
                            .map(|message| FieldError::new(field, message_text(message))),
                    );
                }
                other => errors.push(FieldError::new(field, message_text(other))),
            }
        }
    } else if let Some(message) = body.get("error").and_then(Value::as_str) {
        errors.push(FieldError::new(BASE_FIELD, message));
    }

    errors
}

/// Decode an error body, keeping it as a JSON string when it is not JSON.
pub fn parse_error_body(bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

fn message_text(message: &Value) -> String {
    match message {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
