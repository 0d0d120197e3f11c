//! Result envelope and error taxonomy shared by the client, the HTTP handlers
//! and the CLI.
//!
//! Every internal response body is either `{"success": true, "data": ...}` or
//! `{"success": false, "error": {...}}`. [`ApiResult`] is the Rust side of that
//! contract and [`ApiError`] is the failure payload.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Closed set of failure classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    UpstreamError,
    NetworkError,
    Timeout,
    ApiError,
    ConfigError,
    UnknownError,
}

impl ErrorCode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::UpstreamError => "UPSTREAM_ERROR",
            Self::NetworkError => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::ApiError => "API_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Transport-level and upstream 5xx failures are worth one more attempt.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            Self::NetworkError | Self::Timeout | Self::UpstreamError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure payload carried by [`ApiResult::Failure`].
///
/// Built once where the failure happens and passed through untouched. `cause`
/// is kept for logs only and is never serialized into a response body.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{code}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
    #[serde(skip)]
    pub cause: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status_code: None,
            details: None,
            cause: None,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    /// Validation failure tagged with the offending field name.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut details = Map::new();
        details.insert("field".to_owned(), Value::String(field.to_owned()));
        Self::validation(message).with_details(details)
    }

    #[must_use]
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: Map<String, Value>) -> Self {
        self.details = Some(details);
        self
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl fmt::Display) -> Self {
        self.cause = Some(cause.to_string());
        self
    }
}

/// Discriminated success/failure envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success { data: T },
    Failure { error: ApiError },
}

impl<T> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    pub fn failure(error: ApiError) -> Self {
        Self::Failure { error }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Success { data } => ApiResult::Success { data: f(data) },
            Self::Failure { error } => ApiResult::Failure { error },
        }
    }

    /// Converts into a plain `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ApiError`] for the `Failure` variant.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }
}

impl<T> From<Result<T, ApiError>> for ApiResult<T> {
    fn from(value: Result<T, ApiError>) -> Self {
        match value {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure { error },
        }
    }
}

impl<T: Serialize> Serialize for ApiResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiResult", 2)?;
        match self {
            Self::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_serialize_screaming_snake_case() {
        let json = serde_json::to_value(ErrorCode::ValidationError).unwrap();
        assert_eq!(json, "VALIDATION_ERROR");
        let json = serde_json::to_value(ErrorCode::Timeout).unwrap();
        assert_eq!(json, "TIMEOUT");
        assert_eq!(ErrorCode::ApiError.to_string(), "API_ERROR");
    }

    #[test]
    fn success_envelope_has_data_and_no_error() {
        let json = serde_json::to_value(ApiResult::success(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn failure_envelope_omits_cause_and_empty_optionals() {
        let error = ApiError::new(ErrorCode::Timeout, "timed out").with_cause("deadline elapsed");
        let json = serde_json::to_value(ApiResult::<()>::failure(error)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": {"code": "TIMEOUT", "message": "timed out"}
            })
        );
    }

    #[test]
    fn failure_envelope_serializes_status_code_camel_case() {
        let error = ApiError::new(ErrorCode::UpstreamError, "boom").with_status(503);
        let json = serde_json::to_value(ApiResult::<()>::failure(error)).unwrap();
        assert_eq!(json["error"]["statusCode"], 503);
    }

    #[test]
    fn only_transport_and_server_errors_are_transient() {
        assert!(ErrorCode::NetworkError.is_transient());
        assert!(ErrorCode::Timeout.is_transient());
        assert!(ErrorCode::UpstreamError.is_transient());
        assert!(!ErrorCode::NotFound.is_transient());
        assert!(!ErrorCode::ApiError.is_transient());
        assert!(!ErrorCode::ConfigError.is_transient());
        assert!(!ErrorCode::UnknownError.is_transient());
    }

    #[test]
    fn into_result_round_trips_through_from() {
        let ok: ApiResult<u8> = Ok(3).into();
        assert_eq!(ok.into_result().unwrap(), 3);
        let err: ApiResult<u8> = Err(ApiError::validation("bad")).into();
        assert_eq!(
            err.into_result().unwrap_err().code,
            ErrorCode::ValidationError
        );
    }
}
