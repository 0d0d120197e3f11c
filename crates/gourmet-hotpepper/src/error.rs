use gourmet_core::{ApiError, ErrorCode};
use serde_json::{Map, Value};
use thiserror::Error;

/// Transport and protocol failures inside the HotPepper client.
///
/// Never crosses the crate boundary as-is: [`HotpepperError::into_api_error`]
/// turns it into the shared [`ApiError`] taxonomy.
#[derive(Debug, Error)]
pub enum HotpepperError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("HotPepper returned HTTP {status} for {url}")]
    Status {
        status: u16,
        body: String,
        /// Request URL with the API key masked.
        url: String,
    },

    /// The body was not JSON or lacked the `results` wrapper.
    #[error("unexpected HotPepper response from {endpoint}: {reason}")]
    Envelope {
        endpoint: &'static str,
        reason: String,
    },

    /// HotPepper reported an error inside an otherwise successful response.
    #[error("HotPepper rejected the request: {message}")]
    Rejected { message: String },

    /// `results` did not match the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl HotpepperError {
    /// HTTP status reported by the API, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::Timeout,
            Self::Http(e) => match e.status() {
                Some(status) => code_for_status(status.as_u16()),
                None if e.is_builder() => ErrorCode::UnknownError,
                None => ErrorCode::NetworkError,
            },
            Self::Status { status, .. } => code_for_status(*status),
            Self::Rejected { .. } => ErrorCode::ApiError,
            Self::Envelope { .. } | Self::Deserialize { .. } | Self::InvalidBaseUrl { .. } => {
                ErrorCode::UnknownError
            }
        }
    }

    pub fn into_api_error(self) -> ApiError {
        let code = self.code();
        let status = self.status();
        let message = match &self {
            Self::Rejected { message } => format!("HotPepper API rejected the request: {message}"),
            Self::Envelope { .. } | Self::Deserialize { .. } => {
                "unexpected response format from HotPepper API".to_owned()
            }
            _ => message_for(code, status),
        };

        let mut error = ApiError::new(code, message).with_cause(&self);
        if let Some(status) = status {
            error = error.with_status(status);
        }
        if let Self::Status { body, url, .. } = self {
            let mut details = Map::new();
            let data = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
            details.insert("data".to_owned(), data);
            details.insert("url".to_owned(), Value::String(url));
            error = error.with_details(details);
        }
        error
    }
}

/// Maps an upstream HTTP status onto the error taxonomy.
pub fn code_for_status(status: u16) -> ErrorCode {
    match status {
        404 => ErrorCode::NotFound,
        400..=499 => ErrorCode::ApiError,
        500.. => ErrorCode::UpstreamError,
        _ => ErrorCode::UnknownError,
    }
}

fn message_for(code: ErrorCode, status: Option<u16>) -> String {
    match code {
        ErrorCode::NotFound => "HotPepper API resource was not found".to_owned(),
        ErrorCode::ApiError => "HotPepper API rejected the request".to_owned(),
        ErrorCode::UpstreamError => "HotPepper API returned a server error".to_owned(),
        ErrorCode::NetworkError => "failed to connect to HotPepper API".to_owned(),
        ErrorCode::Timeout => "HotPepper API request timed out".to_owned(),
        _ => status.map_or_else(
            || "unexpected error calling HotPepper API".to_owned(),
            |s| format!("HotPepper API error (status: {s})"),
        ),
    }
}

pub(crate) fn config_error() -> ApiError {
    ApiError::new(
        ErrorCode::ConfigError,
        "HotPepper API key is not configured (HOTPEPPER_API_KEY)",
    )
}
