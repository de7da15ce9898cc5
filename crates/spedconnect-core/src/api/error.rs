use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized - session is missing or expired")]
    Unauthorized(String),

    #[error("Access denied: {}", truncate_body(.0))]
    AccessDenied(String),

    #[error("Resource not found: {}", truncate_body(.0))]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited(String),

    #[error("Server error {status}: {}", truncate_body(.body))]
    ServerError { status: StatusCode, body: String },

    #[error("Unexpected status {status}: {}", truncate_body(.body))]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid authorization header value")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let body = body.to_string();
        match status.as_u16() {
            401 => ApiError::Unauthorized(body),
            403 => ApiError::AccessDenied(body),
            404 => ApiError::NotFound(body),
            429 => ApiError::RateLimited(body),
            500..=599 => ApiError::ServerError { status, body },
            _ => ApiError::UnexpectedStatus { status, body },
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            ApiError::AccessDenied(_) => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound(_) => Some(StatusCode::NOT_FOUND),
            ApiError::RateLimited(_) => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::ServerError { status, .. } | ApiError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            ApiError::Network(e) => e.status(),
            ApiError::InvalidUrl(_)
            | ApiError::InvalidHeader(_)
            | ApiError::Encode(_)
            | ApiError::InvalidResponse(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    /// Raw response body for status errors.
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized(body)
            | ApiError::AccessDenied(body)
            | ApiError::NotFound(body)
            | ApiError::RateLimited(body)
            | ApiError::ServerError { body, .. }
            | ApiError::UnexpectedStatus { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The backend's human readable message, if the error body carries one.
    ///
    /// The API reports failures as `{"data": {"message": "..."}}`; a flat
    /// `{"message": "..."}` is accepted as well.
    pub fn server_message(&self) -> Option<String> {
        let value: serde_json::Value = serde_json::from_str(self.body()?).ok()?;
        value
            .pointer("/data/message")
            .or_else(|| value.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    }
}
