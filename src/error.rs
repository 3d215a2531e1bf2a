//! Mimir error types

use reqwest::StatusCode;

/// Mimir error types
#[derive(Debug, thiserror::Error)]
pub enum MimirError {
    // Configuration errors
    #[error("origin host is not configured (set [origin] host or MIMIR_ORIGIN_HOST)")]
    MissingOrigin,

    #[error("configuration error: {0}")]
    Configuration(String),

    // Request errors
    #[error("invalid request target: {0}")]
    InvalidUrl(String),

    // Origin/network errors
    #[error("origin transport error: {0}")]
    OriginTransport(String),

    #[error("origin body error: {0}")]
    Body(String),

    // Object store errors
    #[error("object store error: {0}")]
    Store(String),
}

impl MimirError {
    /// Status code of the error response built for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            MimirError::MissingOrigin | MimirError::Configuration(_) | MimirError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            MimirError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            MimirError::OriginTransport(_) | MimirError::Body(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<reqwest::Error> for MimirError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_body() || err.is_decode() {
            MimirError::Body(err.to_string())
        } else {
            MimirError::OriginTransport(err.to_string())
        }
    }
}

impl From<url::ParseError> for MimirError {
    fn from(err: url::ParseError) -> Self {
        MimirError::InvalidUrl(err.to_string())
    }
}

/// Result type alias for Mimir operations
pub type Result<T> = std::result::Result<T, MimirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_origin_names_the_setting() {
        let msg = MimirError::MissingOrigin.to_string();
        assert!(msg.contains("not configured"));
        assert!(msg.contains("MIMIR_ORIGIN_HOST"));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            MimirError::MissingOrigin.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            MimirError::InvalidUrl("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MimirError::OriginTransport("refused".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            MimirError::Store("gone".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn url_parse_error_is_invalid_url() {
        let err: MimirError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, MimirError::InvalidUrl(_)));
    }
}
