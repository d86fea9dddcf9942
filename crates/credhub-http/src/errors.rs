//! Error type and conversions.
use axum::response::IntoResponse;
use axum::Json;
use credhub_core::service::CredentialServiceError;
use hyper::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Credhub HTTP error type.
///
/// The message is what callers see. It only ever contains sanitized caller input; the
/// collaborator error is kept as the source.
#[derive(Error, Debug)]
pub enum CredhubHTTPError {
    /// Client-correctable request error.
    #[error("{message}")]
    BadRequest {
        message: String,
        #[source]
        source: Option<CredentialServiceError>,
    },
    /// Credential service failure.
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: CredentialServiceError,
    },
    /// Server configuration could not be loaded.
    #[error("Failed to load configuration: {0}")]
    Config(String),
}

impl CredhubHTTPError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        CredhubHTTPError::BadRequest {
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, source: CredentialServiceError) -> Self {
        CredhubHTTPError::BadRequest {
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn internal(message: impl Into<String>, source: CredentialServiceError) -> Self {
        CredhubHTTPError::Internal {
            message: message.into(),
            source,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CredhubHTTPError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            CredhubHTTPError::Internal { .. } | CredhubHTTPError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Make CredhubHTTPError suitable for axum responses.
impl IntoResponse for CredhubHTTPError {
    fn into_response(self) -> axum::response::Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}
