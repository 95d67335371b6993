use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use facegate::{EnrollmentError, ExtractError, MatchError, PipelineError};

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No face detected in the image. Please upload a photo with a clear face.")]
    NoFaceDetected,

    #[error("Face verification failed: no enrolled identity matched")]
    VerificationFailed,

    #[error("Invalid or expired session token")]
    InvalidToken,

    #[error("Identity {0:?} is already enrolled")]
    DuplicateIdentity(String),

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Enrollment error: {0}")]
    Enrollment(EnrollmentError),

    #[error("Match error: {0}")]
    Match(#[from] MatchError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::NoFaceDetected => StatusCode::BAD_REQUEST,
            ServerError::VerificationFailed | ServerError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::DuplicateIdentity(_) => StatusCode::CONFLICT,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Extract(_) | ServerError::Match(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Enrollment(_) | ServerError::Internal(_) | ServerError::Config(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NoFaceDetected => "NO_FACE_DETECTED",
            ServerError::VerificationFailed => "VERIFICATION_FAILED",
            ServerError::InvalidToken => "INVALID_TOKEN",
            ServerError::DuplicateIdentity(_) => "DUPLICATE_IDENTITY",
            ServerError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ServerError::Extract(_) => "EXTRACT_ERROR",
            ServerError::Enrollment(_) => "ENROLLMENT_ERROR",
            ServerError::Match(_) => "MATCH_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code().to_string();
        let message = self.to_string();

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for ServerError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NoFaceDetected => ServerError::NoFaceDetected,
            PipelineError::Extract(e) => ServerError::Extract(e),
            PipelineError::Enrollment(EnrollmentError::DuplicateIdentity(id)) => {
                ServerError::DuplicateIdentity(id)
            }
            PipelineError::Enrollment(e) => ServerError::Enrollment(e),
            PipelineError::Match(e) => ServerError::Match(e),
        }
    }
}

impl From<EnrollmentError> for ServerError {
    fn from(err: EnrollmentError) -> Self {
        match err {
            EnrollmentError::DuplicateIdentity(id) => ServerError::DuplicateIdentity(id),
            other => ServerError::Enrollment(other),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ServerError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        ServerError::BadRequest(format!("Malformed multipart payload: {err}"))
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
