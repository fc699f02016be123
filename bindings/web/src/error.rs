//! Web error types.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use studentphoto::{ErrorKind, StudentPhotoError};
use thiserror::Error;

pub type WebResult<T> = Result<T, WebError>;

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Photo(#[from] StudentPhotoError),

    #[error("invalid upload: {0}")]
    Upload(#[from] MultipartError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// User-facing category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WebError::Photo(e) => e.kind(),
            WebError::Upload(_) | WebError::Internal(_) => ErrorKind::UnexpectedFailure,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Photo(e) => match e {
                StudentPhotoError::MissingMetadata(_) | StudentPhotoError::NoFaceDetected => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                StudentPhotoError::DecodeError(_)
                | StudentPhotoError::UnsupportedFormat
                | StudentPhotoError::ZeroDimensions
                | StudentPhotoError::InvalidFaceBox { .. } => StatusCode::BAD_REQUEST,
                StudentPhotoError::InvalidCropConfig(_)
                | StudentPhotoError::EncodeError(_)
                | StudentPhotoError::InvalidQuality(_)
                | StudentPhotoError::ModelLoad(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            WebError::Upload(e) => e.status(),
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    kind: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<&'static str>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let missing = match &self {
            WebError::Photo(StudentPhotoError::MissingMetadata(fields)) => fields.clone(),
            _ => Vec::new(),
        };
        let body = ErrorResponse {
            kind: self.kind().as_str(),
            detail: self.to_string(),
            missing,
        };

        (status, Json(body)).into_response()
    }
}
