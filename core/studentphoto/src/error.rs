use thiserror::Error;

use crate::face_detector::FaceBox;

/// Everything that can go wrong between upload and download.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StudentPhotoError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingMetadata(Vec<&'static str>),

    #[error("no face detected, please upload a clearer frontal photo")]
    NoFaceDetected,

    #[error("face box {face:?} does not fit in a {width}x{height} image")]
    InvalidFaceBox {
        face: FaceBox,
        width: u32,
        height: u32,
    },

    #[error("invalid crop config: {0}")]
    InvalidCropConfig(String),

    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("unsupported image format, expected JPEG or PNG")]
    UnsupportedFormat,

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("jpeg quality must be between 1 and 100, got {0}")]
    InvalidQuality(u8),

    #[error("failed to load face model: {0}")]
    ModelLoad(String),
}

/// User-facing classification of a [`StudentPhotoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required form field was left empty. Nothing was decoded.
    MissingMetadata,
    /// The detector returned no candidates.
    NoFaceDetected,
    /// Anything else: corrupt input, encoder failure, bad configuration.
    UnexpectedFailure,
}

impl StudentPhotoError {
    /// Which of the three user-facing categories this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudentPhotoError::MissingMetadata(_) => ErrorKind::MissingMetadata,
            StudentPhotoError::NoFaceDetected => ErrorKind::NoFaceDetected,
            _ => ErrorKind::UnexpectedFailure,
        }
    }
}

impl ErrorKind {
    /// Stable machine-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingMetadata => "missing_metadata",
            ErrorKind::NoFaceDetected => "no_face_detected",
            ErrorKind::UnexpectedFailure => "unexpected_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_metadata_lists_fields() {
        let err = StudentPhotoError::MissingMetadata(vec!["class", "name"]);
        assert_eq!(err.to_string(), "missing required fields: class, name");
        assert_eq!(err.kind(), ErrorKind::MissingMetadata);
    }

    #[test]
    fn decode_failures_are_unexpected() {
        let err = StudentPhotoError::DecodeError("truncated".into());
        assert_eq!(err.kind(), ErrorKind::UnexpectedFailure);
        assert_eq!(err.kind().as_str(), "unexpected_failure");
    }

    #[test]
    fn no_face_kind() {
        assert_eq!(
            StudentPhotoError::NoFaceDetected.kind(),
            ErrorKind::NoFaceDetected
        );
    }
}
