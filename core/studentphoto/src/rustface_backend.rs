use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::StudentPhotoError;
use crate::face_detector::{FaceBox, FaceDetector};

const MIN_FACE_SIZE: u32 = 20;

/// Face detector backed by the `rustface` crate (SeetaFace frontal engine).
///
/// The model is loaded once; each call to [`FaceDetector::detect`] builds a
/// fresh detector from a clone of it, so one instance can be shared across
/// threads.
pub struct RustfaceDetector {
    model: rustface::Model,
    min_face_size: u32,
}

impl RustfaceDetector {
    /// Load the SeetaFace model from a file such as `seeta_fd_frontal_v1.0.bin`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, StudentPhotoError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| StudentPhotoError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load the SeetaFace model from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, StudentPhotoError> {
        let model =
            rustface::read_model(reader).map_err(|e| StudentPhotoError::ModelLoad(e.to_string()))?;
        Ok(Self {
            model,
            min_face_size: MIN_FACE_SIZE,
        })
    }

    /// Smallest face edge, in pixels, the detector will report.
    /// SeetaFace cannot go below 20, which is also the default.
    pub fn min_face_size(mut self, size: u32) -> Self {
        self.min_face_size = size.max(MIN_FACE_SIZE);
        self
    }
}

impl FaceDetector for RustfaceDetector {
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBox> {
        if width.min(height) < self.min_face_size {
            return Vec::new();
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        faces
            .iter()
            .filter_map(|face| {
                let bbox = face.bbox();
                FaceBox::clipped(
                    bbox.x() as i64,
                    bbox.y() as i64,
                    bbox.width() as i64,
                    bbox.height() as i64,
                    width,
                    height,
                )
            })
            .collect()
    }
}
