//! Shared application state.

use std::sync::Arc;

use studentphoto::{CropConfig, FaceDetector};

use crate::config::WebConfig;

/// Immutable per-process state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub detector: Arc<dyn FaceDetector>,
    pub crop_config: CropConfig,
    pub jpeg_quality: u8,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &WebConfig, detector: Arc<dyn FaceDetector>) -> Self {
        Self {
            detector,
            crop_config: config.crop,
            jpeg_quality: config.jpeg_quality,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}
