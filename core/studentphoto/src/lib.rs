//! Student ID photos: find the dominant face in an upload and crop a 3:4
//! portrait around it, named after the student.
//!
//! # Example
//!
//! ```no_run
//! use studentphoto::{PhotoProcessor, RustfaceDetector, StudentInfo};
//!
//! let detector = RustfaceDetector::from_path("model/seeta_fd_frontal_v1.0.bin").unwrap();
//! let raw_bytes = std::fs::read("photo.jpg").unwrap();
//! let student = StudentInfo::new("101", "01", "王小明", "112001");
//!
//! let photo = PhotoProcessor::new(raw_bytes)
//!     .unwrap()
//!     .face_detector(std::sync::Arc::new(detector))
//!     .process(&student)
//!     .unwrap();
//! std::fs::write(&photo.filename, &photo.data).unwrap();
//! ```
#![warn(missing_docs)]

mod crop;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
mod process;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;
mod student;

use std::sync::Arc;

/// Crop-window calculation and framing constants.
pub use crop::{
    compute_crop, CropConfig, CropRectangle, ImageDimensions, DEFAULT_HEIGHT_MULTIPLIER,
    DEFAULT_VERTICAL_OFFSET,
};
/// Error type returned by studentphoto operations, and its user-facing kind.
pub use error::{ErrorKind, StudentPhotoError};
/// Face detection trait, face bounding-box type and dominant-face selection.
pub use face_detector::{select_dominant_face, FaceBox, FaceDetector};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model.
pub use rustface_backend::RustfaceDetector;
/// Student metadata attached to each photo.
pub use student::StudentInfo;

/// Default JPEG quality for the exported portrait.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Container format of the uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// JPEG / JFIF.
    Jpeg,
    /// PNG, possibly with an alpha channel.
    Png,
}

impl SourceFormat {
    /// MIME type of the format, for previews.
    pub fn mime_type(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "image/jpeg",
            SourceFormat::Png => "image/png",
        }
    }
}

/// Result of processing one upload.
#[derive(Debug, Clone)]
pub struct ProcessedPhoto {
    /// The cropped portrait, JPEG-encoded.
    pub data: Vec<u8>,

    /// Download filename built from the student metadata.
    pub filename: String,

    /// Width of the output image in pixels.
    pub width: u32,

    /// Height of the output image in pixels.
    pub height: u32,

    /// Crop window in source image coordinates.
    pub crop: CropRectangle,

    /// The dominant face the crop was centered on, in source coordinates.
    pub face: FaceBox,

    /// Size of the original input in bytes.
    pub original_size: usize,

    /// Format the original input was decoded from.
    pub source_format: SourceFormat,
}

/// Builder for turning an uploaded photo into a cropped ID portrait.
///
/// Checks the input format on construction; decoding, detection and
/// cropping happen in [`PhotoProcessor::process`].
pub struct PhotoProcessor {
    input: Vec<u8>,
    quality: u8,
    crop_config: CropConfig,
    detector: Option<Arc<dyn FaceDetector>>,
}

impl PhotoProcessor {
    /// Create a processor from raw image bytes (JPEG or PNG).
    pub fn new(input: Vec<u8>) -> Result<Self, StudentPhotoError> {
        process::detect_format(&input)?;

        Ok(Self {
            input,
            quality: DEFAULT_JPEG_QUALITY,
            crop_config: CropConfig::default(),
            detector: None,
        })
    }

    /// Set the JPEG quality, 1 (lowest) to 100 (highest). Default: 95.
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Override the framing constants (default: 2.5× face height, face
    /// center 45% down the crop).
    pub fn crop_config(mut self, config: CropConfig) -> Self {
        self.crop_config = config;
        self
    }

    /// Provide the face detector.
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use studentphoto::{FaceBox, FaceDetector, PhotoProcessor, StudentInfo};
    ///
    /// struct MyDetector;
    /// impl FaceDetector for MyDetector {
    ///     fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBox> {
    ///         vec![]
    ///     }
    /// }
    ///
    /// let bytes = std::fs::read("photo.png").unwrap();
    /// let student = StudentInfo::new("101", "01", "王小明", "112001");
    /// let result = PhotoProcessor::new(bytes).unwrap()
    ///     .face_detector(Arc::new(MyDetector))
    ///     .process(&student);
    /// ```
    pub fn face_detector(mut self, detector: Arc<dyn FaceDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Validate the metadata, detect the dominant face, crop and encode.
    ///
    /// Without an explicit detector the built-in SeetaFace backend is not
    /// loaded implicitly (it needs a model file), so this fails with
    /// [`StudentPhotoError::ModelLoad`].
    pub fn process(&self, student: &StudentInfo) -> Result<ProcessedPhoto, StudentPhotoError> {
        student.validate()?;
        if self.quality == 0 || self.quality > 100 {
            return Err(StudentPhotoError::InvalidQuality(self.quality));
        }
        let detector = self
            .detector
            .as_deref()
            .ok_or_else(|| StudentPhotoError::ModelLoad("no face detector configured".into()))?;

        process::process_pipeline(
            &self.input,
            student,
            &self.crop_config,
            self.quality,
            detector,
        )
    }

    /// Hand the input bytes back, e.g. to show the original next to the crop.
    pub fn into_input(self) -> Vec<u8> {
        self.input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CenterDetector;

    impl FaceDetector for CenterDetector {
        fn detect(&self, _gray: &[u8], width: u32, height: u32) -> Vec<FaceBox> {
            let size = width.min(height) / 5;
            vec![FaceBox::new(
                (width - size) / 2,
                (height - size) / 2,
                size,
                size,
            )]
        }
    }

    fn make_test_png(width: u32, height: u32) -> Vec<u8> {
        use image::codecs::png::PngEncoder;
        use image::ImageEncoder;
        use image::RgbImage;

        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = image::Rgb([
                (x * 255 / width.max(1)) as u8,
                (y * 255 / height.max(1)) as u8,
                128,
            ]);
        }
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new(&mut buffer);
        encoder
            .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
            .unwrap();
        buffer
    }

    fn student() -> StudentInfo {
        StudentInfo::new("101", "01", "王小明", "112001")
    }

    #[test]
    fn builder_defaults() {
        let png = make_test_png(400, 600);
        let result = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector))
            .process(&student())
            .unwrap();
        // face 80x80 → crop 150x200
        assert_eq!((result.width, result.height), (150, 200));
        assert_eq!(result.data[0], 0xFF);
        assert_eq!(result.data[1], 0xD8);
        assert_eq!(result.filename, "101_01_王小明_112001.jpg");
    }

    #[test]
    fn builder_with_crop_config() {
        let png = make_test_png(400, 600);
        let result = PhotoProcessor::new(png)
            .unwrap()
            .crop_config(CropConfig {
                height_multiplier: 2.0,
                vertical_offset: 0.5,
            })
            .face_detector(Arc::new(CenterDetector))
            .process(&student())
            .unwrap();
        assert_eq!((result.width, result.height), (120, 160));
    }

    #[test]
    fn builder_invalid_quality() {
        let png = make_test_png(100, 100);
        let processor = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector));
        assert!(matches!(
            processor.quality(0).process(&student()),
            Err(StudentPhotoError::InvalidQuality(0))
        ));
    }

    #[test]
    fn builder_quality_above_range() {
        let png = make_test_png(100, 100);
        let result = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector))
            .quality(101)
            .process(&student());
        assert!(matches!(result, Err(StudentPhotoError::InvalidQuality(101))));
    }

    #[test]
    fn builder_without_detector() {
        let png = make_test_png(100, 100);
        let err = PhotoProcessor::new(png)
            .unwrap()
            .process(&student())
            .unwrap_err();
        assert!(matches!(err, StudentPhotoError::ModelLoad(_)));
        assert_eq!(err.kind(), ErrorKind::UnexpectedFailure);
    }

    #[test]
    fn missing_metadata_wins_over_missing_detector() {
        let png = make_test_png(100, 100);
        let err = PhotoProcessor::new(png)
            .unwrap()
            .process(&StudentInfo::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingMetadata);
    }

    #[test]
    fn builder_invalid_input() {
        let result = PhotoProcessor::new(b"not an image".to_vec());
        assert!(result.is_err());
    }

    #[test]
    fn original_size_is_preserved() {
        let png = make_test_png(200, 300);
        let original_len = png.len();
        let result = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector))
            .process(&student())
            .unwrap();
        assert_eq!(result.original_size, original_len);
        assert_eq!(result.source_format, SourceFormat::Png);
        assert_eq!(result.source_format.mime_type(), "image/png");
    }

    #[test]
    fn input_is_handed_back_untouched() {
        let png = make_test_png(120, 160);
        let buffer = png.as_ptr();
        let processor = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector));
        processor.process(&student()).unwrap();
        let input = processor.into_input();
        assert_eq!(input.as_ptr(), buffer);
    }

    #[test]
    fn processing_is_repeatable() {
        let png = make_test_png(300, 300);
        let processor = PhotoProcessor::new(png)
            .unwrap()
            .face_detector(Arc::new(CenterDetector));
        let first = processor.process(&student()).unwrap();
        let second = processor.process(&student()).unwrap();
        assert_eq!(first.crop, second.crop);
        assert_eq!(first.data, second.data);
    }
}
