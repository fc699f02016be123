use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageFormat, RgbImage, RgbaImage};
use tracing::debug;

use crate::crop::{CropConfig, CropRectangle, ImageDimensions};
use crate::error::StudentPhotoError;
use crate::face_detector::{select_dominant_face, FaceDetector};
use crate::student::StudentInfo;
use crate::{ProcessedPhoto, SourceFormat};

/// Detect the input image format, accepting only JPEG and PNG.
pub(crate) fn detect_format(input: &[u8]) -> Result<SourceFormat, StudentPhotoError> {
    match image::guess_format(input) {
        Ok(ImageFormat::Jpeg) => Ok(SourceFormat::Jpeg),
        Ok(ImageFormat::Png) => Ok(SourceFormat::Png),
        Ok(_) => Err(StudentPhotoError::UnsupportedFormat),
        Err(e) => Err(StudentPhotoError::DecodeError(e.to_string())),
    }
}

/// Decode input bytes into a `DynamicImage`.
pub(crate) fn decode_image(
    input: &[u8],
) -> Result<(DynamicImage, SourceFormat), StudentPhotoError> {
    let source_format = detect_format(input)?;
    let format = match source_format {
        SourceFormat::Jpeg => ImageFormat::Jpeg,
        SourceFormat::Png => ImageFormat::Png,
    };
    let image = image::load_from_memory_with_format(input, format)
        .map_err(|e| StudentPhotoError::DecodeError(e.to_string()))?;
    Ok((image, source_format))
}

/// Cut the crop window out of the source image.
pub(crate) fn apply_crop(image: &DynamicImage, crop: &CropRectangle) -> DynamicImage {
    image.crop_imm(crop.start_x, crop.start_y, crop.width(), crop.height())
}

/// Flatten alpha channel by compositing onto a white background.
pub(crate) fn flatten_alpha(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba: RgbaImage = image.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());
    let mut rgb = RgbImage::new(width, height);

    for (x, y, pixel) in rgba.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = a as f32 / 255.0;
        let inv_alpha = 1.0 - alpha;
        let out_r = (r as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_g = (g as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        let out_b = (b as f32 * alpha + 255.0 * inv_alpha).round() as u8;
        rgb.put_pixel(x, y, image::Rgb([out_r, out_g, out_b]));
    }

    rgb
}

/// Encode an RGB image as baseline JPEG at `quality` (1..=100).
pub(crate) fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, StudentPhotoError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| StudentPhotoError::EncodeError(e.to_string()))?;
    Ok(buffer)
}

/// Full pipeline: validate → decode → detect → select → crop → flatten → encode.
///
/// Metadata is checked before the image is touched, so a form with empty
/// fields never reaches the detector.
pub(crate) fn process_pipeline(
    input: &[u8],
    student: &StudentInfo,
    crop_config: &CropConfig,
    quality: u8,
    detector: &dyn FaceDetector,
) -> Result<ProcessedPhoto, StudentPhotoError> {
    student.validate()?;
    crop_config.validate()?;

    let (decoded, source_format) = decode_image(input)?;
    let dims = ImageDimensions::new(decoded.width(), decoded.height());
    if dims.width == 0 || dims.height == 0 {
        return Err(StudentPhotoError::ZeroDimensions);
    }

    let gray = decoded.to_luma8();
    let faces = detector.detect(gray.as_raw(), dims.width, dims.height);
    debug!(
        width = dims.width,
        height = dims.height,
        faces = faces.len(),
        "face detection finished"
    );

    let face = select_dominant_face(&faces).ok_or(StudentPhotoError::NoFaceDetected)?;
    let crop = crop_config.compute(&face, dims)?;
    debug!(?face, ?crop, "computed crop window");

    let cropped = apply_crop(&decoded, &crop);
    let rgb = flatten_alpha(&cropped);
    let data = encode_jpeg(&rgb, quality)?;

    Ok(ProcessedPhoto {
        data,
        filename: student.filename(),
        width: rgb.width(),
        height: rgb.height(),
        crop,
        face,
        original_size: input.len(),
        source_format,
    })
}
