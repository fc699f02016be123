use crate::error::StudentPhotoError;
use crate::face_detector::FaceBox;

/// Portrait aspect ratio: 3:4 (width / height), as an exact fraction.
const PORTRAIT_ASPECT_NUM: u64 = 3;
const PORTRAIT_ASPECT_DEN: u64 = 4;

/// Default crop height as a multiple of the face height (head, shoulders, margin).
pub const DEFAULT_HEIGHT_MULTIPLIER: f64 = 2.5;

/// Default share of the crop height that sits above the face center.
pub const DEFAULT_VERTICAL_OFFSET: f64 = 0.45;

/// Width and height of a source image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Create dimensions from a width and height.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Crop window within the source image. `end_x`/`end_y` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRectangle {
    /// Left edge, inclusive.
    pub start_x: u32,
    /// Top edge, inclusive.
    pub start_y: u32,
    /// Right edge, exclusive.
    pub end_x: u32,
    /// Bottom edge, exclusive.
    pub end_y: u32,
}

impl CropRectangle {
    /// Window width in pixels.
    pub fn width(&self) -> u32 {
        self.end_x - self.start_x
    }

    /// Window height in pixels.
    pub fn height(&self) -> u32 {
        self.end_y - self.start_y
    }
}

/// Framing constants for the face-centered crop.
///
/// `height_multiplier` sizes the crop from the face height and
/// `vertical_offset` places the face center that fraction of the crop
/// height below the top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropConfig {
    /// Crop height divided by face height.
    pub height_multiplier: f64,
    /// Fraction of the crop height between its top edge and the face center.
    pub vertical_offset: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            height_multiplier: DEFAULT_HEIGHT_MULTIPLIER,
            vertical_offset: DEFAULT_VERTICAL_OFFSET,
        }
    }
}

impl CropConfig {
    /// Reject constants that could push the face center out of the window.
    pub fn validate(&self) -> Result<(), StudentPhotoError> {
        if !self.height_multiplier.is_finite() || self.height_multiplier <= 0.0 {
            return Err(StudentPhotoError::InvalidCropConfig(format!(
                "height multiplier must be a positive number, got {}",
                self.height_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.vertical_offset) {
            return Err(StudentPhotoError::InvalidCropConfig(format!(
                "vertical offset must be within 0.0..=1.0, got {}",
                self.vertical_offset
            )));
        }
        Ok(())
    }

    /// Target crop size `(width, height)` for a face, before any clamping.
    ///
    /// Saturates at `u32::MAX`; anything that large spans the image anyway.
    pub fn target_size(&self, face: &FaceBox) -> (u32, u32) {
        let scaled = (face.height as f64 * self.height_multiplier).floor() as u64;
        let crop_h = u32::try_from(scaled).unwrap_or(u32::MAX).max(1);
        let crop_w = (crop_h as u64 * PORTRAIT_ASPECT_NUM / PORTRAIT_ASPECT_DEN).max(1);
        (crop_w as u32, crop_h)
    }

    /// Compute the 3:4 crop window around `face`, clamped to the image.
    ///
    /// When the image is smaller than the target window on an axis the
    /// window covers that whole axis and the aspect ratio is not kept.
    pub fn compute(
        &self,
        face: &FaceBox,
        dims: ImageDimensions,
    ) -> Result<CropRectangle, StudentPhotoError> {
        self.validate()?;
        if dims.width == 0 || dims.height == 0 {
            return Err(StudentPhotoError::ZeroDimensions);
        }
        let fits = face.width > 0
            && face.height > 0
            && face.x as u64 + face.width as u64 <= dims.width as u64
            && face.y as u64 + face.height as u64 <= dims.height as u64;
        if !fits {
            return Err(StudentPhotoError::InvalidFaceBox {
                face: *face,
                width: dims.width,
                height: dims.height,
            });
        }

        let (center_x, center_y) = face.center();
        let (crop_w, crop_h) = self.target_size(face);

        let start_x = (center_x as f64 - crop_w as f64 / 2.0).floor() as i64;
        // head room is truncated before subtracting
        let start_y = center_y as i64 - (crop_h as f64 * self.vertical_offset) as i64;

        let (start_x, end_x) = clamp_axis(start_x, crop_w as i64, dims.width as i64);
        let (start_y, end_y) = clamp_axis(start_y, crop_h as i64, dims.height as i64);

        Ok(CropRectangle {
            start_x: start_x as u32,
            start_y: start_y as u32,
            end_x: end_x as u32,
            end_y: end_y as u32,
        })
    }
}

/// Crop window for `face` with the default framing constants.
pub fn compute_crop(
    face: &FaceBox,
    dims: ImageDimensions,
) -> Result<CropRectangle, StudentPhotoError> {
    CropConfig::default().compute(face, dims)
}

/// Clamp one axis of the window to `0..limit`, sliding the start back when
/// the end was cut short so the window keeps its full length if it can.
fn clamp_axis(start: i64, length: i64, limit: i64) -> (i64, i64) {
    let mut start = start.max(0);
    let end = (start + length).min(limit);
    if end - start < length {
        start = (end - length).max(0);
    }
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn centered_face_in_square_image() {
        let face = FaceBox::new(400, 300, 200, 200);
        let crop = compute_crop(&face, ImageDimensions::new(1000, 1000)).unwrap();
        assert_eq!(
            crop,
            CropRectangle {
                start_x: 312,
                start_y: 175,
                end_x: 687,
                end_y: 675,
            }
        );
        assert_eq!(crop.width(), 375);
        assert_eq!(crop.height(), 500);
    }

    #[test]
    fn target_size_truncates() {
        let config = CropConfig::default();
        // 101 * 2.5 = 252.5 -> 252, 252 * 3 / 4 = 189
        assert_eq!(config.target_size(&FaceBox::new(0, 0, 90, 101)), (189, 252));
        // 7 * 2.5 = 17.5 -> 17, 17 * 3 / 4 = 12.75 -> 12
        assert_eq!(config.target_size(&FaceBox::new(0, 0, 7, 7)), (12, 17));
    }

    #[test]
    fn head_room_is_truncated() {
        // crop 187x250, head room 250 * 0.45 = 112.5 -> 112
        let face = FaceBox::new(400, 400, 100, 100);
        let crop = compute_crop(&face, ImageDimensions::new(1000, 1000)).unwrap();
        assert_eq!(crop.start_y, 338);
        assert_eq!(crop.end_y, 588);
        assert_eq!(crop.start_x, 356);
    }

    #[rstest]
    #[case(1e300)]
    #[case(f64::MAX)]
    #[case(4_294_967_301.0)]
    fn huge_multiplier_saturates(#[case] height_multiplier: f64) {
        let config = CropConfig {
            height_multiplier,
            ..CropConfig::default()
        };
        let face = FaceBox::new(50, 50, 1, 1);
        assert_eq!(config.target_size(&face), (3_221_225_471, u32::MAX));
        let crop = config
            .compute(&face, ImageDimensions::new(100, 100))
            .unwrap();
        assert_eq!(
            crop,
            CropRectangle {
                start_x: 0,
                start_y: 0,
                end_x: 100,
                end_y: 100,
            }
        );
    }

    #[test]
    fn face_near_top_left_slides_window_in() {
        let face = FaceBox::new(0, 0, 100, 100);
        let crop = compute_crop(&face, ImageDimensions::new(800, 800)).unwrap();
        assert_eq!(crop.start_x, 0);
        assert_eq!(crop.start_y, 0);
        assert_eq!(crop.width(), 187);
        assert_eq!(crop.height(), 250);
    }

    #[test]
    fn face_near_bottom_right_slides_window_back() {
        let face = FaceBox::new(700, 700, 100, 100);
        let crop = compute_crop(&face, ImageDimensions::new(800, 800)).unwrap();
        assert_eq!(crop.end_x, 800);
        assert_eq!(crop.end_y, 800);
        assert_eq!(crop.start_x, 800 - 187);
        assert_eq!(crop.start_y, 800 - 250);
    }

    #[test]
    fn image_smaller_than_target_spans_full_axes() {
        let face = FaceBox::new(50, 40, 100, 100);
        let crop = compute_crop(&face, ImageDimensions::new(200, 180)).unwrap();
        // target is 187x250: width fits, height does not
        assert_eq!(crop.width(), 187);
        assert_eq!((crop.start_y, crop.end_y), (0, 180));
    }

    #[test]
    fn tiny_image_spans_both_axes() {
        let face = FaceBox::new(10, 10, 40, 40);
        let crop = compute_crop(&face, ImageDimensions::new(60, 60)).unwrap();
        assert_eq!(
            crop,
            CropRectangle {
                start_x: 0,
                start_y: 0,
                end_x: 60,
                end_y: 60,
            }
        );
    }

    #[test]
    fn custom_framing_constants() {
        let config = CropConfig {
            height_multiplier: 2.0,
            vertical_offset: 0.5,
        };
        let face = FaceBox::new(400, 400, 200, 200);
        let crop = config
            .compute(&face, ImageDimensions::new(1000, 1000))
            .unwrap();
        // crop 300x400 centered on (500, 500)
        assert_eq!(
            crop,
            CropRectangle {
                start_x: 350,
                start_y: 300,
                end_x: 650,
                end_y: 700,
            }
        );
    }

    #[test]
    fn face_outside_image_is_rejected() {
        let face = FaceBox::new(900, 100, 200, 200);
        let err = compute_crop(&face, ImageDimensions::new(1000, 1000)).unwrap_err();
        assert!(matches!(err, StudentPhotoError::InvalidFaceBox { .. }));
    }

    #[test]
    fn empty_face_is_rejected() {
        let face = FaceBox::new(10, 10, 0, 20);
        assert!(compute_crop(&face, ImageDimensions::new(100, 100)).is_err());
    }

    #[test]
    fn zero_dimensions_rejected() {
        let face = FaceBox::new(0, 0, 1, 1);
        let err = compute_crop(&face, ImageDimensions::new(0, 10)).unwrap_err();
        assert!(matches!(err, StudentPhotoError::ZeroDimensions));
    }

    #[rstest]
    #[case(f64::NAN, 0.45)]
    #[case(0.0, 0.45)]
    #[case(-1.0, 0.45)]
    #[case(2.5, 1.5)]
    #[case(2.5, -0.1)]
    fn invalid_config_rejected(#[case] height_multiplier: f64, #[case] vertical_offset: f64) {
        let config = CropConfig {
            height_multiplier,
            vertical_offset,
        };
        let face = FaceBox::new(10, 10, 20, 20);
        let err = config
            .compute(&face, ImageDimensions::new(100, 100))
            .unwrap_err();
        assert!(matches!(err, StudentPhotoError::InvalidCropConfig(_)));
    }

    #[rstest]
    #[case(640, 480)]
    #[case(480, 640)]
    #[case(1000, 1000)]
    #[case(97, 211)]
    #[case(3000, 4000)]
    fn window_contains_face_center_and_stays_in_bounds(#[case] width: u32, #[case] height: u32) {
        let dims = ImageDimensions::new(width, height);
        let sizes = [1, 2, 3, 7, 20, 45, 90, 150];
        for &size in &sizes {
            if size > width || size > height {
                continue;
            }
            let step = ((width - size) / 6).max(1);
            let step_y = ((height - size) / 6).max(1);
            let mut x = 0;
            while x + size <= width {
                let mut y = 0;
                while y + size <= height {
                    let face = FaceBox::new(x, y, size, size);
                    let crop = compute_crop(&face, dims).unwrap();
                    let (cx, cy) = face.center();
                    assert!(crop.start_x < crop.end_x && crop.end_x <= width, "{face:?} {crop:?}");
                    assert!(crop.start_y < crop.end_y && crop.end_y <= height, "{face:?} {crop:?}");
                    assert!(crop.start_x <= cx && cx <= crop.end_x, "{face:?} {crop:?}");
                    assert!(crop.start_y <= cy && cy <= crop.end_y, "{face:?} {crop:?}");

                    let (crop_w, crop_h) = CropConfig::default().target_size(&face);
                    if crop_w <= width {
                        assert_eq!(crop.width(), crop_w, "{face:?} {crop:?}");
                    } else {
                        assert_eq!((crop.start_x, crop.end_x), (0, width));
                    }
                    if crop_h <= height {
                        assert_eq!(crop.height(), crop_h, "{face:?} {crop:?}");
                    } else {
                        assert_eq!((crop.start_y, crop.end_y), (0, height));
                    }
                    y += step_y;
                }
                x += step;
            }
        }
    }
}
