/// Bounding box of a detected face, in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
    /// X coordinate of the top-left corner.
    pub x: u32,
    /// Y coordinate of the top-left corner.
    pub y: u32,
    /// Width of the box.
    pub width: u32,
    /// Height of the box.
    pub height: u32,
}

impl FaceBox {
    /// Create a face box from its top-left corner and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a face box from raw detector output, clipping it to the image.
    ///
    /// Detectors can report boxes that start at negative coordinates or run
    /// past the right/bottom edge. Returns `None` if nothing of the box is
    /// left inside the image.
    pub fn clipped(
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(image_width as i64);
        let y1 = (y + height).min(image_height as i64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    /// Box area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Face center, using integer division.
    pub fn center(&self) -> (u32, u32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Pick the face with the largest area. Ties go to the earliest candidate.
pub fn select_dominant_face(faces: &[FaceBox]) -> Option<FaceBox> {
    faces.iter().copied().reduce(|best, face| {
        if face.area() > best.area() {
            face
        } else {
            best
        }
    })
}

/// Pluggable face detection backend.
///
/// Implement this trait to provide a custom face detector and pass it to
/// [`crate::PhotoProcessor::face_detector`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    fn detect(&self, gray: &[u8], width: u32, height: u32) -> Vec<FaceBox>;
}
