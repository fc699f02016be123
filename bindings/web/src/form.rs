//! Multipart form parsing.

use axum::extract::Multipart;
use studentphoto::{StudentInfo, StudentPhotoError};
use tracing::debug;

use crate::error::WebResult;

/// Everything submitted with one upload, as entered.
#[derive(Debug, Clone, Default)]
pub struct UploadForm {
    pub class: String,
    pub seat: String,
    pub name: String,
    pub id: String,
    pub photo: Option<Vec<u8>>,
}

impl UploadForm {
    /// Read the form fields from a multipart body. Unknown fields are skipped,
    /// and an empty file part counts as no photo.
    pub async fn from_multipart(mut multipart: Multipart) -> WebResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "class" => form.class = field.text().await?,
                "seat" => form.seat = field.text().await?,
                "name" => form.name = field.text().await?,
                "id" => form.id = field.text().await?,
                "photo" => {
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        form.photo = Some(bytes.to_vec());
                    }
                }
                other => debug!(field = other, "ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    pub fn student(&self) -> StudentInfo {
        StudentInfo::new(&self.class, &self.seat, &self.name, &self.id)
    }

    /// Check that every text field and the photo are present, then move the
    /// photo out of the form.
    ///
    /// All gaps are reported together, text fields first in form order and
    /// `photo` last. On error the form is left untouched.
    pub fn take_submission(&mut self) -> Result<(StudentInfo, Vec<u8>), StudentPhotoError> {
        let student = self.student();
        let mut missing = student.missing_fields();
        if self.photo.is_none() {
            missing.push("photo");
        }
        if !missing.is_empty() {
            return Err(StudentPhotoError::MissingMetadata(missing));
        }
        let photo = self
            .photo
            .take()
            .ok_or_else(|| StudentPhotoError::MissingMetadata(vec!["photo"]))?;
        Ok((student, photo))
    }
}
