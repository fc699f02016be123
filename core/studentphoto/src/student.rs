use crate::error::StudentPhotoError;

/// Identifying metadata entered alongside the photo.
///
/// Built once at the request boundary and passed by value; the crop
/// calculation never sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentInfo {
    /// Class, e.g. `101`.
    pub class: String,
    /// Seat number, e.g. `01`.
    pub seat: String,
    /// Student name.
    pub name: String,
    /// Student ID, e.g. `112001`.
    pub id: String,
}

impl StudentInfo {
    /// Build from raw form values. Surrounding whitespace is dropped.
    pub fn new(
        class: impl Into<String>,
        seat: impl Into<String>,
        name: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        fn clean(value: impl Into<String>) -> String {
            value.into().trim().to_string()
        }
        Self {
            class: clean(class),
            seat: clean(seat),
            name: clean(name),
            id: clean(id),
        }
    }

    /// Names of the fields that are empty or whitespace-only, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("class", &self.class),
            ("seat", &self.seat),
            ("name", &self.name),
            ("id", &self.id),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Fail with [`StudentPhotoError::MissingMetadata`] if any field is empty.
    pub fn validate(&self) -> Result<(), StudentPhotoError> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(StudentPhotoError::MissingMetadata(missing))
        }
    }

    /// Download filename: `{class}_{seat}_{name}_{id}.jpg`.
    ///
    /// Path separators and control characters become `_` so the result is
    /// always a single path component.
    pub fn filename(&self) -> String {
        format!(
            "{}_{}_{}_{}.jpg",
            filename_part(&self.class),
            filename_part(&self.seat),
            filename_part(&self.name),
            filename_part(&self.id)
        )
    }
}

fn filename_part(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
