//! Request handlers.

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};
use maud::Markup;
use studentphoto::{PhotoProcessor, ProcessedPhoto, StudentInfo, StudentPhotoError};
use tracing::{info, warn};

use crate::error::{WebError, WebResult};
use crate::form::UploadForm;
use crate::pages::{self, Notice};
use crate::state::AppState;

pub async fn health() -> &'static str {
    "ok"
}

pub async fn index() -> Markup {
    pages::form_page(&UploadForm::default(), None)
}

/// Form submission: render the result page, or the form again with a banner.
pub async fn process_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match UploadForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return render_failure(&UploadForm::default(), e),
    };

    let (student, photo) = match form.take_submission() {
        Ok(submission) => submission,
        Err(e) => return render_failure(&form, e.into()),
    };

    match run_pipeline(&state, student, photo).await {
        Ok((processed, original)) => {
            pages::result_page(&form, &original, &processed).into_response()
        }
        Err(e) => render_failure(&form, e),
    }
}

/// Programmatic endpoint: the cropped JPEG as an attachment.
pub async fn api_crop(
    State(state): State<AppState>,
    multipart: Multipart,
) -> WebResult<Response> {
    let mut form = UploadForm::from_multipart(multipart).await?;
    let (student, photo) = form.take_submission()?;
    let (processed, _) = run_pipeline(&state, student, photo).await?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("image/jpeg")),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&processed.filename),
            ),
        ],
        processed.data,
    )
        .into_response())
}

fn render_failure(form: &UploadForm, err: WebError) -> Response {
    warn!(kind = err.kind().as_str(), error = %err, "photo request failed");
    let notice = Notice::from_error(&err);
    (err.status_code(), pages::form_page(form, Some(&notice))).into_response()
}

/// Decode, detect and crop on the blocking pool. The upload is moved into the
/// worker and handed back alongside the result.
async fn run_pipeline(
    state: &AppState,
    student: StudentInfo,
    photo: Vec<u8>,
) -> WebResult<(ProcessedPhoto, Vec<u8>)> {
    let detector = state.detector.clone();
    let crop_config = state.crop_config;
    let quality = state.jpeg_quality;

    let (processed, original) =
        tokio::task::spawn_blocking(move || -> Result<_, StudentPhotoError> {
            let processor = PhotoProcessor::new(photo)?
                .crop_config(crop_config)
                .quality(quality)
                .face_detector(detector);
            let processed = processor.process(&student)?;
            Ok((processed, processor.into_input()))
        })
        .await
        .map_err(|e| WebError::internal(format!("photo worker failed: {e}")))??;

    info!(
        width = processed.width,
        height = processed.height,
        crop = ?processed.crop,
        bytes = processed.data.len(),
        "photo processed"
    );
    Ok((processed, original))
}

/// `attachment` disposition with an ASCII fallback and the UTF-8 name.
fn content_disposition(filename: &str) -> HeaderValue {
    let fallback: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let value = format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
