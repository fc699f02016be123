//! HTML pages rendered with maud.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use studentphoto::{ErrorKind, ProcessedPhoto};

use crate::error::WebError;
use crate::form::UploadForm;

const TITLE: &str = "學生證件照電子檔收集器";

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; max-width: 760px; margin: 2rem auto; padding: 0 1rem; color: #262730; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
label { display: block; font-size: 0.9rem; margin-top: 0.75rem; }
input[type=text] { width: 100%; box-sizing: border-box; padding: 0.45rem; }
.notice { padding: 0.75rem 1rem; border-radius: 0.4rem; margin: 1rem 0; }
.warning { background: #fffce7; color: #926c05; }
.error { background: #ffecec; color: #7d353b; }
.success { background: #e8f9ee; color: #177233; }
figure { margin: 0; }
figure img { width: 100%; }
figcaption { text-align: center; font-size: 0.85rem; color: #808495; }
.download { display: inline-block; margin-top: 1rem; padding: 0.5rem 1rem; border: 1px solid #d6d6d9; border-radius: 0.4rem; text-decoration: none; color: inherit; }
footer { margin-top: 2rem; border-top: 1px solid #e6e6e6; padding-top: 0.5rem; font-size: 0.8rem; color: #808495; }
"#;

/// Severity of a banner shown above the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    /// Banner for a failed submission.
    pub fn from_error(err: &WebError) -> Self {
        match err.kind() {
            ErrorKind::MissingMetadata => {
                let missing = match err {
                    WebError::Photo(studentphoto::StudentPhotoError::MissingMetadata(fields)) => {
                        fields.iter().map(|f| field_label(f)).collect::<Vec<_>>()
                    }
                    _ => Vec::new(),
                };
                Notice {
                    level: NoticeLevel::Warning,
                    message: format!(
                        "⚠️ 請先填寫完整的班級、座號、姓名與學號並上傳照片，才能處理照片。（缺少：{}）",
                        missing.join("、")
                    ),
                }
            }
            ErrorKind::NoFaceDetected => Notice {
                level: NoticeLevel::Error,
                message: "❌ 無法偵測到人臉，請更換一張光線清晰、正面的照片。".to_string(),
            },
            ErrorKind::UnexpectedFailure => Notice {
                level: NoticeLevel::Error,
                message: format!("發生錯誤：{err}"),
            },
        }
    }
}

fn field_label(field: &str) -> &'static str {
    match field {
        "class" => "班級",
        "seat" => "座號",
        "name" => "姓名",
        "id" => "學號",
        "photo" => "照片",
        _ => "欄位",
    }
}

fn layout(body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="zh-Hant" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (TITLE) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "📸 " (TITLE) }
                p { "請輸入基本資料並上傳照片，系統將自動裁切為 " strong { "3:4 證件照比例" } "。" }
                (body)
                footer { "隱私聲明：此程式僅在本地端運作。" }
            }
        }
    }
}

fn text_input(name: &str, label: &str, placeholder: &str, value: &str) -> Markup {
    html! {
        label for=(name) { (label) }
        input type="text" id=(name) name=(name) placeholder=(placeholder) value=(value);
    }
}

/// The upload form, optionally with a banner and previously entered values.
pub fn form_page(form: &UploadForm, notice: Option<&Notice>) -> Markup {
    layout(html! {
        @if let Some(notice) = notice {
            @let class = match notice.level {
                NoticeLevel::Warning => "notice warning",
                NoticeLevel::Error => "notice error",
            };
            div class=(class) role="alert" { (notice.message) }
        }
        form method="post" action="/process" enctype="multipart/form-data" {
            div class="columns" {
                div {
                    (text_input("class", "班級", "例如：101", &form.class))
                    (text_input("seat", "座號", "例如：01", &form.seat))
                }
                div {
                    (text_input("name", "姓名", "王小明", &form.name))
                    (text_input("id", "學號", "112001", &form.id))
                }
            }
            label for="photo" { "上傳照片 (支援 JPG, PNG)" }
            input type="file" id="photo" name="photo" accept=".jpg,.jpeg,.png,image/jpeg,image/png";
            p { button type="submit" { "處理照片" } }
        }
    })
}

fn data_uri(mime: &str, data: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(data))
}

/// Success page: both previews plus the download link.
pub fn result_page(form: &UploadForm, original: &[u8], photo: &ProcessedPhoto) -> Markup {
    let processed_uri = data_uri("image/jpeg", &photo.data);
    layout(html! {
        div class="notice success" { "✅ 照片處理完成！" }
        div class="columns" {
            figure {
                img src=(data_uri(photo.source_format.mime_type(), original)) alt="原始照片";
                figcaption { "原始照片" }
            }
            figure {
                img src=(processed_uri) alt="自動裁切 (3:4)";
                figcaption { "自動裁切 (3:4)" }
            }
        }
        a class="download" href=(processed_uri) download=(photo.filename) {
            "📥 下載處理後的照片"
        }
        p { (photo.filename) " · " (photo.width) "×" (photo.height) }
        details {
            summary { "重新上傳" }
            (form_fields_only(form))
        }
    })
}

fn form_fields_only(form: &UploadForm) -> Markup {
    html! {
        form method="post" action="/process" enctype="multipart/form-data" {
            input type="hidden" name="class" value=(form.class);
            input type="hidden" name="seat" value=(form.seat);
            input type="hidden" name="name" value=(form.name);
            input type="hidden" name="id" value=(form.id);
            label for="photo" { "上傳照片 (支援 JPG, PNG)" }
            input type="file" id="photo" name="photo" accept=".jpg,.jpeg,.png,image/jpeg,image/png";
            p { button type="submit" { "處理照片" } }
        }
    }
}
