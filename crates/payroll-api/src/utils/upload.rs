//! Multipart form reading for upload handlers

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use payroll_core::models::UploadedFile;
use payroll_core::AppError;
use std::collections::HashMap;

/// Name of the multipart part carrying the file.
pub const FILE_FIELD: &str = "file";

/// The file part plus any text fields sent alongside it.
#[derive(Debug)]
pub struct UploadForm {
    pub file: UploadedFile,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A form that could not be read, with whatever filename had been seen.
#[derive(Debug)]
pub struct FormRejection {
    pub filename: Option<String>,
    pub error: AppError,
}

impl FormRejection {
    fn new(filename: Option<String>, error: AppError) -> Self {
        Self { filename, error }
    }
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, err.body_text()))
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err.body_text()))
    }
}

/// Read exactly one `file` part and any text fields from a multipart form.
/// A missing filename is replaced by `fallback_filename`.
pub async fn read_upload_form(
    mut multipart: Multipart,
    fallback_filename: &str,
) -> Result<UploadForm, FormRejection> {
    let mut file: Option<UploadedFile> = None;
    let mut fields = HashMap::new();

    loop {
        let seen = file.as_ref().map(|f| f.filename.clone());
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                return Err(FormRejection::new(
                    seen,
                    multipart_error("Failed to read multipart", e),
                ))
            }
        };

        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        if field_name == FILE_FIELD {
            let filename = field
                .file_name()
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback_filename)
                .to_string();
            if file.is_some() {
                return Err(FormRejection::new(
                    Some(filename),
                    AppError::InvalidInput(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    ),
                ));
            }
            let data = match field.bytes().await {
                Ok(data) => data,
                Err(e) => {
                    return Err(FormRejection::new(
                        Some(filename),
                        multipart_error("Failed to read file data", e),
                    ))
                }
            };
            file = Some(UploadedFile {
                filename,
                data: data.to_vec(),
            });
        } else if !field_name.is_empty() {
            match field.text().await {
                Ok(value) => {
                    fields.insert(field_name, value);
                }
                Err(e) => {
                    return Err(FormRejection::new(
                        seen,
                        multipart_error("Failed to read form field", e),
                    ))
                }
            }
        }
    }

    let file = file.ok_or_else(|| {
        FormRejection::new(None, AppError::InvalidInput("No file provided".to_string()))
    })?;

    Ok(UploadForm { file, fields })
}
