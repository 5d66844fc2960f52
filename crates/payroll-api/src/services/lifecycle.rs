//! Request lifecycle around an extractor call
//!
//! Every upload endpoint runs the same steps: read and validate the form,
//! persist the file under a unique temp name, run the extraction, remove the
//! temp file, and record exactly one API log line.
//!
//! Everything after validation runs in a detached task. A client that goes
//! away mid-extraction only loses its response: the extractor keeps its file,
//! cleanup happens after it finishes and the outcome is still logged.

use axum::extract::Multipart;
use axum::response::{IntoResponse, Response};
use payroll_core::models::{LogEntry, UploadKind, UploadedFile};
use payroll_core::{AppError, ErrorMetadata};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::HttpAppError;
use crate::services::TempUpload;
use crate::state::AppState;
use crate::utils::upload::{read_upload_form, UploadForm};

/// How an upload ended: the response to send and the API log verdict.
pub struct Settlement {
    response: Response,
    failure: Option<String>,
}

impl Settlement {
    pub fn success(response: Response) -> Self {
        Self {
            response,
            failure: None,
        }
    }

    pub fn failure(message: impl Into<String>, response: Response) -> Self {
        Self {
            response,
            failure: Some(message.into()),
        }
    }
}

#[derive(Clone)]
pub struct UploadLifecycle {
    state: Arc<AppState>,
    kind: UploadKind,
    request_id: Uuid,
}

impl UploadLifecycle {
    pub fn new(state: &Arc<AppState>, kind: UploadKind) -> Self {
        Self {
            state: state.clone(),
            kind,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Read the form and validate the file. A rejection is logged and returned
    /// as a ready 4xx response.
    pub async fn accept(&self, multipart: Multipart) -> Result<UploadForm, Response> {
        let form = match read_upload_form(multipart, self.kind.fallback_filename()).await {
            Ok(form) => form,
            Err(rejection) => {
                let filename = rejection
                    .filename
                    .unwrap_or_else(|| self.kind.fallback_filename().to_string());
                return Err(self.reject(&filename, rejection.error).await);
            }
        };

        if let Err(err) = self.kind.validate(&form.file) {
            return Err(self.reject(&form.file.filename, err).await);
        }

        Ok(form)
    }

    async fn reject(&self, filename: &str, err: AppError) -> Response {
        self.record(filename, Some(&err.client_message())).await;
        HttpAppError(err).into_response()
    }

    /// Run `extract` against a temp copy of `file`, turn its outcome into a
    /// response with `settle`, and log it.
    ///
    /// The work is spawned, so it runs to completion even if the caller is
    /// dropped. A panic inside `extract` reaches `settle` as an internal error.
    pub async fn process<T, F, Fut, S>(&self, file: UploadedFile, extract: F, settle: S) -> Response
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
        S: FnOnce(Result<T, AppError>) -> Settlement + Send + 'static,
    {
        let lifecycle = self.clone();
        let guard = self.state.in_flight.start();

        let task = tokio::spawn(async move {
            let _guard = guard;
            let filename = file.filename.clone();
            let outcome = lifecycle.extract_from_temp(file, extract).await;
            let Settlement { response, failure } = settle(outcome);
            lifecycle.record(&filename, failure.as_deref()).await;
            response
        });

        match task.await {
            Ok(response) => response,
            Err(e) => {
                HttpAppError(AppError::Internal(format!("Upload task failed: {}", e)))
                    .into_response()
            }
        }
    }

    async fn extract_from_temp<T, F, Fut>(&self, file: UploadedFile, extract: F) -> Result<T, AppError>
    where
        T: Send + 'static,
        F: FnOnce(PathBuf) -> Fut,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        let temp = TempUpload::persist(
            self.state.config.upload_tmp_dir().to_path_buf(),
            self.kind.extension(),
            file.data,
        )
        .await?;

        tracing::info!(
            request_id = %self.request_id,
            endpoint = self.kind.endpoint(),
            filename = %file.filename,
            temp = %temp.path().display(),
            "Processing upload"
        );

        let outcome = match tokio::spawn(extract(temp.path().to_path_buf())).await {
            Ok(result) => result,
            Err(e) => Err(AppError::Internal(format!("Extraction task failed: {}", e))),
        };

        temp.cleanup();
        outcome
    }

    async fn record(&self, filename: &str, failure: Option<&str>) {
        let entry = match failure {
            None => LogEntry::success(self.kind.endpoint(), filename),
            Some(message) => LogEntry::error(self.kind.endpoint(), filename, message),
        };
        self.state.api_log.append(&entry).await;
    }
}
