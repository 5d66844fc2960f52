use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{Settlement, UploadLifecycle};
use crate::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::{IntoResponse, Response},
    Json,
};
use payroll_core::models::UploadKind;
use payroll_core::{AppError, ErrorMetadata};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct SickLeaveResponse {
    pub status: String,
    pub filename: String,
    pub count: usize,
    /// Per-employee results, in the extractor's order
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<Value>,
}

/// Correlate a sick-leave CSV against the latest payroll batch artifact.
///
/// Unlike single-payslip extraction, every processing failure here is a 500.
#[utoipa::path(
    post,
    path = "/extract/sjuklista",
    tag = "extract",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Sick-leave list processed", body = SickLeaveResponse),
        (status = 400, description = "Not a CSV or empty upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Processing failed", body = ErrorResponse)
    )
)]
pub async fn extract_sjuklista(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Response {
    let lifecycle = UploadLifecycle::new(&state, UploadKind::SickLeaveList);

    let form = match lifecycle.accept(multipart).await {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };
    let filename = form.file.filename.clone();

    let extractor = state.extractor.clone();
    let outbox_dir = state.config.outbox_dir();
    let request_id = lifecycle.request_id();
    lifecycle
        .process(
            form.file,
            move |path| async move {
                extractor
                    .process_sick_leave_list(&path, &outbox_dir)
                    .await
                    .map_err(AppError::from)
            },
            move |outcome| settle(outcome, filename, request_id),
        )
        .await
}

fn settle(outcome: Result<Vec<Value>, AppError>, filename: String, request_id: Uuid) -> Settlement {
    match outcome {
        Ok(results) => {
            tracing::info!(
                request_id = %request_id,
                filename = %filename,
                count = results.len(),
                "Successfully extracted payroll data for sjuklista"
            );
            Settlement::success(
                Json(SickLeaveResponse {
                    status: "ok".to_string(),
                    filename,
                    count: results.len(),
                    results,
                })
                .into_response(),
            )
        }
        Err(err) => {
            let error_message = format!(
                "Unexpected error while processing sjuklista: {}",
                err.client_message()
            );
            Settlement::failure(
                error_message.clone(),
                HttpAppError(AppError::Internal(error_message)).into_response(),
            )
        }
    }
}
