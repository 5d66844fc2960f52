use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{BatchArtifactStore, Settlement, UploadLifecycle};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Local;
use payroll_core::models::{ExtractionResult, RawPayrollBatch, UploadKind, UploadMode};
use payroll_core::{AppError, ErrorMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ModeQuery {
    mode: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MultiPayrollResponse {
    pub status: String,
    pub filename: String,
    pub mode: UploadMode,
    pub employee_count: usize,
    /// Path of the written batch artifact
    pub raw_file: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PayrollFaultResponse {
    pub status: String,
    pub error_message: String,
    pub filename: String,
}

enum PayrollOutcome {
    Single(Value),
    Multi(MultiPayrollResponse),
}

#[utoipa::path(
    post,
    path = "/extract/payroll",
    tag = "extract",
    params(
        ("mode" = Option<String>, Query, description = "'single' (default) for one payslip or 'multi' for a multi-employee PDF; also accepted as a form field")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Single mode: the extractor's payload. Multi mode: batch summary", body = MultiPayrollResponse),
        (status = 400, description = "Not a PDF or empty upload", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 422, description = "Extractor could not extract the payslip", body = ErrorResponse),
        (status = 500, description = "Unexpected error", body = PayrollFaultResponse)
    )
)]
pub async fn extract_payroll(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModeQuery>,
    multipart: Multipart,
) -> Response {
    let lifecycle = UploadLifecycle::new(&state, UploadKind::Payroll);

    let form = match lifecycle.accept(multipart).await {
        Ok(form) => form,
        Err(rejection) => return rejection,
    };

    let mode = form
        .field("mode")
        .or(query.mode.as_deref())
        .map(UploadMode::from_form_value)
        .unwrap_or_default();
    let filename = form.file.filename.clone();

    let extractor = state.extractor.clone();
    let batches = state.batches.clone();
    let summary_filename = filename.clone();
    let request_id = lifecycle.request_id();
    lifecycle
        .process(
            form.file,
            move |path| async move {
                match mode {
                    UploadMode::Multi => {
                        let split = extractor.split_multi_payroll(&path).await?;
                        let summary =
                            write_batch(&batches, split.into(), summary_filename).await?;
                        Ok::<_, AppError>(PayrollOutcome::Multi(summary))
                    }
                    UploadMode::Single => match extractor.extract_single_payroll(&path).await? {
                        ExtractionResult::Success(payload) => Ok(PayrollOutcome::Single(payload)),
                        ExtractionResult::Failure { message } => {
                            Err(AppError::ExtractionFailed(message))
                        }
                    },
                }
            },
            move |outcome| settle(outcome, filename, mode, request_id),
        )
        .await
}

fn settle(
    outcome: Result<PayrollOutcome, AppError>,
    filename: String,
    mode: UploadMode,
    request_id: Uuid,
) -> Settlement {
    match outcome {
        Ok(outcome) => {
            tracing::info!(
                request_id = %request_id,
                filename = %filename,
                mode = mode.as_str(),
                "Successfully extracted payroll data"
            );
            let response = match outcome {
                PayrollOutcome::Single(payload) => Json(payload).into_response(),
                PayrollOutcome::Multi(summary) => Json(summary).into_response(),
            };
            Settlement::success(response)
        }
        Err(AppError::ExtractionFailed(message)) => Settlement::failure(
            message.clone(),
            HttpAppError(AppError::ExtractionFailed(message)).into_response(),
        ),
        Err(err) => {
            let error_message = format!("Unexpected error: {}", err.client_message());
            tracing::error!(
                request_id = %request_id,
                filename = %filename,
                error = %err,
                "Error processing payroll PDF"
            );
            let response = (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(PayrollFaultResponse {
                    status: "error".to_string(),
                    error_message: error_message.clone(),
                    filename,
                }),
            )
                .into_response();
            Settlement::failure(error_message, response)
        }
    }
}

/// Persist the split payrolls as this month's batch artifact.
async fn write_batch(
    batches: &BatchArtifactStore,
    batch: RawPayrollBatch,
    filename: String,
) -> Result<MultiPayrollResponse, AppError> {
    let raw_file = batches.write(&batch, Local::now()).await?;
    let employee_count = batch.employee_count();

    tracing::info!(employees = employee_count, "Created payroll_raw.json");

    Ok(MultiPayrollResponse {
        status: "ok".to_string(),
        filename,
        mode: UploadMode::Multi,
        employee_count,
        raw_file: raw_file.display().to_string(),
        message: format!(
            "Successfully processed {} employees from PDF",
            employee_count
        ),
    })
}
