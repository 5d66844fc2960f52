//! OpenAPI documentation, served at `/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use payroll_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "PDF API",
        version = "1.1.0",
        description = "Upload gateway for the payroll extractor: extracts structured data from Crona Lön payslip PDFs and correlates sjuklista CSV files with the latest payroll batch.",
        contact(name = "Oa Berg", email = "oa@example.com"),
        license(name = "MIT")
    ),
    paths(
        handlers::health::health_check,
        handlers::payroll::extract_payroll,
        handlers::sjuklista::extract_sjuklista,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::health::HealthResponse,
        handlers::payroll::MultiPayrollResponse,
        handlers::payroll::PayrollFaultResponse,
        handlers::sjuklista::SickLeaveResponse,
        models::UploadMode,
    )),
    tags(
        (name = "health", description = "Service status"),
        (name = "extract", description = "Payroll and sick-leave extraction")
    )
)]
pub struct ApiDoc;
