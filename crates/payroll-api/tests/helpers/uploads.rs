//! Multipart upload shortcuts.

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};

pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";
pub const CSV_BYTES: &[u8] = b"Namn;Personnummer;Dagar\nAnna Berg;19800101-1234;3\n";

pub fn file_form(filename: &str, mime: &str, data: &[u8]) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::copy_from_slice(data))
        .file_name(filename.to_string())
        .mime_type(mime.to_string());
    MultipartForm::new().add_part("file", part)
}

pub async fn upload_payroll(server: &TestServer, filename: &str, data: &[u8]) -> TestResponse {
    server
        .post("/extract/payroll")
        .multipart(file_form(filename, "application/pdf", data))
        .await
}

pub async fn upload_payroll_multi(server: &TestServer, filename: &str) -> TestResponse {
    let form = file_form(filename, "application/pdf", PDF_BYTES).add_text("mode", "multi");
    server.post("/extract/payroll").multipart(form).await
}

pub async fn upload_sjuklista(server: &TestServer, filename: &str, data: &[u8]) -> TestResponse {
    server
        .post("/extract/sjuklista")
        .multipart(file_form(filename, "text/csv", data))
        .await
}
