mod helpers;

use helpers::uploads::{upload_sjuklista, CSV_BYTES};
use helpers::{setup_test_app, Script};
use serde_json::{json, Value};

#[tokio::test]
async fn returns_results_in_extractor_order() {
    let results = vec![
        json!({ "name": "Anna Berg", "sick_days": 3, "deduction": 1240.0 }),
        json!({ "name": "Erik Lund", "sick_days": 1, "deduction": 410.5 }),
    ];
    let app = setup_test_app(Script::Payload(Value::Array(results.clone())));

    let response = upload_sjuklista(app.client(), "mars.csv", CSV_BYTES).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["filename"], "mars.csv");
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"], Value::Array(results));

    let calls = app.extractor.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].existed);
    assert_eq!(calls[0].bytes, CSV_BYTES);
    assert!(calls[0].path.to_string_lossy().ends_with(".csv"));
    assert_eq!(calls[0].outbox_dir.as_deref(), Some(app.config.outbox_dir().as_path()));
    assert!(app.leftover_uploads().is_empty());

    let lines = app.api_log_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("] /extract/sjuklista - mars.csv - success"), "{}", lines[0]);
}

#[tokio::test]
async fn empty_result_list_is_ok() {
    let app = setup_test_app(Script::Payload(json!([])));

    let response = upload_sjuklista(app.client(), "tom.csv", CSV_BYTES).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body["count"], 0);
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn non_csv_is_rejected() {
    let app = setup_test_app(Script::Payload(json!([])));

    let response = upload_sjuklista(app.client(), "sjuklista.xlsx", CSV_BYTES).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["detail"], "File must be a CSV");
    assert!(app.extractor.calls().is_empty());
}

#[tokio::test]
async fn empty_csv_is_rejected() {
    let app = setup_test_app(Script::Payload(json!([])));

    let response = upload_sjuklista(app.client(), "mars.csv", b"").await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["detail"], "Empty CSV uploaded");
    assert!(app.extractor.calls().is_empty());
    assert!(app.leftover_uploads().is_empty());
}

#[tokio::test]
async fn processing_failure_is_a_500_with_detail() {
    let app = setup_test_app(Script::Error("no payroll_raw.json for 2024_03".to_string()));

    let response = upload_sjuklista(app.client(), "mars.csv", CSV_BYTES).await;

    assert_eq!(response.status_code(), 500);
    let detail = response.json::<Value>()["detail"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(
        detail.starts_with("Unexpected error while processing sjuklista: "),
        "{}",
        detail
    );
    assert!(detail.contains("no payroll_raw.json for 2024_03"), "{}", detail);
    assert!(app.leftover_uploads().is_empty());

    let lines = app.api_log_lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(
        "/extract/sjuklista - mars.csv - error - ERROR: Unexpected error while processing sjuklista: "
    ));
}

#[tokio::test]
async fn structured_failure_is_also_a_500() {
    let app = setup_test_app(Script::Failure("bad header row".to_string()));

    let response = upload_sjuklista(app.client(), "mars.csv", CSV_BYTES).await;

    assert_eq!(response.status_code(), 500);
}

#[tokio::test]
async fn panic_is_contained() {
    let app = setup_test_app(Script::Panic);

    let response = upload_sjuklista(app.client(), "mars.csv", CSV_BYTES).await;

    assert_eq!(response.status_code(), 500);
    assert!(app.leftover_uploads().is_empty());
}
