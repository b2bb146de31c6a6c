use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use backend_application::{AppState, Metrics};
use backend_domain::{DetectorConfig, RuntimeConfig};
use backend_infrastructure::FsUploadStore;
use backend_interfaces_http::build_router;

const BOUNDARY: &str = "leakwatch-test-boundary";
const SAMPLE_CSV: &[u8] = b"Time,Amount,type\n0,10,TRANSFER\n1,1000000,CASH_OUT\n2,12,PAYMENT\n";

fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("leakwatch-http-{}", uuid::Uuid::new_v4()))
}

fn test_router(dir: &PathBuf, api_token: Option<&str>) -> Router {
    let config = RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: api_token.map(str::to_string),
        upload_dir: dir.to_string_lossy().to_string(),
        max_body_bytes: 16 * 1024 * 1024,
        request_timeout_seconds: 30,
        detector: DetectorConfig::default(),
        upload_retention_minutes: 0,
        sweep_interval_minutes: 15,
        delete_after_processing: false,
    };
    let state = AppState {
        config,
        upload_store: Arc::new(FsUploadStore::new(dir.clone())),
        metrics: Arc::new(Metrics::default()),
    };
    build_router(state)
}

fn multipart_body(field_name: &str, file_name: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(field_name: &str, file_name: &str, content: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/uploads")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field_name, file_name, content)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn cleanup(dir: PathBuf) {
    let _ = tokio::fs::remove_dir_all(dir).await;
}

#[tokio::test]
async fn valid_csv_upload_flags_the_extreme_row() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let response = app
        .clone()
        .oneshot(upload_request("file", "transactions.csv", SAMPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "success");
    assert_eq!(body["columns"], serde_json::json!(["Amount", "type"]));
    assert_eq!(body["summary"]["rows"], 3);
    assert_eq!(body["summary"]["anomaly_count"], 1);
    assert_eq!(body["anomalies"][0]["type"], "CASH_OUT");
    assert_eq!(body["anomalies"][0]["Amount"], 1.0);
    assert!(body["anomalies"][0].get("Time").is_none());

    // The raw file was persisted under a generated key.
    let listing = app
        .oneshot(
            Request::builder()
                .uri("/v1/ops/uploads")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(listing.status(), StatusCode::OK);
    let listing = json_body(listing).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
    assert_eq!(listing[0]["original_name"], "transactions.csv");

    cleanup(dir).await;
}

#[tokio::test]
async fn identical_uploads_return_identical_results() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let first = json_body(
        app.clone()
            .oneshot(upload_request("file", "a.csv", SAMPLE_CSV))
            .await
            .unwrap(),
    )
    .await;
    let second = json_body(
        app.oneshot(upload_request("file", "a.csv", SAMPLE_CSV))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(first["anomalies"], second["anomalies"]);
    assert_eq!(first["summary"]["anomaly_count"], second["summary"]["anomaly_count"]);

    cleanup(dir).await;
}

#[tokio::test]
async fn gzip_upload_scores_like_the_plain_file() {
    use std::io::Write;

    let dir = temp_dir();
    let app = test_router(&dir, None);

    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(SAMPLE_CSV).unwrap();
    let packed = encoder.finish().unwrap();

    let response = app
        .oneshot(upload_request("file", "transactions.csv.gz", &packed))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["summary"]["anomaly_count"], 1);
    assert_eq!(body["anomalies"][0]["type"], "CASH_OUT");

    cleanup(dir).await;
}

#[tokio::test]
async fn missing_file_part_is_a_bad_request() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let response = app
        .oneshot(upload_request("data", "transactions.csv", SAMPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["status"], "bad request");
    assert!(body["message"].as_str().unwrap().contains("no file part"));

    cleanup(dir).await;
}

#[tokio::test]
async fn empty_file_name_is_a_bad_request() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let response = app
        .oneshot(upload_request("file", "", SAMPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["status"], "bad request");
    assert!(body["message"].as_str().unwrap().contains("no selected file"));

    cleanup(dir).await;
}

#[tokio::test]
async fn unparseable_csv_is_a_bad_request() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let response = app
        .clone()
        .oneshot(upload_request("file", "empty.csv", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"].as_str().unwrap().contains("empty file"));

    let response = app
        .oneshot(upload_request(
            "file",
            "bad.csv",
            b"Time,Amount\nno-number,also-text\n",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("non-numeric values"));

    cleanup(dir).await;
}

#[tokio::test]
async fn api_token_guards_the_upload_endpoint() {
    let dir = temp_dir();
    let app = test_router(&dir, Some("sekrit"));

    let response = app
        .clone()
        .oneshot(upload_request("file", "transactions.csv", SAMPLE_CSV))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["status"], "unauthorized");

    let mut request = upload_request("file", "transactions.csv", SAMPLE_CSV);
    request.headers_mut().insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_static("Bearer sekrit"),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    cleanup(dir).await;
}

#[tokio::test]
async fn ops_endpoints_respond() {
    let dir = temp_dir();
    let app = test_router(&dir, None);

    let live = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/ops/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/ops/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(ready.status(), StatusCode::OK);

    let metrics = app
        .oneshot(
            Request::builder()
                .uri("/v1/ops/metrics/prometheus")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(metrics.status(), StatusCode::OK);
    let bytes = metrics.into_body().collect().await.unwrap().to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("leakwatch_upload_requests_total"));

    cleanup(dir).await;
}
