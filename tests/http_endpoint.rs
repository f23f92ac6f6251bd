use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tower::ServiceExt;

use rusty_roughness::app::router;
use rusty_roughness::state::ServerConfig;

const BOUNDARY: &str = "profile-test-boundary";

fn multipart_request(field: &str, file_name: Option<&str>, content: &[u8]) -> Request<Body> {
    let disposition = match file_name {
        Some(name) => format!("form-data; name=\"{field}\"; filename=\"{name}\""),
        None => format!("form-data; name=\"{field}\""),
    };

    let mut body = Vec::new();
    body.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: {disposition}\r\nContent-Type: text/csv\r\n\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/process")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::ORIGIN, "http://example.com")
        .body(Body::from(body))
        .unwrap()
}

async fn send(request: Request<Body>) -> (StatusCode, Value, Option<String>) {
    let response = router(&ServerConfig::default())
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let cors = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json, cors)
}

fn profile_csv(n: usize) -> Vec<u8> {
    (0..n)
        .map(|i| format!("{:.5},{}\n", (i as f64 * 0.07).sin(), i))
        .collect::<String>()
        .into_bytes()
}

#[tokio::test]
async fn test_successful_upload_returns_metrics_and_png() {
    let (status, json, cors) =
        send(multipart_request("file", Some("profile.csv"), &profile_csv(400))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cors.as_deref(), Some("*"));

    let results = json["results"].as_object().unwrap();
    for key in ["Ra", "Rq", "Sm", "rms_slope", "Rv", "Rp", "Rt"] {
        assert!(results[key].is_number(), "missing {key}");
    }
    assert!(json.get("error").is_none());

    let png = STANDARD.decode(json["plot"].as_str().unwrap()).unwrap();
    assert_eq!(&png[1..4], b"PNG");
}

#[tokio::test]
async fn test_missing_file_field_is_bad_request() {
    let (status, json, _) =
        send(multipart_request("upload", Some("profile.csv"), &profile_csv(50))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part");
}

#[tokio::test]
async fn test_plain_form_value_is_not_a_file() {
    let (status, json, _) = send(multipart_request("file", None, b"1\n2\n3\n")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No file part");
}

#[tokio::test]
async fn test_non_multipart_body_is_json_bad_request() {
    for content_type in [None, Some("application/json")] {
        let mut builder = Request::builder().method("POST").uri("/process");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(r#"{"file": "1,2,3"}"#)).unwrap();

        let response = router(&ServerConfig::default())
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json",
            "content type {content_type:?}"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"], "No file part");
    }
}

#[tokio::test]
async fn test_empty_file_name_is_bad_request() {
    let (status, json, _) = send(multipart_request("file", Some(""), b"")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_unparsable_upload_is_server_error() {
    let (status, json, _) =
        send(multipart_request("file", Some("profile.csv"), b"a\nb\nc\n")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = json["error"].as_str().unwrap();
    assert!(message.starts_with("Data format error"), "{message}");
    assert!(json.get("results").is_none());
}

#[tokio::test]
async fn test_empty_upload_is_server_error() {
    let (status, json, _) = send(multipart_request("file", Some("empty.csv"), b"")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["error"].as_str().unwrap().contains("no data rows"));
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let config = ServerConfig {
        max_upload_bytes: 64,
        ..ServerConfig::default()
    };
    let response = router(&config)
        .oneshot(multipart_request("file", Some("big.csv"), &profile_csv(500)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
