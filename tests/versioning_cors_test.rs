mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use common::{get, send, setup_test_app, setup_test_db};

fn get_with_version(uri: &str, version: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("api-version", version)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_missing_version_uses_default() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    let (status, headers, _) = send(&app, get("/api/compositions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("api-supported-versions").unwrap(), "1.0");
}

#[tokio::test]
async fn test_supported_versions_are_accepted() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    for version in ["1", "1.0"] {
        let (status, headers, _) = send(&app, get_with_version("/api/compositions", version)).await;
        assert_eq!(status, StatusCode::OK, "version {version}");
        assert_eq!(headers.get("api-supported-versions").unwrap(), "1.0");
    }
}

#[tokio::test]
async fn test_unsupported_version_is_bad_request() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    for version in ["2.0", "latest"] {
        let (status, headers, body) = send(&app, get_with_version("/api/compositions", version)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "version {version}");
        assert_eq!(headers.get("api-supported-versions").unwrap(), "1.0");
        assert!(body["error"].as_str().unwrap().contains(version), "{body}");
    }
}

#[tokio::test]
async fn test_not_found_responses_still_report_versions() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    let (status, headers, _) = send(&app, get("/api/compositions/31337")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.contains_key("api-supported-versions"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/compositions")
        .header("origin", "https://menu.example")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
}

#[tokio::test]
async fn test_cors_preflight() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/compositions")
        .header("origin", "https://menu.example")
        .header("access-control-request-method", "DELETE")
        .header("access-control-request-headers", "api-version")
        .body(Body::empty())
        .unwrap();
    let (status, headers, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    assert!(headers.contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_docs_are_served() {
    let db = setup_test_db().await.unwrap();
    let app = setup_test_app(&db);

    let (status, _, body) = send(&app, get("/docs")).await;
    assert_eq!(status, StatusCode::OK);
    let html = body.as_str().unwrap();
    assert!(html.contains("Composition API"));
    assert!(html.contains("/api/compositions/random-meal"), "random meal should be documented");
    assert!(html.contains("/api/compositions/{id}"), "item routes should be documented");
}
