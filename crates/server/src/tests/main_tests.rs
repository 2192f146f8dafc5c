use super::*;
use axum::{body, body::Body, http::Request};
use std::fs;
use tempfile::TempDir;
use tower::ServiceExt;

const FRAGMENT: &str = "<section class=\"webdeck-slide\"><h2>Plan</h2></section>";

fn test_app(with_fragment: bool) -> (Router, TempDir) {
    let root = tempfile::tempdir().expect("tempdir");
    fs::write(root.path().join("index.html"), "<html><body>home</body></html>").expect("index");
    fs::write(root.path().join("styles.css"), "body { margin: 0 }").expect("css");
    fs::create_dir_all(root.path().join("content")).expect("content dir");
    if with_fragment {
        fs::write(root.path().join("content/content.html"), FRAGMENT).expect("fragment");
    }

    let state = AppState {
        site_root: root.path().to_path_buf(),
        content_path: root.path().join("content/content.html"),
    };
    (build_router(Arc::new(state)), root)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _root) = test_app(true);
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn content_routes_serve_fragment_without_caching() {
    let (app, _root) = test_app(true);

    for path in ["/content-fragment", "/content/content.html"] {
        let request = Request::get(path).body(Body::empty()).expect("request");
        let response = app.clone().oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).expect("cache-control"),
            "no-store"
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).expect("content-type"),
            HTML_CONTENT_TYPE
        );
        assert_eq!(body_text(response).await, FRAGMENT);
    }
}

#[tokio::test]
async fn missing_fragment_returns_404() {
    let (app, _root) = test_app(false);
    let request = Request::get("/content-fragment")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "Content not found");
}

#[tokio::test]
async fn static_pages_are_not_cached_but_assets_are() {
    let (app, _root) = test_app(true);

    let request = Request::get("/").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).expect("cache-control"),
        "no-store"
    );
    assert!(body_text(response).await.contains("home"));

    let request = Request::get("/styles.css").body(Body::empty()).expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());

    let request = Request::get("/missing.png").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreadable_fragment_returns_json_error() {
    let root = tempfile::tempdir().expect("tempdir");
    let content_path = root.path().join("content.html");
    fs::create_dir_all(&content_path).expect("directory in place of file");
    let app = build_router(Arc::new(AppState {
        site_root: root.path().to_path_buf(),
        content_path,
    }));

    let request = Request::get("/content-fragment")
        .body(Body::empty())
        .expect("request");
    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: ApiError = serde_json::from_str(&body_text(response).await).expect("json");
    assert_eq!(error.code, shared::error::ErrorCode::Internal);
}
