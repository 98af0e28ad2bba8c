use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use executor_portal::{build_app, config::AppConfig, state::AppState};
use executor_portal_core::ClientSettings;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

fn app_with_ui(ui: &TempDir, config: AppConfig) -> Router {
    let mut config = config;
    config.ui.dir = ui.path().to_string_lossy().into_owned();
    build_app(AppState::new(config))
}

fn ui_bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<!doctype html><div id=\"main\"></div>").unwrap();
    std::fs::write(dir.path().join("app.js"), "console.log('ui')").unwrap();
    dir
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn healthz_returns_ok() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn readyz_depends_on_ui_bundle() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/readyz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let empty = tempfile::tempdir().unwrap();
    let response = get(app_with_ui(&empty, AppConfig::default()), "/readyz").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn version_reports_package() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/version").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["name"], "executor-portal");
    assert!(json["started_at"].is_string());
}

#[tokio::test]
async fn ui_config_publishes_client_settings() {
    let ui = ui_bundle();
    let mut config = AppConfig::default();
    config.client.search_debounce_ms = 150;
    let response = get(app_with_ui(&ui, config), "/ui-config.json").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    let settings: ClientSettings = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(settings.search_debounce_ms, 150);
    assert_eq!(settings.max_file_size, 52_428_800);
    assert_eq!(settings.allowed_extensions, vec![".xlsx", ".xls", ".csv", ".txt"]);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_index() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/lookup_last_type").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("id=\"main\""));
}

#[tokio::test]
async fn static_assets_are_served_with_security_headers() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/app.js").await;
    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers[header::CACHE_CONTROL].to_str().unwrap().contains("immutable"));
}

#[tokio::test]
async fn configured_csp_and_hsts_are_sent() {
    let ui = ui_bundle();
    let mut config = AppConfig::default();
    if let Some(sec) = config.security.as_mut() {
        sec.enable_hsts = Some(true);
        sec.hsts_include_subdomains = Some(true);
        sec.csp = Some("default-src 'self'".to_string());
    }
    let response = get(app_with_ui(&ui, config), "/healthz").await;
    let headers = response.headers();
    assert_eq!(headers["strict-transport-security"], "max-age=31536000; includeSubDomains");
    assert_eq!(headers["content-security-policy"], "default-src 'self'");
}

#[tokio::test]
async fn api_paths_do_not_fall_back_to_index() {
    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/api/folders").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers()[header::CONTENT_TYPE].to_str().unwrap().starts_with("application/json"));
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["success"], false);
    assert!(!json.to_string().contains("id=\\\"main\\\""));

    let ui = ui_bundle();
    let response = get(app_with_ui(&ui, AppConfig::default()), "/api/folder-files?path=C%3A%5Cdata").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn form_posts_are_answered_explicitly() {
    let ui = ui_bundle();
    let app = app_with_ui(&ui, AppConfig::default());
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
        .body(Body::from("--x--\r\n"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["success"], false);
    assert!(json["message"].as_str().unwrap().contains("POST /"));

    let ui = ui_bundle();
    let app = app_with_ui(&ui, AppConfig::default());
    let request = Request::builder().method("POST").uri("/api/preview-date-range").body(Body::empty()).unwrap();
    assert_eq!(app.oneshot(request).await.unwrap().status(), StatusCode::BAD_GATEWAY);
}
