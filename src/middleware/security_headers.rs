//! Security and caching headers for every response of the host.

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::config::{AppConfig, SecurityConfig};

/// Adds the static security headers, optional HSTS/CSP from `[security]`, and
/// a cache policy by content type:
///
/// - JSON (client settings, probes): `no-store`
/// - HTML (the SPA shell): `no-cache`, so a new bundle is picked up on reload
/// - CSS, JS, WASM: long-lived and `immutable`
pub async fn security_headers_middleware(
    State(cfg): State<Arc<AppConfig>>,
    req: Request,
    next: Next,
) -> Response {
    let mut res = next.run(req).await;
    let headers = res.headers_mut();

    headers.insert(HeaderName::from_static("x-content-type-options"), HeaderValue::from_static("nosniff"));
    headers.insert(HeaderName::from_static("x-frame-options"), HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(HeaderName::from_static("referrer-policy"), HeaderValue::from_static("same-origin"));
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if let Some(sec) = cfg.security.as_ref() {
        apply_optional(headers, sec);
    }

    let content_type: Option<String> = headers.get(CONTENT_TYPE).and_then(|ct| {
        ct.to_str()
            .map_err(|e| {
                tracing::warn!("Invalid UTF-8 in Content-Type header: {}", e);
                e
            })
            .ok()
            .map(|s| s.to_string())
    });
    if let Some(s) = content_type.as_deref() {
        if s.starts_with("application/json") {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
        } else if s.starts_with("text/html") {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        } else if s.starts_with("text/css")
            || s.starts_with("application/javascript")
            || s.starts_with("text/javascript")
            || s.starts_with("application/wasm")
        {
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=31536000, immutable"));
            headers.remove(PRAGMA);
        }
    }

    res
}

fn apply_optional(headers: &mut HeaderMap, sec: &SecurityConfig) {
    if sec.enable_hsts.unwrap_or(false) {
        let max_age = sec.hsts_max_age.unwrap_or(31_536_000);
        let include_sub = if sec.hsts_include_subdomains.unwrap_or(false) { "; includeSubDomains" } else { "" };
        let value = format!("max-age={}{}", max_age, include_sub);
        headers.insert(
            HeaderName::from_static("strict-transport-security"),
            HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("max-age=31536000")),
        );
    }
    if let Some(csp) = sec.csp.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        match HeaderValue::from_str(csp) {
            Ok(val) => {
                headers.insert(HeaderName::from_static("content-security-policy"), val);
            }
            Err(e) => tracing::warn!("Ignoring invalid security.csp: {}", e),
        }
    }
}
