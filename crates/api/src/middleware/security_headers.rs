//! Security headers added to every response.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

pub mod headers {
    pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
    pub const X_FRAME_OPTIONS: &str = "x-frame-options";
    pub const REFERRER_POLICY: &str = "referrer-policy";
}

/// Adds `nosniff`, `DENY` framing, a strict referrer policy and `no-store`
/// caching. `Strict-Transport-Security` is only sent when
/// `security.hsts_enabled` is set, i.e. behind TLS termination.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(response.headers_mut(), state.config.security.hsts_enabled);
    response
}

fn apply_security_headers(map: &mut HeaderMap, hsts_enabled: bool) {
    map.insert(
        header::HeaderName::from_static(headers::X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    map.insert(
        header::HeaderName::from_static(headers::X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    map.insert(
        header::HeaderName::from_static(headers::REFERRER_POLICY),
        HeaderValue::from_static("no-referrer"),
    );
    // Dashboard payloads are per-user.
    map.entry(header::CACHE_CONTROL)
        .or_insert(HeaderValue::from_static("no-store"));

    if hsts_enabled {
        map.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers_without_hsts() {
        let mut map = HeaderMap::new();
        apply_security_headers(&mut map, false);

        assert_eq!(map.get(headers::X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(map.get(headers::X_FRAME_OPTIONS).unwrap(), "DENY");
        assert_eq!(map.get(headers::REFERRER_POLICY).unwrap(), "no-referrer");
        assert_eq!(map.get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert!(map.get(header::STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[test]
    fn test_hsts_when_enabled() {
        let mut map = HeaderMap::new();
        apply_security_headers(&mut map, true);
        assert_eq!(
            map.get(header::STRICT_TRANSPORT_SECURITY).unwrap(),
            "max-age=31536000; includeSubDomains"
        );
    }

    #[test]
    fn test_existing_cache_control_is_kept() {
        let mut map = HeaderMap::new();
        map.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=60"));
        apply_security_headers(&mut map, false);
        assert_eq!(map.get(header::CACHE_CONTROL).unwrap(), "max-age=60");
    }
}
