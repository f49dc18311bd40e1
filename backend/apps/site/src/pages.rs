//! Public Pages
//!
//! Locale-prefixed marketing pages and the admin page shells. The bare
//! root redirects to the best locale for the caller's Accept-Language;
//! everything admin-shaped is rendered only after the gate middleware has
//! let the request through.

use axum::Router;
use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

use platform::accept_language::negotiate;

/// Locales the site is translated into
pub const LOCALES: [&str; 4] = ["en", "es", "pt", "fr"];

/// Fallback when the caller expresses no usable preference
pub const DEFAULT_LOCALE: &str = "es";

pub fn router() -> Router {
    Router::new()
        .route("/", get(locale_redirect))
        .route("/{locale}", get(home))
        .route("/admin/login", get(admin_login))
        .route("/admin/mfa-enroll", get(admin_mfa_enroll))
        .route("/admin/mfa-verify", get(admin_mfa_verify))
        .route("/admin/users", get(admin_users))
}

/// GET / - redirect to the negotiated locale, preserving the query string
async fn locale_redirect(headers: HeaderMap, RawQuery(query): RawQuery) -> Response {
    let accept = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let locale = negotiate(accept, &LOCALES, DEFAULT_LOCALE);

    let location = match query {
        Some(query) => format!("/{locale}?{query}"),
        None => format!("/{locale}"),
    };
    (StatusCode::FOUND, [(header::LOCATION, location)], ()).into_response()
}

/// GET /{locale} - localized landing page
async fn home(Path(locale): Path<String>) -> Response {
    if !LOCALES.contains(&locale.as_str()) {
        return StatusCode::NOT_FOUND.into_response();
    }
    Html(format!(
        "<!doctype html><html lang=\"{locale}\"><body><h1>Centsible</h1></body></html>"
    ))
    .into_response()
}

async fn admin_login() -> Html<&'static str> {
    Html("<!doctype html><title>Admin login</title>")
}

async fn admin_mfa_enroll() -> Html<&'static str> {
    Html("<!doctype html><title>Set up two-factor authentication</title>")
}

async fn admin_mfa_verify() -> Html<&'static str> {
    Html("<!doctype html><title>Verify your device</title>")
}

async fn admin_users() -> Html<&'static str> {
    Html("<!doctype html><title>Admin users</title>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn request(uri: &str, accept_language: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(value) = accept_language {
            builder = builder.header(header::ACCEPT_LANGUAGE, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn location(response: &Response) -> &str {
        response
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[tokio::test]
    async fn test_root_redirects_to_default_locale() {
        let response = router().oneshot(request("/", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/es");
    }

    #[tokio::test]
    async fn test_root_honors_accept_language() {
        let response = router()
            .oneshot(request("/", Some("en-US,en;q=0.9")))
            .await
            .unwrap();
        assert_eq!(location(&response), "/en");
    }

    #[tokio::test]
    async fn test_root_redirect_preserves_query() {
        let response = router()
            .oneshot(request("/?utm_source=ad", Some("pt-BR")))
            .await
            .unwrap();
        assert_eq!(location(&response), "/pt?utm_source=ad");
    }

    #[tokio::test]
    async fn test_unsupported_language_falls_back() {
        let response = router()
            .oneshot(request("/", Some("de-DE,de;q=0.9")))
            .await
            .unwrap();
        assert_eq!(location(&response), "/es");
    }

    #[tokio::test]
    async fn test_known_locale_serves_page() {
        let response = router().oneshot(request("/fr", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_locale_is_not_found() {
        let response = router().oneshot(request("/zz", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
