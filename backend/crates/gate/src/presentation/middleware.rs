//! Admin Gate Middleware
//!
//! Classifies every request against the admin route table and either lets
//! it through or answers with a 302 before any protected handler runs.
//! Non-admin routes pass through untouched.
//!
//! Redirects deliberately use 302 Found: browsers re-issue the target as a
//! GET, which is what the login and MFA pages expect.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use platform::cookie::{append_set_cookies, extract_cookie};

use crate::application::config::GateConfig;
use crate::application::resolve_session::ResolveSessionUseCase;
use crate::domain::backend::AuthBackend;
use crate::domain::decision::{AdminRoute, GateDecision, classify};
use crate::domain::trusted_device::{self, TRUSTED_DEVICE_COOKIE};

/// Shared state for the gate middleware
pub struct GateMiddlewareState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<GateConfig>,
}

impl<B> Clone for GateMiddlewareState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B> GateMiddlewareState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<GateConfig>) -> Self {
        Self { backend, config }
    }
}

/// Gate middleware for admin routes
///
/// Use with `axum::middleware::from_fn_with_state`. Session resolution runs
/// at most once per request, and any Set-Cookie values produced by token
/// rotation are relayed on whichever response goes out, redirects included.
pub async fn admin_gate<B>(
    State(state): State<GateMiddlewareState<B>>,
    req: Request<Body>,
    next: Next,
) -> Response
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let Some(route) = AdminRoute::from_path(req.uri().path()) else {
        return next.run(req).await;
    };

    let resolver = ResolveSessionUseCase::new(Arc::clone(&state.backend), Arc::clone(&state.config));
    let session = resolver.resolve(req.headers()).await;

    let device_trusted = match &session.user {
        Some(user) => {
            let cookie = extract_cookie(req.headers(), TRUSTED_DEVICE_COOKIE);
            trusted_device::validate(
                &state.config.trusted_device_secret,
                cookie.as_deref(),
                &user.id,
            )
        }
        None => false,
    };

    let decision = classify(route, &session, &state.config.allow_list, device_trusted);
    tracing::debug!(
        path = %req.uri().path(),
        authenticated = session.user.is_some(),
        ?decision,
        "Admin gate decision"
    );

    let rotation_cookies = session.response_cookies;
    let mut response = match decision {
        GateDecision::Serve => next.run(req).await,
        GateDecision::RedirectLogin => redirect(&state.config.login_path),
        GateDecision::RedirectMfaEnroll => redirect(&state.config.mfa_enroll_path),
        GateDecision::RedirectMfaVerify => redirect(&state.config.mfa_verify_path),
        GateDecision::RedirectDashboard => redirect(&state.config.dashboard_path),
    };
    append_set_cookies(
        response.headers_mut(),
        rotation_cookies.iter().map(String::as_str),
    );
    response
}

fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)], ()).into_response()
}
