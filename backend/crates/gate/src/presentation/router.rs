//! Admin Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::GateConfig;
use crate::domain::backend::AuthBackend;
use crate::infra::http::HttpAuthBackend;
use crate::presentation::handlers::{self, GateAppState};

/// Create the admin auth router against the hosted auth backend
pub fn admin_auth_router(backend: HttpAuthBackend, config: Arc<GateConfig>) -> Router {
    admin_auth_router_generic(Arc::new(backend), config)
}

/// Create a generic admin auth router for any backend implementation
pub fn admin_auth_router_generic<B>(backend: Arc<B>, config: Arc<GateConfig>) -> Router
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let state = GateAppState { backend, config };

    Router::new()
        .route("/login", post(handlers::login::<B>))
        .route("/logout", post(handlers::logout::<B>))
        .route("/mfa/enroll", post(handlers::mfa_enroll::<B>))
        .route("/mfa/factors", get(handlers::mfa_factors::<B>))
        .route("/mfa/verify", post(handlers::mfa_verify::<B>))
        .with_state(state)
}
