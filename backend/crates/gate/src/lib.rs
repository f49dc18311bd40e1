//! Gate (Admin Access Gate) Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session model, allow-list, routing decision, trusted-device token
//! - `application/` - Use cases and configuration
//! - `infra/` - Hosted auth backend HTTP client
//! - `presentation/` - Middleware, HTTP handlers, DTOs, router
//!
//! ## Security Model
//! - Sessions live in a hosted auth backend; this crate only resolves and
//!   relays them, it never stores credentials or session state
//! - Admin access requires an allow-listed email AND an MFA-verified session
//!   (or a valid trusted-device cookie)
//! - The trusted-device cookie is an HMAC-signed, time-limited token; the
//!   signing secret is the only revocation mechanism
//! - Every ambiguous signal fails closed (redirect to login), with one
//!   deliberate exception: a missing assurance-level signal fails open so a
//!   degraded backend cannot lock out every admin at once

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::GateConfig;
pub use application::resolve_session::ResolveSessionUseCase;
pub use domain::backend::AuthBackend;
pub use error::{GateError, GateResult};
pub use infra::http::HttpAuthBackend;
pub use presentation::middleware::{GateMiddlewareState, admin_gate};
pub use presentation::router::admin_auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
