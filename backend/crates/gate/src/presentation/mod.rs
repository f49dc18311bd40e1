//! Presentation Layer
//!
//! HTTP surface of the gate: the route-protection middleware, the admin
//! auth endpoints, and their request/response DTOs.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{GateMiddlewareState, admin_gate};
pub use router::admin_auth_router;
