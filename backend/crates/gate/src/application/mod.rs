//! Application Layer
//!
//! Use cases and configuration.

pub mod config;
pub mod resolve_session;

// Re-exports
pub use config::GateConfig;
pub use resolve_session::ResolveSessionUseCase;
