//! Domain Layer
//!
//! Session model, allow-list, routing decision, and trusted-device token.

pub mod allow_list;
pub mod backend;
pub mod decision;
pub mod session;
pub mod trusted_device;

// Re-exports
pub use allow_list::AdminAllowList;
pub use backend::AuthBackend;
pub use decision::{AdminRoute, GateDecision, classify};
pub use session::{Assurance, AssuranceLevel, AuthUser, ResolvedSession, SessionTokens};
