//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, constant-time comparison)
//! - Cookie management
//! - Client IP extraction
//! - Rate limiting infrastructure
//! - Accept-Language negotiation

pub mod accept_language;
pub mod client;
pub mod cookie;
pub mod crypto;
pub mod rate_limit;
