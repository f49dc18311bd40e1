//! Infrastructure Layer
//!
//! HTTP implementation of the auth backend trait.

pub mod http;

pub use http::HttpAuthBackend;
