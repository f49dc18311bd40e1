//! Application Configuration
//!
//! Configuration for the gate. Loaded once at process start into an
//! immutable struct and injected into middleware and routers.

use std::time::Duration;

use crate::domain::allow_list::AdminAllowList;
use crate::domain::session::SessionTokens;

/// Re-export SameSite from platform
pub use platform::cookie::{CookieConfig, SameSite};

/// Gate configuration
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Admin email allow-list
    pub allow_list: AdminAllowList,
    /// Secret for trusted-device token MACs; rotating it invalidates every
    /// outstanding trusted-device cookie
    pub trusted_device_secret: Vec<u8>,
    /// Access token cookie name (set by the auth backend's client)
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// Whether issued cookies carry the Secure attribute
    pub cookie_secure: bool,
    /// SameSite policy for issued cookies
    pub cookie_same_site: SameSite,
    /// Max-Age for relayed session cookies (1 week)
    pub session_cookie_max_age: Duration,
    /// Redirect targets
    pub login_path: String,
    pub mfa_enroll_path: String,
    pub mfa_verify_path: String,
    pub dashboard_path: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            allow_list: AdminAllowList::default(),
            trusted_device_secret: vec![0u8; 32],
            access_cookie_name: "sb-access-token".to_string(),
            refresh_cookie_name: "sb-refresh-token".to_string(),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            session_cookie_max_age: Duration::from_secs(7 * 24 * 3600), // 1 week
            login_path: "/admin/login".to_string(),
            mfa_enroll_path: "/admin/mfa-enroll".to_string(),
            mfa_verify_path: "/admin/mfa-verify".to_string(),
            dashboard_path: "/admin/users".to_string(),
        }
    }
}

impl GateConfig {
    /// Create config with a random trusted-device secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            trusted_device_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Cookie configuration for one of the relayed session cookies
    pub fn session_cookie(&self, name: &str) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: Some(self.session_cookie_max_age.as_secs() as i64),
        }
    }

    /// Set-Cookie values installing a session token pair
    pub fn session_cookies(&self, tokens: &SessionTokens) -> Vec<String> {
        vec![
            self.session_cookie(&self.access_cookie_name)
                .build_set_cookie(&tokens.access_token),
            self.session_cookie(&self.refresh_cookie_name)
                .build_set_cookie(&tokens.refresh_token),
        ]
    }

    /// Set-Cookie values deleting both session cookies
    pub fn clear_session_cookies(&self) -> Vec<String> {
        vec![
            self.session_cookie(&self.access_cookie_name)
                .build_delete_cookie(),
            self.session_cookie(&self.refresh_cookie_name)
                .build_delete_cookie(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_config() {
        let config = GateConfig::development();
        assert!(!config.cookie_secure);
        assert_eq!(config.trusted_device_secret.len(), 32);
        // Random secret should not be the all-zero default
        assert!(config.trusted_device_secret.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_session_cookie_options() {
        let config = GateConfig::default();
        let cookie = config.session_cookie("sb-access-token");
        let header = cookie.build_set_cookie("tok");
        assert!(header.starts_with("sb-access-token=tok"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Max-Age=604800"));
    }
}
