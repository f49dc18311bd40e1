//! Trusted-Device Token
//!
//! A signed, time-limited cookie that lets a previously MFA-verified device
//! skip the MFA challenge for a bounded period. Serialized as
//! `userId:expiresAt:signature` where the signature is lowercase-hex
//! HMAC-SHA256 over `userId:expiresAt`.
//!
//! There is no server-side store: expiry and signature are the only
//! invalidation paths, and rotating the secret invalidates every
//! outstanding token at once.

use chrono::Utc;
use hmac::{Hmac, Mac};
use platform::cookie::{CookieConfig, SameSite};
use platform::crypto::constant_time_eq;
use sha2::Sha256;

/// Cookie name holding the token
pub const TRUSTED_DEVICE_COOKIE: &str = "admin_mfa_trusted";

/// Token validity window: 30 days
pub const TRUSTED_DEVICE_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

type HmacSha256 = Hmac<Sha256>;

/// A freshly issued trusted-device cookie
#[derive(Debug, Clone)]
pub struct TrustedDeviceCookie {
    pub value: String,
    pub config: CookieConfig,
}

impl TrustedDeviceCookie {
    /// Full Set-Cookie header value
    pub fn set_cookie(&self) -> String {
        self.config.build_set_cookie(&self.value)
    }
}

fn sign(secret: &[u8], data: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Issue a token for a user who just passed MFA verification
pub fn issue(secret: &[u8], user_id: &str, secure: bool) -> TrustedDeviceCookie {
    issue_at(secret, user_id, secure, Utc::now().timestamp())
}

fn issue_at(secret: &[u8], user_id: &str, secure: bool, now: i64) -> TrustedDeviceCookie {
    let expires_at = now + TRUSTED_DEVICE_MAX_AGE_SECS;
    let signature = sign(secret, &format!("{user_id}:{expires_at}"));

    TrustedDeviceCookie {
        value: format!("{user_id}:{expires_at}:{signature}"),
        config: CookieConfig {
            name: TRUSTED_DEVICE_COOKIE.to_string(),
            secure,
            http_only: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age_secs: Some(TRUSTED_DEVICE_MAX_AGE_SECS),
        },
    }
}

/// Validate a trusted-device cookie against the session's user id
///
/// Absent, malformed, mismatched, expired, or badly signed values are all
/// simply "not trusted" - this never errors. The signature comparison is
/// constant-time.
pub fn validate(secret: &[u8], cookie_value: Option<&str>, expected_user_id: &str) -> bool {
    validate_at(secret, cookie_value, expected_user_id, Utc::now().timestamp())
}

fn validate_at(
    secret: &[u8],
    cookie_value: Option<&str>,
    expected_user_id: &str,
    now: i64,
) -> bool {
    let Some(value) = cookie_value else {
        return false;
    };

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() != 3 {
        return false;
    }
    let (user_id, expires_str, signature) = (parts[0], parts[1], parts[2]);

    if user_id != expected_user_id {
        return false;
    }

    let Ok(expires_at) = expires_str.parse::<i64>() else {
        return false;
    };
    if now > expires_at {
        return false;
    }

    let expected = sign(secret, &format!("{user_id}:{expires_at}"));
    constant_time_eq(expected.as_bytes(), signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-trusted-device-secret";
    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_round_trip() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);
        assert!(validate_at(SECRET, Some(&cookie.value), "user-1", NOW));
        assert!(validate_at(
            SECRET,
            Some(&cookie.value),
            "user-1",
            NOW + TRUSTED_DEVICE_MAX_AGE_SECS - 1
        ));
    }

    #[test]
    fn test_cookie_attributes() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);
        let header = cookie.set_cookie();
        assert!(header.starts_with("admin_mfa_trusted=user-1:"));
        assert!(header.contains("HttpOnly"));
        assert!(header.contains("Secure"));
        assert!(header.contains("SameSite=Lax"));
        assert!(header.contains("Path=/"));
        assert!(header.contains(&format!("Max-Age={TRUSTED_DEVICE_MAX_AGE_SECS}")));

        let insecure = issue_at(SECRET, "user-1", false, NOW);
        assert!(!insecure.set_cookie().contains("Secure"));
    }

    #[test]
    fn test_any_single_character_mutation_invalidates() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);

        for i in 0..cookie.value.len() {
            let mut bytes = cookie.value.clone().into_bytes();
            bytes[i] = if bytes[i] == b'x' { b'y' } else { b'x' };
            let mutated = String::from_utf8(bytes).unwrap();
            if mutated == cookie.value {
                continue;
            }
            assert!(
                !validate_at(SECRET, Some(&mutated), "user-1", NOW),
                "mutation at byte {i} should invalidate the token"
            );
        }
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);
        assert!(!validate_at(
            SECRET,
            Some(&cookie.value),
            "user-1",
            NOW + TRUSTED_DEVICE_MAX_AGE_SECS + 1
        ));
    }

    #[test]
    fn test_forged_expiry_is_rejected() {
        // Pushing the timestamp forward without re-signing must fail
        let cookie = issue_at(SECRET, "user-1", true, NOW - TRUSTED_DEVICE_MAX_AGE_SECS * 2);
        let parts: Vec<&str> = cookie.value.split(':').collect();
        let forged = format!("{}:{}:{}", parts[0], NOW + 1_000, parts[2]);
        assert!(!validate_at(SECRET, Some(&forged), "user-1", NOW));
    }

    #[test]
    fn test_wrong_user_is_rejected() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);
        assert!(!validate_at(SECRET, Some(&cookie.value), "user-2", NOW));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let cookie = issue_at(SECRET, "user-1", true, NOW);
        assert!(!validate_at(
            b"another-secret",
            Some(&cookie.value),
            "user-1",
            NOW
        ));
    }

    #[test]
    fn test_malformed_values_are_not_trusted() {
        assert!(!validate_at(SECRET, None, "user-1", NOW));
        assert!(!validate_at(SECRET, Some(""), "user-1", NOW));
        assert!(!validate_at(SECRET, Some("user-1"), "user-1", NOW));
        assert!(!validate_at(SECRET, Some("user-1:123"), "user-1", NOW));
        assert!(!validate_at(
            SECRET,
            Some("user-1:123:abc:extra"),
            "user-1",
            NOW
        ));
        assert!(!validate_at(
            SECRET,
            Some("user-1:not-a-number:abc"),
            "user-1",
            NOW
        ));
    }
}
