//! Session Model
//!
//! Per-request session state as reported by the hosted auth backend.
//! Nothing here is persisted; every request resolves a fresh view.

use base64::Engine;
use serde::Deserialize;

/// MFA assurance level of a session
///
/// `Aal1` means password-only, `Aal2` means a second factor was verified
/// during this session. Ordering matters: `Aal2 > Aal1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AssuranceLevel {
    Aal1,
    Aal2,
}

impl AssuranceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssuranceLevel::Aal1 => "aal1",
            AssuranceLevel::Aal2 => "aal2",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "aal1" => Some(AssuranceLevel::Aal1),
            "aal2" => Some(AssuranceLevel::Aal2),
            _ => None,
        }
    }
}

/// Current vs required assurance for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assurance {
    /// Level the session actually reached
    pub current: AssuranceLevel,
    /// Level the account is configured to require
    pub next: AssuranceLevel,
}

impl Assurance {
    /// MFA is required but has not been satisfied this session
    pub fn mfa_pending(&self) -> bool {
        self.next == AssuranceLevel::Aal2 && self.current != AssuranceLevel::Aal2
    }

    /// No second factor was ever enrolled for this account
    pub fn mfa_unenrolled(&self) -> bool {
        self.next == AssuranceLevel::Aal1 && self.current == AssuranceLevel::Aal1
    }

    /// Session is fully verified
    pub fn satisfied(&self) -> bool {
        self.current == AssuranceLevel::Aal2
    }
}

/// MFA factor as reported by the auth backend
#[derive(Debug, Clone, Deserialize)]
pub struct MfaFactor {
    pub id: String,
    #[serde(default)]
    pub factor_type: String,
    #[serde(default)]
    pub status: String,
}

impl MfaFactor {
    pub fn is_verified_totp(&self) -> bool {
        self.factor_type == "totp" && self.status == "verified"
    }
}

/// User identity from the auth backend
///
/// The id is an opaque stable identifier owned by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub factors: Vec<MfaFactor>,
}

impl AuthUser {
    /// Assurance level the account is configured to require
    ///
    /// `Aal2` as soon as the user has at least one verified TOTP factor.
    pub fn next_assurance_level(&self) -> AssuranceLevel {
        if self.factors.iter().any(MfaFactor::is_verified_totp) {
            AssuranceLevel::Aal2
        } else {
            AssuranceLevel::Aal1
        }
    }

    pub fn verified_totp_factors(&self) -> impl Iterator<Item = &MfaFactor> {
        self.factors.iter().filter(|f| f.is_verified_totp())
    }
}

/// Access/refresh token pair held in session cookies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Claims read from the access token payload
///
/// The payload is decoded, not verified - the backend already validated
/// the token before we look at it.
#[derive(Debug, Deserialize)]
struct AccessClaims {
    aal: Option<String>,
}

/// Decode the assurance level the session reached from its JWT `aal` claim
///
/// Returns `None` when the token is not a JWT, the payload does not decode,
/// or the claim is missing - callers treat that as a degraded signal, never
/// as an error.
pub fn decode_current_level(access_token: &str) -> Option<AssuranceLevel> {
    let payload = access_token.split('.').nth(1)?;
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let claims: AccessClaims = serde_json::from_slice(&bytes).ok()?;
    AssuranceLevel::parse(&claims.aal?)
}

/// Session resolved for a single request
#[derive(Debug, Clone, Default)]
pub struct ResolvedSession {
    /// `None` means unauthenticated
    pub user: Option<AuthUser>,
    /// `None` means the assurance signal is unavailable (degraded backend)
    pub assurance: Option<Assurance>,
    /// Set-Cookie values that must ride on whatever response goes out,
    /// carrying any token rotation the backend performed
    pub response_cookies: Vec<String>,
}

impl ResolvedSession {
    /// Unauthenticated session with no cookie side effects
    pub fn unauthenticated() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    fn fake_jwt(payload: &str) -> String {
        let engine = &base64::engine::general_purpose::URL_SAFE_NO_PAD;
        format!(
            "{}.{}.{}",
            engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            engine.encode(payload),
            engine.encode("sig")
        )
    }

    #[test]
    fn test_decode_current_level() {
        let token = fake_jwt(r#"{"sub":"u1","aal":"aal2"}"#);
        assert_eq!(decode_current_level(&token), Some(AssuranceLevel::Aal2));

        let token = fake_jwt(r#"{"sub":"u1","aal":"aal1"}"#);
        assert_eq!(decode_current_level(&token), Some(AssuranceLevel::Aal1));
    }

    #[test]
    fn test_decode_current_level_degraded_signals() {
        // Claim missing
        let token = fake_jwt(r#"{"sub":"u1"}"#);
        assert_eq!(decode_current_level(&token), None);

        // Unknown level
        let token = fake_jwt(r#"{"aal":"aal9"}"#);
        assert_eq!(decode_current_level(&token), None);

        // Not a JWT at all
        assert_eq!(decode_current_level("opaque-token"), None);
        assert_eq!(decode_current_level(""), None);

        // Payload is not base64/JSON
        assert_eq!(decode_current_level("a.!!!.c"), None);
    }

    #[test]
    fn test_assurance_predicates() {
        let pending = Assurance {
            current: AssuranceLevel::Aal1,
            next: AssuranceLevel::Aal2,
        };
        assert!(pending.mfa_pending());
        assert!(!pending.mfa_unenrolled());
        assert!(!pending.satisfied());

        let unenrolled = Assurance {
            current: AssuranceLevel::Aal1,
            next: AssuranceLevel::Aal1,
        };
        assert!(unenrolled.mfa_unenrolled());
        assert!(!unenrolled.mfa_pending());

        let satisfied = Assurance {
            current: AssuranceLevel::Aal2,
            next: AssuranceLevel::Aal2,
        };
        assert!(satisfied.satisfied());
        assert!(!satisfied.mfa_pending());
        assert!(!satisfied.mfa_unenrolled());
    }

    #[test]
    fn test_next_assurance_level_from_factors() {
        let mut user = AuthUser {
            id: "u1".to_string(),
            email: Some("a@b.c".to_string()),
            factors: vec![],
        };
        assert_eq!(user.next_assurance_level(), AssuranceLevel::Aal1);

        user.factors.push(MfaFactor {
            id: "f1".to_string(),
            factor_type: "totp".to_string(),
            status: "unverified".to_string(),
        });
        assert_eq!(user.next_assurance_level(), AssuranceLevel::Aal1);

        user.factors.push(MfaFactor {
            id: "f2".to_string(),
            factor_type: "totp".to_string(),
            status: "verified".to_string(),
        });
        assert_eq!(user.next_assurance_level(), AssuranceLevel::Aal2);
        assert_eq!(user.verified_totp_factors().count(), 1);
    }
}
