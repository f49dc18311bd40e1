//! Auth Backend Trait
//!
//! Seam to the hosted auth service. The HTTP implementation lives in the
//! infrastructure layer; tests substitute an in-memory mock.

use crate::domain::session::{AuthUser, SessionTokens};
use crate::error::GateResult;

/// TOTP enrollment data returned by the backend
#[derive(Debug, Clone)]
pub struct MfaEnrollment {
    pub factor_id: String,
    /// Base32 TOTP secret for manual entry
    pub secret: String,
    /// SVG QR code, when the backend renders one
    pub qr_code: Option<String>,
    /// otpauth:// provisioning URI
    pub uri: Option<String>,
}

/// Hosted auth backend operations the gate depends on
#[trait_variant::make(AuthBackend: Send)]
pub trait LocalAuthBackend {
    /// Exchange email + password for a session
    async fn password_sign_in(&self, email: &str, password: &str) -> GateResult<SessionTokens>;

    /// Rotate a session from its refresh token
    async fn refresh_session(&self, refresh_token: &str) -> GateResult<SessionTokens>;

    /// Validate an access token and fetch the user behind it
    async fn get_user(&self, access_token: &str) -> GateResult<AuthUser>;

    /// Revoke the session behind an access token
    async fn sign_out(&self, access_token: &str) -> GateResult<()>;

    /// Enroll a new TOTP factor for the session user
    async fn mfa_enroll(&self, access_token: &str) -> GateResult<MfaEnrollment>;

    /// Open a challenge for a factor, returning the challenge id
    async fn mfa_challenge(&self, access_token: &str, factor_id: &str) -> GateResult<String>;

    /// Verify a TOTP code against a challenge; success upgrades the session
    /// to aal2 and returns the rotated tokens
    async fn mfa_verify(
        &self,
        access_token: &str,
        factor_id: &str,
        challenge_id: &str,
        code: &str,
    ) -> GateResult<SessionTokens>;
}
