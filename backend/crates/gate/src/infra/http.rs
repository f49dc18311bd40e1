//! Hosted Auth Backend HTTP Client
//!
//! Implements [`AuthBackend`] against a GoTrue-style REST API
//! (`/token`, `/user`, `/logout`, `/factors`). Transport failures and 5xx
//! answers map to `BackendUnavailable`; rejection statuses map to the
//! operation-specific error so callers can tell "bad input" from "backend
//! down".

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::domain::backend::{AuthBackend, MfaEnrollment};
use crate::domain::session::{AuthUser, SessionTokens};
use crate::error::{GateError, GateResult};

/// Request timeout for every backend call; a slow backend must degrade the
/// request, not hang it
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP auth backend client
#[derive(Debug, Clone)]
pub struct HttpAuthBackend {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct EnrollTotp {
    secret: String,
    qr_code: Option<String>,
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EnrollResponse {
    id: String,
    totp: EnrollTotp,
}

#[derive(Debug, Deserialize)]
struct ChallengeResponse {
    id: String,
}

impl HttpAuthBackend {
    /// Create a client for the given auth API base URL (e.g.
    /// `https://project.example.co/auth/v1`)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success status to an error
    ///
    /// `rejected` is returned for the 4xx statuses the API uses to refuse
    /// the operation; anything else is a backend fault.
    fn check_status(status: reqwest::StatusCode, rejected: GateError) -> GateResult<()> {
        if status.is_success() {
            return Ok(());
        }
        if status.is_server_error() {
            return Err(GateError::BackendUnavailable(format!(
                "auth API answered {status}"
            )));
        }
        match status.as_u16() {
            400 | 401 | 403 | 404 | 422 => Err(rejected),
            _ => Err(GateError::Backend(format!(
                "unexpected auth API status {status}"
            ))),
        }
    }
}

impl AuthBackend for HttpAuthBackend {
    async fn password_sign_in(&self, email: &str, password: &str) -> GateResult<SessionTokens> {
        let response = self
            .http
            .post(self.url("/token?grant_type=password"))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        Self::check_status(response.status(), GateError::InvalidCredentials)?;

        let tokens: TokenResponse = response.json().await?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn refresh_session(&self, refresh_token: &str) -> GateResult<SessionTokens> {
        let response = self
            .http
            .post(self.url("/token?grant_type=refresh_token"))
            .header("apikey", &self.api_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        Self::check_status(response.status(), GateError::SessionInvalid)?;

        let tokens: TokenResponse = response.json().await?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }

    async fn get_user(&self, access_token: &str) -> GateResult<AuthUser> {
        let response = self
            .http
            .get(self.url("/user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_status(response.status(), GateError::SessionInvalid)?;

        Ok(response.json().await?)
    }

    async fn sign_out(&self, access_token: &str) -> GateResult<()> {
        let response = self
            .http
            .post(self.url("/logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_status(response.status(), GateError::SessionInvalid)
    }

    async fn mfa_enroll(&self, access_token: &str) -> GateResult<MfaEnrollment> {
        let response = self
            .http
            .post(self.url("/factors"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .json(&json!({ "factor_type": "totp" }))
            .send()
            .await?;

        Self::check_status(response.status(), GateError::SessionInvalid)?;

        let enrollment: EnrollResponse = response.json().await?;
        Ok(MfaEnrollment {
            factor_id: enrollment.id,
            secret: enrollment.totp.secret,
            qr_code: enrollment.totp.qr_code,
            uri: enrollment.totp.uri,
        })
    }

    async fn mfa_challenge(&self, access_token: &str, factor_id: &str) -> GateResult<String> {
        let response = self
            .http
            .post(self.url(&format!("/factors/{factor_id}/challenge")))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::check_status(
            response.status(),
            GateError::Backend("MFA challenge rejected".to_string()),
        )?;

        let challenge: ChallengeResponse = response.json().await?;
        Ok(challenge.id)
    }

    async fn mfa_verify(
        &self,
        access_token: &str,
        factor_id: &str,
        challenge_id: &str,
        code: &str,
    ) -> GateResult<SessionTokens> {
        let response = self
            .http
            .post(self.url(&format!("/factors/{factor_id}/verify")))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .json(&json!({ "challenge_id": challenge_id, "code": code }))
            .send()
            .await?;

        Self::check_status(response.status(), GateError::InvalidMfaCode)?;

        let tokens: TokenResponse = response.json().await?;
        Ok(SessionTokens {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let backend = HttpAuthBackend::new("https://auth.example.com/auth/v1/", "key");
        assert_eq!(
            backend.url("/user"),
            "https://auth.example.com/auth/v1/user"
        );
    }

    #[test]
    fn test_check_status_mapping() {
        use reqwest::StatusCode;

        assert!(HttpAuthBackend::check_status(StatusCode::OK, GateError::SessionInvalid).is_ok());

        let err = HttpAuthBackend::check_status(StatusCode::UNAUTHORIZED, GateError::SessionInvalid)
            .unwrap_err();
        assert!(matches!(err, GateError::SessionInvalid));

        let err = HttpAuthBackend::check_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            GateError::SessionInvalid,
        )
        .unwrap_err();
        assert!(matches!(err, GateError::BackendUnavailable(_)));

        let err = HttpAuthBackend::check_status(StatusCode::IM_A_TEAPOT, GateError::SessionInvalid)
            .unwrap_err();
        assert!(matches!(err, GateError::Backend(_)));
    }
}
