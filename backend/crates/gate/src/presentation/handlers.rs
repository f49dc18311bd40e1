//! Admin Auth Handlers
//!
//! Login, logout, and TOTP enrollment/verification for the admin area.
//! Every backend session is revoked the moment we find out the user is not
//! on the allow-list, so a valid password alone never yields a lingering
//! session for a non-admin.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};

use platform::cookie::{append_set_cookies, extract_cookie};

use crate::application::config::GateConfig;
use crate::domain::backend::AuthBackend;
use crate::domain::trusted_device::{self, TRUSTED_DEVICE_COOKIE};
use crate::error::{GateError, GateResult};
use crate::presentation::dto::{
    FactorDto, LoginRequest, LoginResponse, LogoutResponse, MfaEnrollResponse, MfaFactorsResponse,
    MfaVerifyRequest, MfaVerifyResponse,
};

/// Shared state for the admin auth routes
pub struct GateAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<GateConfig>,
}

impl<B> Clone for GateAppState<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: Arc::clone(&self.config),
        }
    }
}

/// POST /api/admin/auth/login
pub async fn login<B>(
    State(state): State<GateAppState<B>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> GateResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    if req.email.trim().is_empty() {
        return Err(GateError::MissingField("email"));
    }
    if req.password.is_empty() {
        return Err(GateError::MissingField("password"));
    }

    let tokens = state.backend.password_sign_in(&req.email, &req.password).await?;
    let user = state.backend.get_user(&tokens.access_token).await?;

    if !state.config.allow_list.permits(&user) {
        if let Err(e) = state.backend.sign_out(&tokens.access_token).await {
            tracing::warn!(error = %e, "Failed to revoke session of non-admin login");
        }
        return Err(GateError::NotAdmin);
    }

    let verified: Vec<_> = user.verified_totp_factors().collect();
    let (mfa, factor_id) = if verified.is_empty() {
        ("enroll", None)
    } else {
        let cookie = extract_cookie(&headers, TRUSTED_DEVICE_COOKIE);
        let trusted = trusted_device::validate(
            &state.config.trusted_device_secret,
            cookie.as_deref(),
            &user.id,
        );
        if trusted {
            ("none", None)
        } else {
            ("verify", Some(verified[0].id.clone()))
        }
    };

    tracing::info!(user_id = %user.id, mfa, "Admin login accepted");

    let mut response = Json(LoginResponse {
        success: true,
        mfa: mfa.to_string(),
        factor_id,
    })
    .into_response();
    let cookies = state.config.session_cookies(&tokens);
    append_set_cookies(response.headers_mut(), cookies.iter().map(String::as_str));
    Ok(response)
}

/// POST /api/admin/auth/logout
///
/// Always clears the session cookies, even when revocation at the backend
/// fails; the client must end up logged out either way.
pub async fn logout<B>(
    State(state): State<GateAppState<B>>,
    headers: HeaderMap,
) -> GateResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    if let Some(access) = extract_cookie(&headers, &state.config.access_cookie_name) {
        if let Err(e) = state.backend.sign_out(&access).await {
            tracing::debug!(error = %e, "Sign-out against auth backend failed");
        }
    }

    let mut response = Json(LogoutResponse { success: true }).into_response();
    let cookies = state.config.clear_session_cookies();
    append_set_cookies(response.headers_mut(), cookies.iter().map(String::as_str));
    Ok(response)
}

/// POST /api/admin/auth/mfa/enroll
pub async fn mfa_enroll<B>(
    State(state): State<GateAppState<B>>,
    headers: HeaderMap,
) -> GateResult<Json<MfaEnrollResponse>>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let access = extract_cookie(&headers, &state.config.access_cookie_name)
        .ok_or(GateError::SessionInvalid)?;
    let enrollment = state.backend.mfa_enroll(&access).await?;
    Ok(Json(enrollment.into()))
}

/// GET /api/admin/auth/mfa/factors
pub async fn mfa_factors<B>(
    State(state): State<GateAppState<B>>,
    headers: HeaderMap,
) -> GateResult<Json<MfaFactorsResponse>>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    let access = extract_cookie(&headers, &state.config.access_cookie_name)
        .ok_or(GateError::SessionInvalid)?;
    let user = state.backend.get_user(&access).await?;
    let factors = user.verified_totp_factors().map(FactorDto::from).collect();
    Ok(Json(MfaFactorsResponse { factors }))
}

/// POST /api/admin/auth/mfa/verify
///
/// A correct code upgrades the session to aal2 and marks the device as
/// trusted for 30 days.
pub async fn mfa_verify<B>(
    State(state): State<GateAppState<B>>,
    headers: HeaderMap,
    Json(req): Json<MfaVerifyRequest>,
) -> GateResult<Response>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    if req.factor_id.trim().is_empty() {
        return Err(GateError::MissingField("factorId"));
    }
    if req.code.trim().is_empty() {
        return Err(GateError::MissingField("code"));
    }

    let access = extract_cookie(&headers, &state.config.access_cookie_name)
        .ok_or(GateError::SessionInvalid)?;
    let user = state.backend.get_user(&access).await?;
    let challenge_id = state.backend.mfa_challenge(&access, &req.factor_id).await?;
    let tokens = state
        .backend
        .mfa_verify(&access, &req.factor_id, &challenge_id, &req.code)
        .await?;

    tracing::info!(user_id = %user.id, "MFA verification succeeded");

    let trusted = trusted_device::issue(
        &state.config.trusted_device_secret,
        &user.id,
        state.config.cookie_secure,
    );
    let mut response = Json(MfaVerifyResponse { success: true }).into_response();
    let mut cookies = state.config.session_cookies(&tokens);
    cookies.push(trusted.set_cookie());
    append_set_cookies(response.headers_mut(), cookies.iter().map(String::as_str));
    Ok(response)
}
