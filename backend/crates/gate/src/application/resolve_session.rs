//! Resolve Session Use Case
//!
//! Resolves the caller's session against the hosted auth backend, once per
//! request. Token rotation performed by the backend is captured as
//! Set-Cookie values on the output; dropping them would log the client out
//! or wedge it in a refresh loop.
//!
//! This use case never fails: every backend error degrades to an
//! unauthenticated session (fail closed), logged server-side.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::application::config::GateConfig;
use crate::domain::backend::AuthBackend;
use crate::domain::session::{
    Assurance, AuthUser, ResolvedSession, SessionTokens, decode_current_level,
};
use crate::error::{GateError, GateResult};

/// Session resolver
pub struct ResolveSessionUseCase<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    backend: Arc<B>,
    config: Arc<GateConfig>,
}

impl<B> ResolveSessionUseCase<B>
where
    B: AuthBackend + Clone + Send + Sync + 'static,
{
    pub fn new(backend: Arc<B>, config: Arc<GateConfig>) -> Self {
        Self { backend, config }
    }

    /// Resolve the session carried by a request's cookies
    ///
    /// Single attempt per request: the one refresh on a stale access token
    /// is part of resolution, not a retry. Transient backend failures make
    /// this request unauthenticated.
    pub async fn resolve(&self, headers: &HeaderMap) -> ResolvedSession {
        let access = platform::cookie::extract_cookie(headers, &self.config.access_cookie_name);
        let refresh = platform::cookie::extract_cookie(headers, &self.config.refresh_cookie_name);

        match self.resolve_inner(access, refresh).await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Session resolution degraded to unauthenticated");
                ResolvedSession::unauthenticated()
            }
        }
    }

    async fn resolve_inner(
        &self,
        access: Option<String>,
        refresh: Option<String>,
    ) -> GateResult<ResolvedSession> {
        let (user, tokens, rotated) = match access {
            Some(access) => match self.backend.get_user(&access).await {
                Ok(user) => {
                    let refresh = refresh.unwrap_or_default();
                    (
                        user,
                        SessionTokens {
                            access_token: access,
                            refresh_token: refresh,
                        },
                        false,
                    )
                }
                // Expired/invalid access token: one refresh if we can,
                // otherwise the request is simply unauthenticated
                Err(GateError::SessionInvalid) => match refresh {
                    Some(refresh) => self.refresh_and_fetch(&refresh).await?,
                    None => return Ok(ResolvedSession::unauthenticated()),
                },
                Err(e) => return Err(e),
            },
            None => match refresh {
                Some(refresh) => self.refresh_and_fetch(&refresh).await?,
                None => return Ok(ResolvedSession::unauthenticated()),
            },
        };

        let assurance = decode_current_level(&tokens.access_token).map(|current| Assurance {
            current,
            next: user.next_assurance_level(),
        });
        if assurance.is_none() {
            tracing::debug!(user_id = %user.id, "No assurance level in access token");
        }

        let response_cookies = if rotated {
            self.config.session_cookies(&tokens)
        } else {
            Vec::new()
        };

        Ok(ResolvedSession {
            user: Some(user),
            assurance,
            response_cookies,
        })
    }

    async fn refresh_and_fetch(
        &self,
        refresh_token: &str,
    ) -> GateResult<(AuthUser, SessionTokens, bool)> {
        let tokens = self.backend.refresh_session(refresh_token).await?;
        let user = self.backend.get_user(&tokens.access_token).await?;
        Ok((user, tokens, true))
    }
}
