//! Contact Form Endpoint
//!
//! Accepts contact-form submissions from the public site, with a
//! per-client-IP fixed-window rate limit (3 submissions per 15 minutes).
//! The limiter is process-local and advisory; it throttles noisy clients,
//! it is not a security boundary.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::routing::post;
use serde::{Deserialize, Serialize};

use kernel::error::app_error::{AppError, AppResult};
use platform::client::extract_client_ip;
use platform::rate_limit::{MemoryRateLimitStore, RateLimitConfig, RateLimitStore};

const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Clone)]
pub struct ContactState {
    store: Arc<MemoryRateLimitStore>,
    limit: RateLimitConfig,
}

impl ContactState {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryRateLimitStore::new()),
            // 3 submissions per 15 minutes per client IP
            limit: RateLimitConfig::new(3, 15 * 60),
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/", post(submit))
        .with_state(ContactState::new())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
}

/// POST /api/contact
pub async fn submit(
    State(state): State<ContactState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<ContactRequest>,
) -> AppResult<Json<ContactResponse>> {
    let client_ip = extract_client_ip(&headers, Some(addr.ip()))
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let result = state
        .store
        .check_and_increment(&format!("contact:{client_ip}"), &state.limit)
        .await
        .map_err(|e| AppError::internal("Rate limit check failed").with_source(e))?;

    if !result.allowed {
        tracing::warn!(%client_ip, "Contact form rate limit exceeded");
        return Err(AppError::too_many_requests(
            "Too many submissions, please try again later",
        ));
    }

    validate(&req)?;

    // Delivery to the inbox happens out of band; the submission is only
    // acknowledged and logged here.
    tracing::info!(
        %client_ip,
        name = %req.name,
        email = %req.email,
        message_len = req.message.len(),
        "Contact form submission accepted"
    );

    Ok(Json(ContactResponse { success: true }))
}

fn validate(req: &ContactRequest) -> AppResult<()> {
    if req.name.trim().is_empty() {
        return Err(AppError::bad_request("Name is required"));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(AppError::bad_request("A valid email address is required"));
    }
    if req.message.trim().is_empty() {
        return Err(AppError::bad_request("Message is required"));
    }
    if req.message.len() > MAX_MESSAGE_LEN {
        return Err(AppError::bad_request("Message is too long"));
    }
    Ok(())
}
