//! Site Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod contact;
mod pages;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use gate::{
    GateConfig, GateMiddlewareState, HttpAuthBackend, admin_auth_router, admin_gate,
    domain::allow_list::AdminAllowList,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "site=info,gate=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Admin allow-list
    let allow_list = AdminAllowList::from_csv(
        &env::var("ADMIN_ALLOWED_EMAILS").unwrap_or_default(),
    );
    if allow_list.is_empty() {
        tracing::warn!("ADMIN_ALLOWED_EMAILS is empty, no account can reach the admin area");
    } else {
        tracing::info!(admins = allow_list.len(), "Admin allow-list loaded");
    }

    // Gate configuration. The trusted-device secret must come from the
    // environment in production so it survives restarts; in development a
    // random per-process secret is fine.
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let gate_config = if app_env == "production" {
        let secret = env::var("TRUSTED_DEVICE_SECRET")
            .expect("TRUSTED_DEVICE_SECRET must be set in production");
        GateConfig {
            allow_list,
            trusted_device_secret: secret.into_bytes(),
            ..GateConfig::default()
        }
    } else if let Ok(secret) = env::var("TRUSTED_DEVICE_SECRET") {
        GateConfig {
            allow_list,
            trusted_device_secret: secret.into_bytes(),
            cookie_secure: false,
            ..GateConfig::default()
        }
    } else {
        GateConfig {
            allow_list,
            ..GateConfig::development()
        }
    };
    let gate_config = Arc::new(gate_config);

    // Hosted auth backend client
    let auth_url =
        env::var("AUTH_BACKEND_URL").expect("AUTH_BACKEND_URL must be set in environment");
    let auth_key =
        env::var("AUTH_BACKEND_API_KEY").expect("AUTH_BACKEND_API_KEY must be set in environment");
    let auth_backend = HttpAuthBackend::new(auth_url, auth_key);

    let gate_state = GateMiddlewareState::new(
        Arc::new(auth_backend.clone()),
        Arc::clone(&gate_config),
    );

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
        ]))
        .allow_credentials(true);

    // Build router; the gate middleware wraps everything so admin routes
    // cannot be mounted outside it by accident
    let app = Router::new()
        .merge(pages::router())
        .nest(
            "/api/admin/auth",
            admin_auth_router(auth_backend, Arc::clone(&gate_config)),
        )
        .nest("/api/contact", contact::router())
        .layer(middleware::from_fn_with_state(
            gate_state,
            admin_gate::<HttpAuthBackend>,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
