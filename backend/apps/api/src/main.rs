//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! auth crate.

use std::env;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use auth::{
    AuthConfig, InMemoryVerificationStore, PgUserStore, SessionManager, admin_router, auth_router,
};
use axum::{
    Router, http,
    http::{Method, header},
};
use base64::Engine;
use base64::engine::general_purpose;
use platform::password::Argon2Hasher;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_ADMIN_LISTEN_ADDR: &str = "127.0.0.1:31114";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,auth=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = load_auth_config()?;
    tracing::info!(config = ?auth_config, "Auth configuration loaded");

    let pepper = match env::var("PASSWORD_PEPPER") {
        Ok(b64) => Some(
            general_purpose::STANDARD
                .decode(b64.trim())
                .context("PASSWORD_PEPPER must be base64")?,
        ),
        Err(_) => None,
    };

    let session = Arc::new(SessionManager::new(
        Arc::new(PgUserStore::new(pool.clone())),
        Arc::new(InMemoryVerificationStore::new()),
        Arc::new(Argon2Hasher::new(pepper)),
        Arc::new(auth_config),
    )?);

    // Background sweep of stale verification codes
    if session.register_email_verification_sweep().is_none() {
        tracing::info!("Email verification disabled, sweeper not started");
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

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
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    // Build routers
    let app = Router::new()
        .nest("/auth", auth_router(session.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let admin = admin_router(session).layer(TraceLayer::new_for_http());

    // Start servers
    let addr = listen_addr("LISTEN_ADDR", DEFAULT_LISTEN_ADDR)?;
    let admin_addr = listen_addr("ADMIN_LISTEN_ADDR", DEFAULT_ADMIN_LISTEN_ADDR)?;
    if !admin_addr.ip().is_loopback() {
        tracing::warn!(%admin_addr, "Admin listener is not bound to loopback");
    }

    let listener = TcpListener::bind(addr).await?;
    let admin_listener = TcpListener::bind(admin_addr).await?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("Admin listening on {}", admin_addr);

    tokio::try_join!(
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .into_future(),
        axum::serve(admin_listener, admin).into_future(),
    )?;

    Ok(())
}

fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let base = match env::var("JWT_SECRET_KEY") {
        Ok(secret) if !secret.is_empty() => AuthConfig {
            jwt_secret: secret.into_bytes(),
            ..AuthConfig::default()
        },
        _ if cfg!(debug_assertions) => {
            tracing::warn!("JWT_SECRET_KEY not set, using a random secret");
            AuthConfig::with_random_secret()
        }
        _ => anyhow::bail!("JWT_SECRET_KEY must be set in production"),
    };

    Ok(AuthConfig {
        email_verification_enabled: env_flag("USE_EMAIL_VERIFIED", false),
        verification_code_ttl: verification_code_ttl(
            env::var("EMAIL_VERIFICATION_EXPIRY_MINUTES").ok().as_deref(),
        )?,
        cookie_secure: env_flag("COOKIE_SECURE", true),
        ..base
    })
}

/// `EMAIL_VERIFICATION_EXPIRY_MINUTES`, 10 minutes when unset
fn verification_code_ttl(raw: Option<&str>) -> anyhow::Result<Duration> {
    let minutes: u64 = match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .context("EMAIL_VERIFICATION_EXPIRY_MINUTES must be a whole number")?,
        None => 10,
    };
    let secs = minutes
        .checked_mul(60)
        .context("EMAIL_VERIFICATION_EXPIRY_MINUTES is too large")?;
    Ok(Duration::from_secs(secs))
}

fn env_flag(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

fn listen_addr(name: &str, default: &str) -> anyhow::Result<SocketAddr> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .with_context(|| format!("{name} is not a valid socket address: {raw}"))
}
