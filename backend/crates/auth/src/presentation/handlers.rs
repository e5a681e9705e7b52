//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::{extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::cookies::{CookieChange, CookieChanges};
use crate::application::session_manager::{LoginOutput, SessionManager};
use crate::domain::repository::{UserStore, VerificationStore};
use crate::domain::value_object::{
    auth_user::AuthUser, email::Email, reissue_target::ReissueTarget, token_pair::TokenPair,
};
use crate::error::AuthResult;
use crate::presentation::dto::{
    ForceCookieResetRequest, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
    SendVerificationMailRequest, VerifyCodeRequest,
};

/// Shared state for auth handlers
pub struct AuthAppState<U, V> {
    pub session: Arc<SessionManager<U, V>>,
}

impl<U, V> Clone for AuthAppState<U, V> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

// ============================================================================
// Sign-up / Authenticate
// ============================================================================

/// POST /auth/register
pub async fn register<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<MessageResponse>)>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let registration = req.into_registration()?;
    state.session.register(registration).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok("Registration complete")),
    ))
}

/// POST /auth/authenticate
///
/// Checks credentials without issuing tokens.
pub async fn authenticate<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<LoginResponse>>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let user = state.session.authenticate(req.into_credentials()?).await?;
    Ok(Json(LoginResponse::from(LoginOutput::from(user))))
}

// ============================================================================
// Login / Logout
// ============================================================================

/// POST /auth/login
pub async fn login<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Response>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let credentials = req.into_credentials()?;

    let mut cookies = CookieChanges::default();
    let output = state.session.login(credentials, &mut cookies).await?;

    Ok(with_cookie_changes(
        state.session.config(),
        &cookies,
        (StatusCode::OK, Json(LoginResponse::from(output))),
    ))
}

/// GET /auth/logout
pub async fn logout<U, V>(State(state): State<AuthAppState<U, V>>) -> Response
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let mut cookies = CookieChanges::default();
    state.session.logout(&mut cookies);

    with_cookie_changes(
        state.session.config(),
        &cookies,
        (StatusCode::OK, Json(MessageResponse::ok("Logged out"))),
    )
}

// ============================================================================
// Token Reissue
// ============================================================================

/// GET /auth/token/reissue/{kind}
pub async fn reissue<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Path(kind): Path<String>,
    headers: HeaderMap,
) -> AuthResult<Response>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let target: ReissueTarget = kind.parse()?;
    let tokens = token_pair_from_headers(state.session.config(), &headers);

    let mut cookies = CookieChanges::default();
    let output = state
        .session
        .reissue(&tokens, target, false, &mut cookies)
        .await?;

    Ok(with_cookie_changes(
        state.session.config(),
        &cookies,
        (StatusCode::OK, Json(MessageResponse::from(output))),
    ))
}

// ============================================================================
// Email Verification
// ============================================================================

/// POST /auth/mail
///
/// Issues a code and hands the mail context to the log; sending the mail
/// itself is not done here.
pub async fn send_verification_mail<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<SendVerificationMailRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let email = Email::new(req.email)?;
    let context = state.session.verification().issue(&email).await?;

    tracing::info!(email = %email, title = %context.title, "Verification mail prepared");
    tracing::debug!(code = context.verification_code, "Verification mail code");

    Ok(Json(MessageResponse::ok("Verification code sent")))
}

/// POST /auth/mail/verify
pub async fn verify_mail_code<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<VerifyCodeRequest>,
) -> AuthResult<Json<MessageResponse>>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let email = Email::new(req.email)?;
    state.session.verification().verify(&email, req.code).await?;

    Ok(Json(MessageResponse::ok("Email verified")))
}

// ============================================================================
// Current User (requires authentication)
// ============================================================================

/// GET /auth/me
pub async fn me(user: AuthUser) -> Json<AuthUser> {
    Json(user)
}

// ============================================================================
// Admin
// ============================================================================

/// PUT /admin/force-cookie-reset
pub async fn set_force_cookie_reset<U, V>(
    State(state): State<AuthAppState<U, V>>,
    Json(req): Json<ForceCookieResetRequest>,
) -> Json<MessageResponse>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    state.session.set_force_cookie_reset(req.force);

    Json(MessageResponse::ok(format!(
        "Force cookie reset is now {}",
        if req.force { "on" } else { "off" }
    )))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Read both token cookies; absent cookies become empty strings
pub(crate) fn token_pair_from_headers(config: &AuthConfig, headers: &HeaderMap) -> TokenPair {
    TokenPair {
        access_token: extract_cookie(headers, &config.access_cookie_name).unwrap_or_default(),
        refresh_token: extract_cookie(headers, &config.refresh_cookie_name).unwrap_or_default(),
    }
}

/// Append a `Set-Cookie` header per recorded change
pub(crate) fn apply_cookie_changes(
    config: &AuthConfig,
    changes: &CookieChanges,
    headers: &mut HeaderMap,
) {
    for change in changes.iter() {
        let cookie = config.cookie_config(change.cookie());
        let raw = match change {
            CookieChange::Set(_, value) => cookie.build_set_cookie(value),
            CookieChange::Clear(_) => cookie.build_delete_cookie(),
        };

        match set_cookie_header(&raw) {
            Some(value) => {
                headers.append(header::SET_COOKIE, value);
            }
            None => {
                tracing::error!(cookie = %cookie.name, "Cookie value is not a valid header");
            }
        }
    }
}

fn with_cookie_changes(
    config: &AuthConfig,
    changes: &CookieChanges,
    response: impl IntoResponse,
) -> Response {
    let mut response = response.into_response();
    apply_cookie_changes(config, changes, response.headers_mut());
    response
}

