//! Auth Middleware
//!
//! Guards protected routes with the access/refresh token pair and exposes the
//! authenticated user to handlers.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::access_guard::AccessGuard;
use crate::application::cookies::CookieChanges;
use crate::domain::repository::{UserStore, VerificationStore};
use crate::domain::value_object::auth_user::AuthUser;
use crate::error::AuthError;
use crate::presentation::handlers::{AuthAppState, apply_cookie_changes, token_pair_from_headers};

/// Middleware that requires a valid token pair
///
/// Renewed or cleared cookies are written to the response whether the
/// request passes or not.
pub async fn require_access_token<U, V>(
    State(state): State<AuthAppState<U, V>>,
    mut req: Request,
    next: Next,
) -> Response
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let tokens = token_pair_from_headers(state.session.config(), req.headers());
    let guard = AccessGuard::new(state.session.clone());

    let mut cookies = CookieChanges::default();
    let mut response = match guard.check(&tokens, &mut cookies).await {
        Ok(identity) => {
            req.extensions_mut().insert(AuthUser::from(&identity));
            next.run(req).await
        }
        Err(e) => e.into_response(),
    };

    apply_cookie_changes(state.session.config(), &cookies, response.headers_mut());
    response
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AuthError::Unauthorized("Authentication required".to_string()))
    }
}
