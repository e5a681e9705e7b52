//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::session_manager::SessionManager;
use crate::domain::repository::{UserStore, VerificationStore};
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_access_token;

/// Public auth routes, meant to be nested under `/auth`
pub fn auth_router<U, V>(session: Arc<SessionManager<U, V>>) -> Router
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    let state = AuthAppState { session };

    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_access_token::<U, V>,
        ));

    Router::new()
        .route("/register", post(handlers::register::<U, V>))
        .route("/authenticate", post(handlers::authenticate::<U, V>))
        .route("/login", post(handlers::login::<U, V>))
        .route("/logout", get(handlers::logout::<U, V>))
        .route("/token/reissue/{kind}", get(handlers::reissue::<U, V>))
        .route("/mail", post(handlers::send_verification_mail::<U, V>))
        .route("/mail/verify", post(handlers::verify_mail_code::<U, V>))
        .merge(protected)
        .with_state(state)
}

/// Administrative routes. Serve these on an internal listener only.
pub fn admin_router<U, V>(session: Arc<SessionManager<U, V>>) -> Router
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/admin/force-cookie-reset",
            put(handlers::set_force_cookie_reset::<U, V>),
        )
        .with_state(AuthAppState { session })
}
