//! Access Guard
//!
//! Decides whether a request carrying an access/refresh token pair may
//! proceed, renewing tokens on the way when possible:
//!
//! | access  | refresh | outcome                                              |
//! |---------|---------|------------------------------------------------------|
//! | invalid | invalid | reject, clear both cookies                           |
//! | invalid | valid   | reissue access, pass if the new token verifies       |
//! | valid   | invalid | pass (refresh renewal attempted, failure tolerated)  |
//! | valid   | valid   | pass, renew refresh when close to expiry             |
//!
//! The global force-reset flag rejects everything before tokens are looked at.

use std::sync::Arc;

use chrono::Utc;

use crate::application::cookies::CookieChanges;
use crate::application::session_manager::SessionManager;
use crate::domain::repository::{UserStore, VerificationStore};
use crate::domain::value_object::{
    identity::IdentityClaim, reissue_target::ReissueTarget, token_pair::TokenPair,
};
use crate::error::{AuthError, AuthResult};

pub struct AccessGuard<U, V> {
    session: Arc<SessionManager<U, V>>,
}

impl<U, V> AccessGuard<U, V>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    pub fn new(session: Arc<SessionManager<U, V>>) -> Self {
        Self { session }
    }

    /// Check `tokens`, recording any cookie renewal or removal in `cookies`.
    /// Returns the identity of the access token the request proceeds with.
    pub async fn check(
        &self,
        tokens: &TokenPair,
        cookies: &mut CookieChanges,
    ) -> AuthResult<IdentityClaim> {
        if self.session.force_cookie_reset() {
            cookies.clear_all();
            tracing::warn!("Rejecting request while force cookie reset is active");
            return Err(AuthError::Unauthorized(
                "All sessions were reset. Please log in again".to_string(),
            ));
        }

        let codec = self.session.codec();
        let access = codec.verify_kind(&tokens.access_token, false);
        let refresh = codec.verify_kind(&tokens.refresh_token, true);

        match (access, refresh) {
            (Err(access_err), Err(refresh_err)) => {
                tracing::debug!(
                    access = %access_err,
                    refresh = %refresh_err,
                    "Both tokens rejected"
                );
                cookies.clear_all();
                Err(AuthError::Unauthorized(
                    "Access and refresh tokens are both invalid".to_string(),
                ))
            }
            (Err(access_err), Ok(_)) => {
                tracing::debug!(error = %access_err, "Access token rejected, renewing from refresh token");
                let renewed = self
                    .session
                    .reissue(tokens, ReissueTarget::Access, true, cookies)
                    .await
                    .inspect_err(|e| tracing::warn!(error = %e, "Access token renewal failed"))?
                    .tokens
                    .ok_or_else(|| AuthError::Internal("Reissue returned no tokens".to_string()))?;

                let claims = codec
                    .verify_kind(&renewed.access_token, false)
                    .inspect_err(|e| tracing::error!(error = %e, "Renewed access token failed verification"))?;
                Ok(claims.identity)
            }
            (Ok(access), Err(refresh_err)) => {
                tracing::debug!(error = %refresh_err, "Refresh token rejected, attempting renewal");
                match self
                    .session
                    .reissue(tokens, ReissueTarget::Refresh, true, cookies)
                    .await
                {
                    Ok(_) => {}
                    Err(e) if e.is_rejection() => {
                        tracing::debug!(error = %e, "Refresh token not renewed");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Refresh token renewal failed");
                        return Err(e);
                    }
                }
                Ok(access.identity)
            }
            (Ok(access), Ok(refresh)) => {
                let threshold = self.session.config().renewal_threshold()?;
                if refresh.remaining(Utc::now()) < threshold {
                    self.session
                        .reissue(tokens, ReissueTarget::Refresh, true, cookies)
                        .await
                        .inspect_err(|e| tracing::error!(error = %e, "Refresh token renewal failed"))?;
                }
                Ok(access.identity)
            }
        }
    }
}
