//! Session Manager
//!
//! Owns the token codec and drives sign-up, login, logout and token reissue. It also
//! holds the global "force cookie reset" flag consulted by the access guard.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use platform::password::PasswordHasher;
use tokio::task::JoinHandle;

use crate::application::config::AuthConfig;
use crate::application::cookies::{CookieChanges, TokenCookie};
use crate::application::sweeper::ExpirySweeper;
use crate::application::token_codec::{TokenCodec, strip_scheme};
use crate::application::verification::VerificationCodes;
use crate::domain::entity::user::{NewUser, UserRecord};
use crate::domain::repository::{UserStore, VerificationStore};
use crate::domain::value_object::{
    credentials::{LoginCredentials, Registration},
    identity::{IdentityClaim, Subject},
    reissue_target::ReissueTarget,
    token_pair::TokenPair,
};
use crate::error::{AuthError, AuthResult};

/// Public identity returned by sign-up, authentication and login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutput {
    pub email: String,
    pub login_id: String,
    pub nickname: String,
}

impl From<UserRecord> for LoginOutput {
    fn from(user: UserRecord) -> Self {
        Self {
            email: user.email,
            login_id: user.login_id,
            nickname: user.nickname,
        }
    }
}

/// Reissue result. `tokens` is only populated when the caller asked for them.
#[derive(Debug, Clone)]
pub struct ReissueOutput {
    pub message: String,
    pub success: bool,
    pub tokens: Option<TokenPair>,
}

pub struct SessionManager<U, V> {
    user_store: Arc<U>,
    hasher: Arc<dyn PasswordHasher>,
    verification: VerificationCodes<V>,
    codec: TokenCodec,
    config: Arc<AuthConfig>,
    force_cookie_reset: AtomicBool,
}

impl<U, V> SessionManager<U, V>
where
    U: UserStore + Send + Sync + 'static,
    V: VerificationStore + Send + Sync + 'static,
{
    pub fn new(
        user_store: Arc<U>,
        verification_store: Arc<V>,
        hasher: Arc<dyn PasswordHasher>,
        config: Arc<AuthConfig>,
    ) -> AuthResult<Self> {
        if config.jwt_secret.is_empty() {
            return Err(AuthError::Internal(
                "Token signing secret is not configured".to_string(),
            ));
        }

        let verification = VerificationCodes::new(verification_store, config.verification_ttl()?);

        Ok(Self {
            user_store,
            hasher,
            verification,
            codec: TokenCodec::new(config.jwt_secret.clone()),
            config,
            force_cookie_reset: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn verification(&self) -> &VerificationCodes<V> {
        &self.verification
    }

    // ------------------------------------------------------------------
    // Tokens
    // ------------------------------------------------------------------

    /// Sign an access or refresh token for `subject`
    pub fn generate_token(&self, subject: &Subject, is_refresh: bool) -> AuthResult<String> {
        let ttl = if is_refresh {
            self.config.refresh_ttl()?
        } else {
            self.config.access_ttl()?
        };
        self.codec.sign(&IdentityClaim::new(subject, is_refresh), ttl)
    }

    pub fn sign_token_pair(&self, subject: &Subject) -> AuthResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_token(subject, false)?,
            refresh_token: self.generate_token(subject, true)?,
        })
    }

    // ------------------------------------------------------------------
    // Sign-up
    // ------------------------------------------------------------------

    /// Hash the password and store a new account. No cookies are set.
    pub async fn register(&self, registration: Registration) -> AuthResult<LoginOutput> {
        let hasher = Arc::clone(&self.hasher);
        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hash task failed: {e}")))??;

        let user = self
            .user_store
            .register(NewUser {
                login_id: registration.login_id.as_str().to_string(),
                nickname: registration.nickname.as_str().to_string(),
                email: registration.email.into_inner(),
                password_hash,
            })
            .await?;

        tracing::info!(uid = user.uid, "User registered");

        Ok(user.into())
    }

    // ------------------------------------------------------------------
    // Login / logout
    // ------------------------------------------------------------------

    /// Resolve credentials to a stored user and check the password
    pub async fn authenticate(&self, credentials: LoginCredentials) -> AuthResult<UserRecord> {
        if !credentials.has_identifier() {
            return Err(AuthError::CredentialsMissing);
        }

        let user = self
            .user_store
            .find(&credentials.lookup())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "User lookup failed"))?
            .ok_or(AuthError::UserNotFound)?;

        let hasher = Arc::clone(&self.hasher);
        let password = credentials.password;
        let password_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("Password check task failed: {e}")))??;

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Authenticate and set both token cookies
    pub async fn login(
        &self,
        credentials: LoginCredentials,
        cookies: &mut CookieChanges,
    ) -> AuthResult<LoginOutput> {
        let user = self.authenticate(credentials).await?;
        let tokens = self.sign_token_pair(&user.subject())?;

        cookies.set(TokenCookie::Access, tokens.access_token);
        cookies.set(TokenCookie::Refresh, tokens.refresh_token);

        tracing::info!(uid = user.uid, "User logged in");

        Ok(user.into())
    }

    /// Clear both token cookies. Tokens themselves stay valid until expiry.
    pub fn logout(&self, cookies: &mut CookieChanges) {
        cookies.clear_all();
    }

    // ------------------------------------------------------------------
    // Reissue
    // ------------------------------------------------------------------

    /// Mint a new token pair from the refresh token in `existing` and set the
    /// cookies selected by `target`.
    pub async fn reissue(
        &self,
        existing: &TokenPair,
        target: ReissueTarget,
        return_tokens: bool,
        cookies: &mut CookieChanges,
    ) -> AuthResult<ReissueOutput> {
        if existing.is_empty() {
            return Err(AuthError::BadRequest("No token to verify".to_string()));
        }

        let claims = self
            .codec
            .verify_kind(strip_scheme(&existing.refresh_token), true)
            .map_err(|e| {
                tracing::debug!(error = %e, "Refresh token rejected");
                AuthError::Unauthorized("Refresh token is no longer valid".to_string())
            })?;

        let subject = claims.identity.subject();
        let tokens = self.sign_token_pair(&subject)?;

        if target.includes_access() {
            cookies.set(TokenCookie::Access, tokens.access_token.clone());
        }
        if target.includes_refresh() {
            cookies.set(TokenCookie::Refresh, tokens.refresh_token.clone());
        }

        tracing::info!(uid = subject.subject_id, target = %target, "Tokens reissued");

        Ok(ReissueOutput {
            message: format!("Reissued {target} token"),
            success: true,
            tokens: return_tokens.then_some(tokens),
        })
    }

    // ------------------------------------------------------------------
    // Force cookie reset
    // ------------------------------------------------------------------

    pub fn force_cookie_reset(&self) -> bool {
        self.force_cookie_reset.load(Ordering::Acquire)
    }

    pub fn set_force_cookie_reset(&self, force: bool) {
        self.force_cookie_reset.store(force, Ordering::Release);
        tracing::warn!(force, "Force cookie reset flag changed");
    }

    // ------------------------------------------------------------------
    // Background work
    // ------------------------------------------------------------------

    /// Start the verification code sweeper if email verification is enabled
    pub fn register_email_verification_sweep(&self) -> Option<JoinHandle<()>> {
        if !self.config.email_verification_enabled {
            return None;
        }

        tracing::info!(
            period_secs = self.config.verification_sweep_period.as_secs(),
            "Starting verification code sweeper"
        );
        let sweeper = ExpirySweeper::new(
            self.verification.clone(),
            self.config.verification_sweep_period,
        );
        Some(sweeper.spawn())
    }
}
