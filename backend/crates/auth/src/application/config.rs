//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;
use platform::cookie::CookieConfig;

use crate::application::cookies::TokenCookie;
use crate::error::{AuthError, AuthResult};

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Access token cookie name
    pub access_cookie_name: String,
    /// Refresh token cookie name
    pub refresh_cookie_name: String,
    /// HMAC-SHA512 token signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh token lifetime (1 day)
    pub refresh_token_ttl: Duration,
    /// Refresh token is renewed by the guard once it has less than this left (60 minutes)
    pub refresh_renewal_threshold: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Whether email verification codes are swept in the background
    pub email_verification_enabled: bool,
    /// Verification code lifetime (10 minutes)
    pub verification_code_ttl: Duration,
    /// How often stale verification codes are swept (1 minute)
    pub verification_sweep_period: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_cookie_name: "accessToken".to_string(),
            refresh_cookie_name: "refreshToken".to_string(),
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60),
            refresh_token_ttl: Duration::from_secs(24 * 3600),
            refresh_renewal_threshold: Duration::from_secs(60 * 60),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            email_verification_enabled: false,
            verification_code_ttl: Duration::from_secs(10 * 60),
            verification_sweep_period: Duration::from_secs(60),
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 64];
        rand::rng().fill_bytes(&mut secret);
        Self {
            jwt_secret: secret.to_vec(),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    pub fn access_ttl(&self) -> AuthResult<TimeDelta> {
        to_time_delta(self.access_token_ttl, "access token TTL")
    }

    pub fn refresh_ttl(&self) -> AuthResult<TimeDelta> {
        to_time_delta(self.refresh_token_ttl, "refresh token TTL")
    }

    pub fn renewal_threshold(&self) -> AuthResult<TimeDelta> {
        to_time_delta(self.refresh_renewal_threshold, "refresh renewal threshold")
    }

    pub fn verification_ttl(&self) -> AuthResult<TimeDelta> {
        to_time_delta(self.verification_code_ttl, "verification code TTL")
    }

    pub fn cookie_name(&self, cookie: TokenCookie) -> &str {
        match cookie {
            TokenCookie::Access => &self.access_cookie_name,
            TokenCookie::Refresh => &self.refresh_cookie_name,
        }
    }

    /// Cookie attributes for one of the token cookies
    pub fn cookie_config(&self, cookie: TokenCookie) -> CookieConfig {
        CookieConfig {
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            ..CookieConfig::named(self.cookie_name(cookie))
        }
    }
}

fn to_time_delta(duration: Duration, what: &str) -> AuthResult<TimeDelta> {
    TimeDelta::from_std(duration).map_err(|e| AuthError::Internal(format!("Invalid {what}: {e}")))
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("refresh_renewal_threshold", &self.refresh_renewal_threshold)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .field("email_verification_enabled", &self.email_verification_enabled)
            .field("verification_code_ttl", &self.verification_code_ttl)
            .field("verification_sweep_period", &self.verification_sweep_period)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl().unwrap(), TimeDelta::minutes(15));
        assert_eq!(config.refresh_ttl().unwrap(), TimeDelta::days(1));
        assert_eq!(config.renewal_threshold().unwrap(), TimeDelta::minutes(60));
        assert_eq!(config.verification_ttl().unwrap(), TimeDelta::minutes(10));
    }

    #[test]
    fn test_random_secret() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.jwt_secret.len(), 64);
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn test_cookie_config() {
        let config = AuthConfig::development();
        let access = config.cookie_config(TokenCookie::Access);
        assert_eq!(access.name, "accessToken");
        assert!(access.http_only);
        assert!(!access.secure);
        assert_eq!(config.cookie_config(TokenCookie::Refresh).name, "refreshToken");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig {
            jwt_secret: b"super-secret".to_vec(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
