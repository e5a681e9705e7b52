//! Token Codec
//!
//! Stateless HS512-signed tokens in the compact JWS layout:
//! `base64url(header).base64url(payload).base64url(signature)`.
//!
//! Signed tokens carry a `Bearer ` prefix. Verification accepts a
//! case-insensitive `Bearer ` or `Base ` prefix, or none at all.

use chrono::{DateTime, TimeDelta, Utc};
use platform::crypto::{
    from_base64url, hmac_sha512, random_bytes, to_base64url, verify_hmac_sha512,
};
use serde::Deserialize;

use crate::domain::value_object::identity::{IdentityClaim, TokenClaims};
use crate::error::{AuthError, AuthResult};

pub const TOKEN_SCHEME: &str = "Bearer ";

const HEADER_JSON: &str = r#"{"alg":"HS512","typ":"JWT"}"#;
const ALGORITHM: &str = "HS512";
const ACCEPTED_SCHEMES: [&str; 2] = ["bearer ", "base "];

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Strip a leading `Bearer ` / `Base ` (any case)
pub fn strip_scheme(token: &str) -> &str {
    let token = token.trim();
    for scheme in ACCEPTED_SCHEMES {
        match token.get(..scheme.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => {
                return token[scheme.len()..].trim_start();
            }
            _ => {}
        }
    }
    token
}

/// Signs and verifies tokens with a shared secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign `identity` with expiry `now + ttl`
    pub fn sign(&self, identity: &IdentityClaim, ttl: TimeDelta) -> AuthResult<String> {
        self.sign_at(identity, ttl, Utc::now())
    }

    pub fn sign_at(
        &self,
        identity: &IdentityClaim,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> AuthResult<String> {
        let claims = TokenClaims {
            identity: identity.clone(),
            jti: to_base64url(&random_bytes(16)),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let payload = serde_json::to_vec(&claims)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token claims: {e}")))?;

        let signing_input = format!(
            "{}.{}",
            to_base64url(HEADER_JSON.as_bytes()),
            to_base64url(&payload)
        );
        let signature = hmac_sha512(&self.secret, signing_input.as_bytes());

        Ok(format!(
            "{TOKEN_SCHEME}{signing_input}.{}",
            to_base64url(&signature)
        ))
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> AuthResult<TokenClaims> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<TokenClaims> {
        let token = strip_scheme(token);
        if token.is_empty() {
            return Err(AuthError::TokenMissing);
        }

        let mut parts = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(AuthError::TokenInvalid);
        };

        let signature = from_base64url(signature).map_err(|_| AuthError::TokenInvalid)?;
        let signing_input = &token[..header.len() + 1 + payload.len()];
        if !verify_hmac_sha512(&self.secret, signing_input.as_bytes(), &signature) {
            return Err(AuthError::TokenInvalid);
        }

        let header: Header = decode_segment(header)?;
        if header.alg != ALGORITHM {
            return Err(AuthError::TokenInvalid);
        }

        let claims: TokenClaims = decode_segment(payload)?;
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Verify and additionally require the token kind (access or refresh)
    pub fn verify_kind(&self, token: &str, refresh: bool) -> AuthResult<TokenClaims> {
        let claims = self.verify(token)?;
        if claims.identity.is_refresh != refresh {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> AuthResult<T> {
    let bytes = from_base64url(segment).map_err(|_| AuthError::TokenInvalid)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenInvalid)
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret".to_vec())
    }

    fn identity(is_refresh: bool) -> IdentityClaim {
        IdentityClaim {
            subject_id: 1,
            login_id: "alice".to_string(),
            email: "alice@example.com".to_string(),
            is_refresh,
        }
    }

    #[test]
    fn test_sign_then_verify() {
        let token = codec().sign(&identity(false), TimeDelta::minutes(15)).unwrap();
        assert!(token.starts_with("Bearer "));
        assert_eq!(token.matches('.').count(), 2);

        let claims = codec().verify(&token).unwrap();
        assert_eq!(claims.identity, identity(false));
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_header_segment() {
        let token = codec().sign(&identity(false), TimeDelta::minutes(1)).unwrap();
        let header = strip_scheme(&token).split('.').next().unwrap();
        assert_eq!(from_base64url(header).unwrap(), HEADER_JSON.as_bytes());
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let token = codec().sign(&identity(false), TimeDelta::zero()).unwrap();
        assert!(matches!(codec().verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let token = codec()
            .sign_at(&identity(false), TimeDelta::seconds(10), now)
            .unwrap();
        assert!(codec().verify_at(&token, now + TimeDelta::seconds(9)).is_ok());
        assert!(matches!(
            codec().verify_at(&token, now + TimeDelta::seconds(10)),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_missing_token() {
        assert!(matches!(codec().verify(""), Err(AuthError::TokenMissing)));
        assert!(matches!(codec().verify("Bearer "), Err(AuthError::TokenMissing)));
    }

    #[test]
    fn test_garbage_is_invalid() {
        for token in ["abc", "a.b", "a.b.c", "a.b.c.d", "Bearer !!.??.**"] {
            assert!(
                matches!(codec().verify(token), Err(AuthError::TokenInvalid)),
                "{token}"
            );
        }
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = codec().sign(&identity(false), TimeDelta::minutes(1)).unwrap();
        let other = TokenCodec::new(b"other-secret".to_vec());
        assert!(matches!(other.verify(&token), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_tampered_payload_is_invalid() {
        let token = codec().sign(&identity(false), TimeDelta::minutes(1)).unwrap();
        let parts: Vec<&str> = strip_scheme(&token).split('.').collect();

        let mut claims: serde_json::Value =
            serde_json::from_slice(&from_base64url(parts[1]).unwrap()).unwrap();
        claims["uid"] = serde_json::json!(2);
        let forged_payload = to_base64url(&serde_json::to_vec(&claims).unwrap());
        let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

        assert!(matches!(codec().verify(&forged), Err(AuthError::TokenInvalid)));
    }

    #[test]
    fn test_scheme_prefixes() {
        let token = codec().sign(&identity(false), TimeDelta::minutes(1)).unwrap();
        let bare = strip_scheme(&token);

        assert!(codec().verify(bare).is_ok());
        assert!(codec().verify(&format!("bearer {bare}")).is_ok());
        assert!(codec().verify(&format!("BASE {bare}")).is_ok());
        assert_eq!(strip_scheme("Basic abc"), "Basic abc");
    }

    #[test]
    fn test_tokens_are_unique() {
        let now = Utc::now();
        let a = codec().sign_at(&identity(true), TimeDelta::days(2), now).unwrap();
        let b = codec().sign_at(&identity(true), TimeDelta::days(2), now).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_kind() {
        let access = codec().sign(&identity(false), TimeDelta::minutes(1)).unwrap();
        let refresh = codec().sign(&identity(true), TimeDelta::minutes(1)).unwrap();

        assert!(codec().verify_kind(&access, false).is_ok());
        assert!(codec().verify_kind(&refresh, true).is_ok());
        assert!(matches!(codec().verify_kind(&access, true), Err(AuthError::TokenInvalid)));
        assert!(matches!(codec().verify_kind(&refresh, false), Err(AuthError::TokenInvalid)));
    }
}
