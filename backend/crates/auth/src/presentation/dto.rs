//! API DTOs (Data Transfer Objects)

use platform::password::ClearTextPassword;
use serde::{Deserialize, Serialize};

use crate::application::session_manager::{LoginOutput, ReissueOutput};
use crate::domain::value_object::{
    credentials::{LoginCredentials, Registration},
    email::Email,
    login_id::LoginId,
    nickname::Nickname,
};
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Login
// ============================================================================

/// Login request. Either `email` or `id` identifies the account.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub password: String,
}

impl LoginRequest {
    /// Validate field formats. Absent (or blank) identifiers stay `None`.
    pub fn into_credentials(self) -> AuthResult<LoginCredentials> {
        let email = non_blank(self.email).map(Email::new).transpose()?;
        let login_id = non_blank(self.id).map(LoginId::new).transpose()?;
        let password = ClearTextPassword::new(self.password)
            .map_err(|e| AuthError::BadRequest(e.to_string()))?;

        Ok(LoginCredentials {
            email,
            login_id,
            password,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Login response: public identity only, tokens travel in cookies
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub email: String,
    pub id: String,
    pub nickname: String,
}

impl From<LoginOutput> for LoginResponse {
    fn from(output: LoginOutput) -> Self {
        Self {
            email: output.email,
            id: output.login_id,
            nickname: output.nickname,
        }
    }
}

// ============================================================================
// Sign-up
// ============================================================================

/// Sign-up request. `nickname` defaults to the login id.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub id: String,
    #[serde(default)]
    pub nickname: Option<String>,
    pub password: String,
}

impl RegisterRequest {
    pub fn into_registration(self) -> AuthResult<Registration> {
        let email = Email::new(self.email)?;
        let login_id = LoginId::new(self.id)?;
        let nickname = match non_blank(self.nickname) {
            Some(nickname) => Nickname::new(nickname)?,
            None => Nickname::new(login_id.as_str())?,
        };
        let password = ClearTextPassword::new(self.password)
            .map_err(|e| AuthError::BadRequest(e.to_string()))?;

        Ok(Registration {
            email,
            login_id,
            nickname,
            password,
        })
    }
}

// ============================================================================
// Generic message
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
    pub success: bool,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

impl From<ReissueOutput> for MessageResponse {
    fn from(output: ReissueOutput) -> Self {
        Self {
            message: output.message,
            success: output.success,
        }
    }
}

// ============================================================================
// Email verification
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SendVerificationMailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: u32,
}

// ============================================================================
// Admin
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct ForceCookieResetRequest {
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(email: Option<&str>, id: Option<&str>, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.map(str::to_string),
            id: id.map(str::to_string),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_request_parses_json() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"id":"alice","password":"pw"}"#).unwrap();
        assert_eq!(req.id.as_deref(), Some("alice"));
        assert!(req.email.is_none());
    }

    #[test]
    fn test_into_credentials() {
        let creds = request(Some("Alice@Example.com"), None, "pw")
            .into_credentials()
            .unwrap();
        assert_eq!(creds.email.unwrap().as_str(), "alice@example.com");
        assert!(creds.login_id.is_none());
    }

    #[test]
    fn test_blank_identifiers_are_absent() {
        let creds = request(Some(""), Some("  "), "pw").into_credentials().unwrap();
        assert!(!creds.has_identifier());
    }

    #[test]
    fn test_register_request_defaults_nickname() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"Bob@Example.com","id":"bob_01","password":"pw"}"#,
        )
        .unwrap();
        let registration = req.into_registration().unwrap();
        assert_eq!(registration.email.as_str(), "bob@example.com");
        assert_eq!(registration.nickname.as_str(), "bob_01");
    }

    #[test]
    fn test_register_request_rejects_invalid_fields() {
        let req = |email: &str, id: &str, nickname: Option<&str>, password: &str| RegisterRequest {
            email: email.to_string(),
            id: id.to_string(),
            nickname: nickname.map(str::to_string),
            password: password.to_string(),
        };

        for bad in [
            req("bob", "bob_01", None, "pw"),
            req("bob@example.com", "b", None, "pw"),
            req("bob@example.com", "bob_01", Some(&"n".repeat(21)), "pw"),
            req("bob@example.com", "bob_01", None, ""),
        ] {
            assert!(matches!(bad.into_registration(), Err(AuthError::BadRequest(_))));
        }
    }

    #[test]
    fn test_invalid_fields_are_bad_request() {
        assert!(matches!(
            request(Some("not-an-email"), None, "pw").into_credentials(),
            Err(AuthError::BadRequest(_))
        ));
        assert!(matches!(
            request(None, Some("a!"), "pw").into_credentials(),
            Err(AuthError::BadRequest(_))
        ));
        assert!(matches!(
            request(None, Some("alice"), "").into_credentials(),
            Err(AuthError::BadRequest(_))
        ));
    }
}
