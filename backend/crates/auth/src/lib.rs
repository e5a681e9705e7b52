//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, store traits
//! - `application/` - Token codec, session flows, access guard, verification codes
//! - `infra/` - PostgreSQL and in-memory stores
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Sign-up with Argon2id password hashing
//! - Login by email or login id + password
//! - Stateless HS512 access (15 min) / refresh (1 day) tokens in HttpOnly cookies
//! - Transparent token renewal on protected routes
//! - Global "force cookie reset" kill switch
//! - Six-digit email verification codes with background expiry sweep
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, compared off the async executor
//! - Access and refresh tokens are not interchangeable
//! - Tokens are not revocable before expiry; the reset flag is the escape hatch

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::session_manager::SessionManager;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserStore, InMemoryVerificationStore, PgUserStore};
pub use presentation::router::{admin_router, auth_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
