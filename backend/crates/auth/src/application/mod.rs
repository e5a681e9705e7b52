//! Application Layer
//!
//! Token handling, session flows and verification codes.

pub mod access_guard;
pub mod config;
pub mod cookies;
pub mod session_manager;
pub mod sweeper;
pub mod token_codec;
pub mod verification;

// Re-exports
pub use access_guard::AccessGuard;
pub use config::AuthConfig;
pub use cookies::{CookieChange, CookieChanges, TokenCookie};
pub use session_manager::{LoginOutput, ReissueOutput, SessionManager};
pub use sweeper::ExpirySweeper;
pub use token_codec::TokenCodec;
pub use verification::{VerificationCodes, VerificationContext};
