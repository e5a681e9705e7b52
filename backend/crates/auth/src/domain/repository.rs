//! Store Traits
//!
//! Interfaces for persistence. Implementations are in the infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{
    user::{NewUser, UserRecord},
    verification::VerificationEntry,
};
use crate::domain::value_object::credentials::UserLookup;
use crate::error::AuthResult;

/// User lookup and sign-up
#[trait_variant::make(UserStore: Send)]
pub trait LocalUserStore {
    /// First active (not soft-deleted) user matching every criterion set in
    /// `lookup`. An empty lookup matches nothing. Emails compare
    /// case-insensitively.
    async fn find(&self, lookup: &UserLookup) -> AuthResult<Option<UserRecord>>;

    /// Insert a new account. A taken email, login id or nickname is
    /// `AuthError::Conflict`.
    async fn register(&self, user: NewUser) -> AuthResult<UserRecord>;
}

/// Pending verification codes keyed by email address
///
/// Kept behind a trait so the map can live in a shared cache when the
/// service runs as several instances.
#[trait_variant::make(VerificationStore: Send)]
pub trait LocalVerificationStore {
    /// Get the pending entry for an email
    async fn get(&self, email: &str) -> AuthResult<Option<VerificationEntry>>;

    /// Insert or replace the entry for an email
    async fn set(&self, email: &str, entry: VerificationEntry) -> AuthResult<()>;

    /// Remove the entry for an email. Returns whether one existed.
    async fn delete(&self, email: &str) -> AuthResult<bool>;

    /// Remove the entry only if it is still the one issued at `issued_at`
    async fn delete_if_issued_at(&self, email: &str, issued_at: DateTime<Utc>) -> AuthResult<bool>;

    /// Snapshot of all pending entries
    async fn entries(&self) -> AuthResult<Vec<(String, VerificationEntry)>>;
}
