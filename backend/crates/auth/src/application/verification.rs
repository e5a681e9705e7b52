//! Email Verification Codes
//!
//! Issues six-digit one-time codes, checks them, and sweeps stale ones.
//! Delivery of the code is left to the caller, which receives the template
//! context for the mail.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use platform::crypto::random_in_range;
use serde::Serialize;

use crate::domain::entity::verification::VerificationEntry;
use crate::domain::repository::VerificationStore;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

const CODE_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;
const MAIL_TITLE: &str = "Email verification";
const PROJECT_OWNER: &str = "Admin";

/// Template context for the verification mail
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationContext {
    pub title: String,
    pub verification_code: u32,
    pub project_owner: String,
}

/// Verification code service over a [`VerificationStore`]
pub struct VerificationCodes<V> {
    store: Arc<V>,
    ttl: TimeDelta,
}

impl<V> Clone for VerificationCodes<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ttl: self.ttl,
        }
    }
}

impl<V> VerificationCodes<V>
where
    V: VerificationStore + Send + Sync,
{
    pub fn new(store: Arc<V>, ttl: TimeDelta) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &V {
        &self.store
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Issue a fresh code for `email`, replacing any pending one
    pub async fn issue(&self, email: &Email) -> AuthResult<VerificationContext> {
        self.issue_at(email, Utc::now()).await
    }

    pub async fn issue_at(&self, email: &Email, now: DateTime<Utc>) -> AuthResult<VerificationContext> {
        let code = random_in_range(CODE_RANGE);
        self.store
            .set(email.as_str(), VerificationEntry::new(code, now))
            .await?;

        tracing::debug!(email = %email, "Verification code issued");

        Ok(VerificationContext {
            title: MAIL_TITLE.to_string(),
            verification_code: code,
            project_owner: PROJECT_OWNER.to_string(),
        })
    }

    /// Check `code` against the pending entry. The entry is consumed on
    /// success and when found stale.
    pub async fn verify(&self, email: &Email, code: u32) -> AuthResult<()> {
        self.verify_at(email, code, Utc::now()).await
    }

    pub async fn verify_at(&self, email: &Email, code: u32, now: DateTime<Utc>) -> AuthResult<()> {
        let Some(entry) = self.store.get(email.as_str()).await? else {
            return Err(AuthError::BadRequest(
                "No verification code is pending for this email".to_string(),
            ));
        };

        if entry.is_stale(self.ttl, now) {
            self.store
                .delete_if_issued_at(email.as_str(), entry.issued_at)
                .await?;
            return Err(AuthError::BadRequest(
                "Verification code has expired".to_string(),
            ));
        }

        if entry.code != code {
            return Err(AuthError::BadRequest(
                "Verification code does not match".to_string(),
            ));
        }

        self.store
            .delete_if_issued_at(email.as_str(), entry.issued_at)
            .await?;
        tracing::info!(email = %email, "Email verified");
        Ok(())
    }

    /// Remove every entry older than the code TTL. Returns how many were removed.
    pub async fn sweep(&self) -> AuthResult<usize> {
        self.sweep_at(Utc::now()).await
    }

    pub async fn sweep_at(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut removed = 0;
        for (email, entry) in self.store.entries().await? {
            if entry.is_stale(self.ttl, now)
                && self.store.delete_if_issued_at(&email, entry.issued_at).await?
            {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryVerificationStore;

    fn codes() -> VerificationCodes<InMemoryVerificationStore> {
        VerificationCodes::new(
            Arc::new(InMemoryVerificationStore::new()),
            TimeDelta::minutes(10),
        )
    }

    fn email(raw: &str) -> Email {
        Email::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_issue_stores_six_digit_code() {
        let codes = codes();
        let ctx = codes.issue(&email("a@example.com")).await.unwrap();

        assert!((100_000..=999_999).contains(&ctx.verification_code));
        assert_eq!(ctx.project_owner, "Admin");

        let entry = codes.store().get("a@example.com").await.unwrap().unwrap();
        assert_eq!(entry.code, ctx.verification_code);
    }

    #[tokio::test]
    async fn test_reissue_replaces_entry() {
        let codes = codes();
        let now = Utc::now();
        codes.issue_at(&email("a@example.com"), now - TimeDelta::minutes(5)).await.unwrap();
        let second = codes.issue_at(&email("a@example.com"), now).await.unwrap();

        let entries = codes.store().entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].1.code, second.verification_code);
        assert_eq!(entries[0].1.issued_at, now);
    }

    #[tokio::test]
    async fn test_verify_consumes_code() {
        let codes = codes();
        let addr = email("a@example.com");
        let ctx = codes.issue(&addr).await.unwrap();

        codes.verify(&addr, ctx.verification_code).await.unwrap();
        assert!(codes.store().get(addr.as_str()).await.unwrap().is_none());
        assert!(matches!(
            codes.verify(&addr, ctx.verification_code).await,
            Err(AuthError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_mismatch_keeps_code() {
        let codes = codes();
        let addr = email("a@example.com");
        codes
            .store()
            .set(addr.as_str(), VerificationEntry::new(123_456, Utc::now()))
            .await
            .unwrap();

        assert!(matches!(
            codes.verify(&addr, 654_321).await,
            Err(AuthError::BadRequest(_))
        ));
        assert!(codes.store().get(addr.as_str()).await.unwrap().is_some());
        codes.verify(&addr, 123_456).await.unwrap();
    }

    #[tokio::test]
    async fn test_verify_stale_code_fails() {
        let codes = codes();
        let addr = email("a@example.com");
        let now = Utc::now();
        codes
            .store()
            .set(addr.as_str(), VerificationEntry::new(123_456, now - TimeDelta::minutes(11)))
            .await
            .unwrap();

        assert!(matches!(
            codes.verify_at(&addr, 123_456, now).await,
            Err(AuthError::BadRequest(_))
        ));
        assert!(codes.store().get(addr.as_str()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_stale_entries() {
        let codes = codes();
        let now = Utc::now();
        let store = codes.store();
        store
            .set("old@example.com", VerificationEntry::new(111_111, now - TimeDelta::minutes(11)))
            .await
            .unwrap();
        store
            .set("edge@example.com", VerificationEntry::new(222_222, now - TimeDelta::minutes(10)))
            .await
            .unwrap();
        store
            .set("new@example.com", VerificationEntry::new(333_333, now - TimeDelta::minutes(1)))
            .await
            .unwrap();

        assert_eq!(codes.sweep_at(now).await.unwrap(), 1);

        assert!(store.get("old@example.com").await.unwrap().is_none());
        assert!(store.get("edge@example.com").await.unwrap().is_some());
        assert!(store.get("new@example.com").await.unwrap().is_some());
    }
}
