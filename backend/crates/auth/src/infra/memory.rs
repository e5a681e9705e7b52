//! In-Memory Store Implementations
//!
//! Process-local stores for single-instance deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::domain::entity::{
    user::{NewUser, UserRecord},
    verification::VerificationEntry,
};
use crate::domain::repository::{UserStore, VerificationStore};
use crate::domain::value_object::credentials::UserLookup;
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Users
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<Vec<UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn insert(&self, user: UserRecord) {
        self.users.write().await.push(user);
    }
}

fn matches(user: &UserRecord, lookup: &UserLookup) -> bool {
    lookup.uid.is_none_or(|uid| uid == user.uid)
        && lookup
            .email
            .as_deref()
            .is_none_or(|email| email.to_lowercase() == user.email.to_lowercase())
        && lookup.login_id.as_deref().is_none_or(|id| id == user.login_id)
}

impl UserStore for InMemoryUserStore {
    async fn find(&self, lookup: &UserLookup) -> AuthResult<Option<UserRecord>> {
        if lookup.is_empty() {
            return Ok(None);
        }
        let users = self.users.read().await;
        Ok(users.iter().find(|u| matches(u, lookup)).cloned())
    }

    async fn register(&self, user: NewUser) -> AuthResult<UserRecord> {
        let mut users = self.users.write().await;

        let email = user.email.to_lowercase();
        let conflict = users.iter().find_map(|u| {
            if u.email.to_lowercase() == email {
                Some("Email is already registered")
            } else if u.login_id == user.login_id {
                Some("Login id is already taken")
            } else if u.nickname == user.nickname {
                Some("Nickname is already taken")
            } else {
                None
            }
        });
        if let Some(message) = conflict {
            return Err(AuthError::Conflict(message.to_string()));
        }

        let record = UserRecord {
            uid: users.iter().map(|u| u.uid).max().unwrap_or(0) + 1,
            login_id: user.login_id,
            nickname: user.nickname,
            email: user.email,
            password_hash: user.password_hash,
        };
        users.push(record.clone());
        Ok(record)
    }
}

// ============================================================================
// Verification codes
// ============================================================================

#[derive(Clone, Default)]
pub struct InMemoryVerificationStore {
    entries: Arc<RwLock<HashMap<String, VerificationEntry>>>,
}

impl InMemoryVerificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VerificationStore for InMemoryVerificationStore {
    async fn get(&self, email: &str) -> AuthResult<Option<VerificationEntry>> {
        Ok(self.entries.read().await.get(email).copied())
    }

    async fn set(&self, email: &str, entry: VerificationEntry) -> AuthResult<()> {
        self.entries.write().await.insert(email.to_string(), entry);
        Ok(())
    }

    async fn delete(&self, email: &str) -> AuthResult<bool> {
        Ok(self.entries.write().await.remove(email).is_some())
    }

    async fn delete_if_issued_at(&self, email: &str, issued_at: DateTime<Utc>) -> AuthResult<bool> {
        let mut entries = self.entries.write().await;
        match entries.get(email) {
            Some(entry) if entry.issued_at == issued_at => {
                entries.remove(email);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn entries(&self) -> AuthResult<Vec<(String, VerificationEntry)>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|(k, v)| (k.clone(), *v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn user(uid: i64, login_id: &str, email: &str) -> UserRecord {
        UserRecord {
            uid,
            login_id: login_id.to_string(),
            nickname: format!("{login_id}-nick"),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_requires_all_criteria() {
        let store = InMemoryUserStore::with_users(vec![
            user(1, "alice", "alice@example.com"),
            user(2, "bob", "bob@example.com"),
        ]);

        let found = store.find(&UserLookup::by_login_id("bob")).await.unwrap();
        assert_eq!(found.map(|u| u.uid), Some(2));

        let found = store.find(&UserLookup::by_email("alice@example.com")).await.unwrap();
        assert_eq!(found.map(|u| u.uid), Some(1));

        let mismatched = UserLookup {
            email: Some("alice@example.com".to_string()),
            login_id: Some("bob".to_string()),
            ..Default::default()
        };
        assert!(store.find(&mismatched).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_email_lookup_ignores_stored_case() {
        let store = InMemoryUserStore::with_users(vec![user(7, "alice", "Alice@Example.com")]);

        let found = store.find(&UserLookup::by_email("alice@example.com")).await.unwrap();
        assert_eq!(found.map(|u| u.uid), Some(7));
    }

    #[tokio::test]
    async fn test_register_assigns_uid_and_rejects_duplicates() {
        let store = InMemoryUserStore::with_users(vec![user(1, "alice", "alice@example.com")]);
        let new_user = |id: &str, nickname: &str, email: &str| NewUser {
            login_id: id.to_string(),
            nickname: nickname.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        };

        let bob = store.register(new_user("bob", "Bob", "bob@example.com")).await.unwrap();
        assert_eq!(bob.uid, 2);
        assert!(store.find(&UserLookup::by_login_id("bob")).await.unwrap().is_some());

        let taken = [
            new_user("carol", "Carol", "ALICE@example.com"),
            new_user("alice", "Carol", "carol@example.com"),
            new_user("carol", "Bob", "carol@example.com"),
        ];
        for candidate in taken {
            assert!(matches!(
                store.register(candidate).await,
                Err(AuthError::Conflict(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_empty_lookup_matches_nothing() {
        let store = InMemoryUserStore::with_users(vec![user(1, "alice", "alice@example.com")]);
        assert!(store.find(&UserLookup::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_if_issued_at() {
        let store = InMemoryVerificationStore::new();
        let issued = Utc::now() - TimeDelta::minutes(20);
        store.set("a@example.com", VerificationEntry::new(111_111, issued)).await.unwrap();

        // Replaced by a newer code: the old issuance no longer matches
        let reissued = Utc::now();
        store.set("a@example.com", VerificationEntry::new(222_222, reissued)).await.unwrap();
        assert!(!store.delete_if_issued_at("a@example.com", issued).await.unwrap());
        assert!(store.get("a@example.com").await.unwrap().is_some());

        assert!(store.delete_if_issued_at("a@example.com", reissued).await.unwrap());
        assert!(!store.delete("a@example.com").await.unwrap());
    }
}
