//! PostgreSQL Store Implementations

use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, UserRecord};
use crate::domain::repository::UserStore;
use crate::domain::value_object::credentials::UserLookup;
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    uid: i64,
    id: String,
    nickname: String,
    email: String,
    password: String,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            uid: row.uid,
            login_id: row.id,
            nickname: row.nickname,
            email: row.email,
            password_hash: row.password,
        }
    }
}

// ============================================================================
// User Store Implementation
// ============================================================================

/// Optional criteria in one statement. Emails are compared through
/// `lower()` so rows stored before normalization still match.
const FIND_USER: &str = r#"
    SELECT uid, id, nickname, email, password
    FROM users
    WHERE ($1::BIGINT IS NULL OR uid = $1)
      AND ($2::TEXT IS NULL OR lower(email) = lower($2))
      AND ($3::TEXT IS NULL OR id = $3)
      AND deleted_at IS NULL
    ORDER BY uid
    LIMIT 1
"#;

const INSERT_USER: &str = r#"
    INSERT INTO users (id, nickname, email, password)
    VALUES ($1, $2, $3, $4)
    RETURNING uid, id, nickname, email, password
"#;

impl UserStore for PgUserStore {
    async fn find(&self, lookup: &UserLookup) -> AuthResult<Option<UserRecord>> {
        if lookup.is_empty() {
            return Ok(None);
        }

        let row = sqlx::query_as::<_, UserRow>(FIND_USER)
            .bind(lookup.uid)
            .bind(lookup.email.as_deref())
            .bind(lookup.login_id.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserRecord::from))
    }

    async fn register(&self, user: NewUser) -> AuthResult<UserRecord> {
        let row = sqlx::query_as::<_, UserRow>(INSERT_USER)
            .bind(&user.login_id)
            .bind(&user.nickname)
            .bind(&user.email)
            .bind(&user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    AuthError::Conflict(conflict_message(db.constraint()).to_string())
                }
                _ => AuthError::Database(e),
            })?;

        Ok(row.into())
    }
}

fn conflict_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("users_email_active_key") => "Email is already registered",
        Some("users_id_active_key") => "Login id is already taken",
        Some("users_nickname_active_key") => "Nickname is already taken",
        _ => "Account already exists",
    }
}
