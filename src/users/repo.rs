use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use super::repo_types::{ListOrder, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The insert hit the unique constraint on `users.email`.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// All access to stored users goes through this trait.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user in its own transaction.
    ///
    /// Fails with [`StoreError::EmailTaken`] when the email already exists;
    /// nothing is written in that case.
    async fn insert(&self, username: &str, email: &str) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;

    async fn list_all(&self, order: ListOrder) -> Result<Vec<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, username: &str, email: &str) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await?;

        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email)
            VALUES ($1, $2)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(user) => {
                tx.commit().await?;
                debug!(user_id = user.id, "user row committed");
                Ok(user)
            }
            Err(e) => {
                if let Err(rb) = tx.rollback().await {
                    warn!(error = %rb, "rollback after failed insert");
                }
                Err(classify(e, email))
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_all(&self, order: ListOrder) -> Result<Vec<User>, StoreError> {
        let sql = match order {
            ListOrder::Insertion => {
                "SELECT id, username, email, created_at FROM users ORDER BY id ASC"
            }
            ListOrder::NewestFirst => {
                "SELECT id, username, email, created_at FROM users ORDER BY created_at DESC, id DESC"
            }
        };
        let rows = sqlx::query_as::<_, User>(sql).fetch_all(&self.db).await?;
        Ok(rows)
    }
}

fn classify(err: sqlx::Error, email: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::EmailTaken(email.to_string());
        }
    }
    StoreError::Database(err)
}
