use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;
use crate::users::repo::{StoreError, UserStore};

/// Users inserted by `seed-db`.
pub const SEED_USERS: [(&str, &str); 2] = [("admin", "admin@admin.com"), ("test", "test@test.com")];

pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run migrations")?;
    Ok(())
}

/// Drop the users table and the migration ledger, then rebuild the schema.
pub async fn recreate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::query("DROP TABLE IF EXISTS users")
        .execute(db)
        .await
        .context("drop users")?;
    sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
        .execute(db)
        .await
        .context("drop migration ledger")?;
    migrate(db).await?;
    info!("schema recreated");
    Ok(())
}

/// Insert the fixture users. Rows whose email already exists are skipped.
pub async fn seed(store: &dyn UserStore) -> anyhow::Result<usize> {
    let mut inserted = 0;
    for (username, email) in SEED_USERS {
        match store.insert(username, email).await {
            Ok(user) => {
                info!(user_id = user.id, %email, "seeded user");
                inserted += 1;
            }
            Err(StoreError::EmailTaken(_)) => info!(%email, "seed user already present"),
            Err(e) => return Err(e).with_context(|| format!("seed {email}")),
        }
    }
    Ok(inserted)
}
