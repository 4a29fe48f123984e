use sqlx::FromRow;
use time::OffsetDateTime;

/// User record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,                    // assigned by the store
    pub username: String,
    pub email: String,              // unique across all users
    pub created_at: OffsetDateTime, // set by the column default on insert
}

/// Row order for [`super::repo::UserStore::list_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Ascending id.
    Insertion,
    /// Descending `created_at`, ties broken by descending id.
    NewestFirst,
}
