use std::sync::Arc;

use sqlx::PgPool;

use crate::users::repo::{PgUserStore, UserStore};

/// Shared per-router state. Handlers only ever see the store trait object.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        Self::from_store(Arc::new(PgUserStore::new(db)))
    }

    pub fn from_store(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// State backed by an empty in-memory store.
    #[cfg(test)]
    pub fn fake() -> Self {
        Self::from_store(Arc::new(crate::users::memory::MemoryUserStore::default()))
    }
}
