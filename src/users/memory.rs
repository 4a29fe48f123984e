use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::repo::{StoreError, UserStore};
use super::repo_types::{ListOrder, User};

/// In-process stand-in for PostgreSQL with the same uniqueness rules.
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, username: &str, email: &str) -> Result<User, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|u| u.email == email) {
            return Err(StoreError::EmailTaken(email.to_string()));
        }
        let user = User {
            id: rows.last().map_or(1, |u| u.id + 1),
            username: username.to_string(),
            email: email.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.iter().find(|u| u.id == id).cloned())
    }

    async fn list_all(&self, order: ListOrder) -> Result<Vec<User>, StoreError> {
        let mut rows = self.rows.lock().await.clone();
        match order {
            ListOrder::Insertion => rows.sort_by_key(|u| u.id),
            ListOrder::NewestFirst => {
                rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)))
            }
        }
        Ok(rows)
    }
}

/// Store whose email lookup never finds anything, so duplicates only
/// surface at insert time (two writers racing past the pre-check).
#[derive(Default)]
pub struct BlindLookupStore {
    inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for BlindLookupStore {
    async fn insert(&self, username: &str, email: &str) -> Result<User, StoreError> {
        self.inner.insert(username, email).await
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, StoreError> {
        Ok(None)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn list_all(&self, order: ListOrder) -> Result<Vec<User>, StoreError> {
        self.inner.list_all(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryUserStore::default();
        let a = store.insert("admin", "admin@admin.com").await.unwrap();
        let b = store.insert("test", "test@test.com").await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(store.find_by_id(2).await.unwrap().unwrap().username, "test");
        assert!(store.find_by_id(3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_and_not_stored() {
        let store = MemoryUserStore::default();
        store.insert("test", "test@test.com").await.unwrap();
        let err = store.insert("other", "test@test.com").await.unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken(ref e) if e == "test@test.com"));
        assert_eq!(store.list_all(ListOrder::Insertion).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn newest_first_reverses_insertion_order() {
        let store = MemoryUserStore::default();
        for (name, email) in [("a", "a@x.io"), ("b", "b@x.io"), ("c", "c@x.io")] {
            store.insert(name, email).await.unwrap();
        }
        let names = |rows: Vec<User>| rows.into_iter().map(|u| u.username).collect::<Vec<_>>();
        assert_eq!(names(store.list_all(ListOrder::Insertion).await.unwrap()), ["a", "b", "c"]);
        assert_eq!(names(store.list_all(ListOrder::NewestFirst).await.unwrap()), ["c", "b", "a"]);
    }
}
