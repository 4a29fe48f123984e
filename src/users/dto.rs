use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::repo_types::User;

/// Body of `POST /users`. Both keys must be present.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Form fields of `POST /`.
#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Returns `(username, email)` only when both are present.
pub fn required_fields(
    username: Option<String>,
    email: Option<String>,
) -> Option<(String, String)> {
    Some((username?, email?))
}

/// `{status, message}` envelope shared by successes and failures.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub status: &'static str,
    pub message: String,
}

impl MessageResponse {
    pub fn success(message: impl Into<String>) -> Self {
        Self { status: "success", message: message.into() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { status: "fail", message: message.into() }
    }
}

/// `{status: "success", data}` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn success(data: T) -> Self {
        Self { status: "success", data }
    }
}

#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserDetails {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            email: u.email,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListItem {
    pub username: String,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub id: i32,
}

impl From<User> for UserListItem {
    fn from(u: User) -> Self {
        Self {
            username: u.username,
            email: u.email,
            created_at: u.created_at,
            id: u.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UsersData {
    pub users: Vec<UserListItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn required_fields_needs_both() {
        assert_eq!(
            required_fields(Some("test".into()), Some("test@test.com".into())),
            Some(("test".to_string(), "test@test.com".to_string()))
        );
        assert_eq!(required_fields(None, Some("test@test.com".into())), None);
        assert_eq!(required_fields(Some("test".into()), None), None);
        assert_eq!(required_fields(None, None), None);
    }

    #[test]
    fn user_details_serialization() {
        let details = UserDetails::from(User {
            id: 7,
            username: "test".into(),
            email: "test@test.com".into(),
            created_at: datetime!(2024-03-01 12:30:00 UTC),
        });
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "test",
                "email": "test@test.com",
                "created_at": "2024-03-01T12:30:00Z"
            })
        );
    }

    #[test]
    fn fail_envelope() {
        let json = serde_json::to_string(&MessageResponse::fail("Param id error")).unwrap();
        assert_eq!(json, r#"{"status":"fail","message":"Param id error"}"#);
    }
}
