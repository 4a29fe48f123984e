use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::users::{dto::MessageResponse, repo::StoreError};

/// Failures a handler can answer with. Each maps to a status code and a
/// `{status: "fail", message}` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid payload.")]
    InvalidPayload,

    #[error("Sorry. That email already exists.")]
    EmailExists,

    #[error("Param id error")]
    InvalidId,

    #[error("User does not exist")]
    UserNotFound,

    #[error("Internal server error.")]
    Store(#[source] sqlx::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidPayload | Self::EmailExists | Self::InvalidId => StatusCode::BAD_REQUEST,
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            // the pre-check missed a concurrent writer; the constraint caught it
            StoreError::EmailTaken(_) => Self::InvalidPayload,
            StoreError::Database(db) => Self::Store(db),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(e) = &self {
            error!(error = %e, "store failure");
        }
        let status = self.status_code();
        (status, Json(MessageResponse::fail(self.to_string()))).into_response()
    }
}
