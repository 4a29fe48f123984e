use std::num::IntErrorKind;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{
    required_fields, CreateUserRequest, DataResponse, MessageResponse, UserDetails, UserListItem,
    UsersData,
};
use super::repo_types::ListOrder;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user))
}

pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::success("pong!"))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected user payload");
        ApiError::InvalidPayload
    })?;
    let (username, email) = required_fields(body.username, body.email).ok_or_else(|| {
        warn!("user payload missing username or email");
        ApiError::InvalidPayload
    })?;

    // Friendlier message for the common case; the unique constraint still
    // decides when two requests race past this lookup.
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::EmailExists);
    }

    let user = state.users.insert(&username, &email).await.map_err(|e| {
        warn!(error = %e, %email, "insert failed");
        ApiError::from(e)
    })?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::success(format!("{} was added!", user.email))),
    ))
}

#[instrument(skip(state, raw_id))]
pub async fn get_user(
    State(state): State<AppState>,
    raw_id: Result<Path<String>, PathRejection>,
) -> Result<Json<DataResponse<UserDetails>>, ApiError> {
    let Path(raw_id) = raw_id.map_err(|e| {
        warn!(error = %e, "rejected user id segment");
        ApiError::InvalidId
    })?;
    let id = parse_user_id(&raw_id)?;

    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or(ApiError::UserNotFound)?;
    Ok(Json(DataResponse::success(UserDetails::from(user))))
}

/// Ids are SERIAL: an integer outside the `i32` range is well formed but
/// cannot exist.
fn parse_user_id(raw: &str) -> Result<i32, ApiError> {
    raw.trim().parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ApiError::UserNotFound,
        _ => ApiError::InvalidId,
    })
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<UsersData>>, ApiError> {
    let users = state
        .users
        .list_all(ListOrder::Insertion)
        .await?
        .into_iter()
        .map(UserListItem::from)
        .collect();
    Ok(Json(DataResponse::success(UsersData { users })))
}
