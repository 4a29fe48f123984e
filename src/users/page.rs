use std::fmt::Write as _;

use axum::{
    extract::{rejection::FormRejection, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::{required_fields, AddUserForm};
use super::repo::StoreError;
use super::repo_types::{ListOrder, User};

pub fn page_routes() -> Router<AppState> {
    Router::new().route("/", get(index).post(add_user))
}

#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let users = state.users.list_all(ListOrder::NewestFirst).await?;
    Ok(Html(render_index(&users, None)))
}

/// Form submission. The page is re-rendered in every case; failures carry a
/// notice and a 400.
#[instrument(skip(state, form))]
pub async fn add_user(
    State(state): State<AppState>,
    form: Result<Form<AddUserForm>, FormRejection>,
) -> Result<(StatusCode, Html<String>), ApiError> {
    let fields = form
        .ok()
        .and_then(|Form(f)| required_fields(f.username, f.email));

    let (status, notice) = match fields {
        None => {
            warn!("add-user form missing username or email");
            (StatusCode::BAD_REQUEST, Some(ApiError::InvalidPayload))
        }
        Some((username, email)) => match state.users.insert(&username, &email).await {
            Ok(user) => {
                info!(user_id = user.id, email = %user.email, "user added from page");
                (StatusCode::OK, None)
            }
            Err(StoreError::EmailTaken(email)) => {
                warn!(%email, "page submission with existing email");
                (StatusCode::BAD_REQUEST, Some(ApiError::EmailExists))
            }
            Err(e) => return Err(e.into()),
        },
    };

    let users = state.users.list_all(ListOrder::NewestFirst).await?;
    let notice = notice.map(|e| e.to_string());
    Ok((status, Html(render_index(&users, notice.as_deref()))))
}

/// Renders the user list (already ordered by the caller) and the add form.
pub fn render_index(users: &[User], notice: Option<&str>) -> String {
    let mut html = String::from(concat!(
        "<!DOCTYPE html>\n",
        "<html lang=\"en\">\n",
        "<head>\n",
        "  <meta charset=\"utf-8\">\n",
        "  <title>Users</title>\n",
        "</head>\n",
        "<body>\n",
        "  <h2>Add User</h2>\n",
        "  <form action=\"/\" method=\"POST\">\n",
        "    <input name=\"username\" type=\"text\" placeholder=\"Enter a username\" required>\n",
        "    <input name=\"email\" type=\"email\" placeholder=\"Enter an email address\" required>\n",
        "    <input type=\"submit\" value=\"Submit\">\n",
        "  </form>\n",
    ));

    if let Some(notice) = notice {
        let _ = writeln!(html, "  <p class=\"notice\">{}</p>", escape(notice));
    }

    if users.is_empty() {
        html.push_str("  <p>No users!</p>\n");
    } else {
        html.push_str("  <h1>All Users</h1>\n  <ul>\n");
        for u in users {
            let _ = writeln!(
                html,
                "    <li><strong>{}</strong> - <span>{}</span></li>",
                escape(&u.username),
                escape(&u.email)
            );
        }
        html.push_str("  </ul>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
