use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;

use crate::{auth::{self, IdentityClient}, ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub(crate) struct UpsertBody {
    username: Option<String>,
}

/// Save the caller's public handle. Keyed on the person id, so repeating
/// the same handle is a no-op and a person can never hold two rows; only
/// the handle's uniqueness across people can fail.
#[debug_handler(state = AppState)]
pub(crate) async fn upsert(
    State(db_pool): State<SqlitePool>,
    State(identity): State<IdentityClient>,
    headers: HeaderMap,
    body: Result<Json<UpsertBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(UpsertBody { username }) = body.map_err(|_| ApiError::Malformed)?;
    let username = username
        .filter(|u| !u.trim().is_empty())
        .ok_or(ApiError::MissingField("username is required"))?;

    let token = auth::bearer_token(&headers)?;
    let user_id = identity.resolve(token).await?;

    sqlx::query(
        "INSERT INTO profiles (id, username) VALUES (?, ?)
         ON CONFLICT(id) DO UPDATE SET username = excluded.username",
    )
    .bind(&user_id)
    .bind(&username)
    .execute(&db_pool)
    .await
    .map_err(|err| match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => ApiError::UsernameTaken,
        _ => ApiError::from(err),
    })?;

    info!("saved handle @{username} for u/{user_id}");

    Ok(Json(json!({ "success": true, "username": username })))
}
