use axum::{debug_handler, extract::{Path, State}, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{db::Profile, ApiError, ApiResult};

/// Resolve a handle for the give page. Public: only confirms the handle
/// exists, never the person id behind it.
#[debug_handler]
pub(crate) async fn lookup(
    Path(username): Path<String>,
    State(db_pool): State<SqlitePool>,
) -> ApiResult<Json<Value>> {
    let Some(profile): Option<Profile> =
        sqlx::query_as("SELECT id, username FROM profiles WHERE username = ?")
            .bind(&username)
            .fetch_optional(&db_pool)
            .await?
    else {
        return Err(ApiError::TargetNotFound);
    };

    Ok(Json(json!({ "username": profile.username })))
}
