use axum::{debug_handler, extract::State, http::HeaderMap, Json};
use serde_json::{json, Value};
use sqlx::SqlitePool;

use crate::{auth::{self, IdentityClient}, ApiError, ApiResult, AppState};

/// The caller's own handle. 404 until they have saved one.
#[debug_handler(state = AppState)]
pub(crate) async fn me(
    State(db_pool): State<SqlitePool>,
    State(identity): State<IdentityClient>,
    headers: HeaderMap,
) -> ApiResult<Json<Value>> {
    let token = auth::bearer_token(&headers)?;
    let user_id = identity.resolve(token).await?;

    let Some((username,)): Option<(String,)> =
        sqlx::query_as("SELECT username FROM profiles WHERE id = ?")
            .bind(&user_id)
            .fetch_optional(&db_pool)
            .await?
    else {
        return Err(ApiError::NotFound);
    };

    Ok(Json(json!({ "username": username })))
}
