use axum::{debug_handler, extract::State, http::HeaderMap, Json};
use sqlx::SqlitePool;

use crate::{auth::{self, IdentityClient}, db::Advice, ApiResult, AppState};

/// The caller's received advice, newest first. Matches on the pinned
/// profile id, never the username, so it survives handle renames.
#[debug_handler(state = AppState)]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    State(identity): State<IdentityClient>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Advice>>> {
    let token = auth::bearer_token(&headers)?;
    let user_id = identity.resolve(token).await?;

    let rows: Vec<Advice> = sqlx::query_as(
        "SELECT id, target_username, target_profile_id, content, from_name, is_anonymous, created_at
         FROM advice WHERE target_profile_id = ? ORDER BY created_at DESC",
    )
    .bind(&user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(rows))
}
