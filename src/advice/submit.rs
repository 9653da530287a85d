use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::{db::Profile, rate_limit::{self, RateLimiter}, ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub(crate) struct SubmitBody {
    target_username: Option<String>,
    content: Option<String>,
    from_name: Option<String>,
    #[serde(default)]
    is_anonymous: bool,
}

/// Leave advice for a handle. No credential needed; the rate guard is the
/// only brake on unauthenticated senders, so it runs before anything else.
#[debug_handler(state = AppState)]
pub(crate) async fn submit(
    State(db_pool): State<SqlitePool>,
    State(limiter): State<RateLimiter>,
    headers: HeaderMap,
    body: Result<Json<SubmitBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let origin = rate_limit::client_ip(&headers);
    if !limiter.allow(&origin) {
        return Err(ApiError::RateLimited);
    }

    let Json(SubmitBody { target_username, content, from_name, is_anonymous }) =
        body.map_err(|_| ApiError::Malformed)?;

    let (Some(target_username), Some(content)) = (
        target_username.filter(|u| !u.is_empty()),
        content.filter(|c| !c.is_empty()),
    ) else {
        return Err(ApiError::MissingField("target_username and content are required"));
    };

    // The row targets the stable profile id; the username is kept only as
    // a readable copy, so later renames leave old advice where it landed.
    let Some(target): Option<Profile> =
        sqlx::query_as("SELECT id, username FROM profiles WHERE username = ?")
            .bind(&target_username)
            .fetch_optional(&db_pool)
            .await?
    else {
        return Err(ApiError::TargetNotFound);
    };

    let id = Uuid::now_v7();
    let from_name = if is_anonymous { None } else { from_name.filter(|n| !n.is_empty()) };
    let created_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| e.to_string())?;

    sqlx::query(
        "INSERT INTO advice (id, target_username, target_profile_id, content, from_name, is_anonymous, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id.to_string())
    .bind(&target.username)
    .bind(&target.id)
    .bind(&content)
    .bind(&from_name)
    .bind(is_anonymous)
    .bind(&created_at)
    .execute(&db_pool)
    .await?;

    info!("advice {id} left for @{}", target.username);

    Ok(Json(json!({ "success": true })))
}
