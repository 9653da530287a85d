use axum::{debug_handler, extract::{rejection::JsonRejection, State}, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::info;

use crate::{auth::{self, IdentityClient}, ApiError, ApiResult, AppState};

#[derive(Deserialize)]
pub(crate) struct DeleteBody {
    id: Option<String>,
}

/// The delete path reaches the store over a privileged connection, so this
/// predicate is the only check between a caller and someone else's advice:
/// the caller must be the recorded target of the row. Rows with no
/// recorded target are deletable by no one.
pub(crate) fn owns_advice(caller_id: &str, target_profile_id: Option<&str>) -> bool {
    target_profile_id.is_some_and(|owner| owner == caller_id)
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete(
    State(db_pool): State<SqlitePool>,
    State(identity): State<IdentityClient>,
    headers: HeaderMap,
    body: Result<Json<DeleteBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(DeleteBody { id }) = body.map_err(|_| ApiError::Malformed)?;
    let id = id
        .filter(|i| !i.is_empty())
        .ok_or(ApiError::MissingField("id is required"))?;

    let token = auth::bearer_token(&headers)?;
    let user_id = identity.resolve(token).await?;

    let Some((target_profile_id,)): Option<(Option<String>,)> =
        sqlx::query_as("SELECT target_profile_id FROM advice WHERE id = ?")
            .bind(&id)
            .fetch_optional(&db_pool)
            .await?
    else {
        return Err(ApiError::NotFound);
    };

    if !owns_advice(&user_id, target_profile_id.as_deref()) {
        return Err(ApiError::Forbidden);
    }

    sqlx::query("DELETE FROM advice WHERE id = ?")
        .bind(&id)
        .execute(&db_pool)
        .await?;

    info!("advice {id} deleted by u/{user_id}");

    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::owns_advice;

    #[test]
    fn the_recorded_target_may_delete() {
        assert!(owns_advice("u1", Some("u1")));
    }

    #[test]
    fn anyone_else_may_not() {
        assert!(!owns_advice("u2", Some("u1")));
    }

    #[test]
    fn rows_without_a_target_are_deletable_by_no_one() {
        assert!(!owns_advice("u1", None));
    }
}
