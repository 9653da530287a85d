pub mod advice;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod profiles;
pub mod rate_limit;

use axum::{extract::FromRef, routing::post, Router};
use sqlx::SqlitePool;

pub use error::{ApiError, ApiResult};

use auth::IdentityClient;
use rate_limit::RateLimiter;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub identity: IdentityClient,
    pub limiter: RateLimiter,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/submit", post(advice::submit))
        .nest("/api/profile", profiles::router())
        .nest("/api/advice", advice::router())
        .with_state(state)
}

pub trait GetField {
    fn get_str_field(&self, field: &str) -> ApiResult<String>;
}

impl GetField for serde_json::Value {
    fn get_str_field(&self, field: &str) -> ApiResult<String> {
        Ok(
            self.get(field)
            .ok_or(format!("expected {field} in {self}"))?
            .as_str()
            .ok_or(format!("expected {field} in {self} to be string"))?
            .to_owned()
        )
    }
}
