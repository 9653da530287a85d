mod delete;
mod list;
mod submit;

pub(crate) use submit::submit;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list))
        .route("/delete", post(delete::delete))
}
