mod lookup;
mod me;
mod upsert;

use axum::{routing::{get, post}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upsert", post(upsert::upsert))
        .route("/me", get(me::me))
        .route("/{username}", get(lookup::lookup))
}
