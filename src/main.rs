use advicebox::{app, auth::IdentityClient, config::Config, db, rate_limit::RateLimiter, AppState};
use axum::http::{header::{AUTHORIZATION, CONTENT_TYPE}, Method};
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::from_env();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&config.database_url)
        .await
        .unwrap();
    db::init(&db_pool).await.unwrap();

    let app_state = AppState {
        db_pool,
        identity: IdentityClient::new(&config.identity_url, &config.service_key),
        limiter: RateLimiter::default(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = app(app_state).layer(cors);

    info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
