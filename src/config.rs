use tracing::info;

/// Runtime configuration, read once at startup. `.env` values are already
/// loaded by the time this runs.
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub identity_url: String,
    pub service_key: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:8080"),
            database_url: try_load("DATABASE_URL", "sqlite://advicebox.db?mode=rwc"),
            identity_url: must_load("IDENTITY_URL"),
            service_key: must_load("SERVICE_ROLE_KEY"),
        }
    }
}

fn try_load(key: &str, default: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_owned()
    })
}

fn must_load(key: &str) -> String {
    dotenv::var(key).unwrap_or_else(|_| panic!("{key} must be set"))
}
