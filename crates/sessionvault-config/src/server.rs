use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub metrics_port: u16,
    /// PostgreSQL URL. When unset the server runs on the in-memory directory.
    pub database_url: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: crate::env_or("PORT", 8001),
            metrics_port: crate::env_or("METRICS_PORT", 9001),
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        }
    }
}
