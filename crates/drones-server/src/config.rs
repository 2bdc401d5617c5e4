//! Server configuration from environment.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Base for absolute links in representations, without trailing slash.
    pub public_base_url: String,
    pub database_path: String,
    pub database_max_connections: u32,
    /// Default page size for list endpoints.
    pub page_size: usize,
    /// Upper bound for a client-supplied `limit`.
    pub max_page_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        let server_port = env::var("DRONES_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        Self {
            server_port,
            public_base_url: env::var("DRONES_PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", server_port)),
            database_path: env::var("DRONES_DATABASE_PATH")
                .unwrap_or_else(|_| "data/drones.db".to_string()),
            database_max_connections: env::var("DRONES_DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            page_size: env::var("DRONES_PAGE_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(4),
            max_page_size: 100,
        }
    }
}
