use atria_core::ports::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use atria_core::{ENV_ATRIA_BIND_ADDR, ENV_ATRIA_DB_PATH};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub db_path: PathBuf,
    pub max_body_bytes: usize,
    pub default_page_limit: usize,
    pub max_page_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            db_path: PathBuf::from("artifacts").join("atria.sqlite"),
            max_body_bytes: 64 * 1024,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var(ENV_ATRIA_BIND_ADDR) {
            let trimmed = addr.trim();
            if !trimmed.is_empty() {
                config.bind_addr = trimmed.to_string();
            }
        }
        if let Ok(path) = std::env::var(ENV_ATRIA_DB_PATH) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                config.db_path = PathBuf::from(trimmed);
            }
        }
        config
    }
}
