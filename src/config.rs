use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

/// `DATABASE_URL` value that selects the in-memory store.
pub const MEMORY_DATABASE_URL: &str = "memory://";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    5
}

fn default_max_lifetime_secs() -> u64 {
    300
}

fn default_run_migrations() -> bool {
    true
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        self.url == MEMORY_DATABASE_URL
    }
}

impl Config {
    /// `.env`, then `CONFIG_PATH` (default `config.toml`), then environment overrides.
    /// Without a config file everything comes from the environment.
    pub fn load() -> AppResult<Self> {
        if dotenv::dotenv().is_err() {
            log::info!(".env file not found");
        }

        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        let lookup = |name: &str| env::var(name).ok();

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::from_toml_str(&config_str)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::from_lookup(lookup)?,
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "failed to read {config_path}: {e}"
                )));
            }
        };
        config.apply_overrides(lookup);
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> AppResult<Self> {
        toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("failed to parse config file: {e}")))
    }

    /// Defaults for everything; the database URL is either `DATABASE_URL` or
    /// assembled from `DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD` and `DB_NAME`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => postgres_url(
                &lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                &lookup("DB_PORT").unwrap_or_else(|| "5432".to_string()),
                &lookup("DB_USER").unwrap_or_else(|| "postgres".to_string()),
                &lookup("DB_PASSWORD").unwrap_or_default(),
                &lookup("DB_NAME").unwrap_or_else(|| "subscriptions".to_string()),
            )?,
        };

        Ok(Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url,
                max_connections: default_max_connections(),
                min_connections: default_min_connections(),
                max_lifetime_secs: default_max_lifetime_secs(),
                run_migrations: default_run_migrations(),
            },
            cors: CorsConfig::default(),
        })
    }

    /// Environment values win over the config file.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(p) = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|v| v.parse().ok())
        {
            self.server.port = p;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(n) = lookup("DB_MAX_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.max_connections = n;
        }
        if let Some(n) = lookup("DB_MIN_CONNECTIONS").and_then(|v| v.parse().ok()) {
            self.database.min_connections = n;
        }
        if let Some(n) = lookup("DB_MAX_LIFETIME_SECS").and_then(|v| v.parse().ok()) {
            self.database.max_lifetime_secs = n;
        }
        if let Some(b) = lookup("DB_RUN_MIGRATIONS").and_then(|v| v.parse().ok()) {
            self.database.run_migrations = b;
        }
        if let Some(v) = lookup("CORS_ALLOWED_ORIGINS") {
            self.cors.allowed_origins = v
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
    }
}

/// Credentials are percent-encoded, so passwords may contain `@`, `/`, `#` or `?`.
fn postgres_url(host: &str, port: &str, user: &str, password: &str, name: &str) -> AppResult<String> {
    let mut url = Url::parse(&format!("postgres://{host}:{port}"))
        .map_err(|e| AppError::ConfigError(format!("invalid DB_HOST/DB_PORT: {e}")))?;
    url.set_username(user)
        .map_err(|_| AppError::ConfigError("invalid DB_USER".to_string()))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| AppError::ConfigError("invalid DB_PASSWORD".to_string()))?;
    }
    url.set_path(&format!("/{name}"));
    url.query_pairs_mut().append_pair("sslmode", "disable");
    Ok(url.into())
}
