//! Configuration management

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub queries: QueriesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Upper bound for a single request, including bulk loads
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path, or `:memory:`
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// How long a connection waits on a locked database before failing
    #[serde(default = "default_busy_timeout_secs")]
    pub busy_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// Directory holding Categorias.csv, productos.csv, ... ordenes.csv
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

/// Default filter values for the parameterized catalog queries
#[derive(Debug, Clone, Deserialize)]
pub struct QueriesConfig {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_http_port() -> u16 {
    5000
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_database_url() -> String {
    "empresa.db".to_string()
}

fn default_max_connections() -> u32 {
    4
}

fn default_busy_timeout_secs() -> u64 {
    5
}

fn default_level() -> String {
    "info".to_string()
}

fn default_data_dir() -> String {
    "archivos".to_string()
}

fn default_delimiter() -> char {
    ';'
}

fn default_country() -> String {
    "Inglaterra".to_string()
}

fn default_category() -> String {
    "Deportes".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            http_port: default_http_port(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
            busy_timeout_secs: default_busy_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_level() }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            delimiter: default_delimiter(),
        }
    }
}

impl Default for QueriesConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
            category: default_category(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_file("config.toml")
    }

    /// Load from `path` (optional) layered with `VENTAS__SECTION__KEY` variables
    pub fn from_file(path: &str) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("VENTAS").separator("__"));

        let settings = builder.build()?;
        let config: Config = settings.try_deserialize()?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server.http_port == 0 {
            anyhow::bail!("Invalid http_port: 0 is not allowed");
        }
        if self.server.host.is_empty() {
            anyhow::bail!("Server host cannot be empty");
        }
        if self.server.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be at least 1");
        }

        if self.database.url.is_empty() {
            anyhow::bail!("Database URL cannot be empty");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("max_connections must be at least 1");
        }

        if self.loader.data_dir.is_empty() {
            anyhow::bail!("Loader data_dir cannot be empty");
        }
        if !self.loader.delimiter.is_ascii() {
            anyhow::bail!(
                "Invalid loader delimiter '{}': must be a single ASCII character",
                self.loader.delimiter
            );
        }

        if self.queries.country.trim().is_empty() || self.queries.category.trim().is_empty() {
            anyhow::bail!("Query filters (country, category) cannot be empty");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid logging level '{}'. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            );
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}
