//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::Level;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_LOG_DATE_FORMAT, DEFAULT_LOG_LEVEL, DEFAULT_MAX_OVERFLOW,
    DEFAULT_OPENAPI_FILE_PATH, DEFAULT_POOL_SIZE, DEFAULT_POOL_TIMEOUT_SECONDS,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// HTTP server and documentation settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Exposes `/docs` and `/openapi.json` when set
    pub debug: bool,
    pub generate_openapi_file: bool,
    pub openapi_file_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_SERVER_HOST.to_string(),
            port: DEFAULT_SERVER_PORT,
            debug: false,
            generate_openapi_file: false,
            openapi_file_path: DEFAULT_OPENAPI_FILE_PATH.to_string(),
        }
    }
}

impl AppConfig {
    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Resolve the OpenAPI output path against the working directory.
    pub fn openapi_output_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.openapi_file_path);
        if path.is_absolute() {
            return path;
        }
        env::current_dir()
            .map(|dir| dir.join(&path))
            .unwrap_or(path)
    }
}

/// Connection pool settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Log every SQL statement
    pub echo: bool,
    /// Log pool checkouts at debug level
    pub echo_pool: bool,
    pub pool_size: u32,
    pub max_overflow: u32,
    pub pool_pre_ping: bool,
    /// Seconds to wait for a connection
    pub pool_timeout: u64,
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("echo", &self.echo)
            .field("echo_pool", &self.echo_pool)
            .field("pool_size", &self.pool_size)
            .field("max_overflow", &self.max_overflow)
            .field("pool_pre_ping", &self.pool_pre_ping)
            .field("pool_timeout", &self.pool_timeout)
            .finish()
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            echo: false,
            echo_pool: false,
            pool_size: DEFAULT_POOL_SIZE,
            max_overflow: DEFAULT_MAX_OVERFLOW,
            pool_pre_ping: true,
            pool_timeout: DEFAULT_POOL_TIMEOUT_SECONDS,
        }
    }
}

impl DatabaseConfig {
    /// Upper bound of simultaneously open connections.
    pub fn max_connections(&self) -> u32 {
        self.pool_size.max(1).saturating_add(self.max_overflow)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_timeout)
    }
}

/// Output format of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Pretty,
    #[default]
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub date_format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::default(),
            date_format: DEFAULT_LOG_DATE_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    /// Map the configured level name to a tracing level.
    ///
    /// Accepts the usual names plus `warning` and `critical`; anything else is INFO.
    pub fn level_value(&self) -> Level {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" | "warning" => Level::WARN,
            "error" | "critical" | "fatal" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Missing or unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_defaults = AppConfig::default();
        let db_defaults = DatabaseConfig::default();
        let log_defaults = LoggingConfig::default();

        let string = |key: &str, default: String| lookup(key).unwrap_or(default);
        let flag = |key: &str, default: bool| {
            lookup(key).and_then(|v| parse_bool(&v)).unwrap_or(default)
        };

        Self {
            app: AppConfig {
                host: string("APP_HOST", app_defaults.host),
                port: parse_or(lookup("APP_PORT"), app_defaults.port),
                debug: flag("APP_DEBUG", app_defaults.debug),
                generate_openapi_file: flag(
                    "APP_GENERATE_OPENAPI_FILE",
                    app_defaults.generate_openapi_file,
                ),
                openapi_file_path: string("APP_OPENAPI_FILE_PATH", app_defaults.openapi_file_path),
            },
            database: DatabaseConfig {
                url: string("DATABASE_URL", db_defaults.url),
                echo: flag("DATABASE_ECHO", db_defaults.echo),
                echo_pool: flag("DATABASE_ECHO_POOL", db_defaults.echo_pool),
                pool_size: parse_or(lookup("DATABASE_POOL_SIZE"), db_defaults.pool_size),
                max_overflow: parse_or(lookup("DATABASE_MAX_OVERFLOW"), db_defaults.max_overflow),
                pool_pre_ping: flag("DATABASE_POOL_PRE_PING", db_defaults.pool_pre_ping),
                pool_timeout: parse_or(lookup("DATABASE_POOL_TIMEOUT"), db_defaults.pool_timeout),
            },
            logging: LoggingConfig {
                level: string("LOG_LEVEL", log_defaults.level),
                format: lookup("LOG_FORMAT")
                    .and_then(|v| LogFormat::parse(&v))
                    .unwrap_or(log_defaults.format),
                date_format: string("LOG_DATE_FORMAT", log_defaults.date_format),
            },
        }
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
