//! Configuration System
//!
//! Resolves one `Config` per process from, in increasing precedence:
//! built-in defaults, an optional TOML file, environment variables (a `.env`
//! file is loaded into the environment by the binaries), and command-line
//! overrides. `Config::resolve` is the pure core of that layering.

use crate::filter::{DateNormalizer, FieldMatch, FilterCriteria, MatchMode, DEFAULT_DATE_FORMATS};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable holding the database path
pub const ENV_DB_FILEPATH: &str = "DB_FILEPATH";
/// Environment variable holding the table name
pub const ENV_TABLE_NAME: &str = "TABLE_NAME";
/// Environment variable holding the date column name
pub const ENV_DATE_COLUMN: &str = "DATE_COLUMN";
pub const ENV_HOST: &str = "VIEWER_HOST";
pub const ENV_PORT: &str = "VIEWER_PORT";
pub const ENV_LOG_LEVEL: &str = "VIEWER_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "VIEWER_LOG_FORMAT";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which database and table to read
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Absolute path to the SQLite file; unset until the user provides one
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    #[serde(default = "default_table_name")]
    pub table_name: String,
}

fn default_table_name() -> String {
    "EfrisPdfReport".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            table_name: default_table_name(),
        }
    }
}

impl SourceConfig {
    /// Apply per-request form values on top of the session configuration
    ///
    /// A submitted but empty field replaces the configured value, so clearing
    /// the path in the form surfaces a configuration error instead of
    /// silently falling back.
    pub fn with_request(&self, db_path: Option<&str>, table_name: Option<&str>) -> Self {
        let db_path = match db_path {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(PathBuf::from(p.trim())),
            None => self.db_path.clone(),
        };
        let table_name = table_name
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| self.table_name.clone());

        Self {
            db_path,
            table_name,
        }
    }
}

/// How rows are normalized and filtered
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_date_column")]
    pub date_column: String,

    /// Columns offered as secondary equality filters, in form order
    #[serde(default = "default_field_columns")]
    pub field_columns: Vec<String>,

    #[serde(default)]
    pub match_mode: MatchMode,

    /// Column summed in the result summary
    #[serde(default = "default_amount_column")]
    pub amount_column: Option<String>,

    /// Date formats in priority order
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    /// Width of the initial date range shown on the page, ending today
    #[serde(default = "default_range_days")]
    pub default_range_days: i64,
}

fn default_date_column() -> String {
    "Activity Date".to_string()
}

fn default_field_columns() -> Vec<String> {
    vec!["TIN".to_string(), "Assessment Number".to_string()]
}

fn default_amount_column() -> Option<String> {
    Some("Amount Assessed".to_string())
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
}

fn default_range_days() -> i64 {
    30
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            date_column: default_date_column(),
            field_columns: default_field_columns(),
            match_mode: MatchMode::default(),
            amount_column: default_amount_column(),
            date_formats: default_date_formats(),
            default_range_days: default_range_days(),
        }
    }
}

impl FilterConfig {
    /// Build the date normalizer for the configured formats
    pub fn normalizer(&self) -> DateNormalizer {
        DateNormalizer::new(self.date_formats.iter().cloned())
    }

    /// Build criteria from bounds and the values typed into the field inputs
    ///
    /// `field_values[i]` pairs with `field_columns[i]`; extra values are
    /// ignored and missing ones leave their column unfiltered.
    pub fn criteria(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        field_values: &[Option<String>],
    ) -> FilterCriteria {
        self.field_columns
            .iter()
            .zip(field_values)
            .fold(FilterCriteria::new().with_range(from, to), |c, (col, val)| {
                c.with_field(FieldMatch::new(col.clone(), val.clone(), self.match_mode))
            })
    }

    /// The default page range: the last `default_range_days` days up to `today`
    ///
    /// A range reaching past the earliest representable date starts there.
    pub fn default_range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let days = chrono::Days::new(self.default_range_days.max(0).unsigned_abs());
        let start = today.checked_sub_days(days).unwrap_or(NaiveDate::MIN);
        (start, today)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum rows rendered in the HTML table (exports are never truncated)
    #[serde(default = "default_page_row_limit")]
    pub page_row_limit: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8501
}

fn default_page_row_limit() -> usize {
    1000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            page_row_limit: default_page_row_limit(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CSV export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_file_name() -> String {
    "report_export.csv".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Command-line overrides; `None` leaves the lower layers in place
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub table_name: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Layer environment values and overrides on top of `base`
    ///
    /// Pure: reads nothing but its arguments. Empty environment values are
    /// treated as unset.
    pub fn resolve(
        base: Config,
        env: &HashMap<String, String>,
        overrides: &ConfigOverrides,
    ) -> Config {
        let mut config = base;
        let var = |key: &str| {
            env.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        // Environment layer
        if let Some(path) = var(ENV_DB_FILEPATH) {
            config.source.db_path = Some(PathBuf::from(path));
        }
        if let Some(table) = var(ENV_TABLE_NAME) {
            config.source.table_name = table;
        }
        if let Some(column) = var(ENV_DATE_COLUMN) {
            config.filter.date_column = column;
        }
        if let Some(host) = var(ENV_HOST) {
            config.server.host = host;
        }
        if let Some(port) = var(ENV_PORT).and_then(|p| p.parse().ok()) {
            config.server.port = port;
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            config.logging.level = level;
        }
        if let Some(format) = var(ENV_LOG_FORMAT) {
            config.logging.format = format;
        }

        // Override layer
        if let Some(path) = &overrides.db_path {
            config.source.db_path = Some(path.clone());
        }
        if let Some(table) = &overrides.table_name {
            config.source.table_name = table.clone();
        }
        if let Some(host) = &overrides.host {
            config.server.host = host.clone();
        }
        if let Some(port) = overrides.port {
            config.server.port = port;
        }

        config
    }

    /// Resolve from a file (or defaults), the process environment and overrides
    pub fn load_with_overrides(
        path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::load(p)?,
            None => Self::load_default_file(),
        };
        Ok(Self::resolve(base, &env_snapshot(), overrides))
    }

    /// Load configuration with environment variable overrides only
    pub fn from_env() -> Self {
        Self::resolve(Config::default(), &env_snapshot(), &ConfigOverrides::default())
    }

    /// Try default config locations, falling back to built-in defaults
    fn load_default_file() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("report-viewer").join("config.toml")),
            Some(PathBuf::from("./report-viewer.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }
}

/// Snapshot of the process environment
pub fn env_snapshot() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Report Viewer Configuration
#
# Environment variables override these settings:
# - DB_FILEPATH
# - TABLE_NAME
# - DATE_COLUMN
# - VIEWER_HOST
# - VIEWER_PORT
# - VIEWER_LOG_LEVEL
# - VIEWER_LOG_FORMAT

[source]
# Absolute path to the SQLite database (opened read-only)
# db_path = "/path/to/EFRIS PDF Report.db"

# Table to browse
table_name = "EfrisPdfReport"

[filter]
# Column holding the date text
date_column = "Activity Date"

# Columns offered as optional equality filters
field_columns = ["TIN", "Assessment Number"]

# exact (case-sensitive equality) or contains (case-insensitive substring)
match_mode = "exact"

# Column summed in the results summary
amount_column = "Amount Assessed"

# Initial date range on the page (days back from today)
default_range_days = 30

[server]
host = "127.0.0.1"
port = 8501

# Maximum rows rendered in the results table
page_row_limit = 1000

[export]
file_name = "report_export.csv"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
