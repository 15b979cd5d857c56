//! Server configuration management
//!
//! Handles loading configuration from environment variables, TOML files, and CLI arguments.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tasas_core::DataSource;
use thiserror::Error;

/// Default spreadsheet location
pub const DEFAULT_DATA_PATH: &str = "data/tasas_interes.xlsx";

/// Default sheet holding the loan table
pub const DEFAULT_SHEET_NAME: &str = "bd_2023_prueba";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid port number: {0}. Must be between 1 and 65535")]
    InvalidPort(u16),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid environment: {0}. Must be one of: development, production")]
    InvalidEnvironment(String),

    #[error("Sheet name must not be empty")]
    EmptySheetName,

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// Deployment environment; production switches logs to JSON lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_string())),
        }
    }
}

impl Environment {
    /// Check if this is a production environment
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Server configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Environment (development, production)
    #[serde(deserialize_with = "deserialize_environment")]
    pub environment: Environment,
    /// Spreadsheet or CSV holding the loan table
    pub data_path: PathBuf,
    /// Sheet to read from the spreadsheet
    pub sheet_name: String,
    /// File served by `/download_excel`; defaults to `data_path`
    pub excel_path: Option<PathBuf>,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_environment<'de, D>(deserializer: D) -> Result<Environment, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Environment::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
            log_level: LogLevel::Info,
            environment: Environment::Development,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            excel_path: None,
        }
    }
}

/// Environment variable names
pub mod env_vars {
    pub const HOST: &str = "TASAS_SERVER_HOST";
    pub const PORT: &str = "TASAS_SERVER_PORT";
    pub const LOG_LEVEL: &str = "TASAS_LOG_LEVEL";
    pub const ENVIRONMENT: &str = "TASAS_ENV";
    pub const DATA_PATH: &str = "TASAS_DATA_PATH";
    pub const SHEET_NAME: &str = "TASAS_SHEET_NAME";
    pub const EXCEL_PATH: &str = "TASAS_EXCEL_PATH";
}

impl ServerConfig {
    /// Create a new ServerConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: ServerConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Override fields from any `TASAS_*` environment variables that are set
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(host) = std::env::var(env_vars::HOST) {
            self.host = host;
        }
        if let Ok(port_str) = std::env::var(env_vars::PORT) {
            self.port = port_str.parse().map_err(|_| ConfigError::InvalidPort(0))?;
        }
        if let Ok(log_level) = std::env::var(env_vars::LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&log_level)?;
        }
        if let Ok(env) = std::env::var(env_vars::ENVIRONMENT) {
            self.environment = Environment::from_str(&env)?;
        }
        if let Ok(path) = std::env::var(env_vars::DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        if let Ok(sheet) = std::env::var(env_vars::SHEET_NAME) {
            self.sheet_name = sheet;
        }
        if let Ok(path) = std::env::var(env_vars::EXCEL_PATH) {
            self.excel_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort(self.port));
        }
        if self.sheet_name.trim().is_empty() {
            return Err(ConfigError::EmptySheetName);
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Source the dataset is loaded from
    pub fn data_source(&self) -> DataSource {
        DataSource::new(&self.data_path, &self.sheet_name)
    }

    /// File served verbatim by the Excel download
    pub fn excel_download_path(&self) -> &Path {
        self.excel_path.as_deref().unwrap_or(self.data_path.as_path())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(host) = &cli.host {
            self.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(path) = &cli.data_path {
            self.data_path = path.clone();
        }
        if let Some(sheet) = &cli.sheet_name {
            self.sheet_name = sheet.clone();
        }
        if let Some(path) = &cli.excel_path {
            self.excel_path = Some(path.clone());
        }
        Ok(())
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Host address override
    pub host: Option<String>,
    /// Port override
    pub port: Option<u16>,
    /// Log level override
    pub log_level: Option<String>,
    /// Data source override
    pub data_path: Option<PathBuf>,
    /// Sheet name override
    pub sheet_name: Option<String>,
    /// Excel download override
    pub excel_path: Option<PathBuf>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<ServerConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        ServerConfig::from_file(config_path)?
    } else {
        ServerConfig::default()
    };

    config.apply_env()?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
