//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate, lowest priority first:
//! 1. Built-in defaults (see [`defaults`])
//! 2. An optional configuration file (any format `config` understands)
//! 3. Environment variables, e.g. `CATALOG_CRAWLER_CRAWLING__CONCURRENCY=4`
//!
//! Command-line flags are applied on top by the binary.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::infrastructure::parsing::ParsingConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "CATALOG_CRAWLER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawling: CrawlingConfig,
    pub logging: LoggingConfig,
    /// Selectors and labels for the catalogue markup
    pub parsing: ParsingConfig,
}

/// What happens when one product page fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First failure cancels the crawl and nothing is written
    #[default]
    Abort,
    /// Failures are reported alongside the records that did succeed
    Isolate,
}

/// Order of records in the output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrdering {
    /// Listing order: page, then position on the page
    #[default]
    UrlOrder,
    /// Whatever order the workers finished in
    Completion,
}

/// Crawl behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlingConfig {
    /// Number of product pages fetched and parsed in parallel
    pub concurrency: usize,

    pub user_agent: String,

    /// Per-request timeout in seconds, 0 disables it
    pub request_timeout_seconds: u64,

    /// Where the product array is written
    pub output_path: PathBuf,

    pub failure_policy: FailurePolicy,

    pub ordering: OutputOrdering,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Directory for the log file when `file_output` is enabled
    pub log_dir: PathBuf,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self {
            concurrency: defaults::CONCURRENCY,
            user_agent: defaults::USER_AGENT.to_string(),
            request_timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            output_path: PathBuf::from(defaults::OUTPUT_FILE),
            failure_policy: FailurePolicy::default(),
            ordering: OutputOrdering::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawling.concurrency == 0 {
            return Err(ConfigError::Validation {
                message: "crawling.concurrency must be at least 1".to_string(),
            });
        }

        if !self.logging.console_output && !self.logging.file_output {
            return Err(ConfigError::Validation {
                message: "at least one of logging.console_output or logging.file_output must be enabled"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Loads [`AppConfig`] from defaults, an optional file and the environment
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = &self.config_path {
            builder = builder.add_source(config::File::from(path.as_path()));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = settings.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Default configuration values
pub mod defaults {
    /// Serial crawl unless asked otherwise
    pub const CONCURRENCY: usize = 1;

    pub const USER_AGENT: &str = concat!("catalog-crawler/", env!("CARGO_PKG_VERSION"));

    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    pub const OUTPUT_FILE: &str = "products.json";

    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = false;

    pub const LOG_DIR: &str = "logs";

    /// Name of the log file inside `LOG_DIR`
    pub const LOG_FILE_NAME: &str = "catalog-crawler.log";
}
