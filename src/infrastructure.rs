//! Infrastructure layer: transport, parsing, configuration, logging, output

pub mod config;
pub mod http_client;
pub mod json_writer;
pub mod logging;
pub mod parsing;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigManager, CrawlingConfig, FailurePolicy, OutputOrdering};
pub use http_client::{FetchError, FetchedPage, HttpClient, HttpClientConfig, PageFetcher};
pub use json_writer::{write_json_document, OutputError};
pub use logging::{init_logging_with_config, LoggingConfig};
pub use parsing::{
    ContextualParser, DetailParseContext, ParseContext, ParsingConfig, ParsingError, ParsingResult,
    ProductDetailParser, ProductListParser, QuantityMatcher,
};
