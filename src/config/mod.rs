//! Configuration module for Pagewise
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional, so running without a file is the same as running
//! with an empty one.
//!
//! # Example
//!
//! ```no_run
//! use pagewise::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("pagewise.toml")).unwrap();
//! println!("Sitemap will be crawled to depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, DownloadConfig, LlmConfig, OutputConfig, DEFAULT_EXTENSIONS,
    DEFAULT_PROMPT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
