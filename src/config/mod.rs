//! Configuration module for Law-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use law_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("statutes.toml")).unwrap();
//! println!("Files are stored under: {}", config.files.store);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, FilesConfig, HrefPolicy, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
