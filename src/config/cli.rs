use clap::{Parser, Subcommand};
use crate::config::toml_config::{TomlConfig, DEFAULT_CONCURRENT_FETCHES};
use crate::core::export::OutputFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

#[derive(Debug, Clone, Parser)]
#[command(name = "store-locator")]
#[command(about = "Find stores and browse their product catalogs")]
pub struct CliConfig {
    /// Base URL of the store directory service
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Serve stores from a JSON file instead of the directory service
    #[arg(long)]
    pub seed: Option<String>,

    /// TOML configuration file; command-line flags take precedence
    #[arg(short, long)]
    pub config: Option<String>,

    /// Base URL for relative product image references
    #[arg(long)]
    pub image_base: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long)]
    pub concurrent_fetches: Option<usize>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(skip)]
    pub headers: HashMap<String, String>,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Fill every setting not given on the command line from `file`.
    pub fn merge_file(&mut self, file: &TomlConfig) -> Result<()> {
        if self.endpoint.is_none() {
            self.endpoint = Some(file.endpoint().to_string());
        }
        if self.image_base.is_none() {
            self.image_base = file.image_base_url().map(str::to_string);
        }
        if self.timeout_seconds.is_none() {
            self.timeout_seconds = file.timeout_seconds();
        }
        if self.concurrent_fetches.is_none() {
            self.concurrent_fetches = Some(file.concurrent_fetches());
        }
        if self.format.is_none() {
            self.format = file.output_format()?;
        }
        for (key, value) in file.headers() {
            self.headers.entry(key).or_insert(value);
        }
        Ok(())
    }

    pub fn output_format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

impl ConfigProvider for CliConfig {
    fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    fn image_base_url(&self) -> Option<&str> {
        self.image_base.as_deref()
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }

    fn concurrent_fetches(&self) -> usize {
        self.concurrent_fetches.unwrap_or(DEFAULT_CONCURRENT_FETCHES)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if self.seed.is_none() {
            validate_url("endpoint", self.endpoint())?;
        }
        if let Some(base) = &self.image_base {
            validate_url("image_base", base)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout as usize, 1)?;
        }
        validate_positive_number("concurrent_fetches", self.concurrent_fetches(), 1)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// List every store in the directory
    List,

    /// Search stores by name (case-insensitive substring)
    Search { query: String },

    /// Show the product catalog of one store
    Products {
        store: String,

        /// Resolve the store within this search instead of the full listing
        #[arg(long)]
        query: Option<String>,
    },

    /// Fetch the product images of one store and report which loaded
    Images {
        store: String,

        #[arg(long)]
        query: Option<String>,
    },
}
