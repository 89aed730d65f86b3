//! CLI configuration: defaults, then environment, then flags.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::Level;

pub const SCHEMA_ENV: &str = "FIELDSPEC_SCHEMA";
pub const LOG_ENV: &str = "FIELDSPEC_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Datamodel JSON the catalog is loaded from
    pub schema_path: PathBuf,
    pub output: OutputFormat,
    pub log_level: Level,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("./datamodel.json"),
            output: OutputFormat::Human,
            log_level: Level::WARN,
        }
    }
}

impl CliConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(path) = std::env::var(SCHEMA_ENV) {
            if !path.trim().is_empty() {
                config.schema_path = PathBuf::from(path);
            }
        }
        if let Some(level) = std::env::var(LOG_ENV)
            .ok()
            .and_then(|v| Level::from_str(v.trim()).ok())
        {
            config.log_level = level;
        }
        config
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(mut self, schema: Option<PathBuf>, json: bool, verbose: u8) -> Self {
        if let Some(path) = schema {
            self.schema_path = path;
        }
        if json {
            self.output = OutputFormat::Json;
        }
        self.log_level = match verbose {
            0 => self.log_level,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        self
    }
}
