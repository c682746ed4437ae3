//! Configuration loaded from `mlforge.toml`.
//!
//! Values missing from the file fall back to sensible defaults. The
//! `MLFORGE_API_KEY` environment variable takes precedence over the file
//! for the backend API key.

use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct AgentConfig {
    /// API key for the text-generation backend. Empty means unauthenticated.
    #[serde(default)]
    pub api_key: String,

    /// Generate endpoint of the text-generation backend.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Total repair attempts before the run gives up.
    #[serde(default = "default_max_fix_retries")]
    pub max_fix_retries: u32,

    /// Total collecting visits before the run gives up on the user.
    #[serde(default = "default_max_collect_visits")]
    pub max_collect_visits: u32,

    /// Prompting rounds within one collecting visit.
    #[serde(default = "default_collect_rounds")]
    pub collect_rounds: u32,

    /// Dataset rows read when checking the target column.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Timeout for one execution of candidate code, in seconds.
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,

    /// Whole-run deadline, in seconds.
    #[serde(default = "default_run_deadline_secs")]
    pub run_deadline_secs: u64,

    /// Interpreter used to run candidate code.
    #[serde(default = "default_python_bin")]
    pub python_bin: String,
}

fn default_endpoint() -> String {
    "http://localhost:8080/generate".to_string()
}

fn default_max_fix_retries() -> u32 {
    3
}

fn default_max_collect_visits() -> u32 {
    3
}

fn default_collect_rounds() -> u32 {
    5
}

fn default_preview_rows() -> usize {
    10
}

fn default_execution_timeout_secs() -> u64 {
    300
}

fn default_run_deadline_secs() -> u64 {
    1800
}

fn default_python_bin() -> String {
    "python3".to_string()
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            max_fix_retries: default_max_fix_retries(),
            max_collect_visits: default_max_collect_visits(),
            collect_rounds: default_collect_rounds(),
            preview_rows: default_preview_rows(),
            execution_timeout_secs: default_execution_timeout_secs(),
            run_deadline_secs: default_run_deadline_secs(),
            python_bin: default_python_bin(),
        }
    }
}

impl AgentConfig {
    /// Load configuration from `mlforge.toml` in the current directory,
    /// falling back to defaults when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Path::new("mlforge.toml");
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<AgentConfig>(&contents)?
        } else {
            Self::default()
        };

        // Environment takes precedence over the file for the API key.
        if let Ok(key) = std::env::var("MLFORGE_API_KEY")
            && !key.is_empty()
        {
            config.api_key = key;
        }

        Ok(config)
    }
}
