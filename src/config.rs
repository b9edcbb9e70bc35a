//! Configuration for eventcrew.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (EVENTCREW_OUTPUT_DIR, EVENTCREW_BIND, EVENTCREW_MODEL)
//! 2. Config file (.eventcrew/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .eventcrew/config.yaml
//! - Falls back to ~/.eventcrew/config.yaml
//! - `output_dir` in the config file is relative to the directory holding .eventcrew/
//!
//! API keys are never read from here; they arrive with each request.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::validation::ValidationRules;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Default bind address for `serve`
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub output_dir: Option<String>,
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub validation: Option<ValidationConfig>,
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ValidationConfig {
    pub min_participants: Option<u32>,
    pub min_budget: Option<f64>,
    pub restrict_venue_types: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    pub openai_base_url: Option<String>,
    pub serper_base_url: Option<String>,
    pub search_results: Option<usize>,
    pub scrape_max_chars: Option<usize>,
    pub request_timeout_seconds: Option<u64>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory artifacts are written to and read from
    pub output_dir: PathBuf,
    /// Address the web form binds to
    pub bind: String,
    /// Chat model name
    pub model: String,
    /// Form validation rules
    pub validation: ValidationRules,
    /// Engine settings
    pub engine: EngineSettings,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Schema version declared by the config file
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub openai_base_url: String,
    pub serper_base_url: String,
    pub search_results: usize,
    pub scrape_max_chars: usize,
    pub request_timeout_seconds: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            openai_base_url: "https://api.openai.com/v1".to_string(),
            serper_base_url: "https://google.serper.dev".to_string(),
            search_results: 5,
            scrape_max_chars: 8_000,
            request_timeout_seconds: 120,
        }
    }
}

impl EngineSettings {
    fn merge(config: Option<&EngineConfig>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };

        Self {
            openai_base_url: config
                .openai_base_url
                .clone()
                .unwrap_or(defaults.openai_base_url),
            serper_base_url: config
                .serper_base_url
                .clone()
                .unwrap_or(defaults.serper_base_url),
            search_results: config.search_results.unwrap_or(defaults.search_results),
            scrape_max_chars: config.scrape_max_chars.unwrap_or(defaults.scrape_max_chars),
            request_timeout_seconds: config
                .request_timeout_seconds
                .unwrap_or(defaults.request_timeout_seconds),
        }
    }
}

impl ValidationRules {
    fn merge(config: Option<&ValidationConfig>) -> Self {
        let defaults = Self::default();
        let Some(config) = config else {
            return defaults;
        };

        Self {
            min_participants: config.min_participants.unwrap_or(defaults.min_participants),
            min_budget: config.min_budget.or(defaults.min_budget),
            restrict_venue_types: config
                .restrict_venue_types
                .unwrap_or(defaults.restrict_venue_types),
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".eventcrew").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    let home_config = dirs::home_dir()?.join(".eventcrew").join("config.yaml");
    home_config.exists().then_some(home_config)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(serde_yaml::from_str(content)?)
}

/// Resolve a path that may be relative to the config file's project root
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file with environment overrides
fn resolve(file: ConfigFile, config_path: Option<&Path>) -> ResolvedConfig {
    // Project root is the parent of .eventcrew/
    let base_dir = config_path
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));

    let output_dir = if let Ok(env_dir) = std::env::var("EVENTCREW_OUTPUT_DIR") {
        PathBuf::from(env_dir)
    } else if let Some(ref dir) = file.output_dir {
        resolve_path(base_dir, dir)
    } else {
        PathBuf::from(".")
    };

    let bind = std::env::var("EVENTCREW_BIND")
        .ok()
        .or(file.bind)
        .unwrap_or_else(|| DEFAULT_BIND.to_string());

    let model = std::env::var("EVENTCREW_MODEL")
        .ok()
        .or(file.model)
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    ResolvedConfig {
        output_dir,
        bind,
        model,
        validation: ValidationRules::merge(file.validation.as_ref()),
        engine: EngineSettings::merge(file.engine.as_ref()),
        config_file: config_path.map(Path::to_path_buf),
        version: file.version,
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let file = match config_file {
        Some(ref path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    Ok(resolve(file, config_file.as_deref()))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}
