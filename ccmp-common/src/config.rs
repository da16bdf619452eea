//! Configuration loading and resolution
//!
//! Bootstrap configuration comes from a single TOML file. The file is located
//! in this priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CCMP_CONFIG` environment variable
//! 3. Platform config file (`~/.config/ccmp/config.toml`, then `/etc/ccmp/config.toml`)
//! 4. Built-in defaults (fallback)
//!
//! The Airtable API key may additionally be supplied via `CCMP_AIRTABLE_API_KEY`,
//! which takes precedence over the TOML value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CCMP_CONFIG";

/// Environment variable carrying the Airtable personal access token
pub const API_KEY_ENV_VAR: &str = "CCMP_AIRTABLE_API_KEY";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub airtable: AirtableConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote record store settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AirtableConfig {
    /// Personal access token (prefer the environment variable)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base identifier (starts with `app`)
    #[serde(default)]
    pub base_id: String,

    /// REST API root, without the base id
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// View used when listing stories
    #[serde(default = "default_view")]
    pub view: String,

    /// Record cap for story listing
    #[serde(default = "default_max_records")]
    pub max_records: u32,

    /// Per-request timeout; `None` leaves requests unbounded
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub tables: TableNames,
}

/// Logical table names (must match the remote base exactly)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TableNames {
    #[serde(default = "default_applications_table")]
    pub applications: String,

    #[serde(default = "default_coffee_stories_table")]
    pub coffee_stories: String,

    #[serde(default = "default_story_submissions_table")]
    pub story_submissions: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory of static assets (images etc.) served as a fallback
    #[serde(default)]
    pub site_dir: Option<PathBuf>,
}

/// Home page content settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub stats: SiteStats,
}

/// Target values for the animated counters on the home page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteStats {
    #[serde(default = "default_conversations")]
    pub conversations: u32,
    #[serde(default = "default_stories")]
    pub stories: u32,
    #[serde(default = "default_countries")]
    pub countries: u32,
    #[serde(default = "default_scholars")]
    pub scholars: u32,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_api_url() -> String {
    "https://api.airtable.com/v0".to_string()
}

fn default_view() -> String {
    "Grid view".to_string()
}

fn default_max_records() -> u32 {
    100
}

fn default_applications_table() -> String {
    "applications".to_string()
}

fn default_coffee_stories_table() -> String {
    "coffee_stories".to_string()
}

fn default_story_submissions_table() -> String {
    "story_submissions".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5780
}

fn default_conversations() -> u32 {
    127
}

fn default_stories() -> u32 {
    89
}

fn default_countries() -> u32 {
    15
}

fn default_scholars() -> u32 {
    127
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AirtableConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_id: String::new(),
            api_url: default_api_url(),
            view: default_view(),
            max_records: default_max_records(),
            request_timeout_secs: None,
            tables: TableNames::default(),
        }
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            applications: default_applications_table(),
            coffee_stories: default_coffee_stories_table(),
            story_submissions: default_story_submissions_table(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            site_dir: None,
        }
    }
}

impl Default for SiteStats {
    fn default() -> Self {
        Self {
            conversations: default_conversations(),
            stories: default_stories(),
            countries: default_countries(),
            scholars: default_scholars(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Locate the config file following the documented priority order
///
/// Returns `None` when no file is found; callers fall back to defaults.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Platform config file
    let user_config = dirs::config_dir().map(|d| d.join("ccmp").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let system_config = PathBuf::from("/etc/ccmp/config.toml");
    if cfg!(unix) && system_config.exists() {
        return Some(system_config);
    }

    None
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load configuration from the resolved path, or defaults when none exists
///
/// An explicitly named file that cannot be read is an error; a missing
/// platform file is not.
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    match resolve_config_path(cli_arg) {
        Some(path) => {
            let config = load_toml_config(&path)?;
            info!("Loaded configuration from {}", path.display());
            Ok(config)
        }
        None => {
            info!("No config file found, using built-in defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Resolve the Airtable API key
///
/// **Priority:** ENV → TOML
pub fn resolve_api_key(config: &AirtableConfig) -> Result<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR).ok().filter(|k| is_valid_key(k));
    let toml_key = config.api_key.as_ref().filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "Airtable API key found in both environment and TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("Airtable API key loaded from environment variable");
        return Ok(key.trim().to_string());
    }

    if let Some(key) = toml_key {
        info!("Airtable API key loaded from TOML config");
        return Ok(key.trim().to_string());
    }

    Err(Error::Config(format!(
        "Airtable API key not configured. Please configure using one of:\n\
         1. Environment: {}=your-token\n\
         2. TOML config: [airtable] api_key = \"your-token\"\n\
         \n\
         Create a token at: https://airtable.com/create/tokens",
        API_KEY_ENV_VAR
    )))
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

impl TomlConfig {
    /// Check the settings the service cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.airtable.base_id.trim().is_empty() {
            return Err(Error::Config(
                "airtable.base_id is required (found in the base URL, starts with 'app')"
                    .to_string(),
            ));
        }
        if self.airtable.max_records == 0 {
            return Err(Error::Config("airtable.max_records must be at least 1".to_string()));
        }
        Ok(())
    }
}
