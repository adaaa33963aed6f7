//! Runtime configuration.
//!
//! # Responsibility
//! - Merge CLI/env overrides, an optional TOML file, a legacy `key.txt` and
//!   built-in defaults into one [`AppConfig`].
//! - Decide once whether the external text service is available.
//!
//! # Invariants
//! - Precedence: overrides > `OPENAI_API_KEY` (key only) > file > `key.txt`
//!   (key only) > defaults.
//! - A missing config file is not an error; an unreadable or malformed one is.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const APP_DIR_NAME: &str = "sytobook";
const CONFIG_FILE_NAME: &str = "config.toml";
const LEGACY_KEY_FILE_NAME: &str = "key.txt";
const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } => Some(source),
            Self::Parse { .. } => None,
        }
    }
}

/// External text-service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AssistantSettings {
    /// Live only when enabled and a non-blank key is present.
    pub fn is_available(&self) -> bool {
        self.enabled
            && self
                .api_key
                .as_deref()
                .is_some_and(|key| !key.trim().is_empty())
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub assistant: AssistantSettings,
}

/// Values supplied on the command line or through `SYTOBOOK_*` variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub data_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub api_key: Option<String>,
    pub disable_assistant: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    log_level: Option<String>,
    log_dir: Option<PathBuf>,
    assistant: FileAssistantConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileAssistantConfig {
    enabled: Option<bool>,
    api_key: Option<String>,
    model: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

impl AppConfig {
    /// Loads configuration from `config_path` (or the default location).
    pub fn load(
        config_path: Option<&Path>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let path = config_path.map(Path::to_path_buf).or_else(default_config_path);
        let file = match path {
            Some(path) => read_file_config(&path, config_path.is_some())?,
            None => FileConfig::default(),
        };
        let env_key = std::env::var(FALLBACK_API_KEY_ENV).ok();
        Ok(Self::resolve(file, overrides, env_key))
    }

    /// Parses TOML text and resolves it against overrides, without touching
    /// the environment.
    pub fn from_toml_str(raw: &str, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let file = parse_file_config(raw, Path::new("<inline>"))?;
        Ok(Self::resolve(file, overrides, None))
    }

    fn resolve(file: FileConfig, overrides: ConfigOverrides, env_key: Option<String>) -> Self {
        let data_dir = overrides
            .data_dir
            .or(file.data_dir)
            .unwrap_or_else(default_data_dir);
        let log_dir = file.log_dir.unwrap_or_else(|| data_dir.join("logs"));
        let log_level = overrides
            .log_level
            .or(file.log_level)
            .unwrap_or_else(|| crate::logging::default_log_level().to_string());

        let defaults = AssistantSettings::default();
        let api_key = non_blank(overrides.api_key)
            .or_else(|| non_blank(env_key))
            .or_else(|| non_blank(file.assistant.api_key))
            .or_else(|| read_legacy_key(&data_dir));
        let enabled = !overrides.disable_assistant && file.assistant.enabled.unwrap_or(true);

        Self {
            log_dir,
            log_level,
            assistant: AssistantSettings {
                enabled,
                api_key,
                model: file.assistant.model.unwrap_or(defaults.model),
                endpoint: file.assistant.endpoint.unwrap_or(defaults.endpoint),
                timeout_secs: file.assistant.timeout_secs.unwrap_or(defaults.timeout_secs),
            },
            data_dir,
        }
    }

    /// SQLite file holding every user's contacts and notes.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("sytobook.sqlite3")
    }
}

fn read_file_config(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse_file_config(&raw, path),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && !required => {
            Ok(FileConfig::default())
        }
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_file_config(raw: &str, path: &Path) -> Result<FileConfig, ConfigError> {
    toml::from_str(raw).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn read_legacy_key(data_dir: &Path) -> Option<String> {
    let raw = std::fs::read_to_string(data_dir.join(LEGACY_KEY_FILE_NAME)).ok()?;
    non_blank(Some(raw))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
