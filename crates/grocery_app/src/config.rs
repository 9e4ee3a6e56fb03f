//! Application configuration.
//!
//! Read from `grocery.ron` in the working directory (or the file named by
//! `GROCERY_CONFIG`), every field optional, then secrets and URLs are
//! overridden from the environment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use grocery_engine::{
    DocumentSettings, PlannerSettings, PollSettings, TaskApiSettings, TaskSpec, TranslateSettings,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "grocery.ron";
pub const CONFIG_ENV: &str = "GROCERY_CONFIG";

const TASK_API_KEY_ENV: &str = "GROCERY_TASK_API_KEY";
const DEEPL_API_KEY_ENV: &str = "GROCERY_DEEPL_API_KEY";
const PLANNER_API_KEY_ENV: &str = "GROCERY_PLANNER_API_KEY";
const DOC_URL_ENV: &str = "GROCERY_DOC_URL";
const NOTION_TOKEN_ENV: &str = "GROCERY_NOTION_TOKEN";
const NOTION_DATABASE_ENV: &str = "GROCERY_NOTION_DATABASE_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where list files are written and read.
    pub output_dir: PathBuf,
    /// Also write `./grocery.log`.
    pub log_to_file: bool,
    pub task_api: TaskApiConfig,
    pub poll: PollConfig,
    pub notion: NotionConfig,
    pub translation: TranslationConfig,
    pub document: DocumentConfig,
    pub planner: PlannerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    pub database_id: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub api_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub url: Option<String>,
    pub max_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            log_to_file: false,
            task_api: TaskApiConfig::default(),
            poll: PollConfig::default(),
            notion: NotionConfig::default(),
            translation: TranslationConfig::default(),
            document: DocumentConfig::default(),
            planner: PlannerConfig::default(),
        }
    }
}

impl Default for TaskApiConfig {
    fn default() -> Self {
        let settings = TaskApiSettings::default();
        Self {
            base_url: settings.base_url,
            api_key: None,
            request_timeout_secs: settings.request_timeout.as_secs(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        let settings = PollSettings::default();
        Self {
            max_attempts: settings.max_attempts,
            interval_secs: settings.interval.as_secs(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            api_url: TranslateSettings::default().api_url,
            api_key: None,
        }
    }
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_bytes: DocumentSettings::default().max_bytes,
        }
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let settings = PlannerSettings::default();
        Self {
            base_url: settings.base_url,
            api_key: None,
            model: settings.model,
        }
    }
}

impl AppConfig {
    /// Loads the config file (if any) and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match &explicit {
            Some(path) => Self::from_file(path)?,
            None => Self::from_optional_file(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Like [`AppConfig::from_file`], but a missing file yields the defaults.
    pub fn from_optional_file(path: &Path) -> Result<Self, ConfigError> {
        match Self::from_file(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn from_ron_str(text: &str) -> Result<Self, String> {
        ron::from_str(text).map_err(|err| err.to_string())
    }

    /// Overrides secrets and the document URL with non-empty values from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = get(TASK_API_KEY_ENV) {
            self.task_api.api_key = Some(key);
        }
        if let Some(key) = get(DEEPL_API_KEY_ENV) {
            self.translation.api_key = Some(key);
        }
        if let Some(key) = get(PLANNER_API_KEY_ENV) {
            self.planner.api_key = Some(key);
        }
        if let Some(url) = get(DOC_URL_ENV) {
            self.document.url = Some(url);
        }
        if let Some(token) = get(NOTION_TOKEN_ENV) {
            self.notion.token = token;
        }
        if let Some(id) = get(NOTION_DATABASE_ENV) {
            self.notion.database_id = id;
        }
    }

    pub fn task_api_settings(&self) -> TaskApiSettings {
        TaskApiSettings {
            base_url: self.task_api.base_url.clone(),
            api_key: self.task_api.api_key.clone(),
            request_timeout: Duration::from_secs(self.task_api.request_timeout_secs),
            ..TaskApiSettings::default()
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_attempts: self.poll.max_attempts,
            interval: Duration::from_secs(self.poll.interval_secs),
        }
    }

    pub fn notion_task(&self) -> TaskSpec {
        TaskSpec::notion_grocery_fetch(&self.notion.database_id, &self.notion.token)
    }

    pub fn translate_settings(&self) -> TranslateSettings {
        TranslateSettings {
            api_url: self.translation.api_url.clone(),
            api_key: self.translation.api_key.clone(),
            ..TranslateSettings::default()
        }
    }

    pub fn document_settings(&self) -> DocumentSettings {
        DocumentSettings {
            max_bytes: self.document.max_bytes,
            ..DocumentSettings::default()
        }
    }

    /// `None` when no planner key is configured.
    pub fn planner_settings(&self) -> Option<PlannerSettings> {
        let api_key = self.planner.api_key.clone().filter(|key| !key.is_empty())?;
        Some(PlannerSettings {
            base_url: self.planner.base_url.clone(),
            api_key: Some(api_key),
            model: self.planner.model.clone(),
            ..PlannerSettings::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn partial_ron_keeps_defaults_for_the_rest() {
        let config = AppConfig::from_ron_str(
            r#"(
                poll: (max_attempts: 5),
                document: (url: Some("https://docs.google.com/document/d/abc/edit")),
            )"#,
        )
        .unwrap();

        assert_eq!(config.poll.max_attempts, 5);
        assert_eq!(config.poll.interval_secs, 10);
        assert_eq!(
            config.document.url.as_deref(),
            Some("https://docs.google.com/document/d/abc/edit")
        );
        assert_eq!(config.task_api, TaskApiConfig::default());
        assert_eq!(config.poll_settings().interval, Duration::from_secs(10));
    }

    #[test]
    fn environment_overrides_secrets_and_ignores_blanks() {
        let env: HashMap<&str, &str> = HashMap::from([
            (TASK_API_KEY_ENV, "task-key"),
            (NOTION_DATABASE_ENV, "db-1"),
            (DEEPL_API_KEY_ENV, "   "),
        ]);
        let mut config = AppConfig::default();
        config.translation.api_key = Some("from-file".to_string());

        config.apply_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(config.task_api.api_key.as_deref(), Some("task-key"));
        assert_eq!(config.notion.database_id, "db-1");
        assert_eq!(config.translation.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.task_api_settings().api_key.as_deref(), Some("task-key"));
    }

    #[test]
    fn planner_is_disabled_without_key() {
        let mut config = AppConfig::default();
        assert!(config.planner_settings().is_none());

        config.planner.api_key = Some("k".to_string());
        let settings = config.planner_settings().unwrap();
        assert_eq!(settings.model, "gpt-4");
        assert_eq!(settings.max_tokens, 1000);
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = AppConfig::from_optional_file(&temp.path().join("grocery.ron")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("grocery.ron");
        fs::write(&path, "(poll: (max_attempts: \"many\"))").unwrap();

        assert!(matches!(
            AppConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
