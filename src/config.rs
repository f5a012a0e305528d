// File: ./src/config.rs
// Handles configuration loading, saving, validation and defaults.
use crate::context::AppContext;
use crate::model::DurationTable;
use anyhow::{Context, Error, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
#[error("Config file not found: {}", .0.display())]
pub struct MissingConfig(pub PathBuf);

static NO_DURATION_LABELS: DurationTable = DurationTable::new();

fn default_issue_prefixes() -> Vec<String> {
    vec!["DR".to_string(), "SR".to_string()]
}

fn default_token_dir() -> String {
    "..".to_string()
}

fn default_token_file() -> String {
    "token.json".to_string()
}

fn default_credentials_path() -> String {
    "../credentials.json".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoistConfig {
    pub token: String,
    #[serde(default)]
    pub duration_labels: DurationTable,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct JiraConfig {
    pub server: String,
    pub ssl_cert_path: String,
    pub login: String,
    pub password: String,
    #[serde(default = "default_issue_prefixes")]
    pub issue_prefixes: Vec<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TogglConfig {
    pub token: String,
    pub workspace_id: u64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PtmConfig {
    pub api_url: String,
    pub user_login: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct GcalConfig {
    #[serde(default = "default_token_dir")]
    pub path_to_token: String,
    #[serde(default = "default_token_file")]
    pub token_file_name: String,
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

impl Default for GcalConfig {
    fn default() -> Self {
        Self {
            path_to_token: default_token_dir(),
            token_file_name: default_token_file(),
            credentials_path: default_credentials_path(),
        }
    }
}

impl GcalConfig {
    pub fn token_path(&self) -> PathBuf {
        Path::new(&self.path_to_token).join(&self.token_file_name)
    }
}

/// Every service section is optional; only configured services are used.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub todoist: Option<TodoistConfig>,
    #[serde(default)]
    pub jira: Option<JiraConfig>,
    #[serde(default)]
    pub toggl: Option<TogglConfig>,
    #[serde(default)]
    pub ptm: Option<PtmConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
}

fn require(value: &str, what: &str, section: &str) -> Result<()> {
    if value.trim().is_empty() {
        bail!("{} is not specified for {} wrapper", what, section);
    }
    Ok(())
}

impl Config {
    /// Duration labels of the task manager, empty when it is not configured.
    pub fn duration_labels(&self) -> &DurationTable {
        self.todoist
            .as_ref()
            .map(|t| &t.duration_labels)
            .unwrap_or(&NO_DURATION_LABELS)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations the service wrappers could not work with.
    /// Negative or fractional minutes never get here: they fail deserialization.
    pub fn validate(&self) -> Result<()> {
        if let Some(todoist) = &self.todoist {
            require(&todoist.token, "Token", "todoist")?;
            for (key, entry) in todoist.duration_labels.iter() {
                if entry.label.trim().is_empty() {
                    bail!("Duration label '{}' has an empty label name", key);
                }
            }
        }
        if let Some(jira) = &self.jira {
            require(&jira.server, "Jira server", "jira")?;
            require(&jira.ssl_cert_path, "Path to SSL certificate", "jira")?;
            require(&jira.login, "Login", "jira")?;
            require(&jira.password, "Password", "jira")?;
        }
        if let Some(toggl) = &self.toggl {
            require(&toggl.token, "Toggl token", "toggl")?;
        }
        if let Some(ptm) = &self.ptm {
            require(&ptm.api_url, "API url", "ptm")?;
            require(&ptm.user_login, "User login", "ptm")?;
        }
        Ok(())
    }

    /// Reads `config.toml` from the context's config dir. A missing file is
    /// reported as [`MissingConfig`] so callers can fall back to defaults.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;
        if !path.exists() {
            return Err(MissingConfig(path).into());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;

        log::info!(
            "Loaded config from {} ({} duration labels)",
            path.display(),
            config.duration_labels().len()
        );
        Ok(config)
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        err.chain().any(|cause| {
            cause.is::<MissingConfig>()
                || cause
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Writes through a sibling `.tmp` file and renames it over the config.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, toml_str)?;
        fs::rename(tmp_path, &path)?;
        Ok(())
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}
