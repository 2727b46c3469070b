// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::Envelope;
use crate::error::{ErpError, ErpResult};

const QUALIFIER: &str = "com.guardian";
const ORGANIZATION: &str = "Guardian";
const APPLICATION: &str = "guardian-erp";

pub const ENV_API_URL: &str = "GUARDIAN_API_URL";
pub const ENV_API_TOKEN: &str = "GUARDIAN_API_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub envelope: Envelope,
    #[serde(default = "default_chat_envelope")]
    pub chat_envelope: Envelope,
    /// `limit` sent with every list request.
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_chat_envelope() -> Envelope {
    Envelope::Nested
}

fn default_page_limit() -> usize {
    1000
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout(),
            envelope: Envelope::default(),
            chat_envelope: default_chat_envelope(),
            page_limit: default_page_limit(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Local records store; defaults to the platform data dir.
    #[serde(default)]
    pub database: Option<PathBuf>,
}

fn project_dirs() -> ErpResult<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .ok_or_else(|| ErpError::Config("could not determine platform directories".into()))
}

pub fn default_config_path() -> ErpResult<PathBuf> {
    Ok(project_dirs()?.config_dir().join("config.yaml"))
}

pub fn default_data_dir() -> ErpResult<PathBuf> {
    let dirs = project_dirs()?;
    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir)?;
    Ok(data_dir.to_path_buf())
}

impl Settings {
    pub fn from_yaml(text: &str) -> ErpResult<Settings> {
        if text.trim().is_empty() {
            return Ok(Settings::default());
        }
        serde_yaml::from_str(text).map_err(|e| ErpError::Config(e.to_string()))
    }

    /// Read `path` (or the default location). A missing default file is not an
    /// error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> ErpResult<Settings> {
        let mut settings = match path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .map_err(|e| ErpError::Config(format!("{}: {}", p.display(), e)))?;
                Settings::from_yaml(&text)?
            }
            None => {
                let p = default_config_path()?;
                if p.exists() {
                    Settings::from_yaml(&fs::read_to_string(&p)?)?
                } else {
                    Settings::default()
                }
            }
        };
        settings.apply_env(|k| std::env::var(k).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(url) = get(ENV_API_URL).filter(|s| !s.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(token) = get(ENV_API_TOKEN).filter(|s| !s.trim().is_empty()) {
            self.api.token = Some(token);
        }
    }

    pub fn validate(&self) -> ErpResult<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ErpError::Config(format!(
                "api.base_url must start with http:// or https:// (got '{}')",
                url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ErpError::Config("api.timeout_secs must be positive".into()));
        }
        if self.api.page_limit == 0 {
            return Err(ErpError::Config("api.page_limit must be positive".into()));
        }
        Ok(())
    }

    /// Write the defaults to `path` unless a file is already there.
    pub fn write_default(path: &Path) -> ErpResult<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_yaml::to_string(&Settings::default())
            .map_err(|e| ErpError::Config(e.to_string()))?;
        fs::write(path, text)?;
        Ok(true)
    }

    pub fn database_path(&self) -> ErpResult<PathBuf> {
        match self.database {
            Some(ref p) => Ok(p.clone()),
            None => Ok(default_data_dir()?.join("guardian.sqlite")),
        }
    }
}
