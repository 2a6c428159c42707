use serde::{Deserialize, Serialize};
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::FlowError;
use crate::utils::{app_data_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";
const TOKEN_ENV: &str = "ONBOARD_CORE_TOKEN";

/// Runtime configuration for the flow engine and its gateway boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote banking gateway.
    pub gateway_base_url: String,
    /// Request timeout for gateway calls, in seconds.
    pub request_timeout_secs: u64,
    /// Environment variable consulted for the bearer credential.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_flow: Option<String>,
}

fn default_token_env() -> String {
    TOKEN_ENV.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_base_url: "https://gateway.local/api/v1".into(),
            request_timeout_secs: 30,
            token_env: default_token_env(),
            last_flow: None,
        }
    }
}

impl Config {
    /// Resolves the bearer credential from the configured environment variable.
    pub fn bearer_token(&self) -> Option<String> {
        env::var(&self.token_env).ok().filter(|t| !t.is_empty())
    }
}

/// Loads and persists the active [`Config`] under the app data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, FlowError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, FlowError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, FlowError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config, FlowError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), FlowError> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<(), FlowError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
