use std::path::PathBuf;

use crate::util::{non_empty_var, parse_millis_var, path_var};

pub const ENV_CONFIG_PATH: &str = "TINT_CONFIG_PATH";
pub const ENV_CONFIG_JSON: &str = "TINT_CONFIG_JSON";
pub const ENV_STORE_PATH: &str = "TINT_STORE_PATH";
pub const ENV_COMMIT_DELAY_MS: &str = "TINT_COMMIT_DELAY_MS";

/// Source that produced the configuration, before env overrides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TintConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl TintConfigSource {
    pub fn describe(&self) -> String {
        match self {
            Self::Default => "built-in defaults".to_string(),
            Self::EnvPath(path) => {
                format!("{} ({ENV_CONFIG_PATH})", path.display())
            }
            Self::EnvInline => ENV_CONFIG_JSON.to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}

/// Environment-derived configuration values.
///
/// Gathered once so loading itself never touches the process environment.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub config_json: Option<String>,
    pub store_path: Option<PathBuf>,
    pub commit_delay_ms: Option<u64>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self {
            config_path: path_var(ENV_CONFIG_PATH),
            config_json: non_empty_var(ENV_CONFIG_JSON),
            store_path: path_var(ENV_STORE_PATH),
            commit_delay_ms: parse_millis_var(ENV_COMMIT_DELAY_MS),
        }
    }
}
