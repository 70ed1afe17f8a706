pub mod format;
pub mod sources;

pub use format::ConfigFormat;
pub use sources::{EnvConfig, TintConfigSource};

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tint_core::apply::{DEFAULT_COMMIT_DELAY, default_base_color};
use tint_core::{CommitPolicy, CoordinatorConfig, HexColor};
use tracing::{debug, warn};

use crate::validation::{self, ConfigWarnings};

/// Store file name under the platform config directory.
const DEFAULT_STORE_FILE: &str = "store.json";

/// Directory under the platform config directory.
const APP_DIR: &str = "tint";

/// Effective tint settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TintConfig {
    /// Color preselected for origins without a stored preference. Kept as
    /// written so validation can report a bad value instead of failing the
    /// load.
    pub default_color: String,
    pub apply: ApplyConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApplyConfig {
    /// How long a color must stay put before it is recorded as recent.
    /// `0` records it as part of the apply.
    pub commit_delay_ms: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for TintConfig {
    fn default() -> Self {
        Self {
            default_color: Self::fallback_color().into(),
            apply: ApplyConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            commit_delay_ms: DEFAULT_COMMIT_DELAY.as_millis() as u64,
        }
    }
}

impl TintConfig {
    /// Load configuration from `env`, resolving relative paths against
    /// `base_dir`. Evaluation order:
    /// 1) `$TINT_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$TINT_CONFIG_JSON` (inline JSON),
    /// 3) `tint.toml`, `tint.json` or `config/tint.toml` in `base_dir`,
    /// 4) defaults if none of these exist.
    ///
    /// `$TINT_STORE_PATH` and `$TINT_COMMIT_DELAY_MS` are applied last.
    pub fn load(
        env: &EnvConfig,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, TintConfigSource)> {
        let (mut config, source) = Self::load_base(env, base_dir)?;
        config.apply_env_overrides(env);
        debug!(source = %source.describe(), "configuration loaded");
        Ok((config, source))
    }

    fn load_base(
        env: &EnvConfig,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, TintConfigSource)> {
        if let Some(path) = &env.config_path {
            let config = Self::read_file(&base_dir.join(path))?;
            return Ok((config, TintConfigSource::EnvPath(path.clone())));
        }

        if let Some(raw) = &env.config_json {
            let config = ConfigFormat::Json
                .parse(raw)
                .context("failed to parse TINT_CONFIG_JSON")?;
            return Ok((config, TintConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::read_file(&path)?;
            return Ok((config, TintConfigSource::File(path)));
        }

        Ok((Self::default(), TintConfigSource::Default))
    }

    /// Read one config file, parsed according to [`ConfigFormat::for_path`].
    pub fn read_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read tint config from {}", path.display())
        })?;
        ConfigFormat::for_path(path)
            .parse(&contents)
            .with_context(|| format!("invalid tint config {}", path.display()))
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        const CANDIDATES: &[&str] =
            &["tint.toml", "tint.json", "config/tint.toml"];

        CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.is_file())
    }

    fn apply_env_overrides(&mut self, env: &EnvConfig) {
        if let Some(path) = &env.store_path {
            self.store.path = Some(path.clone());
        }
        if let Some(delay_ms) = env.commit_delay_ms {
            self.apply.commit_delay_ms = delay_ms;
        }
    }

    /// Built-in default color, `#3584e4`.
    pub fn fallback_color() -> HexColor {
        default_base_color()
    }

    /// Configured default color, or the built-in one when the configured
    /// value does not parse.
    pub fn default_color(&self) -> HexColor {
        HexColor::parse(&self.default_color).unwrap_or_else(|err| {
            warn!(error = %err, "invalid default_color, using built-in default");
            Self::fallback_color()
        })
    }

    pub fn commit_policy(&self) -> CommitPolicy {
        CommitPolicy::from_delay_ms(self.apply.commit_delay_ms)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            commit_policy: self.commit_policy(),
            default_color: self.default_color(),
        }
    }

    /// Location of the JSON store: `store.path` when set, otherwise
    /// `<config dir>/tint/store.json`.
    pub fn store_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.store.path {
            return Ok(path.clone());
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(DEFAULT_STORE_FILE))
            .ok_or_else(|| {
                anyhow!(
                    "no platform config directory; set store.path or TINT_STORE_PATH"
                )
            })
    }

    pub fn validate(&self) -> ConfigWarnings {
        validation::validate(self)
    }
}
