use tint_core::HexColor;

use crate::models::TintConfig;

/// Commit delays above this are almost certainly a unit mistake.
pub const MAX_REASONABLE_COMMIT_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

/// Non-fatal problems with a loaded configuration. Every problem listed here
/// has a usable fallback, so none of them stop the program.
pub fn validate(config: &TintConfig) -> ConfigWarnings {
    let mut warnings = ConfigWarnings::default();

    if HexColor::parse(&config.default_color).is_err() {
        warnings.push_with_hint(
            format!(
                "default_color {:?} is not a valid hex color; using {}",
                config.default_color,
                TintConfig::fallback_color()
            ),
            "Use #rgb or #rrggbb, for example \"#3584e4\"",
        );
    }

    if config.apply.commit_delay_ms > MAX_REASONABLE_COMMIT_DELAY_MS {
        warnings.push_with_hint(
            format!(
                "apply.commit_delay_ms is {} ms; colors will take a long time to reach recents",
                config.apply.commit_delay_ms
            ),
            "The value is in milliseconds; 3000 is the usual window and 0 commits immediately",
        );
    }

    if let Some(path) = &config.store.path
        && path.is_dir()
    {
        warnings.push_with_hint(
            format!("store.path {} is a directory", path.display()),
            "Point store.path at a JSON file, for example store.json inside that directory",
        );
    }

    warnings
}
