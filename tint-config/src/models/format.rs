use std::path::Path;

use anyhow::{Context, anyhow};

use super::TintConfig;

/// Syntax of a config document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    /// No recognised extension: TOML is tried first, then JSON.
    Sniff,
}

impl ConfigFormat {
    /// Chosen by extension, case-insensitively.
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Sniff,
        }
    }

    pub fn parse(self, contents: &str) -> anyhow::Result<TintConfig> {
        match self {
            Self::Toml => toml::from_str(contents).context("invalid TOML"),
            Self::Json => {
                serde_json::from_str(contents).context("invalid JSON")
            }
            Self::Sniff => Self::Toml.parse(contents).or_else(|toml_err| {
                Self::Json.parse(contents).map_err(|json_err| {
                    anyhow!(
                        "neither TOML nor JSON (toml: {toml_err:#}; json: {json_err:#})"
                    )
                })
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_picks_format() {
        assert_eq!(ConfigFormat::for_path(Path::new("tint.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::for_path(Path::new("TINT.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::for_path(Path::new("tintrc")), ConfigFormat::Sniff);
        assert_eq!(ConfigFormat::for_path(Path::new("tint.yaml")), ConfigFormat::Sniff);
    }

    #[test]
    fn declared_format_is_not_second_guessed() {
        let json = r##"{"default_color":"#040506"}"##;
        assert!(ConfigFormat::Toml.parse(json).is_err());
        assert_eq!(ConfigFormat::Json.parse(json).unwrap().default_color, "#040506");
        assert_eq!(ConfigFormat::Sniff.parse(json).unwrap().default_color, "#040506");
    }

    #[test]
    fn sniff_failure_reports_both_attempts() {
        let err = ConfigFormat::Sniff.parse("{{ not config").unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("toml: invalid TOML"), "{message}");
        assert!(message.contains("json: invalid JSON"), "{message}");
    }
}
