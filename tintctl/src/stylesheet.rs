use std::path::PathBuf;

use async_trait::async_trait;
use tint_core::{PaletteInjector, StyleOverrides, TintError};
use tracing::debug;

/// Fallback injector for the command line: writes the rendered `:root`
/// rule to a stylesheet file, or to stdout when no file is given.
#[derive(Debug, Clone)]
pub enum StylesheetInjector {
    Stdout,
    File(PathBuf),
}

impl StylesheetInjector {
    pub fn new(css_out: Option<PathBuf>) -> Self {
        match css_out {
            Some(path) => Self::File(path),
            None => Self::Stdout,
        }
    }
}

#[async_trait]
impl PaletteInjector for StylesheetInjector {
    async fn inject(&self, overrides: &StyleOverrides) -> tint_core::Result<()> {
        let css = overrides.to_css();
        match self {
            Self::Stdout => {
                print!("{css}");
                Ok(())
            }
            Self::File(path) => {
                tokio::fs::write(path, css).await.map_err(|err| {
                    TintError::Delivery(format!(
                        "failed to write stylesheet {}: {err}",
                        path.display()
                    ))
                })?;
                debug!(path = %path.display(), "stylesheet written");
                Ok(())
            }
        }
    }
}
