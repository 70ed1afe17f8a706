//! Palette hand-off to the page.
//!
//! The page is reached through a live channel when a content context is
//! loaded, otherwise through a one-shot injection carrying precomputed style
//! overrides. Both payloads come from [`StyleOverrides::from_base`], so the
//! two paths render identical colors.

use std::{any::type_name_of_val, fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tint_model::HexColor;
use tracing::{debug, error, warn};

use crate::color::derive_palette;
use crate::error::Result;

pub const PROP_NAVY: &str = "--navy";
pub const PROP_BASE_PARTS: &str = "--theme-sel-bg-parts";
pub const PROP_LEVEL_ZERO: &str = "--nav-level-zero";
pub const PROP_LEVEL_ONE: &str = "--nav-level-one";
pub const PROP_LEVEL_TWO: &str = "--nav-level-two";
pub const PROP_LEVEL_THREE: &str = "--nav-level-three";

/// Message sent over the live channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteRequest {
    pub base_color: HexColor,
}

impl PaletteRequest {
    pub fn new(base_color: HexColor) -> Self {
        Self { base_color }
    }

    /// Style overrides the page should end up with for this request.
    pub fn overrides(&self) -> StyleOverrides {
        StyleOverrides::from_base(&self.base_color)
    }
}

/// A single CSS custom property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleProperty {
    pub name: &'static str,
    pub value: String,
}

/// Ordered custom-property assignments for one base color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleOverrides {
    properties: Vec<StyleProperty>,
}

impl StyleOverrides {
    pub fn from_base(base: &HexColor) -> Self {
        let palette = derive_palette(base);
        let [one, two, three] = palette.levels;

        let properties = vec![
            StyleProperty {
                name: PROP_NAVY,
                value: base.to_string(),
            },
            StyleProperty {
                name: PROP_BASE_PARTS,
                value: base.to_rgb().css_parts(),
            },
            StyleProperty {
                name: PROP_LEVEL_ZERO,
                value: base.to_string(),
            },
            StyleProperty {
                name: PROP_LEVEL_ONE,
                value: one.into(),
            },
            StyleProperty {
                name: PROP_LEVEL_TWO,
                value: two.into(),
            },
            StyleProperty {
                name: PROP_LEVEL_THREE,
                value: three.into(),
            },
        ];

        Self { properties }
    }

    pub fn properties(&self) -> &[StyleProperty] {
        &self.properties
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|prop| prop.name == name)
            .map(|prop| prop.value.as_str())
    }

    /// Render as a `:root` rule. Every property is marked `!important` so
    /// the overrides win over the site's own stylesheet.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for prop in &self.properties {
            css.push_str(&format!("  {}: {} !important;\n", prop.name, prop.value));
        }
        css.push_str("}\n");
        css
    }
}

/// Live in-page channel. Fails when no content context is loaded yet.
#[async_trait]
pub trait PaletteChannel: Send + Sync {
    async fn deliver(&self, request: &PaletteRequest) -> Result<()>;
}

/// One-shot direct injection used when the live channel is unavailable.
#[async_trait]
pub trait PaletteInjector: Send + Sync {
    async fn inject(&self, overrides: &StyleOverrides) -> Result<()>;
}

/// How a palette reached the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Live,
    Fallback,
    /// Both paths failed; the stored color is unaffected.
    Failed,
    /// No delivery target is attached.
    Skipped,
}

/// Best-effort delivery: live channel first, single fallback injection
/// second, no retries.
#[derive(Clone, Default)]
pub struct PaletteDelivery {
    live: Option<Arc<dyn PaletteChannel>>,
    fallback: Option<Arc<dyn PaletteInjector>>,
}

impl fmt::Debug for PaletteDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaletteDelivery")
            .field("live", &self.live.as_ref().map(|c| type_name_of_val(c.as_ref())))
            .field(
                "fallback",
                &self.fallback.as_ref().map(|i| type_name_of_val(i.as_ref())),
            )
            .finish()
    }
}

impl PaletteDelivery {
    pub fn new(
        live: Option<Arc<dyn PaletteChannel>>,
        fallback: Option<Arc<dyn PaletteInjector>>,
    ) -> Self {
        Self { live, fallback }
    }

    pub fn with_live(mut self, live: Arc<dyn PaletteChannel>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn PaletteInjector>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub async fn deliver(&self, request: &PaletteRequest) -> DeliveryOutcome {
        if self.live.is_none() && self.fallback.is_none() {
            debug!(color = %request.base_color, "no palette delivery target attached");
            return DeliveryOutcome::Skipped;
        }

        if let Some(live) = &self.live {
            match live.deliver(request).await {
                Ok(()) => return DeliveryOutcome::Live,
                Err(err) => {
                    debug!(error = %err, "live palette channel unavailable, falling back");
                }
            }
        }

        let Some(fallback) = &self.fallback else {
            warn!(color = %request.base_color, "live delivery failed and no fallback is attached");
            return DeliveryOutcome::Failed;
        };

        match fallback.inject(&request.overrides()).await {
            Ok(()) => DeliveryOutcome::Fallback,
            Err(err) => {
                error!(color = %request.base_color, error = %err, "fallback palette injection failed");
                DeliveryOutcome::Failed
            }
        }
    }
}
