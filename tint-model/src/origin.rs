use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{ModelError, Result};

/// Scheme+host+port of a web page, used as the per-site preference key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Origin(String);

impl Origin {
    /// Accepts a bare origin or any page URL and reduces it to its origin.
    ///
    /// Default ports are dropped (`https://a.com:443` becomes
    /// `https://a.com`). Opaque origins such as `data:` or `file:` URLs are
    /// rejected since they cannot key a preference.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidOrigin(raw.to_string()));
        }

        let url = Url::parse(trimmed)
            .map_err(|_| ModelError::InvalidOrigin(raw.to_string()))?;
        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(ModelError::InvalidOrigin(raw.to_string()));
        }

        Ok(Self(origin.ascii_serialization()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Origin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Origin {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Origin {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Origin> for String {
    fn from(value: Origin) -> Self {
        value.0
    }
}
