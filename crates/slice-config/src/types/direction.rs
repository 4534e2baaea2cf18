//! Build direction enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which way the part grows during a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BuildDirection {
    /// Platform starts at the top and the part is built downward.
    #[serde(rename = "Top_Down")]
    TopDown,
    /// Platform starts at the vat floor and the part is pulled upward.
    #[default]
    #[serde(rename = "Bottom_Up")]
    BottomUp,
}

impl BuildDirection {
    /// Name used in the config document and the summary block.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TopDown => "Top_Down",
            Self::BottomUp => "Bottom_Up",
        }
    }
}

impl fmt::Display for BuildDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a direction name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseBuildDirectionError(pub String);

impl fmt::Display for ParseBuildDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown build direction '{}' (expected Top_Down or Bottom_Up)", self.0)
    }
}

impl std::error::Error for ParseBuildDirectionError {}

impl FromStr for BuildDirection {
    type Err = ParseBuildDirectionError;

    /// Accepts the persisted names and the legacy ordinals `0`/`1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Top_Down" | "0" => Ok(Self::TopDown),
            "Bottom_Up" | "1" => Ok(Self::BottomUp),
            other => Err(ParseBuildDirectionError(other.to_string())),
        }
    }
}
