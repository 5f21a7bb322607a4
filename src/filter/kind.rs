//! Filter kinds and their canonical names
//!
//! The catalog is a closed set. Names are parsed with an exact,
//! case-sensitive match; anything else is an `InvalidFilter`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CollageError, Result};

/// Reserved name that never resolves to a filter
pub const UNSUPPORTED_FILTER_NAME: &str = "unsupported";

/// Every filter a layer can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterKind {
    /// Leave the layer as it is
    #[default]
    Normal,
    RedComponent,
    GreenComponent,
    BlueComponent,
    BrightenValue,
    DarkenValue,
    BrightenIntensity,
    DarkenIntensity,
    BrightenLuma,
    DarkenLuma,
    /// `|top - bottom|` against the layer beneath
    Difference,
    /// `top * bottom / max` against the layer beneath
    Multiply,
    /// Inverse multiply against the layer beneath
    Screen,
}

impl FilterKind {
    /// All kinds, in catalog order
    pub const ALL: [FilterKind; 13] = [
        FilterKind::Normal,
        FilterKind::RedComponent,
        FilterKind::GreenComponent,
        FilterKind::BlueComponent,
        FilterKind::BrightenValue,
        FilterKind::DarkenValue,
        FilterKind::BrightenIntensity,
        FilterKind::DarkenIntensity,
        FilterKind::BrightenLuma,
        FilterKind::DarkenLuma,
        FilterKind::Difference,
        FilterKind::Multiply,
        FilterKind::Screen,
    ];

    /// Resolve a canonical filter name
    ///
    /// # Errors
    /// `InvalidFilter` for anything that is not an exact canonical name.
    pub fn parse(name: &str) -> Result<Self> {
        let kind = match name {
            "normal" => FilterKind::Normal,
            "red-component" => FilterKind::RedComponent,
            "green-component" => FilterKind::GreenComponent,
            "blue-component" => FilterKind::BlueComponent,
            "brighten-value" => FilterKind::BrightenValue,
            "darken-value" => FilterKind::DarkenValue,
            "brighten-intensity" => FilterKind::BrightenIntensity,
            "darken-intensity" => FilterKind::DarkenIntensity,
            "brighten-luma" => FilterKind::BrightenLuma,
            "darken-luma" => FilterKind::DarkenLuma,
            "difference" => FilterKind::Difference,
            "multiply" => FilterKind::Multiply,
            "screen" => FilterKind::Screen,
            _ => {
                return Err(CollageError::InvalidFilter {
                    name: name.to_string(),
                })
            }
        };
        Ok(kind)
    }

    /// Canonical name, the exact inverse of [`FilterKind::parse`]
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Normal => "normal",
            FilterKind::RedComponent => "red-component",
            FilterKind::GreenComponent => "green-component",
            FilterKind::BlueComponent => "blue-component",
            FilterKind::BrightenValue => "brighten-value",
            FilterKind::DarkenValue => "darken-value",
            FilterKind::BrightenIntensity => "brighten-intensity",
            FilterKind::DarkenIntensity => "darken-intensity",
            FilterKind::BrightenLuma => "brighten-luma",
            FilterKind::DarkenLuma => "darken-luma",
            FilterKind::Difference => "difference",
            FilterKind::Multiply => "multiply",
            FilterKind::Screen => "screen",
        }
    }

    /// Whether the filter reads the pixel on the layer beneath
    pub fn is_blend_mode(&self) -> bool {
        matches!(
            self,
            FilterKind::Difference | FilterKind::Multiply | FilterKind::Screen
        )
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = CollageError;

    fn from_str(s: &str) -> Result<Self> {
        FilterKind::parse(s)
    }
}
