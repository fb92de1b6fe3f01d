use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use virtual_repeater::Direction;

/// The layout strategies a [`crate::VirtualList`] can be switched between by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum LayoutMode {
    #[default]
    Vertical,
    Horizontal,
    VerticalGrid,
    HorizontalGrid,
}

impl LayoutMode {
    pub const ALL: [Self; 4] = [
        Self::Vertical,
        Self::Horizontal,
        Self::VerticalGrid,
        Self::HorizontalGrid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::VerticalGrid => "vertical-grid",
            Self::HorizontalGrid => "horizontal-grid",
        }
    }

    /// The scroll axis.
    pub fn direction(self) -> Direction {
        match self {
            Self::Vertical | Self::VerticalGrid => Direction::Vertical,
            Self::Horizontal | Self::HorizontalGrid => Direction::Horizontal,
        }
    }

    pub fn is_grid(self) -> bool {
        matches!(self, Self::VerticalGrid | Self::HorizontalGrid)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayoutMode {
    type Err = ParseLayoutModeError;

    /// Accepts the kebab-case names, ignoring ASCII case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseLayoutModeError {
                input: name.to_string(),
            })
    }
}

/// Returned when a layout name matches no [`LayoutMode`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error(
    "unknown layout mode `{input}` (expected vertical, horizontal, vertical-grid or horizontal-grid)"
)]
pub struct ParseLayoutModeError {
    input: String,
}

impl ParseLayoutModeError {
    pub fn input(&self) -> &str {
        &self.input
    }
}
