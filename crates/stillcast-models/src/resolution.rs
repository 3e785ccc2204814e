//! Output resolution selector.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of target output resolutions.
///
/// The selector is treated as a hint rather than a validated field: any
/// unrecognized value falls back to 720p instead of rejecting the job.
/// That permissiveness is long-standing documented behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Hd720,
    Hd1080,
}

impl Resolution {
    /// Parse a client-supplied selector. Unknown values map to 720p.
    pub fn from_param(s: &str) -> Self {
        match s.trim() {
            "1080p" => Resolution::Hd1080,
            _ => Resolution::Hd720,
        }
    }

    /// Target frame width.
    pub fn width(&self) -> u32 {
        match self {
            Resolution::Hd720 => 1280,
            Resolution::Hd1080 => 1920,
        }
    }

    /// Target frame height.
    pub fn height(&self) -> u32 {
        match self {
            Resolution::Hd720 => 720,
            Resolution::Hd1080 => 1080,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hd720 => "720p",
            Resolution::Hd1080 => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(Resolution::from_param("720p"), Resolution::Hd720);
        assert_eq!(Resolution::from_param("1080p"), Resolution::Hd1080);
    }

    #[test]
    fn test_unknown_selectors_fall_back_to_720p() {
        assert_eq!(Resolution::from_param("4k"), Resolution::Hd720);
        assert_eq!(Resolution::from_param(""), Resolution::Hd720);
        assert_eq!(Resolution::from_param("1080"), Resolution::Hd720);
        assert_eq!(Resolution::from_param("HD1080P"), Resolution::Hd720);
    }

    #[test]
    fn test_geometry() {
        assert_eq!(
            (Resolution::Hd720.width(), Resolution::Hd720.height()),
            (1280, 720)
        );
        assert_eq!(
            (Resolution::Hd1080.width(), Resolution::Hd1080.height()),
            (1920, 1080)
        );
    }
}
