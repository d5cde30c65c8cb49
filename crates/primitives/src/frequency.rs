//! Return frequencies and resampling options.

use serde::{Deserialize, Serialize};

use crate::Weekday;

/// Observation frequency of a return stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    /// Native frequency of the quotes, no resampling.
    #[default]
    Daily,
    /// One bucket per week, ending on an anchor weekday.
    Weekly,
    /// One bucket per calendar month, ending on its last observation.
    Monthly,
}

impl Frequency {
    /// Parse a one-letter frequency code (`D`, `W` or `M`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "D" | "DAILY" => Some(Self::Daily),
            "W" | "WEEKLY" => Some(Self::Weekly),
            "M" | "MONTHLY" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Daily => write!(f, "daily"),
            Self::Weekly => write!(f, "weekly"),
            Self::Monthly => write!(f, "monthly"),
        }
    }
}

/// Options controlling weekly bucket boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResampleOptions {
    /// Weekday that closes each weekly bucket.
    pub anchor: Weekday,
    /// Emit one bucket per week even when the anchor day has no observation,
    /// falling back to the nearest earlier observation.
    pub force_anchor: bool,
}

impl ResampleOptions {
    /// Options with forced weekly anchors on `anchor`.
    #[must_use]
    pub const fn forced(anchor: Weekday) -> Self {
        Self { anchor, force_anchor: true }
    }
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self { anchor: Weekday::Wed, force_anchor: false }
    }
}
