//! Inclusive date windows.

use serde::{Deserialize, Serialize};

use crate::{Date, PrimitivesError};

/// An inclusive `[start, end]` window of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    /// First date of the window.
    pub start: Date,
    /// Last date of the window.
    pub end: Date,
}

impl DateWindow {
    /// Create a window.
    ///
    /// # Errors
    /// Returns `PrimitivesError::InvalidWindow` if `start` is after `end`.
    pub fn new(start: Date, end: Date) -> Result<Self, PrimitivesError> {
        if start > end {
            return Err(PrimitivesError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Whether `date` falls in the window.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Iterate over every calendar day in the window.
    pub fn days(&self) -> impl Iterator<Item = Date> + '_ {
        self.start.iter_days().take_while(|d| *d <= self.end)
    }
}
