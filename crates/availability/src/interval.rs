use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::slots::SlotError;

/// A half-open time range `[start, end)` in UTC.
///
/// Represents either a busy period reported by a calendar provider or a
/// candidate range inside a working window. Invariant: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeInterval {
    /// Create an interval, rejecting reversed bounds.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, SlotError> {
        if start > end {
            return Err(SlotError::InvalidInterval { start, end });
        }
        Ok(TimeInterval { start, end })
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Clamp the interval to a window. `None` when nothing of it remains
    /// inside the window (this also drops zero-length intervals).
    pub(crate) fn clipped_to(&self, window: &WorkingWindow) -> Option<TimeInterval> {
        let start = self.start.max(window.day_start);
        let end = self.end.min(window.day_end);
        (start < end).then_some(TimeInterval { start, end })
    }
}

/// Daily working-hours policy, in whole hours of the scheduling timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WorkingHours {
    /// The unrestricted 00:00-24:00 policy.
    pub fn full_day() -> Self {
        WorkingHours {
            start_hour: 0,
            end_hour: 24,
        }
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        WorkingHours {
            start_hour: 9,
            end_hour: 18,
        }
    }
}

/// The day-bounded range availability is computed within.
///
/// Invariant: `day_start < day_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub day_start: DateTime<Utc>,
    pub day_end: DateTime<Utc>,
}

impl WorkingWindow {
    pub fn new(day_start: DateTime<Utc>, day_end: DateTime<Utc>) -> Result<Self, SlotError> {
        if day_start >= day_end {
            return Err(SlotError::InvalidWindow { day_start, day_end });
        }
        Ok(WorkingWindow { day_start, day_end })
    }

    pub fn duration(&self) -> Duration {
        self.day_end - self.day_start
    }
}
