use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interval::{TimeInterval, WorkingWindow};

/// Malformed-input conditions for a slot query.
///
/// Empty busy lists, busy intervals covering the whole window, and busy
/// intervals lying outside the window are all normal cases, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("window start {day_start} is not before window end {day_end}")]
    InvalidWindow {
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    },

    #[error("minimum slot duration must be positive, got {minutes} minutes")]
    InvalidDuration { minutes: i64 },

    #[error("busy interval ends before it starts ({start} > {end})")]
    InvalidInterval {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

/// An idle range of at least the requested minimum duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FreeSlot {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// A single availability question: which gaps of at least `min_duration`
/// does `window` leave open given `busy`?
#[derive(Debug, Clone)]
pub struct SlotQuery {
    pub window: WorkingWindow,
    pub min_duration: Duration,
    pub busy: Vec<TimeInterval>,
}

impl SlotQuery {
    pub fn compute(&self) -> Result<Vec<FreeSlot>, SlotError> {
        compute_free_slots(&self.window, self.min_duration, &self.busy)
    }
}

/// Compute the ordered free slots of a working window.
///
/// `busy` may be unsorted, overlapping, adjacent, or reach outside the
/// window; intervals are clipped to the window before the scan. The result
/// is ordered by start time, pairwise disjoint, and independent of the
/// input order of `busy`.
pub fn compute_free_slots(
    window: &WorkingWindow,
    min_duration: Duration,
    busy: &[TimeInterval],
) -> Result<Vec<FreeSlot>, SlotError> {
    if window.day_start >= window.day_end {
        return Err(SlotError::InvalidWindow {
            day_start: window.day_start,
            day_end: window.day_end,
        });
    }
    if min_duration <= Duration::zero() {
        return Err(SlotError::InvalidDuration {
            minutes: min_duration.num_minutes(),
        });
    }

    let mut clipped = Vec::with_capacity(busy.len());
    for interval in busy {
        if interval.start > interval.end {
            return Err(SlotError::InvalidInterval {
                start: interval.start,
                end: interval.end,
            });
        }
        if let Some(inside) = interval.clipped_to(window) {
            clipped.push(inside);
        }
    }
    clipped.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut slots = Vec::new();
    let mut cursor = window.day_start;
    for interval in &clipped {
        if cursor + min_duration <= interval.start {
            slots.push(FreeSlot {
                start: cursor,
                end: interval.start,
            });
        }
        // max() merges overlapping and nested busy intervals in the same
        // pass; the cursor never moves backwards.
        cursor = cursor.max(interval.end);
    }
    if cursor + min_duration <= window.day_end {
        slots.push(FreeSlot {
            start: cursor,
            end: window.day_end,
        });
    }

    Ok(slots)
}
