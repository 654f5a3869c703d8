use availability::TimeInterval;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled event, resolved to concrete UTC timestamps.
///
/// All-day events have already been expanded to their date boundaries by
/// the provider, so `start`/`end` are always usable as a busy interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_all_day: bool,
    /// Attendee email addresses.
    pub attendees: Vec<String>,
    /// Conferencing link (Google Meet) when the event has one.
    pub meet_link: Option<String>,
    /// Link to the event in the Calendar web UI.
    pub html_link: Option<String>,
}

impl CalendarEvent {
    /// The committed time range this event occupies. Bounds are passed
    /// through unchecked; the slot engine rejects reversed intervals.
    pub fn busy_interval(&self) -> TimeInterval {
        TimeInterval {
            start: self.start,
            end: self.end,
        }
    }

    /// Title for display; the backend allows untitled events.
    pub fn title(&self) -> &str {
        self.summary.as_deref().unwrap_or("No title")
    }
}

/// A request to put a new event on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Attendee email addresses to invite.
    pub attendees: Vec<String>,
    /// Ask the backend to attach a Google Meet link on creation.
    pub with_meet_link: bool,
}
