use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::ProviderError;
use crate::types::{CalendarEvent, EventDraft};

/// Calendar backend capability consumed by the tool layer.
///
/// Implementations own authentication and transport. Callers receive one
/// by injection (`Arc<dyn CalendarProvider>`) instead of reaching for
/// shared global state, so the tool layer can be exercised against a fake.
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Events overlapping `[start, end)`, expanded to single events and
    /// ordered by start time. `max_results` caps the page size when set.
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: Option<i32>,
    ) -> Result<Vec<CalendarEvent>, ProviderError>;

    /// Create an event and return it as stored by the backend.
    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ProviderError>;

    /// Move an existing event to a new start/end, keeping everything else.
    async fn reschedule_event(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<CalendarEvent, ProviderError>;

    /// Delete an event, optionally notifying attendees. Returns the event
    /// as it was before deletion so callers can report what was removed.
    async fn cancel_event(
        &self,
        event_id: &str,
        notify_attendees: bool,
    ) -> Result<CalendarEvent, ProviderError>;
}
