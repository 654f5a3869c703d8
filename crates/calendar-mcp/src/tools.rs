//! The tool surface exposed to MCP clients.

use std::future::Future;
use std::sync::Arc;

use availability::{SlotError, SlotQuery, WorkingHours};
use calendar_client::{CalendarEvent, CalendarProvider, EventDraft, ProviderError};
use chrono::{Days, Duration, Utc};
use chrono_tz::Tz;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::config::Config;
use crate::format;
use crate::timeutil;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CheckAvailabilityRequest {
    #[schemars(description = "Start date (YYYY-MM-DD). Defaults to today.")]
    pub start_date: Option<String>,
    #[schemars(description = "End date (YYYY-MM-DD). Defaults to start date plus the lookahead.")]
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScheduleMeetingRequest {
    #[schemars(description = "Meeting title")]
    pub title: String,
    #[schemars(description = "Start time (YYYY-MM-DD HH:MM)")]
    pub start_datetime: String,
    #[schemars(description = "Meeting length in minutes. Defaults to 30.")]
    pub duration_minutes: Option<u32>,
    #[schemars(description = "Comma-separated attendee email addresses")]
    pub attendees: Option<String>,
    #[schemars(description = "Meeting description")]
    pub description: Option<String>,
    #[schemars(description = "Attach a Google Meet link. Defaults to true.")]
    pub add_meet_link: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListUpcomingEventsRequest {
    #[schemars(description = "Maximum number of events to return. Defaults to 10.")]
    pub max_results: Option<u32>,
    #[schemars(description = "How many days ahead to look. Defaults to 7.")]
    pub days_ahead: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RescheduleMeetingRequest {
    #[schemars(description = "ID of the event to move")]
    pub event_id: String,
    #[schemars(description = "New start time (YYYY-MM-DD HH:MM)")]
    pub new_start_datetime: String,
    #[schemars(description = "New meeting length in minutes. Defaults to 30.")]
    pub new_duration_minutes: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CancelMeetingRequest {
    #[schemars(description = "ID of the event to cancel")]
    pub event_id: String,
    #[schemars(description = "Notify attendees of the cancellation. Defaults to true.")]
    pub send_cancellation: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct FindFreeSlotsRequest {
    #[schemars(description = "Date to search (YYYY-MM-DD). Defaults to today.")]
    pub date: Option<String>,
    #[schemars(description = "Minimum slot length in minutes. Defaults to 30.")]
    pub duration_minutes: Option<u32>,
    #[schemars(description = "Restrict to configured working hours. Defaults to true.")]
    pub working_hours_only: Option<bool>,
}

/// Calendar tools served over MCP.
///
/// Holds the injected provider capability; no credential state lives here.
#[derive(Clone)]
pub struct CalendarAgent {
    provider: Arc<dyn CalendarProvider>,
    config: Config,
    tz: Tz,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl CalendarAgent {
    pub fn new(provider: Arc<dyn CalendarProvider>, config: Config) -> anyhow::Result<Self> {
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid timezone: {}", config.timezone))?;

        Ok(CalendarAgent {
            provider,
            config,
            tz,
            tool_router: Self::tool_router(),
        })
    }

    #[tool(
        description = "Check calendar availability between two dates. Dates should be in YYYY-MM-DD format."
    )]
    async fn check_availability(
        &self,
        Parameters(req): Parameters<CheckAvailabilityRequest>,
    ) -> Result<CallToolResult, McpError> {
        let start_date = match &req.start_date {
            Some(s) => timeutil::parse_date(s).map_err(bad_input)?,
            None => timeutil::today(self.tz),
        };
        let end_date = match &req.end_date {
            Some(s) => timeutil::parse_date(s).map_err(bad_input)?,
            None => start_date + Days::new(u64::from(self.config.default_lookahead_days)),
        };

        let start = timeutil::local_midnight(start_date, self.tz).map_err(bad_input)?;
        let end = timeutil::local_midnight(end_date, self.tz).map_err(bad_input)?;
        if start >= end {
            return Err(McpError::invalid_params(
                format!("start_date {} is not before end_date {}", start_date, end_date),
                None,
            ));
        }

        tracing::info!("Checking availability from {} to {}", start_date, end_date);
        let events = self
            .provider
            .events_between(start, end, None)
            .await
            .map_err(provider_error)?;

        Ok(text_result(format::availability_report(
            start_date, end_date, &events, self.tz,
        )))
    }

    #[tool(
        description = "Schedule a new meeting. start_datetime format: YYYY-MM-DD HH:MM. attendees: comma-separated emails."
    )]
    async fn schedule_meeting(
        &self,
        Parameters(req): Parameters<ScheduleMeetingRequest>,
    ) -> Result<CallToolResult, McpError> {
        let duration = req
            .duration_minutes
            .unwrap_or(self.config.default_duration_minutes);
        if duration == 0 {
            return Err(McpError::invalid_params(
                "duration_minutes must be positive",
                None,
            ));
        }

        let start = timeutil::parse_datetime(&req.start_datetime, self.tz).map_err(bad_input)?;
        let end = start + Duration::minutes(i64::from(duration));

        let draft = EventDraft {
            title: req.title,
            description: req.description,
            start,
            end,
            attendees: req.attendees.as_deref().map(split_emails).unwrap_or_default(),
            with_meet_link: req.add_meet_link.unwrap_or(true),
        };

        tracing::info!("Scheduling '{}' at {}", draft.title, start);
        let event = self
            .provider
            .create_event(&draft)
            .await
            .map_err(provider_error)?;

        Ok(text_result(format::meeting_scheduled(&event, self.tz)))
    }

    #[tool(description = "List upcoming calendar events.")]
    async fn list_upcoming_events(
        &self,
        Parameters(req): Parameters<ListUpcomingEventsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let max_results = req.max_results.unwrap_or(10);
        let days_ahead = req.days_ahead.unwrap_or(self.config.default_lookahead_days);

        let now = Utc::now();
        let until = now + Duration::days(i64::from(days_ahead));

        let events = self
            .provider
            .events_between(now, until, Some(max_results as i32))
            .await
            .map_err(provider_error)?;

        Ok(text_result(format::upcoming_events(
            days_ahead, &events, self.tz,
        )))
    }

    #[tool(
        description = "Reschedule an existing meeting to a new time. new_start_datetime format: YYYY-MM-DD HH:MM."
    )]
    async fn reschedule_meeting(
        &self,
        Parameters(req): Parameters<RescheduleMeetingRequest>,
    ) -> Result<CallToolResult, McpError> {
        let duration = req
            .new_duration_minutes
            .unwrap_or(self.config.default_duration_minutes);
        if duration == 0 {
            return Err(McpError::invalid_params(
                "new_duration_minutes must be positive",
                None,
            ));
        }

        let new_start =
            timeutil::parse_datetime(&req.new_start_datetime, self.tz).map_err(bad_input)?;
        let new_end = new_start + Duration::minutes(i64::from(duration));

        tracing::info!("Rescheduling event {} to {}", req.event_id, new_start);
        let event = self
            .provider
            .reschedule_event(&req.event_id, new_start, new_end)
            .await
            .map_err(provider_error)?;

        Ok(text_result(format::meeting_rescheduled(&event, self.tz)))
    }

    #[tool(description = "Cancel a meeting and optionally notify attendees.")]
    async fn cancel_meeting(
        &self,
        Parameters(req): Parameters<CancelMeetingRequest>,
    ) -> Result<CallToolResult, McpError> {
        let notify = req.send_cancellation.unwrap_or(true);

        tracing::info!("Cancelling event {} (notify: {})", req.event_id, notify);
        let event = self
            .provider
            .cancel_event(&req.event_id, notify)
            .await
            .map_err(provider_error)?;

        Ok(text_result(format::meeting_cancelled(&event, notify, self.tz)))
    }

    #[tool(
        description = "Find available time slots on a specific date. date format: YYYY-MM-DD."
    )]
    async fn find_free_slots(
        &self,
        Parameters(req): Parameters<FindFreeSlotsRequest>,
    ) -> Result<CallToolResult, McpError> {
        let date = match &req.date {
            Some(s) => timeutil::parse_date(s).map_err(bad_input)?,
            None => timeutil::today(self.tz),
        };
        let minutes = req
            .duration_minutes
            .unwrap_or(self.config.default_duration_minutes);
        let hours = if req.working_hours_only.unwrap_or(true) {
            self.config.working_hours
        } else {
            WorkingHours::full_day()
        };

        let window = timeutil::day_window(date, &hours, self.tz).map_err(bad_input)?;

        tracing::info!("Finding free slots on {} (minimum {} minutes)", date, minutes);
        let events = self
            .provider
            .events_between(window.day_start, window.day_end, None)
            .await
            .map_err(provider_error)?;

        let query = SlotQuery {
            window,
            min_duration: Duration::minutes(i64::from(minutes)),
            busy: events.iter().map(CalendarEvent::busy_interval).collect(),
        };
        let slots = query.compute().map_err(slot_error)?;

        Ok(text_result(format::free_slot_report(
            date, minutes, &slots, self.tz,
        )))
    }
}

#[tool_handler]
impl ServerHandler for CalendarAgent {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Google Calendar tools: check availability, schedule, reschedule and cancel \
                 meetings, list upcoming events, and find free time slots."
                    .to_string(),
            ),
        }
    }
}

fn text_result(message: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(message)])
}

fn split_emails(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}

/// Caller mistakes (unknown ids, unparseable inputs) become invalid-params
/// errors; everything else at the provider boundary is internal.
fn provider_error(err: ProviderError) -> McpError {
    match &err {
        ProviderError::EventNotFound { .. } => McpError::invalid_params(err.to_string(), None),
        _ => {
            tracing::error!("Provider error: {}", err);
            McpError::internal_error(err.to_string(), None)
        }
    }
}

fn slot_error(err: SlotError) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

fn bad_input(err: anyhow::Error) -> McpError {
    McpError::invalid_params(err.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone};
    use std::sync::Mutex;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, h, m, 0).unwrap()
    }

    fn event(id: &str, title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            summary: Some(title.to_string()),
            description: None,
            start,
            end,
            is_all_day: false,
            attendees: vec![],
            meet_link: None,
            html_link: None,
        }
    }

    /// In-memory provider: serves a fixed event list and records drafts.
    struct FakeProvider {
        events: Vec<CalendarEvent>,
        created: Mutex<Vec<EventDraft>>,
    }

    impl FakeProvider {
        fn with_events(events: Vec<CalendarEvent>) -> Self {
            FakeProvider {
                events,
                created: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl CalendarProvider for FakeProvider {
        async fn events_between(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            max_results: Option<i32>,
        ) -> Result<Vec<CalendarEvent>, ProviderError> {
            let mut hits: Vec<CalendarEvent> = self
                .events
                .iter()
                .filter(|e| e.start < end && e.end > start)
                .cloned()
                .collect();
            if let Some(limit) = max_results {
                hits.truncate(limit as usize);
            }
            Ok(hits)
        }

        async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ProviderError> {
            self.created.lock().unwrap().push(draft.clone());
            Ok(CalendarEvent {
                id: "created-1".to_string(),
                summary: Some(draft.title.clone()),
                description: draft.description.clone(),
                start: draft.start,
                end: draft.end,
                is_all_day: false,
                attendees: draft.attendees.clone(),
                meet_link: draft
                    .with_meet_link
                    .then(|| "https://meet.google.com/fake".to_string()),
                html_link: None,
            })
        }

        async fn reschedule_event(
            &self,
            event_id: &str,
            new_start: DateTime<Utc>,
            new_end: DateTime<Utc>,
        ) -> Result<CalendarEvent, ProviderError> {
            let existing = self
                .events
                .iter()
                .find(|e| e.id == event_id)
                .ok_or_else(|| ProviderError::EventNotFound {
                    id: event_id.to_string(),
                })?;
            let mut moved = existing.clone();
            moved.start = new_start;
            moved.end = new_end;
            Ok(moved)
        }

        async fn cancel_event(
            &self,
            event_id: &str,
            _notify_attendees: bool,
        ) -> Result<CalendarEvent, ProviderError> {
            self.events
                .iter()
                .find(|e| e.id == event_id)
                .cloned()
                .ok_or_else(|| ProviderError::EventNotFound {
                    id: event_id.to_string(),
                })
        }
    }

    fn agent(provider: FakeProvider) -> CalendarAgent {
        CalendarAgent::new(Arc::new(provider), Config::default()).expect("should build agent")
    }

    fn text_of(result: &CallToolResult) -> &str {
        result.content[0]
            .as_text()
            .map(|t| t.text.as_str())
            .expect("text content")
    }

    #[tokio::test]
    async fn test_find_free_slots_reports_gaps_around_meetings() {
        let agent = agent(FakeProvider::with_events(vec![event(
            "evt-1",
            "Standup",
            at(10, 0),
            at(11, 0),
        )]));

        let result = agent
            .find_free_slots(Parameters(FindFreeSlotsRequest {
                date: Some("2024-05-20".to_string()),
                duration_minutes: Some(30),
                working_hours_only: Some(true),
            }))
            .await
            .expect("should succeed");

        let text = text_of(&result);
        assert!(text.contains("1. 09:00 AM - 10:00 AM (60 minutes available)"));
        assert!(text.contains("2. 11:00 AM - 06:00 PM (420 minutes available)"));
    }

    #[tokio::test]
    async fn test_find_free_slots_empty_day_reports_whole_window() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let result = agent
            .find_free_slots(Parameters(FindFreeSlotsRequest {
                date: Some("2024-05-20".to_string()),
                duration_minutes: None,
                working_hours_only: None,
            }))
            .await
            .expect("should succeed");

        assert!(text_of(&result).contains("1. 09:00 AM - 06:00 PM (540 minutes available)"));
    }

    #[tokio::test]
    async fn test_find_free_slots_fully_booked_day() {
        let agent = agent(FakeProvider::with_events(vec![event(
            "evt-1",
            "Offsite",
            at(9, 0),
            at(18, 0),
        )]));

        let result = agent
            .find_free_slots(Parameters(FindFreeSlotsRequest {
                date: Some("2024-05-20".to_string()),
                duration_minutes: Some(30),
                working_hours_only: Some(true),
            }))
            .await
            .expect("should succeed");

        assert!(text_of(&result).contains("No available slots found"));
    }

    #[tokio::test]
    async fn test_find_free_slots_rejects_zero_duration() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let err = agent
            .find_free_slots(Parameters(FindFreeSlotsRequest {
                date: Some("2024-05-20".to_string()),
                duration_minutes: Some(0),
                working_hours_only: Some(true),
            }))
            .await
            .expect_err("zero duration should be rejected");

        assert!(err.message.contains("positive"));
    }

    #[tokio::test]
    async fn test_schedule_meeting_parses_attendees_and_duration() {
        let provider = Arc::new(FakeProvider::with_events(vec![]));
        let agent = CalendarAgent::new(provider.clone(), Config::default())
            .expect("should build agent");

        let result = agent
            .schedule_meeting(Parameters(ScheduleMeetingRequest {
                title: "Planning".to_string(),
                start_datetime: "2024-05-20 14:00".to_string(),
                duration_minutes: Some(45),
                attendees: Some("a@example.com, b@example.com".to_string()),
                description: None,
                add_meet_link: Some(true),
            }))
            .await
            .expect("should succeed");

        let text = text_of(&result);
        assert!(text.contains("Meeting scheduled successfully!"));
        assert!(text.contains("Duration: 45 minutes"));
        assert!(text.contains("Google Meet Link: https://meet.google.com/fake"));

        let drafts = provider.created.lock().unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].attendees, vec!["a@example.com", "b@example.com"]);
        assert_eq!(drafts[0].start, at(14, 0));
        assert_eq!(drafts[0].end, at(14, 45));
        assert!(drafts[0].with_meet_link);
    }

    #[tokio::test]
    async fn test_schedule_meeting_rejects_bad_datetime() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let err = agent
            .schedule_meeting(Parameters(ScheduleMeetingRequest {
                title: "Planning".to_string(),
                start_datetime: "sometime tomorrow".to_string(),
                duration_minutes: None,
                attendees: None,
                description: None,
                add_meet_link: None,
            }))
            .await
            .expect_err("garbage datetime should be rejected");

        assert!(err.message.contains("invalid datetime"));
    }

    #[tokio::test]
    async fn test_check_availability_lists_events() {
        let agent = agent(FakeProvider::with_events(vec![event(
            "evt-1",
            "Standup",
            at(10, 0),
            at(10, 15),
        )]));

        let result = agent
            .check_availability(Parameters(CheckAvailabilityRequest {
                start_date: Some("2024-05-20".to_string()),
                end_date: Some("2024-05-21".to_string()),
            }))
            .await
            .expect("should succeed");

        let text = text_of(&result);
        assert!(text.contains("Found 1 scheduled events:"));
        assert!(text.contains("- Standup"));
    }

    #[tokio::test]
    async fn test_check_availability_empty_period() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let result = agent
            .check_availability(Parameters(CheckAvailabilityRequest {
                start_date: Some("2024-05-20".to_string()),
                end_date: Some("2024-05-27".to_string()),
            }))
            .await
            .expect("should succeed");

        assert!(text_of(&result).contains("No events scheduled."));
    }

    #[tokio::test]
    async fn test_check_availability_rejects_inverted_range() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let err = agent
            .check_availability(Parameters(CheckAvailabilityRequest {
                start_date: Some("2024-05-27".to_string()),
                end_date: Some("2024-05-20".to_string()),
            }))
            .await
            .expect_err("inverted range should be rejected");

        assert!(err.message.contains("is not before"));
    }

    #[tokio::test]
    async fn test_reschedule_unknown_meeting_is_invalid_params() {
        let agent = agent(FakeProvider::with_events(vec![]));

        let err = agent
            .reschedule_meeting(Parameters(RescheduleMeetingRequest {
                event_id: "missing".to_string(),
                new_start_datetime: "2024-05-20 15:00".to_string(),
                new_duration_minutes: None,
            }))
            .await
            .expect_err("unknown event should be rejected");

        assert!(err.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_cancel_meeting_reports_cancelled_event() {
        let agent = agent(FakeProvider::with_events(vec![event(
            "evt-9",
            "1:1",
            at(13, 0),
            at(13, 30),
        )]));

        let result = agent
            .cancel_meeting(Parameters(CancelMeetingRequest {
                event_id: "evt-9".to_string(),
                send_cancellation: Some(false),
            }))
            .await
            .expect("should succeed");

        let text = text_of(&result);
        assert!(text.contains("Cancelled Event: 1:1"));
        assert!(text.contains("No notifications sent."));
    }
}
