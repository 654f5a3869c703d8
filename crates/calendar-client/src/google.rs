use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use google_calendar3::api::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event, EventAttendee,
    EventDateTime,
};
use google_calendar3::hyper_rustls::HttpsConnector;
use google_calendar3::CalendarHub;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::CalendarConfig;
use crate::error::ProviderError;
use crate::provider::CalendarProvider;
use crate::types::{CalendarEvent, EventDraft};

/// OAuth scope for full calendar access.
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Google Calendar implementation of [`CalendarProvider`].
pub struct GoogleCalendar {
    hub: CalendarHub<HttpsConnector<HttpConnector>>,
    calendar_id: String,
}

impl GoogleCalendar {
    /// Authenticate with the installed-app OAuth flow and build the API
    /// client. Tokens are cached on disk and refreshed transparently by
    /// the authenticator.
    pub async fn connect(config: &CalendarConfig) -> Result<Self, ProviderError> {
        let secret =
            google_calendar3::yup_oauth2::read_application_secret(&config.credentials_path)
                .await
                .map_err(|e| {
                    ProviderError::Credentials(format!("{}: {}", config.credentials_path, e))
                })?;

        let auth = google_calendar3::yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            google_calendar3::yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(Path::new(&config.token_cache_path))
        .build()
        .await
        .map_err(|e| ProviderError::Auth(e.to_string()))?;

        let connector = google_calendar3::hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| ProviderError::Setup(format!("failed to load TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(connector);
        let hub = CalendarHub::new(client, auth);

        tracing::info!(
            "Connected to Google Calendar (calendar: {})",
            config.calendar_id
        );

        Ok(GoogleCalendar {
            hub,
            calendar_id: config.calendar_id.clone(),
        })
    }

    /// Run the OAuth installed flow eagerly and cache a token for the
    /// calendar scope. The setup binary calls this once so the server
    /// never has to open a browser itself.
    pub async fn authorize(config: &CalendarConfig) -> Result<(), ProviderError> {
        let secret =
            google_calendar3::yup_oauth2::read_application_secret(&config.credentials_path)
                .await
                .map_err(|e| {
                    ProviderError::Credentials(format!("{}: {}", config.credentials_path, e))
                })?;

        let auth = google_calendar3::yup_oauth2::InstalledFlowAuthenticator::builder(
            secret,
            google_calendar3::yup_oauth2::InstalledFlowReturnMethod::HTTPRedirect,
        )
        .persist_tokens_to_disk(Path::new(&config.token_cache_path))
        .build()
        .await
        .map_err(|e| ProviderError::Auth(e.to_string()))?;

        auth.token(&[CALENDAR_SCOPE])
            .await
            .map_err(|e| ProviderError::Auth(e.to_string()))?;

        tracing::info!("Token cached at {}", config.token_cache_path);
        Ok(())
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendar {
    async fn events_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        max_results: Option<i32>,
    ) -> Result<Vec<CalendarEvent>, ProviderError> {
        let mut call = self
            .hub
            .events()
            .list(&self.calendar_id)
            .time_min(start)
            .time_max(end)
            .single_events(true)
            .order_by("startTime");
        if let Some(limit) = max_results {
            call = call.max_results(limit);
        }

        let (_, listing) = call.doit().await.map_err(api_error)?;

        let events: Vec<CalendarEvent> = listing
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(resolve_event)
            .collect();

        tracing::debug!(
            "Fetched {} events between {} and {}",
            events.len(),
            start,
            end
        );
        Ok(events)
    }

    async fn create_event(&self, draft: &EventDraft) -> Result<CalendarEvent, ProviderError> {
        let mut event = Event {
            summary: Some(draft.title.clone()),
            description: draft.description.clone(),
            start: Some(EventDateTime {
                date_time: Some(draft.start),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(draft.end),
                ..Default::default()
            }),
            ..Default::default()
        };

        if !draft.attendees.is_empty() {
            event.attendees = Some(
                draft
                    .attendees
                    .iter()
                    .map(|email| EventAttendee {
                        email: Some(email.clone()),
                        ..Default::default()
                    })
                    .collect(),
            );
        }

        if draft.with_meet_link {
            event.conference_data = Some(ConferenceData {
                create_request: Some(CreateConferenceRequest {
                    request_id: Some(format!("meet-{}", Utc::now().timestamp_millis())),
                    conference_solution_key: Some(ConferenceSolutionKey {
                        type_: Some("hangoutsMeet".to_string()),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            });
        }

        let (_, created) = self
            .hub
            .events()
            .insert(event, &self.calendar_id)
            .conference_data_version(if draft.with_meet_link { 1 } else { 0 })
            .send_updates("all")
            .doit()
            .await
            .map_err(api_error)?;

        tracing::info!(
            "Created calendar event: {} (id: {:?})",
            draft.title,
            created.id
        );

        let id = created.id.clone().unwrap_or_default();
        resolve_event(created).ok_or(ProviderError::MalformedEvent { id })
    }

    async fn reschedule_event(
        &self,
        event_id: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<CalendarEvent, ProviderError> {
        let (_, mut event) = self
            .hub
            .events()
            .get(&self.calendar_id, event_id)
            .doit()
            .await
            .map_err(|e| event_api_error(e, event_id))?;

        event.start = Some(EventDateTime {
            date_time: Some(new_start),
            ..Default::default()
        });
        event.end = Some(EventDateTime {
            date_time: Some(new_end),
            ..Default::default()
        });

        let (_, updated) = self
            .hub
            .events()
            .update(event, &self.calendar_id, event_id)
            .send_updates("all")
            .doit()
            .await
            .map_err(|e| event_api_error(e, event_id))?;

        tracing::info!(
            "Rescheduled event {} to {} - {}",
            event_id,
            new_start,
            new_end
        );

        let id = updated.id.clone().unwrap_or_else(|| event_id.to_string());
        resolve_event(updated).ok_or(ProviderError::MalformedEvent { id })
    }

    async fn cancel_event(
        &self,
        event_id: &str,
        notify_attendees: bool,
    ) -> Result<CalendarEvent, ProviderError> {
        let (_, existing) = self
            .hub
            .events()
            .get(&self.calendar_id, event_id)
            .doit()
            .await
            .map_err(|e| event_api_error(e, event_id))?;

        let cancelled = resolve_event(existing).ok_or(ProviderError::MalformedEvent {
            id: event_id.to_string(),
        })?;

        let send_updates = if notify_attendees { "all" } else { "none" };
        self.hub
            .events()
            .delete(&self.calendar_id, event_id)
            .send_updates(send_updates)
            .doit()
            .await
            .map_err(|e| event_api_error(e, event_id))?;

        tracing::info!(
            "Cancelled event {} (notifications: {})",
            event_id,
            send_updates
        );
        Ok(cancelled)
    }
}

/// Turn an API event into a [`CalendarEvent`], resolving all-day events to
/// their date boundaries. Events without usable start/end times are
/// skipped with a warning.
fn resolve_event(event: Event) -> Option<CalendarEvent> {
    let id = event.id.clone().unwrap_or_default();
    let start = event.start.as_ref().and_then(resolve_time);
    let end = event.end.as_ref().and_then(resolve_time);
    let (Some((start, is_all_day)), Some((end, _))) = (start, end) else {
        tracing::warn!("Skipping event '{}' without usable start/end times", id);
        return None;
    };

    let meet_link = conference_uri(&event);
    Some(CalendarEvent {
        id,
        summary: event.summary,
        description: event.description,
        start,
        end,
        is_all_day,
        attendees: event
            .attendees
            .map(|list| list.into_iter().filter_map(|a| a.email).collect())
            .unwrap_or_default(),
        meet_link,
        html_link: event.html_link,
    })
}

/// Concrete timestamp for a start/end field, plus whether it came from a
/// date-only (all-day) payload. Google's all-day `end.date` is already
/// exclusive, so midnight boundaries are correct on both sides.
fn resolve_time(when: &EventDateTime) -> Option<(DateTime<Utc>, bool)> {
    if let Some(stamp) = when.date_time {
        return Some((stamp, false));
    }
    let midnight = when.date?.and_hms_opt(0, 0, 0)?;
    Some((Utc.from_utc_datetime(&midnight), true))
}

fn conference_uri(event: &Event) -> Option<String> {
    if let Some(data) = &event.conference_data {
        if let Some(points) = &data.entry_points {
            if let Some(uri) = points.iter().find_map(|p| p.uri.clone()) {
                return Some(uri);
            }
        }
    }
    event.hangout_link.clone()
}

fn api_error(err: google_calendar3::Error) -> ProviderError {
    match err {
        google_calendar3::Error::MissingToken(source) => ProviderError::Auth(source.to_string()),
        other => ProviderError::Api(other),
    }
}

fn event_api_error(err: google_calendar3::Error, event_id: &str) -> ProviderError {
    if is_not_found(&err) {
        return ProviderError::EventNotFound {
            id: event_id.to_string(),
        };
    }
    api_error(err)
}

fn is_not_found(err: &google_calendar3::Error) -> bool {
    match err {
        google_calendar3::Error::BadRequest(value) => value
            .get("error")
            .and_then(|e| e.get("code"))
            .and_then(|code| code.as_i64())
            == Some(404),
        google_calendar3::Error::Failure(response) => response.status().as_u16() == 404,
        _ => false,
    }
}
