use thiserror::Error;

/// Failures at the calendar-provider boundary.
///
/// These are the collaborator's errors: the slot engine never produces
/// them, and the tool layer can distinguish caller mistakes (an unknown
/// event id) from auth and transport trouble.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// OAuth client secret missing or unreadable.
    #[error("calendar credentials unavailable: {0}")]
    Credentials(String),

    /// Token acquisition or refresh failed.
    #[error("calendar authentication failed: {0}")]
    Auth(String),

    /// Client construction failed before any request was made.
    #[error("calendar client setup failed: {0}")]
    Setup(String),

    /// The requested event does not exist on the calendar.
    #[error("event '{id}' not found")]
    EventNotFound { id: String },

    /// The backend returned an event without usable start/end times.
    #[error("event '{id}' has no usable start and end times")]
    MalformedEvent { id: String },

    /// Any other Calendar API failure (network, quota, server errors).
    #[error("calendar API request failed: {0}")]
    Api(#[source] google_calendar3::Error),
}
