//! Calendar provider capability and its Google Calendar implementation.
//!
//! The tool layer talks to a [`CalendarProvider`] trait object; the only
//! implementation shipped here authenticates against Google Calendar with
//! the installed-app OAuth flow and an on-disk token cache.

pub mod config;
pub mod error;
pub mod google;
pub mod provider;
pub mod types;

pub use config::CalendarConfig;
pub use error::ProviderError;
pub use google::GoogleCalendar;
pub use provider::CalendarProvider;
pub use types::{CalendarEvent, EventDraft};
