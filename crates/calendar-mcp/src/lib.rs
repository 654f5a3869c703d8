//! MCP tool surface over the calendar provider.
//!
//! Six tools mirror what an agent needs from a calendar: availability
//! queries, event CRUD, and free-slot search. The slot math itself lives
//! in the `availability` crate; everything here is transport, parsing,
//! and presentation.

pub mod config;
pub mod format;
pub mod timeutil;
pub mod tools;
