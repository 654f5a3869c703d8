//! Free-slot computation over a day's busy intervals.
//!
//! This crate is pure and synchronous: it knows nothing about calendar
//! providers or transports. Callers resolve events to concrete UTC
//! timestamps first, then ask for the idle gaps.

pub mod interval;
pub mod slots;

pub use interval::{TimeInterval, WorkingHours, WorkingWindow};
pub use slots::{compute_free_slots, FreeSlot, SlotError, SlotQuery};
