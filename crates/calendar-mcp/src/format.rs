//! Human-readable rendering of tool results.

use availability::FreeSlot;
use calendar_client::CalendarEvent;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

const TIME_FMT: &str = "%I:%M %p";
const DATE_TIME_FMT: &str = "%Y-%m-%d %I:%M %p";

fn time(stamp: DateTime<Utc>, tz: Tz) -> String {
    stamp.with_timezone(&tz).format(TIME_FMT).to_string()
}

fn date_time(stamp: DateTime<Utc>, tz: Tz) -> String {
    stamp.with_timezone(&tz).format(DATE_TIME_FMT).to_string()
}

pub fn availability_report(
    start_date: NaiveDate,
    end_date: NaiveDate,
    events: &[CalendarEvent],
    tz: Tz,
) -> String {
    let mut out = format!("Calendar Availability from {} to {}:\n\n", start_date, end_date);

    if events.is_empty() {
        out.push_str("No events scheduled. Fully available during this period.");
        return out;
    }

    out.push_str(&format!("Found {} scheduled events:\n\n", events.len()));
    for event in events {
        out.push_str(&format!(
            "- {}\n  {} - {}\n\n",
            event.title(),
            date_time(event.start, tz),
            time(event.end, tz)
        ));
    }
    out
}

pub fn meeting_scheduled(event: &CalendarEvent, tz: Tz) -> String {
    let mut out = String::from("Meeting scheduled successfully!\n\n");
    out.push_str(&format!("Title: {}\n", event.title()));
    out.push_str(&format!("Start: {}\n", date_time(event.start, tz)));
    out.push_str(&format!("End: {}\n", date_time(event.end, tz)));
    out.push_str(&format!(
        "Duration: {} minutes\n",
        (event.end - event.start).num_minutes()
    ));

    if !event.attendees.is_empty() {
        out.push_str(&format!("Attendees: {}\n", event.attendees.join(", ")));
    }
    if let Some(link) = &event.meet_link {
        out.push_str(&format!("Google Meet Link: {}\n", link));
    }

    out.push_str(&format!("\nEvent ID: {}\n", event.id));
    out.push_str(&format!(
        "View in Calendar: {}",
        event.html_link.as_deref().unwrap_or("N/A")
    ));
    out
}

pub fn upcoming_events(days_ahead: u32, events: &[CalendarEvent], tz: Tz) -> String {
    if events.is_empty() {
        return format!("No upcoming events in the next {} days.", days_ahead);
    }

    let mut out = format!("Upcoming Events (next {} days):\n\n", days_ahead);
    for (i, event) in events.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, event.title()));
        out.push_str(&format!("   Time: {}\n", date_time(event.start, tz)));
        out.push_str(&format!("   Event ID: {}\n", event.id));
        if let Some(link) = &event.meet_link {
            out.push_str(&format!("   Meet Link: {}\n", link));
        }
        out.push('\n');
    }
    out
}

pub fn meeting_rescheduled(event: &CalendarEvent, tz: Tz) -> String {
    let mut out = String::from("Meeting rescheduled successfully!\n\n");
    out.push_str(&format!("Title: {}\n", event.title()));
    out.push_str(&format!("New Start: {}\n", date_time(event.start, tz)));
    out.push_str(&format!("New End: {}\n", date_time(event.end, tz)));
    out.push_str(&format!(
        "Duration: {} minutes\n",
        (event.end - event.start).num_minutes()
    ));
    out.push_str(&format!(
        "\nView in Calendar: {}",
        event.html_link.as_deref().unwrap_or("N/A")
    ));
    out
}

pub fn meeting_cancelled(event: &CalendarEvent, notified: bool, tz: Tz) -> String {
    let mut out = String::from("Meeting cancelled successfully!\n\n");
    out.push_str(&format!("Cancelled Event: {}\n", event.title()));
    out.push_str(&format!(
        "Was scheduled for: {}\n",
        date_time(event.start, tz)
    ));
    if notified {
        out.push_str("\nCancellation notifications sent to all attendees.");
    } else {
        out.push_str("\nNo notifications sent.");
    }
    out
}

pub fn free_slot_report(
    date: NaiveDate,
    min_duration_minutes: u32,
    slots: &[FreeSlot],
    tz: Tz,
) -> String {
    let mut out = format!(
        "Available time slots for {}:\n(Minimum duration: {} minutes)\n\n",
        date, min_duration_minutes
    );

    if slots.is_empty() {
        out.push_str("No available slots found for the specified duration.");
        return out;
    }

    for (i, slot) in slots.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {} ({} minutes available)\n",
            i + 1,
            time(slot.start, tz),
            time(slot.end, tz),
            slot.duration().num_minutes()
        ));
    }
    out
}
