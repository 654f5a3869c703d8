use anyhow::{anyhow, Context, Result};
use availability::{WorkingHours, WorkingWindow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse `YYYY-MM-DD HH:MM` (seconds optional) as a local time in `tz`.
pub fn parse_datetime(s: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .with_context(|| format!("invalid datetime '{}', expected YYYY-MM-DD HH:MM", s))?;

    let local = tz
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow!("Ambiguous or invalid local time: {}", s))?;

    Ok(local.with_timezone(&Utc))
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", s))
}

/// Today's date in `tz`.
pub fn today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Midnight at the start of `date` in `tz`, expressed in UTC.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    local_time(date, 0, tz)
}

/// The working window for `date` under `hours`, expressed in UTC.
pub fn day_window(date: NaiveDate, hours: &WorkingHours, tz: Tz) -> Result<WorkingWindow> {
    let day_start = local_time(date, hours.start_hour, tz)?;
    let day_end = local_time(date, hours.end_hour, tz)?;
    WorkingWindow::new(day_start, day_end).map_err(anyhow::Error::from)
}

fn local_time(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Utc>> {
    // Hour 24 is the end of a full-day window: the next day's midnight.
    let (day, hour) = if hour == 24 {
        let next = date
            .succ_opt()
            .ok_or_else(|| anyhow!("date out of range: {}", date))?;
        (next, 0)
    } else {
        (date, hour)
    };

    let naive = day
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| anyhow!("working hour out of range: {}", hour))?;

    let local = tz
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow!("Ambiguous or invalid local time: {} {:02}:00", day, hour))?;

    Ok(local.with_timezone(&Utc))
}
