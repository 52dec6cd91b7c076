use chrono::{DateTime, Local, TimeZone, Utc};

use intake_core::autosave::AutoSaveStatus;

#[must_use]
pub fn format_time_of_day<Tz: TimeZone>(value: DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format("%H:%M").to_string()
}

/// Badge text, or `None` before the first save.
#[must_use]
pub fn autosave_label<Tz: TimeZone>(status: AutoSaveStatus, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    if status.is_saving() {
        return Some("Saving...".to_string());
    }
    status
        .last_saved
        .map(|at| format!("Saved {}", format_time_of_day(at, tz)))
}

#[must_use]
pub fn local_autosave_label(status: AutoSaveStatus) -> Option<String> {
    autosave_label(status, &Local)
}
