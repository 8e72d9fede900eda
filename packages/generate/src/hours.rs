//! Opening-hours parsing.
//!
//! The places service returns one line per weekday, e.g.
//! `"Monday: 6:00 AM – 9:00 PM\nTuesday: ..."`. Only the first line is
//! used as the representative schedule.

use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

/// Matches `H:MM AM – H:MM PM` with an en-dash or hyphen separator.
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2})\s*([AP]M)\s*[–-]\s*(\d{1,2}):(\d{2})\s*([AP]M)")
        .expect("valid regex")
});

/// Opening and closing time. Both are known or neither is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningHours {
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time.
    pub close: NaiveTime,
}

impl OpeningHours {
    /// Renders the opening time as `HH:MM:SS`.
    #[must_use]
    pub fn open_text(&self) -> String {
        self.open.format("%H:%M:%S").to_string()
    }

    /// Renders the closing time as `HH:MM:SS`.
    #[must_use]
    pub fn close_text(&self) -> String {
        self.close.format("%H:%M:%S").to_string()
    }
}

/// Parses the first weekday's time range out of `text`.
///
/// Returns `None` when the text is absent, empty, or its first line has
/// no parseable range. A first line reading `"Open 24 hours"` or
/// `"Closed"` also yields `None`.
#[must_use]
pub fn parse_hours(text: Option<&str>) -> Option<OpeningHours> {
    let first_line = text?.lines().next()?;
    let caps = TIME_RANGE.captures(first_line)?;

    let open = to_time(&caps[1], &caps[2], &caps[3])?;
    let close = to_time(&caps[4], &caps[5], &caps[6])?;

    Some(OpeningHours { open, close })
}

/// Converts a 12-hour clock reading to a time of day.
fn to_time(hour: &str, minute: &str, meridiem: &str) -> Option<NaiveTime> {
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;

    let hour = match (meridiem, hour) {
        ("AM", 12) => 0,
        ("PM", h) if h != 12 => h + 12,
        (_, h) => h,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}
