//! Second-timezone clock and the time/date strings of the face

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, Timelike};
use heapless::String;

use crate::text;

/// Shift a wall-clock `hour` (0–23) by a fixed `offset` in hours.
///
/// Wraps across one day boundary in either direction. The two branches only agree with
/// `(hour + offset) mod 24` for offsets in `-23..=23`; below -24 the result stays negative and
/// large positive offsets are folded by `%` only. [`Config::validate`](crate::Config::validate)
/// keeps the offset inside the supported range.
pub fn convert_hour(hour: u32, offset: i32) -> i32 {
    let shifted = hour as i32 + offset;
    if offset > 0 {
        if shifted > 23 {
            shifted % 24
        } else {
            shifted
        }
    } else if shifted < 0 {
        24 + shifted
    } else {
        shifted
    }
}

/// Hour and minute of an instant in one interpretation (local or UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WallClockSample {
    pub hour: u32,
    pub minute: u32,
}

impl WallClockSample {
    pub fn from_datetime(time: &NaiveDateTime) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
        }
    }
}

/// The other timezone's clock, derived from the UTC sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConvertedTime {
    pub hour: i32,
    pub minute: u32,
}

impl ConvertedTime {
    pub fn from_utc(utc: WallClockSample, offset: i32) -> Self {
        Self {
            hour: convert_hour(utc.hour, offset),
            minute: utc.minute,
        }
    }
}

/// The three time-derived strings shown on the face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeStrings {
    /// Local time, `HH:MM` in 24h style or `II:MM` in 12h style.
    pub local: String<8>,
    /// Second timezone, always `HH:MM`.
    pub other: String<8>,
    /// UTC date, `YYYY-MM-DD`.
    pub date: String<16>,
}

impl TimeStrings {
    /// Format one instant. `now` carries the device's local offset.
    pub fn render(now: &DateTime<FixedOffset>, is_24h: bool, offset: i32) -> Self {
        let local = now.naive_local();
        let utc = now.naive_utc();

        let local = if is_24h {
            text::format(format_args!("{:02}:{:02}", local.hour(), local.minute()))
        } else {
            let (_, hour12) = local.hour12();
            text::format(format_args!("{:02}:{:02}", hour12, local.minute()))
        };

        // The second clock ignores the 12h preference and always shows 24h digits.
        let converted = ConvertedTime::from_utc(WallClockSample::from_datetime(&utc), offset);
        let other = text::format(format_args!(
            "{:02}:{:02}",
            converted.hour, converted.minute
        ));

        let date = text::format(format_args!(
            "{:04}-{:02}-{:02}",
            utc.year(),
            utc.month(),
            utc.day()
        ));

        Self { local, other, date }
    }
}
