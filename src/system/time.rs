//! Time keeping module for PineTime

use core::cell::Cell;

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use embassy_sync::blocking_mutex::{raw::ThreadModeRawMutex, Mutex};
use embassy_time::Instant;

/// Length of a Current Time Service payload.
pub const CTS_LEN: usize = 10;

#[derive(Clone, Copy)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl TimeReference {
    /// Anchor the given UTC unix timestamp at the current instant
    pub fn from_timestamp(secs: i64) -> Result<Self, Error> {
        let time = DateTime::from_timestamp(secs, 0)
            .ok_or(Error::InvalidDate)?
            .naive_utc();
        Ok(Self {
            time,
            instant: Instant::now(),
        })
    }

    /// Create new time reference from Current Time Service data
    pub fn from_cts_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < CTS_LEN {
            return Err(Error::Truncated);
        }
        let year = u16::from_le_bytes([bytes[0], bytes[1]]) as i32;
        let month = bytes[2] as u32;
        let day = bytes[3] as u32;
        let hour = bytes[4] as u32;
        let min = bytes[5] as u32;
        let sec = bytes[6] as u32;
        // bytes[7] is the day of week, bytes[9] the adjust reason
        let milli = bytes[8] as u32 * 1000 / 256; // Convert fractions_256 to milliseconds

        let time = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_milli_opt(hour, min, sec, milli))
            .ok_or(Error::InvalidDate)?;

        Ok(Self {
            time,
            instant: Instant::now(),
        })
    }
}

/// UTC wall clock derived from a reference point and the monotonic timer
pub struct TimeManager {
    reference: Mutex<ThreadModeRawMutex, Cell<Option<TimeReference>>>,
}

impl TimeManager {
    pub const fn new() -> Self {
        Self {
            reference: Mutex::new(Cell::new(None)),
        }
    }

    /// Get current UTC time. Counts from the unix epoch until a reference is set.
    pub fn now_utc(&self) -> NaiveDateTime {
        let now = Instant::now();
        let (time, instant) = match self.reference.lock(|r| r.get()) {
            Some(reference) => (reference.time, reference.instant),
            None => (NaiveDateTime::UNIX_EPOCH, Instant::from_ticks(0)),
        };
        let elapsed = now.duration_since(instant).as_millis() as i64;
        time.checked_add_signed(ChronoDuration::milliseconds(elapsed))
            .unwrap_or(time)
    }

    /// Update time reference
    pub fn set_time(&self, reference: TimeReference) {
        self.reference.lock(|r| r.set(Some(reference)));
    }
}

#[derive(Debug, defmt::Format)]
pub enum Error {
    Truncated,
    InvalidDate,
}
