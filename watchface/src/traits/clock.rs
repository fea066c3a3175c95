use chrono::{DateTime, FixedOffset};

pub trait Clock {
    /// Current instant, carrying the device's local UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// User preference for the local clock, queried on every update.
    fn is_24h_style(&self) -> bool;
}
