//! Watchface configuration

use crate::error::ConfigError;

/// Offset of the second clock from UTC, in hours. Daylight saving is not tracked.
pub const DEFAULT_OTHER_ZONE_OFFSET: i32 = -5;

/// Ask the companion for fresh weather whenever the minute is a multiple of this.
pub const DEFAULT_WEATHER_REFRESH_MINUTES: u32 = 30;

/// Battery glyph is shown below this charge level.
pub const DEFAULT_LOW_BATTERY_PERCENT: u8 = 30;

/// Compiled-in settings of the face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Fixed signed hour offset from UTC for the second clock.
    pub other_zone_offset: i32,
    pub weather_refresh_minutes: u32,
    pub low_battery_percent: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            other_zone_offset: DEFAULT_OTHER_ZONE_OFFSET,
            weather_refresh_minutes: DEFAULT_WEATHER_REFRESH_MINUTES,
            low_battery_percent: DEFAULT_LOW_BATTERY_PERCENT,
        }
    }
}

impl Config {
    /// Default configuration with a different second-clock offset.
    pub fn new(other_zone_offset: i32) -> Result<Self, ConfigError> {
        Self {
            other_zone_offset,
            ..Self::default()
        }
        .validate()
    }

    /// Check the settings against what the face can display correctly.
    ///
    /// The hour converter wraps at most one day, so offsets beyond a day are refused here
    /// instead of rendering out-of-range hours.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(-23..=23).contains(&self.other_zone_offset) {
            return Err(ConfigError::OffsetOutOfRange(self.other_zone_offset));
        }
        if self.weather_refresh_minutes == 0 {
            return Err(ConfigError::ZeroRefreshInterval);
        }
        if self.low_battery_percent > 100 {
            return Err(ConfigError::BatteryThresholdOutOfRange(
                self.low_battery_percent,
            ));
        }
        Ok(self)
    }
}
