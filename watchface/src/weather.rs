//! Weather line fed by the companion app

use heapless::{String, Vec};

use crate::{
    dictionary::{DictionaryWriter, Tuple},
    error::DictionaryError,
    text,
};

/// Inbound key carrying the temperature in °C.
pub const KEY_TEMPERATURE: u32 = 0;
/// Inbound key carrying the location name.
pub const KEY_LOCATION_NAME: u32 = 1;
/// Outbound key of the refresh request.
pub const KEY_REQUEST: u32 = 0;

/// Shown until the first reply arrives.
pub const LOADING_TEXT: &str = "Loading...";

pub const REQUEST_BUF_LEN: usize = 16;

/// Encoded refresh request: a single `u8` 0 under key 0.
pub fn weather_request() -> Result<Vec<u8, REQUEST_BUF_LEN>, DictionaryError> {
    let mut writer = DictionaryWriter::new()?;
    writer.write_uint8(KEY_REQUEST, 0)?;
    Ok(writer.finish())
}

/// Whether a tick at `minute` should ask for fresh weather.
pub fn refresh_due(minute: u32, interval_minutes: u32) -> bool {
    interval_minutes != 0 && minute % interval_minutes == 0
}

/// What a single tuple did to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Applied {
    Temperature,
    Location,
    /// Known key with a value of the wrong type; the field keeps its old text.
    WrongType(u32),
    Unrecognized(u32),
}

/// Last received weather. Each field is kept until a message carrying it arrives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherReport {
    temperature: String<7>,
    location: String<31>,
}

impl WeatherReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Formatted temperature, e.g. `22°C`. Empty before the first reply.
    pub fn temperature(&self) -> &str {
        &self.temperature
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn apply(&mut self, tuple: &Tuple<'_>) -> Applied {
        match tuple.key {
            KEY_TEMPERATURE => match tuple.value.as_i32() {
                Some(celsius) => {
                    self.temperature = text::format(format_args!("{}°C", celsius));
                    Applied::Temperature
                }
                None => Applied::WrongType(tuple.key),
            },
            KEY_LOCATION_NAME => match tuple.value.as_str() {
                Some(name) => {
                    self.location = text::truncated(name);
                    Applied::Location
                }
                None => Applied::WrongType(tuple.key),
            },
            other => Applied::Unrecognized(other),
        }
    }

    /// `"<temperature> - <location>"`, cut to fit the weather region.
    pub fn summary(&self) -> String<31> {
        text::format(format_args!("{} - {}", self.temperature, self.location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::Value;

    fn int(key: u32, v: i32) -> Tuple<'static> {
        Tuple {
            key,
            value: Value::Int(v),
        }
    }

    fn cstr(key: u32, s: &'static [u8]) -> Tuple<'static> {
        Tuple {
            key,
            value: Value::CString(s),
        }
    }

    #[test]
    fn temperature_and_location() {
        let mut report = WeatherReport::new();
        assert_eq!(report.apply(&int(0, 22)), Applied::Temperature);
        assert_eq!(report.apply(&cstr(1, b"Boston\0")), Applied::Location);
        assert_eq!(report.summary().as_str(), "22°C - Boston");
    }

    #[test]
    fn unknown_key_leaves_report_alone() {
        let mut report = WeatherReport::new();
        report.apply(&int(0, 22));
        assert_eq!(report.apply(&int(5, 99)), Applied::Unrecognized(5));
        assert_eq!(report.temperature(), "22°C");
        assert_eq!(report.location(), "");
    }

    #[test]
    fn fields_persist_between_messages() {
        let mut report = WeatherReport::new();
        report.apply(&int(0, 22));
        report.apply(&cstr(1, b"Boston\0"));
        report.apply(&int(0, -4));
        assert_eq!(report.summary().as_str(), "-4°C - Boston");
    }

    #[test]
    fn wrong_value_type_is_skipped() {
        let mut report = WeatherReport::new();
        report.apply(&int(0, 7));
        assert_eq!(report.apply(&cstr(0, b"hot\0")), Applied::WrongType(0));
        assert_eq!(report.apply(&int(1, 3)), Applied::WrongType(1));
        assert_eq!(report.temperature(), "7°C");
    }

    #[test]
    fn long_values_are_truncated() {
        let mut report = WeatherReport::new();
        report.apply(&int(0, -2_000_000));
        assert_eq!(report.temperature(), "-200000");
        report.apply(&cstr(1, b"Llanfairpwllgwyngyllgogerychwyrndrobwll\0"));
        assert_eq!(report.location(), "Llanfairpwllgwyngyllgogerychwyr");
        assert_eq!(
            report.summary().as_str(),
            "-200000 - Llanfairpwllgwyngyllg"
        );
    }

    #[test]
    fn refresh_gate() {
        assert!(refresh_due(0, 30));
        assert!(refresh_due(30, 30));
        assert!(!refresh_due(31, 30));
        assert!(!refresh_due(15, 30));
        assert!(!refresh_due(0, 0));
    }

    #[test]
    fn request_encoding() {
        assert_eq!(
            weather_request().unwrap().as_slice(),
            &[1, 0, 0, 0, 0, 2, 1, 0, 0]
        );
    }
}
