//! The watchface controller

use chrono::Timelike;

use crate::{
    config::Config,
    dictionary::Dictionary,
    error::MessageResult,
    events::EventHandler,
    status::{battery_glyph, bluetooth_indicator},
    time::TimeStrings,
    traits::{ChargeState, Host, Outbox, Region},
    weather::{self, Applied, WeatherReport, LOADING_TEXT},
};
use crate::{debug, error, info, warn};

/// Owns all state of the face; the device hands it events one at a time.
pub struct WatchFace {
    config: Config,
    weather: WeatherReport,
}

impl WatchFace {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            weather: WeatherReport::new(),
        }
    }

    pub fn weather(&self) -> &WeatherReport {
        &self.weather
    }

    /// Draw the initial face: placeholder weather, current status snapshots and the time.
    pub fn start<H: Host>(&mut self, host: &mut H) {
        info!(
            "Starting watchface, second zone UTC{}",
            self.config.other_zone_offset
        );
        host.set_text(Region::Weather, LOADING_TEXT);

        let battery = host.battery();
        self.on_battery_change(host, battery);

        let connected = host.is_connected();
        self.on_connectivity_change(host, connected);

        self.update_time(host);
    }

    /// Render local time, second zone and date from one clock reading. Returns the local minute.
    fn update_time<H: Host>(&self, host: &mut H) -> u32 {
        let now = host.now();
        let strings = TimeStrings::render(&now, host.is_24h_style(), self.config.other_zone_offset);

        host.set_text(Region::LocalTime, &strings.local);
        host.set_text(Region::OtherTime, &strings.other);
        host.set_text(Region::Date, &strings.date);

        now.minute()
    }

    fn request_weather<O: Outbox>(&self, outbox: &mut O) {
        let request = match weather::weather_request() {
            Ok(request) => request,
            Err(e) => {
                error!("Could not encode weather request: {:?}", e);
                return;
            }
        };
        match outbox.send(&request) {
            Ok(()) => debug!("Weather request queued"),
            Err(reason) => error!("Outbox send failed: {:?}", reason),
        }
    }
}

impl Default for WatchFace {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl EventHandler for WatchFace {
    fn on_tick<H: Host>(&mut self, host: &mut H) {
        let minute = self.update_time(host);
        if weather::refresh_due(minute, self.config.weather_refresh_minutes) {
            self.request_weather(host);
        }
    }

    fn on_connectivity_change<H: Host>(&mut self, host: &mut H, connected: bool) {
        let indicator = bluetooth_indicator(connected);
        host.set_text(Region::Bluetooth, indicator.glyph);
        if indicator.pulse {
            host.double_pulse();
        }
    }

    fn on_battery_change<H: Host>(&mut self, host: &mut H, state: ChargeState) {
        host.set_text(
            Region::Battery,
            battery_glyph(state, self.config.low_battery_percent),
        );
    }

    fn on_message_received<H: Host>(&mut self, host: &mut H, message: &[u8]) {
        match Dictionary::parse(message) {
            Ok(dict) => {
                for tuple in dict.iter() {
                    match tuple {
                        Ok(tuple) => match self.weather.apply(&tuple) {
                            Applied::Temperature | Applied::Location => {}
                            Applied::WrongType(key) => {
                                warn!("Key {} has an unexpected value type", key)
                            }
                            Applied::Unrecognized(key) => error!("Key {} not recognized!", key),
                        },
                        Err(e) => {
                            error!("Malformed message: {:?}", e);
                            break;
                        }
                    }
                }
            }
            Err(e) => error!("Malformed message: {:?}", e),
        }

        host.set_text(Region::Weather, &self.weather.summary());
    }

    fn on_message_dropped<H: Host>(&mut self, _host: &mut H, reason: MessageResult) {
        error!("Message dropped! ({})", reason.code());
    }

    fn on_send_failed<H: Host>(&mut self, _host: &mut H, reason: MessageResult) {
        error!("Outbox send failed! ({})", reason.code());
    }

    fn on_send_succeeded<H: Host>(&mut self, _host: &mut H) {
        info!("Outbox send success!");
    }
}
