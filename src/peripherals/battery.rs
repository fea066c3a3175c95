//! Battery status check
//!
//! Implementation based upon https://github.com/dbrgn/pinetime-rtic/blob/master/pinetime-rtic/src/battery.rs
//! and https://wiki.pine64.org/wiki/PineTime.

use embassy_nrf::{gpio::Input, peripherals::P0_12, saadc::Saadc};

use worldclock_watchface::ChargeState;

/// Battery configuration
struct BatteryConfig<'a> {
    /// ADC instance for battery voltage measurement
    adc: Saadc<'a, 1>,
    /// Charge indication pin:
    /// high = battery, low = charging
    pin_charge_indication: Input<'a, P0_12>,
}

/// Battery API
pub struct Battery {
    /// Battery configuration
    config: BatteryConfig<'static>,
    /// Last reported state
    state: ChargeState,
}

impl Battery {
    /// Configure battery settings on boot and take a first reading
    pub async fn init(adc: Saadc<'static, 1>, charge_pin: Input<'static, P0_12>) -> Self {
        let mut battery = Self {
            config: BatteryConfig {
                adc,
                pin_charge_indication: charge_pin,
            },
            state: ChargeState {
                percent: 0,
                charging: false,
                plugged: false,
            },
        };
        battery.state = battery.read().await;
        battery
    }

    /// Last reported state
    pub fn state(&self) -> ChargeState {
        self.state
    }

    /// Sample the hardware. Returns the new state if it differs from the last one.
    pub async fn update(&mut self) -> Option<ChargeState> {
        let state = self.read().await;
        if state == self.state {
            return None;
        }
        self.state = state;
        Some(state)
    }

    async fn read(&mut self) -> ChargeState {
        let charging = self.is_charging();
        ChargeState {
            percent: self.get_percent().await,
            charging,
            // The charge pin only goes low while on the cradle.
            plugged: charging,
        }
    }

    /// Carging state of the battery
    fn is_charging(&self) -> bool {
        self.config.pin_charge_indication.is_low()
    }

    /// Battery capacity in percent
    async fn get_percent(&mut self) -> u8 {
        percent_from_millivolts(self.get_voltage().await)
    }

    /// Battery voltage in millivolts
    async fn get_voltage(&mut self) -> u16 {
        let mut buf = [0; 1];
        self.config.adc.sample(&mut buf).await;
        // For detailed explanation of formula check https://wiki.pine64.org/wiki/PineTime
        // Use u32 during calculation to prevent overflow
        (buf[0].max(0) as u32 * 2000 / 1241) as u16
    }
}

/// Use fixed data points and linear interpolation in between
/// to estimate battery capacity.
fn percent_from_millivolts(voltage: u16) -> u8 {
    (match voltage {
        0..=3449 => 0,
        3450..=3699 => (voltage - 3450) / 5,
        3700..=4199 => 50 + (voltage - 3700) / 10,
        _ => 100,
    }) as u8
}
