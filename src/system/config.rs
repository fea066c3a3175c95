//! General system configuration

use embassy_nrf::{
    config::{Config, Debug, HfclkSource, LfclkSource},
    interrupt::{self, InterruptExt, Priority},
};

/// Offset of the watch's own clock from UTC, in seconds.
pub const LOCAL_UTC_OFFSET: i32 = 1 * 3_600;

/// Offset of the second clock from UTC, in hours.
pub const OTHER_ZONE_OFFSET: i32 = -5;

/// Show the local clock in 24h style.
pub const CLOCK_24H: bool = true;

/// Fixed backlight level (0–7).
pub const BACKLIGHT_LEVEL: u8 = 2;

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Generate default config, required because Config is set as
        // `non_exhaustive`
        let mut config = Config::default();

        // Set high-frequency and low-frequency clock sources to external
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Configure interrupt priorities to exclude 0 (default), 1, and 4,
        // which are reserved for the nrf SoftDevice
        config.gpiote_interrupt_priority = Priority::P2;
        config.time_interrupt_priority = Priority::P2;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }

    /// Move the peripherals bound in `main` off the SoftDevice priorities.
    pub fn set_peripheral_priorities() {
        interrupt::SAADC.set_priority(Priority::P3);
        interrupt::SPIM2_SPIS2_SPI2.set_priority(Priority::P3);
    }
}
