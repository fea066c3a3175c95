#![no_std]
#![no_main]

mod host;
mod peripherals;
mod system;

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Core
use core::cell::Cell;

// Device
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    saadc::{self, ChannelConfig, Resolution, Saadc},
    spim,
};
use embassy_sync::{
    blocking_mutex::{raw::ThreadModeRawMutex, Mutex},
    channel::Channel,
    signal::Signal,
};
use embassy_time::{Delay, Duration, Ticker, Timer};
use heapless::Vec;
use nrf_softdevice::Softdevice;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    SAADC => saadc::InterruptHandler;
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use host::PineTimeHost;
use peripherals::{
    backlight::Backlight, battery::Battery, display::Display, vibration::VibrationMotor,
};
use system::{
    bluetooth::{self, Server},
    config::{SystemConfig, BACKLIGHT_LEVEL, LOCAL_UTC_OFFSET, OTHER_ZONE_OFFSET},
    time::{TimeManager, TimeReference},
};

// Others
use chrono::{FixedOffset, Timelike};
use worldclock_watchface::{
    dispatch, weather::REQUEST_BUF_LEN, ChargeState, Config, Event, MessageResult, WatchFace,
};

// Include current UTC epoch at compile time
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Communication channels
static BATTERY_STATE: Mutex<ThreadModeRawMutex, Cell<ChargeState>> =
    Mutex::new(Cell::new(ChargeState {
        percent: 0,
        charging: false,
        plugged: false,
    }));
static DROPPED: Signal<ThreadModeRawMutex, MessageResult> = Signal::new();
static EVENTS: Channel<ThreadModeRawMutex, Event, 8> = Channel::new();
static OUTBOX: Channel<ThreadModeRawMutex, Vec<u8, REQUEST_BUF_LEN>, 2> = Channel::new();
static VIBRATE: Signal<ThreadModeRawMutex, u8> = Signal::new();

static TIME: TimeManager = TimeManager::new();
static BACKLIGHT: StaticCell<Backlight<'static>> = StaticCell::new();
static SERVER: StaticCell<Server> = StaticCell::new();

/// Pulse the motor whenever a notification is signaled
#[embassy_executor::task(pool_size = 1)]
async fn notify(mut motor: VibrationMotor<'static>) {
    loop {
        // Vibrate signaled amount of times
        let count = VIBRATE.wait().await;
        match count {
            1 => motor.pulse_once(Some(200)).await,
            _ => motor.pulse_times(Some(200), count).await,
        }
    }
}

/// Fetch the battery status from the hardware and report changes.
#[embassy_executor::task(pool_size = 1)]
async fn update_battery_status(mut battery: Battery, server: &'static Server) {
    loop {
        // Re-schedule the timer interrupt in 10s
        Timer::after(Duration::from_secs(10)).await;

        if let Some(state) = battery.update().await {
            defmt::info!(
                "Battery status: {} ({})",
                state.percent,
                if state.charging {
                    "charging"
                } else {
                    "discharging"
                }
            );
            BATTERY_STATE.lock(|s| s.set(state));
            if let Err(e) = server.bas.battery_level_set(&state.percent) {
                defmt::warn!("Battery level not published: {:?}", e);
            }
            EVENTS.send(Event::BatteryChanged(state)).await;
        }
    }
}

/// Emit a tick whenever the wall-clock minute changes.
#[embassy_executor::task(pool_size = 1)]
async fn minute_ticker() {
    let mut tick = Ticker::every(Duration::from_secs(1));
    let minute_of = |t: chrono::NaiveDateTime| (t.hour(), t.minute());
    let mut last = minute_of(TIME.now_utc());
    loop {
        tick.next().await;
        let current = minute_of(TIME.now_utc());
        if current != last {
            last = current;
            EVENTS.send(Event::Tick).await;
        }
    }
}

/// Own the face and feed it one event at a time.
#[embassy_executor::task(pool_size = 1)]
async fn run_watchface(mut host: PineTimeHost, config: Config) {
    let mut face = WatchFace::new(config);
    face.start(&mut host);

    loop {
        let event = match select(EVENTS.receive(), DROPPED.wait()).await {
            Either::First(event) => event,
            Either::Second(reason) => Event::MessageDropped(reason),
        };
        dispatch(&mut face, &mut host, event);
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let mut p = embassy_nrf::init(SystemConfig::new());
    SystemConfig::set_peripheral_priorities();
    defmt::info!("Initializing");

    TIME.set_time(unwrap!(TimeReference::from_timestamp(UTC_EPOCH)));
    let config = unwrap!(Config::new(OTHER_ZONE_OFFSET));
    let local_offset = unwrap!(FixedOffset::east_opt(LOCAL_UTC_OFFSET));

    // Initialize Bluetooth
    let sd = Softdevice::enable(&bluetooth::softdevice_config());
    let server: &'static Server = SERVER.init(unwrap!(Server::new(sd)));
    let sd: &'static Softdevice = sd;
    unwrap!(spawner.spawn(bluetooth::softdevice_task(sd)));

    // Initialize SAADC
    let mut saadc_config = saadc::Config::default();
    // Set resolution to 12bit, necessary for correct battery status calculation
    saadc_config.resolution = Resolution::_12BIT;
    // Pin P0.31: Voltage level
    let channel_config = ChannelConfig::single_ended(&mut p.P0_31);
    let saadc = Saadc::new(p.SAADC, Irqs, saadc_config, [channel_config]);
    saadc.calibrate().await;

    // Initialize Battery
    let battery = Battery::init(saadc, Input::new(p.P0_12, Pull::None)).await;
    BATTERY_STATE.lock(|s| s.set(battery.state()));

    // Initialize Backlight; it lives for the rest of the program to keep the pins driven
    let backlight = BACKLIGHT.init(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
    ));

    // Initialize vibration motor
    let vibration = VibrationMotor::init(Output::new(p.P0_16, Level::High, OutputDrive::Standard));

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
        &mut Delay,
    ));
    unwrap!(backlight.set(BACKLIGHT_LEVEL));
    defmt::info!("Backlight at level {}", backlight.brightness());

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(bluetooth::run_bluetooth(sd, server)));
    unwrap!(spawner.spawn(notify(vibration)));
    unwrap!(spawner.spawn(update_battery_status(battery, server)));
    unwrap!(spawner.spawn(run_watchface(
        PineTimeHost::new(display, local_offset),
        config
    )));
    unwrap!(spawner.spawn(minute_ticker()));
}
