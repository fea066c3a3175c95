//! Bluetooth module
//!
//! Advertises the watch, serves the battery service and the companion service that carries
//! weather dictionaries in both directions and lets the phone set the clock.

// Core
use core::{
    mem,
    sync::atomic::{AtomicBool, Ordering},
};

// BLE
use nrf_softdevice::{
    self,
    ble::{
        advertisement_builder::{
            Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload, ServiceList,
            ServiceUuid16,
        },
        gatt_server::{self, NotifyValueError},
        peripheral, Connection,
    },
    raw, Config, Softdevice,
};

// Embassy
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};
use heapless::Vec;

// Crate
use super::time::{TimeReference, CTS_LEN};
use crate::{DROPPED, EVENTS, OUTBOX, TIME};
use worldclock_watchface::{
    events::INBOX_SIZE,
    weather::REQUEST_BUF_LEN,
    Event, MessageResult,
};

/// Pause before advertising again after a failed attempt.
const ADVERTISE_RETRY: Duration = Duration::from_secs(1);

/// Whether a companion is currently connected.
static CONNECTED: AtomicBool = AtomicBool::new(false);

pub fn is_connected() -> bool {
    CONNECTED.load(Ordering::Relaxed)
}

pub static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .full_name("PineTime")
    .build();

pub static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .services_16(ServiceList::Complete, &[ServiceUuid16::BATTERY])
    .build();

#[nrf_softdevice::gatt_server]
pub struct Server {
    pub bas: BatteryService,
    pub companion: CompanionService,
}

#[nrf_softdevice::gatt_service(uuid = "180f")]
pub struct BatteryService {
    #[characteristic(uuid = "2a19", read, notify)]
    pub battery_level: u8,
}

#[nrf_softdevice::gatt_service(uuid = "5c1e0001-6f2a-4d8e-9b3a-2f7c8d9e0a1b")]
pub struct CompanionService {
    /// Dictionaries written by the phone
    #[characteristic(uuid = "5c1e0002-6f2a-4d8e-9b3a-2f7c8d9e0a1b", write)]
    pub inbox: Vec<u8, INBOX_SIZE>,
    /// Dictionaries sent to the phone
    #[characteristic(uuid = "5c1e0003-6f2a-4d8e-9b3a-2f7c8d9e0a1b", read, notify)]
    pub outbox: Vec<u8, REQUEST_BUF_LEN>,
    /// Current Time Service layout
    #[characteristic(uuid = "5c1e0004-6f2a-4d8e-9b3a-2f7c8d9e0a1b", write)]
    pub time: [u8; CTS_LEN],
}

pub fn softdevice_config() -> Config {
    Config {
        clock: Some(raw::nrf_clock_lf_cfg_t {
            source: raw::NRF_CLOCK_LF_SRC_RC as u8,
            rc_ctiv: 16,
            rc_temp_ctiv: 2,
            accuracy: raw::NRF_CLOCK_LF_ACCURACY_500_PPM as u8,
        }),
        conn_gap: Some(raw::ble_gap_conn_cfg_t {
            conn_count: 1,
            event_length: 24,
        }),
        conn_gatt: Some(raw::ble_gatt_conn_cfg_t { att_mtu: 256 }),
        gatts_attr_tab_size: Some(raw::ble_gatts_cfg_attr_tab_size_t {
            attr_tab_size: raw::BLE_GATTS_ATTR_TAB_SIZE_DEFAULT,
        }),
        gap_role_count: Some(raw::ble_gap_cfg_role_count_t {
            adv_set_count: 1,
            periph_role_count: 1,
            _bitfield_1: raw::ble_gap_cfg_role_count_t::new_bitfield_1(0),
        }),
        gap_device_name: Some(raw::ble_gap_cfg_device_name_t {
            p_value: b"PineTime" as *const u8 as _,
            current_len: 8,
            max_len: 8,
            write_perm: unsafe { mem::zeroed() },
            _bitfield_1: raw::ble_gap_cfg_device_name_t::new_bitfield_1(
                raw::BLE_GATTS_VLOC_STACK as u8,
            ),
        }),
        ..Default::default()
    }
}

#[embassy_executor::task]
pub async fn softdevice_task(sd: &'static Softdevice) -> ! {
    sd.run().await
}

/// Advertise, serve one companion connection at a time, and report connectivity changes.
#[embassy_executor::task]
pub async fn run_bluetooth(sd: &'static Softdevice, server: &'static Server) {
    let config = peripheral::Config::default();
    loop {
        let adv = peripheral::ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };
        let conn = match peripheral::advertise_connectable(sd, adv, &config).await {
            Ok(conn) => conn,
            Err(e) => {
                defmt::warn!("Advertising failed: {:?}", e);
                Timer::after(ADVERTISE_RETRY).await;
                continue;
            }
        };

        defmt::info!("Companion connected");
        set_connected(true).await;

        let gatt = gatt_server::run(&conn, server, |e| handle_server_event(e));
        match select(gatt, forward_outbox(server, &conn)).await {
            Either::First(reason) => defmt::info!("Companion disconnected: {:?}", reason),
            Either::Second(()) => {}
        }

        set_connected(false).await;
    }
}

async fn set_connected(connected: bool) {
    if CONNECTED.swap(connected, Ordering::Relaxed) != connected {
        EVENTS.send(Event::ConnectivityChanged(connected)).await;
    }
}

fn handle_server_event(event: ServerEvent) {
    match event {
        ServerEvent::Bas(BatteryServiceEvent::BatteryLevelCccdWrite { notifications }) => {
            defmt::info!("Battery notifications: {}", notifications);
        }
        ServerEvent::Companion(event) => match event {
            CompanionServiceEvent::InboxWrite(message) => {
                if EVENTS.try_send(Event::MessageReceived(message)).is_err() {
                    DROPPED.signal(MessageResult::BufferOverflow);
                }
            }
            CompanionServiceEvent::OutboxCccdWrite { notifications } => {
                defmt::info!("Outbox notifications: {}", notifications);
            }
            CompanionServiceEvent::TimeWrite(bytes) => match TimeReference::from_cts_bytes(&bytes) {
                Ok(reference) => {
                    TIME.set_time(reference);
                    defmt::info!("Clock set by companion");
                }
                Err(e) => defmt::warn!("Invalid time payload: {:?}", e),
            },
        },
    }
}

/// Notify queued outbox messages and report each delivery result.
async fn forward_outbox(server: &Server, conn: &Connection) {
    loop {
        let message = OUTBOX.receive().await;
        let event = match server.companion.outbox_notify(conn, &message) {
            Ok(()) => Event::SendSucceeded,
            Err(NotifyValueError::Disconnected) => Event::SendFailed(MessageResult::NotConnected),
            Err(e) => {
                defmt::warn!("Outbox notify failed: {:?}", e);
                Event::SendFailed(MessageResult::SendRejected)
            }
        };
        EVENTS.send(event).await;
    }
}
