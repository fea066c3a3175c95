use std::{cell::RefCell, collections::HashMap, sync::Once};

use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{Level, LevelFilter, Log, Metadata, Record};
use worldclock_watchface::{
    dictionary::DictionaryWriter, dispatch, events::INBOX_SIZE, ChargeState, Clock, Config,
    Event, Haptics, Inbox, MessageResult, Outbox, Region, StatusPeek, TextSink, WatchFace,
};

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Keeps log records per test thread so parallel tests don't see each other's output.
struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS.with(|r| {
            r.borrow_mut()
                .push((record.level(), record.args().to_string()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;
static INIT_LOGGER: Once = Once::new();

/// Install the capturing logger and forget anything this thread logged so far.
fn capture_logs() {
    INIT_LOGGER.call_once(|| {
        log::set_logger(&LOGGER).unwrap();
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

/// Number of records at `level` whose message contains `needle`.
fn logged(level: Level, needle: &str) -> usize {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(l, message)| *l == level && message.contains(needle))
            .count()
    })
}

struct MockHost {
    now: DateTime<FixedOffset>,
    is_24h: bool,
    battery: ChargeState,
    connected: bool,
    outbox_result: Result<(), MessageResult>,
    texts: HashMap<Region, String>,
    pulses: usize,
    sent: Vec<Vec<u8>>,
}

impl MockHost {
    fn new() -> Self {
        Self {
            now: utc(2024, 5, 17, 13, 45, 0),
            is_24h: true,
            battery: charge(80),
            connected: true,
            outbox_result: Ok(()),
            texts: HashMap::new(),
            pulses: 0,
            sent: Vec::new(),
        }
    }

    fn text(&self, region: Region) -> &str {
        self.texts.get(&region).map(String::as_str).unwrap_or("<unset>")
    }
}

impl Clock for MockHost {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn is_24h_style(&self) -> bool {
        self.is_24h
    }
}

impl TextSink for MockHost {
    fn set_text(&mut self, region: Region, text: &str) {
        self.texts.insert(region, text.to_owned());
    }
}

impl Haptics for MockHost {
    fn double_pulse(&mut self) {
        self.pulses += 1;
    }
}

impl Outbox for MockHost {
    fn send(&mut self, message: &[u8]) -> Result<(), MessageResult> {
        self.sent.push(message.to_vec());
        self.outbox_result
    }
}

impl StatusPeek for MockHost {
    fn battery(&self) -> ChargeState {
        self.battery
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, local_offset_hours: i32) -> DateTime<FixedOffset> {
    let naive = NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, mi, 0)
        .unwrap();
    DateTime::from_naive_utc_and_offset(
        naive,
        FixedOffset::east_opt(local_offset_hours * 3_600).unwrap(),
    )
}

fn charge(percent: u8) -> ChargeState {
    ChargeState {
        percent,
        charging: false,
        plugged: false,
    }
}

fn weather_message(build: impl FnOnce(&mut DictionaryWriter<INBOX_SIZE>)) -> Inbox {
    let mut writer = DictionaryWriter::new().unwrap();
    build(&mut writer);
    writer.finish()
}

fn started(host: &mut MockHost) -> WatchFace {
    let mut face = WatchFace::default();
    face.start(host);
    face
}

#[test]
fn startup_draws_every_region() {
    let mut host = MockHost::new();
    started(&mut host);

    assert_eq!(host.text(Region::LocalTime), "13:45");
    assert_eq!(host.text(Region::OtherTime), "08:45");
    assert_eq!(host.text(Region::Date), "2024-05-17");
    assert_eq!(host.text(Region::Weather), "Loading...");
    assert_eq!(host.text(Region::Bluetooth), "");
    assert_eq!(host.text(Region::Battery), "");
    assert_eq!(host.pulses, 0);
    assert!(host.sent.is_empty());
}

#[test]
fn startup_while_disconnected_and_low_pulses_once() {
    let mut host = MockHost::new();
    host.connected = false;
    host.battery = charge(12);
    started(&mut host);

    assert_eq!(host.text(Region::Bluetooth), "-");
    assert_eq!(host.text(Region::Battery), "-");
    assert_eq!(host.pulses, 1);
}

#[test]
fn weather_reply_fills_weather_region() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    let message = weather_message(|w| {
        w.write_int32(0, 22).unwrap();
        w.write_cstring(1, "Boston").unwrap();
    });
    dispatch(&mut face, &mut host, Event::MessageReceived(message));

    assert_eq!(host.text(Region::Weather), "22°C - Boston");
}

#[test]
fn unknown_key_is_skipped_and_later_keys_still_apply() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    capture_logs();
    let message = weather_message(|w| {
        w.write_int32(0, 22).unwrap();
        w.write_int32(5, 99).unwrap();
        w.write_cstring(1, "Boston").unwrap();
    });
    dispatch(&mut face, &mut host, Event::MessageReceived(message));

    assert_eq!(host.text(Region::Weather), "22°C - Boston");
    assert_eq!(face.weather().temperature(), "22°C");
    assert_eq!(logged(Level::Error, "Key 5 not recognized"), 1);
    assert_eq!(logged(Level::Error, "not recognized"), 1);
}

#[test]
fn partial_reply_keeps_previous_location() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    let first = weather_message(|w| {
        w.write_int32(0, 22).unwrap();
        w.write_cstring(1, "Boston").unwrap();
    });
    dispatch(&mut face, &mut host, Event::MessageReceived(first));
    let second = weather_message(|w| w.write_int32(0, 18).unwrap());
    dispatch(&mut face, &mut host, Event::MessageReceived(second));

    assert_eq!(host.text(Region::Weather), "18°C - Boston");
}

#[test]
fn malformed_reply_keeps_decoded_prefix() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    let mut message = weather_message(|w| {
        w.write_int32(0, 22).unwrap();
        w.write_cstring(1, "Boston").unwrap();
    });
    // Chop the location value short.
    message.truncate(message.len() - 3);
    dispatch(&mut face, &mut host, Event::MessageReceived(message));

    assert_eq!(host.text(Region::Weather), "22°C - ");
}

#[test]
fn tick_at_half_hour_requests_weather_once() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    host.now = utc(2024, 5, 17, 14, 30, 0);
    dispatch(&mut face, &mut host, Event::Tick);
    assert_eq!(host.sent, vec![vec![1, 0, 0, 0, 0, 2, 1, 0, 0]]);
    assert_eq!(host.text(Region::LocalTime), "14:30");
    assert_eq!(host.text(Region::OtherTime), "09:30");

    host.now = utc(2024, 5, 17, 14, 31, 0);
    dispatch(&mut face, &mut host, Event::Tick);
    assert_eq!(host.sent.len(), 1);
    assert_eq!(host.text(Region::LocalTime), "14:31");
}

#[test]
fn gate_uses_local_minute() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    // UTC+5:30: 09:30 UTC is 15:00 local.
    host.now = DateTime::from_naive_utc_and_offset(
        NaiveDate::from_ymd_opt(2024, 5, 17)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap(),
        FixedOffset::east_opt(5 * 3_600 + 30 * 60).unwrap(),
    );
    dispatch(&mut face, &mut host, Event::Tick);
    assert_eq!(host.text(Region::LocalTime), "15:00");
    assert_eq!(host.text(Region::OtherTime), "04:30");
    assert_eq!(host.sent.len(), 1);
}

#[test]
fn failed_send_keeps_face_unchanged() {
    let mut host = MockHost::new();
    host.outbox_result = Err(MessageResult::NotConnected);
    let mut face = started(&mut host);

    capture_logs();
    host.now = utc(2024, 5, 17, 15, 0, 0);
    dispatch(&mut face, &mut host, Event::Tick);
    dispatch(&mut face, &mut host, Event::SendFailed(MessageResult::SendTimeout));
    dispatch(&mut face, &mut host, Event::MessageDropped(MessageResult::BufferOverflow));
    dispatch(&mut face, &mut host, Event::SendSucceeded);

    assert_eq!(host.sent.len(), 1);
    assert_eq!(host.text(Region::Weather), "Loading...");
    assert_eq!(host.text(Region::LocalTime), "15:00");

    // Queueing refused while disconnected
    assert_eq!(logged(Level::Error, "Outbox send failed: NotConnected"), 1);
    // Delivery failure and dropped inbound message carry their reason codes
    assert_eq!(logged(Level::Error, "Outbox send failed! (2)"), 1);
    assert_eq!(logged(Level::Error, "Message dropped! (128)"), 1);
    assert_eq!(logged(Level::Info, "Outbox send success!"), 1);
}

#[test]
fn well_formed_reply_logs_no_errors() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    capture_logs();
    let message = weather_message(|w| {
        w.write_int32(0, 22).unwrap();
        w.write_cstring(1, "Boston").unwrap();
    });
    dispatch(&mut face, &mut host, Event::MessageReceived(message));

    assert_eq!(logged(Level::Error, ""), 0);
    assert_eq!(logged(Level::Warn, ""), 0);
}

#[test]
fn twelve_hour_preference_is_read_on_each_tick() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    host.is_24h = false;
    host.now = utc(2024, 5, 17, 22, 5, 0);
    dispatch(&mut face, &mut host, Event::Tick);
    assert_eq!(host.text(Region::LocalTime), "10:05");
    assert_eq!(host.text(Region::OtherTime), "17:05");
}

#[test]
fn battery_glyph_flips_at_threshold() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    dispatch(&mut face, &mut host, Event::BatteryChanged(charge(29)));
    assert_eq!(host.text(Region::Battery), "-");
    dispatch(&mut face, &mut host, Event::BatteryChanged(charge(30)));
    assert_eq!(host.text(Region::Battery), "");
}

#[test]
fn connectivity_loss_pulses_and_reconnect_clears() {
    let mut host = MockHost::new();
    let mut face = started(&mut host);

    dispatch(&mut face, &mut host, Event::ConnectivityChanged(false));
    assert_eq!(host.text(Region::Bluetooth), "-");
    assert_eq!(host.pulses, 1);

    dispatch(&mut face, &mut host, Event::ConnectivityChanged(true));
    assert_eq!(host.text(Region::Bluetooth), "");
    assert_eq!(host.pulses, 1);
}

#[test]
fn custom_offset_drives_second_clock() {
    let mut host = MockHost::new();
    let mut face = WatchFace::new(Config::new(9).unwrap());
    face.start(&mut host);
    assert_eq!(host.text(Region::OtherTime), "22:45");
}
