//! PineTime implementation of the watchface host services

use chrono::{DateTime, FixedOffset};
use heapless::Vec;

use worldclock_watchface::{
    ChargeState, Clock, Haptics, MessageResult, Outbox, Region, StatusPeek, TextSink,
};

use crate::{
    peripherals::display::Display,
    system::{bluetooth, config::CLOCK_24H},
    BATTERY_STATE, OUTBOX, TIME, VIBRATE,
};

pub struct PineTimeHost {
    display: Display<'static>,
    local_offset: FixedOffset,
}

impl PineTimeHost {
    pub fn new(display: Display<'static>, local_offset: FixedOffset) -> Self {
        Self {
            display,
            local_offset,
        }
    }
}

impl Clock for PineTimeHost {
    fn now(&self) -> DateTime<FixedOffset> {
        DateTime::from_naive_utc_and_offset(TIME.now_utc(), self.local_offset)
    }

    fn is_24h_style(&self) -> bool {
        CLOCK_24H
    }
}

impl TextSink for PineTimeHost {
    fn set_text(&mut self, region: Region, text: &str) {
        if let Err(e) = self.display.draw_region(region, text) {
            defmt::warn!("Drawing {:?} failed: {:?}", region, e);
        }
    }
}

impl Haptics for PineTimeHost {
    fn double_pulse(&mut self) {
        VIBRATE.signal(2);
    }
}

impl Outbox for PineTimeHost {
    fn send(&mut self, message: &[u8]) -> Result<(), MessageResult> {
        if !bluetooth::is_connected() {
            return Err(MessageResult::NotConnected);
        }
        let message = Vec::from_slice(message).map_err(|_| MessageResult::InvalidArgs)?;
        OUTBOX.try_send(message).map_err(|_| MessageResult::Busy)
    }
}

impl StatusPeek for PineTimeHost {
    fn battery(&self) -> ChargeState {
        BATTERY_STATE.lock(|state| state.get())
    }

    fn is_connected(&self) -> bool {
        bluetooth::is_connected()
    }
}
