//! Events delivered by the device and the handler interface the face implements

use heapless::Vec;

use crate::{
    error::MessageResult,
    traits::{ChargeState, Host},
};

/// Largest inbound dictionary accepted from the companion.
pub const INBOX_SIZE: usize = 64;

/// Raw inbound dictionary bytes.
pub type Inbox = Vec<u8, INBOX_SIZE>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The minute changed.
    Tick,
    ConnectivityChanged(bool),
    BatteryChanged(ChargeState),
    MessageReceived(Inbox),
    MessageDropped(MessageResult),
    SendFailed(MessageResult),
    SendSucceeded,
}

/// One method per device event. Calls are serialized by the caller.
pub trait EventHandler {
    fn on_tick<H: Host>(&mut self, host: &mut H);

    fn on_connectivity_change<H: Host>(&mut self, host: &mut H, connected: bool);

    fn on_battery_change<H: Host>(&mut self, host: &mut H, state: ChargeState);

    fn on_message_received<H: Host>(&mut self, host: &mut H, message: &[u8]);

    fn on_message_dropped<H: Host>(&mut self, host: &mut H, reason: MessageResult);

    fn on_send_failed<H: Host>(&mut self, host: &mut H, reason: MessageResult);

    fn on_send_succeeded<H: Host>(&mut self, host: &mut H);
}

/// Route one event to its handler method.
pub fn dispatch<E, H>(handler: &mut E, host: &mut H, event: Event)
where
    E: EventHandler,
    H: Host,
{
    match event {
        Event::Tick => handler.on_tick(host),
        Event::ConnectivityChanged(connected) => handler.on_connectivity_change(host, connected),
        Event::BatteryChanged(state) => handler.on_battery_change(host, state),
        Event::MessageReceived(message) => handler.on_message_received(host, &message),
        Event::MessageDropped(reason) => handler.on_message_dropped(host, reason),
        Event::SendFailed(reason) => handler.on_send_failed(host, reason),
        Event::SendSucceeded => handler.on_send_succeeded(host),
    }
}
