//! Services the watchface needs from the device

mod clock;
mod display;
mod haptics;
mod outbox;
mod status;

pub use clock::Clock;
pub use display::{Region, TextSink};
pub use haptics::Haptics;
pub use outbox::Outbox;
pub use status::{ChargeState, StatusPeek};

/// Everything a device has to provide to run the face.
pub trait Host: Clock + TextSink + Haptics + Outbox + StatusPeek {}

impl<T> Host for T where T: Clock + TextSink + Haptics + Outbox + StatusPeek {}
