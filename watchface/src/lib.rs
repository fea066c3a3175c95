//! Second-timezone watchface logic.
//!
//! Everything observable on the face lives here: the offset clock, the date and local time
//! strings, the weather line fed by the companion app and the two status glyphs. The hardware
//! side only has to implement [`traits::Host`] and feed [`events::Event`]s into
//! [`events::dispatch`].

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod dictionary;
pub mod error;
pub mod events;
pub mod face;
pub mod status;
pub mod text;
pub mod time;
pub mod traits;
pub mod weather;

cfg_if::cfg_if! {
    if #[cfg(feature = "defmt")] {
        pub use defmt::{trace, debug, info, warn, error};
    } else if #[cfg(feature = "log")] {
        pub use log::{trace, debug, info, warn, error};
    } else {
        #[allow(unused_imports)]
        pub(crate) use silent::{trace, debug, info, warn, error};
    }
}

/// Logging macros used when neither `defmt` nor `log` is enabled. Arguments are
/// type-checked but never evaluated.
#[cfg(not(any(feature = "defmt", feature = "log")))]
mod silent {
    macro_rules! trace {
        ($($arg:tt)*) => {{ if false { ::core::mem::drop(::core::format_args!($($arg)*)); } }};
    }
    macro_rules! debug {
        ($($arg:tt)*) => {{ if false { ::core::mem::drop(::core::format_args!($($arg)*)); } }};
    }
    macro_rules! info {
        ($($arg:tt)*) => {{ if false { ::core::mem::drop(::core::format_args!($($arg)*)); } }};
    }
    macro_rules! warn {
        ($($arg:tt)*) => {{ if false { ::core::mem::drop(::core::format_args!($($arg)*)); } }};
    }
    macro_rules! error {
        ($($arg:tt)*) => {{ if false { ::core::mem::drop(::core::format_args!($($arg)*)); } }};
    }
    #[allow(unused_imports)]
    pub(crate) use {debug, error, info, trace, warn};
}

pub use config::Config;
pub use error::{ConfigError, DictionaryError, MessageResult};
pub use events::{dispatch, Event, EventHandler, Inbox};
pub use face::WatchFace;
pub use traits::{ChargeState, Clock, Haptics, Host, Outbox, Region, StatusPeek, TextSink};
