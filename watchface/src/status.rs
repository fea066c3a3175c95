//! Bluetooth and battery glyphs

use crate::traits::ChargeState;

/// Marker drawn in a status region when attention is needed.
pub const ALERT_GLYPH: &str = "-";

/// Bluetooth region update for one connectivity report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BluetoothIndicator {
    pub glyph: &'static str,
    /// Vibrate on this report.
    pub pulse: bool,
}

/// Every disconnected report alerts, including the first one at startup.
pub fn bluetooth_indicator(connected: bool) -> BluetoothIndicator {
    if connected {
        BluetoothIndicator {
            glyph: "",
            pulse: false,
        }
    } else {
        BluetoothIndicator {
            glyph: ALERT_GLYPH,
            pulse: true,
        }
    }
}

/// Battery glyph, shown strictly below `low_percent`.
pub fn battery_glyph(state: ChargeState, low_percent: u8) -> &'static str {
    if state.percent < low_percent {
        ALERT_GLYPH
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charge(percent: u8) -> ChargeState {
        ChargeState {
            percent,
            charging: false,
            plugged: false,
        }
    }

    #[test]
    fn battery_threshold_has_no_hysteresis() {
        assert_eq!(battery_glyph(charge(29), 30), "-");
        assert_eq!(battery_glyph(charge(30), 30), "");
        assert_eq!(battery_glyph(charge(29), 30), "-");
        assert_eq!(battery_glyph(charge(0), 30), "-");
        assert_eq!(battery_glyph(charge(100), 30), "");
    }

    #[test]
    fn charging_does_not_hide_low_glyph() {
        let state = ChargeState {
            percent: 10,
            charging: true,
            plugged: true,
        };
        assert_eq!(battery_glyph(state, 30), "-");
    }

    #[test]
    fn disconnect_pulses_connect_clears() {
        assert_eq!(
            bluetooth_indicator(false),
            BluetoothIndicator {
                glyph: "-",
                pulse: true
            }
        );
        assert_eq!(
            bluetooth_indicator(true),
            BluetoothIndicator {
                glyph: "",
                pulse: false
            }
        );
    }
}
