/// Battery state as reported by the power service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChargeState {
    /// Charge level in percent (0–100)
    pub percent: u8,
    pub charging: bool,
    pub plugged: bool,
}

/// Current snapshot of the status services, read once at startup.
pub trait StatusPeek {
    fn battery(&self) -> ChargeState;

    fn is_connected(&self) -> bool;
}
