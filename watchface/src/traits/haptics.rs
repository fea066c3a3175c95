pub trait Haptics {
    /// Two short vibration pulses.
    fn double_pulse(&mut self);
}
