/// Text regions of the face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Region {
    LocalTime,
    OtherTime,
    Date,
    Weather,
    Bluetooth,
    Battery,
}

/// Write-only text output. Implementations copy the text; it is not kept alive by the caller.
pub trait TextSink {
    fn set_text(&mut self, region: Region, text: &str);
}
