// Command types - what the MIDI callback sends to the app loop

/// Commands crossing from the MIDI callback thread into the app loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// One external clock pulse: advance the cycle by one slot.
    Pulse,
}
