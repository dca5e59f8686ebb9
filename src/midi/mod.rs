// MIDI module - event parsing, port enumeration, clock input, note output

pub mod device;
pub mod event;
pub mod input;
pub mod output;
