// MIDI port enumeration

use midir::{MidiInput, MidiOutput};

/// A selectable MIDI port.
#[derive(Clone, Debug)]
pub struct MidiPortInfo {
    pub name: String,
    pub is_default: bool,
}

pub struct MidiPortScanner;

impl MidiPortScanner {
    pub fn new() -> Self {
        Self
    }

    /// List the available input ports. The first port is the default.
    pub fn list_input_ports(&self) -> Vec<MidiPortInfo> {
        let mut devices = Vec::new();

        if let Ok(midi_in) = MidiInput::new("StepCycle MIDI scanner") {
            for (index, port) in midi_in.ports().iter().enumerate() {
                if let Ok(name) = midi_in.port_name(port) {
                    devices.push(MidiPortInfo {
                        name,
                        is_default: index == 0,
                    });
                }
            }
        }

        devices
    }

    /// List the available output ports. The first port is the default.
    pub fn list_output_ports(&self) -> Vec<MidiPortInfo> {
        let mut devices = Vec::new();

        if let Ok(midi_out) = MidiOutput::new("StepCycle MIDI scanner") {
            for (index, port) in midi_out.ports().iter().enumerate() {
                if let Ok(name) = midi_out.port_name(port) {
                    devices.push(MidiPortInfo {
                        name,
                        is_default: index == 0,
                    });
                }
            }
        }

        devices
    }
}

impl Default for MidiPortScanner {
    fn default() -> Self {
        Self::new()
    }
}
