// Note output - sends note on/off bytes on the configured channel

use crate::midi::device::MidiPortScanner;
use crate::midi::event::MidiEvent;
use midir::{MidiOutput as MidirOutput, MidiOutputConnection};

/// Owns the midir output connection and the note channel.
///
/// The channel is the 1-based number shown in the panel; the status byte
/// carries it 0-based.
pub struct NoteOutput {
    connection: Option<MidiOutputConnection>,
    channel: u8,
    port_name: Option<String>,
}

impl NoteOutput {
    /// Connect to `preferred` when it is available, else to the first
    /// available port. Runs silently when no port exists.
    pub fn new(preferred: Option<&str>, channel: u8) -> Self {
        let mut output = Self {
            connection: None,
            channel: channel.clamp(1, 16),
            port_name: None,
        };

        let available: Vec<String> = MidiPortScanner::new()
            .list_output_ports()
            .into_iter()
            .map(|p| p.name)
            .collect();

        if available.is_empty() {
            println!("No MIDI output port detected. Notes will not be sent.");
            return output;
        }

        let target = preferred
            .filter(|name| available.iter().any(|n| n.as_str() == *name))
            .unwrap_or_else(|| available[0].as_str())
            .to_string();

        output.connect_to(&target);
        output
    }

    /// Drop the current connection and connect to the named port.
    pub fn connect_to(&mut self, port_name: &str) -> bool {
        self.connection = None;
        self.port_name = None;

        let midi_out = match MidirOutput::new("StepCycle note output") {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Failed to initialize MIDI output: {}", e);
                return false;
            }
        };

        let ports = midi_out.ports();
        let port = ports.iter().find(|p| {
            midi_out
                .port_name(p)
                .map(|name| name == port_name)
                .unwrap_or(false)
        });

        let Some(port) = port else {
            eprintln!("MIDI output port '{}' not found", port_name);
            return false;
        };

        match midi_out.connect(port, "stepcycle-notes") {
            Ok(conn) => {
                self.connection = Some(conn);
                self.port_name = Some(port_name.to_string());
                println!("MIDI note output connected: {}", port_name);
                true
            }
            Err(e) => {
                eprintln!("Failed to connect MIDI output: {}", e);
                false
            }
        }
    }

    pub fn send(&mut self, event: MidiEvent) {
        let message = encode(event, self.channel);
        if let Some(connection) = &mut self.connection {
            if let Err(e) = connection.send(&message) {
                eprintln!("MIDI output: failed to send message: {}", e);
            }
        }
    }

    pub fn note_on(&mut self, note: u8, velocity: u8) {
        self.send(MidiEvent::NoteOn { note, velocity });
    }

    pub fn note_off(&mut self, note: u8) {
        self.send(MidiEvent::NoteOff { note });
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn set_channel(&mut self, channel: u8) {
        self.channel = channel.clamp(1, 16);
    }

    /// Name of the connected port, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }
}

/// Wire bytes for an event on a 1-based channel.
fn encode(event: MidiEvent, channel: u8) -> [u8; 3] {
    let channel_bits = channel.saturating_sub(1) & 0x0F;
    match event {
        MidiEvent::NoteOn { note, velocity } => [0x90 | channel_bits, note, velocity],
        MidiEvent::NoteOff { note } => [0x80 | channel_bits, note, 0],
    }
}
