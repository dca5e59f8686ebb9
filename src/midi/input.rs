// Clock input - incoming note-ons drive the sequencer

use crate::messaging::channels::CommandProducer;
use crate::messaging::command::Command;
use crate::midi::device::MidiPortScanner;
use crate::midi::event::MidiEvent;
use midir::{MidiInput as MidirInput, MidiInputConnection};
use std::sync::{Arc, Mutex};

/// Owns the midir input connection and feeds pulses into the command ring
/// buffer. Each incoming note-on is one clock pulse.
pub struct ClockInput {
    _connection: Option<MidiInputConnection<()>>,
    command_tx: Arc<Mutex<CommandProducer>>,
    port_name: Option<String>,
}

impl ClockInput {
    /// Connect to `preferred` when it is available, else to the first
    /// available port. Runs without a clock when no port exists.
    pub fn new(command_tx: CommandProducer, preferred: Option<&str>) -> Self {
        let mut input = Self {
            _connection: None,
            command_tx: Arc::new(Mutex::new(command_tx)),
            port_name: None,
        };

        let available: Vec<String> = MidiPortScanner::new()
            .list_input_ports()
            .into_iter()
            .map(|p| p.name)
            .collect();

        if available.is_empty() {
            println!("No MIDI input port detected. The sequencer will run without a clock.");
            return input;
        }

        let target = preferred
            .filter(|name| available.iter().any(|n| n.as_str() == *name))
            .unwrap_or_else(|| available[0].as_str())
            .to_string();

        input.connect_to(&target);
        input
    }

    /// Drop the current connection and connect to the named port.
    pub fn connect_to(&mut self, port_name: &str) -> bool {
        self._connection = None;
        self.port_name = None;

        let midi_in = match MidirInput::new("StepCycle clock input") {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Failed to initialize MIDI input: {}", e);
                return false;
            }
        };

        let ports = midi_in.ports();
        let port = ports.iter().find(|p| {
            midi_in
                .port_name(p)
                .map(|name| name == port_name)
                .unwrap_or(false)
        });

        let Some(port) = port else {
            eprintln!("MIDI input port '{}' not found", port_name);
            return false;
        };

        let command_tx = Arc::clone(&self.command_tx);

        let connection = midi_in.connect(
            port,
            "stepcycle-clock",
            move |_timestamp, message, _| {
                // MIDI callback thread: parse, push, never block.
                if let Some(MidiEvent::NoteOn { .. }) = MidiEvent::from_bytes(message) {
                    if let Ok(mut tx) = command_tx.try_lock() {
                        if ringbuf::traits::Producer::try_push(&mut *tx, Command::Pulse).is_err() {
                            eprintln!("Warning: pulse buffer full, pulse dropped");
                        }
                    }
                }
            },
            (),
        );

        match connection {
            Ok(conn) => {
                self._connection = Some(conn);
                self.port_name = Some(port_name.to_string());
                println!("MIDI clock input connected: {}", port_name);
                true
            }
            Err(e) => {
                eprintln!("Failed to connect MIDI input: {}", e);
                false
            }
        }
    }

    /// Name of the connected port, if any.
    pub fn port_name(&self) -> Option<&str> {
        self.port_name.as_deref()
    }
}
