// Note player - turns resolved steps into MIDI note messages
// Monophonic: at most one note sounding at a time

use crate::midi::event::MidiEvent;
use crate::sequencer::engine::SequencerEngine;
use crate::timing::PulseTimer;
use std::time::Duration;

/// Velocity for every emitted note.
pub const NOTE_VELOCITY: u8 = 127;

/// Monophonic note dispatcher.
///
/// Pulls the engine's pending trigger after each pulse and keeps the gate
/// timer for the sounding note. Returns plain events; the MIDI output
/// layer owns the channel and the wire encoding.
pub struct NotePlayer {
    held: Option<u8>,
    gate: PulseTimer,
}

impl NotePlayer {
    pub fn new(note_length: Duration) -> Self {
        Self {
            held: None,
            gate: PulseTimer::new(note_length),
        }
    }

    /// Events for the pulse that just advanced the engine.
    ///
    /// A note-off for the previously sounding note always precedes the
    /// new note-on.
    pub fn pulse(&mut self, engine: &mut SequencerEngine) -> Vec<MidiEvent> {
        let mut events = Vec::new();

        let Some(note) = engine.take_trigger() else {
            return events;
        };

        if let Some(previous) = self.held.take() {
            events.push(MidiEvent::NoteOff { note: previous });
        }
        events.push(MidiEvent::NoteOn {
            note,
            velocity: NOTE_VELOCITY,
        });
        self.held = Some(note);
        self.gate.restart();

        events
    }

    /// Poll the gate; releases the held note exactly once, when the gate
    /// elapses.
    pub fn tick(&mut self) -> Option<MidiEvent> {
        if self.gate.finished() {
            if let Some(note) = self.held.take() {
                return Some(MidiEvent::NoteOff { note });
            }
        }
        None
    }

    /// Release whatever is sounding (shutdown, clock loss).
    pub fn all_notes_off(&mut self) -> Option<MidiEvent> {
        self.held.take().map(|note| MidiEvent::NoteOff { note })
    }

    pub fn held_note(&self) -> Option<u8> {
        self.held
    }

    pub fn note_length(&self) -> Duration {
        self.gate.duration()
    }

    pub fn set_note_length(&mut self, length: Duration) {
        self.gate.set_duration(length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> NotePlayer {
        NotePlayer::new(Duration::from_secs(60))
    }

    #[test]
    fn test_first_pulse_emits_note_on_only() {
        let mut engine = SequencerEngine::new();
        let mut player = player();

        engine.advance().unwrap();
        let events = player.pulse(&mut engine);

        assert_eq!(events.len(), 1);
        match events[0] {
            MidiEvent::NoteOn { velocity, .. } => assert_eq!(velocity, NOTE_VELOCITY),
            _ => panic!("Expected NoteOn"),
        }
        assert!(player.held_note().is_some());
    }

    #[test]
    fn test_note_off_precedes_next_note_on() {
        let mut engine = SequencerEngine::new();
        let mut player = player();

        engine.advance().unwrap();
        let first = player.pulse(&mut engine);
        let first_note = match first[0] {
            MidiEvent::NoteOn { note, .. } => note,
            _ => panic!("Expected NoteOn"),
        };

        engine.advance().unwrap();
        let second = player.pulse(&mut engine);

        assert_eq!(second.len(), 2);
        assert_eq!(second[0], MidiEvent::NoteOff { note: first_note });
        assert!(matches!(second[1], MidiEvent::NoteOn { .. }));
    }

    #[test]
    fn test_silent_step_emits_nothing() {
        let mut engine = SequencerEngine::new();
        let mut player = player();
        engine.set_step_audible(2, false);

        assert_eq!(engine.advance().unwrap(), 2);
        assert!(player.pulse(&mut engine).is_empty());
        assert!(player.held_note().is_none());
    }

    #[test]
    fn test_gate_releases_held_note_once() {
        let mut engine = SequencerEngine::new();
        let mut player = NotePlayer::new(Duration::ZERO);

        engine.advance().unwrap();
        let events = player.pulse(&mut engine);
        let note = match events[0] {
            MidiEvent::NoteOn { note, .. } => note,
            _ => panic!("Expected NoteOn"),
        };

        assert_eq!(player.tick(), Some(MidiEvent::NoteOff { note }));
        assert_eq!(player.tick(), None);
    }

    #[test]
    fn test_gate_holds_until_elapsed() {
        let mut engine = SequencerEngine::new();
        let mut player = player();

        engine.advance().unwrap();
        player.pulse(&mut engine);

        assert_eq!(player.tick(), None);
        assert!(player.held_note().is_some());
    }

    #[test]
    fn test_note_length_round_trip() {
        let mut player = player();
        player.set_note_length(Duration::from_millis(120));
        assert_eq!(player.note_length(), Duration::from_millis(120));
    }

    #[test]
    fn test_all_notes_off_releases_immediately() {
        let mut engine = SequencerEngine::new();
        let mut player = player();

        engine.advance().unwrap();
        player.pulse(&mut engine);

        assert!(player.all_notes_off().is_some());
        assert!(player.all_notes_off().is_none());
        assert!(player.held_note().is_none());
    }
}
