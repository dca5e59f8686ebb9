// Step cycle engine - position, direction, repeat and reset bookkeeping
// Advances one slot per external clock pulse

use crate::sequencer::mode::PlayMode;
use crate::sequencer::step::{STEP_COUNT, Step, wrap_repeat};
use thiserror::Error;

/// First and last playable slots.
pub const FIRST_STEP: i32 = 1;
pub const LAST_STEP: i32 = 8;

/// Boundary slots below and above the playable range. Never playable:
/// PingPongFixed turns around on them, every other mode wraps across them.
pub const WRAP_BELOW: i32 = 0;
pub const WRAP_ABOVE: i32 = 9;

/// Reset window bounds, in pulses.
pub const RESET_WINDOW_MIN: i32 = 1;
pub const RESET_WINDOW_MAX: i32 = 128;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SequencerError {
    /// Steps 1-8 are all inactive: traversal has nowhere to land.
    #[error("no active step to land on")]
    NoActiveStep,
}

/// The sequencing state machine.
///
/// Owns the eight playable steps and the traversal state around them.
/// Driven by [`advance`](Self::advance) once per external clock pulse;
/// everything else is clamped setters and read accessors for the front
/// end. After a batch of edits, call [`resolve`](Self::resolve) to settle
/// the position and direction; the front end does this once per frame.
///
/// Single-threaded by design: the caller serializes pulses and edits onto
/// one thread, and no operation yields mid-mutation.
#[derive(Debug, Clone)]
pub struct SequencerEngine {
    steps: [Step; STEP_COUNT],
    position: i32,
    direction: i32,
    mode: PlayMode,
    reset_enabled: bool,
    reset_anchor: i32,
    reset_window: i32,
    reset_countdown: i32,
    note_low: i32,
    note_high: i32,
    trigger_pending: bool,
}

impl SequencerEngine {
    pub fn new() -> Self {
        Self {
            steps: [Step::new(); STEP_COUNT],
            position: FIRST_STEP,
            direction: 1,
            mode: PlayMode::Forward,
            reset_enabled: false,
            reset_anchor: FIRST_STEP,
            reset_window: RESET_WINDOW_MAX,
            reset_countdown: RESET_WINDOW_MAX,
            note_low: 1,
            note_high: 127,
            trigger_pending: false,
        }
    }

    /// Consume one external clock pulse.
    ///
    /// Burns one repeat of the current step or moves the position, arms
    /// the note trigger, runs the periodic reset, then settles onto an
    /// active step. Returns the resolved position.
    pub fn advance(&mut self) -> Result<i32, SequencerError> {
        match Self::playable_index(self.position) {
            Some(i) if self.steps[i].repeat_remaining > 1 => {
                self.steps[i].repeat_remaining -= 1;
            }
            Some(i) => {
                self.steps[i].repeat_remaining = self.steps[i].repeat_count;
                self.position += self.direction;
            }
            // Boundary slots own exactly one pulse.
            None => self.position += self.direction,
        }

        self.trigger_pending = true;

        if self.reset_enabled {
            self.reset_countdown -= 1;
            if self.reset_countdown <= 0 {
                self.reset();
            }
        }

        self.resolve()
    }

    /// Settle the position onto an active step.
    ///
    /// Applies the mode's direction rule, wraps across the boundary slots
    /// and walks past inactive steps until the position is playable.
    /// Idempotent once it is. Errs instead of looping forever when every
    /// step is inactive.
    pub fn resolve(&mut self) -> Result<i32, SequencerError> {
        self.clamp_parameters();

        if !self.steps.iter().any(|s| s.active) {
            return Err(SequencerError::NoActiveStep);
        }

        loop {
            self.direction = self.mode.steer(self.position, self.direction);

            if self.mode.wraps_around() {
                if self.position == WRAP_ABOVE {
                    self.position = FIRST_STEP;
                } else if self.position == WRAP_BELOW {
                    self.position = LAST_STEP;
                }
            }

            if self.slot_is_active(self.position) {
                return Ok(self.position);
            }

            self.position += self.direction;
        }
    }

    /// Consume the pending note trigger for the resolved step.
    ///
    /// The trigger is consumed either way; silent steps take their turn
    /// without producing a note.
    pub fn take_trigger(&mut self) -> Option<u8> {
        if !self.trigger_pending {
            return None;
        }
        self.trigger_pending = false;

        let step = Self::playable_index(self.position).map(|i| self.steps[i])?;
        if !step.audible {
            return None;
        }
        Some(self.note_for_pitch(step.pitch))
    }

    /// Jump to the anchor step and rewind every counter.
    pub fn reset(&mut self) {
        self.position = self.reset_anchor;
        self.reset_countdown = self.reset_window;

        for step in &mut self.steps {
            step.repeat_remaining = step.repeat_count;
        }

        if self.mode.is_ping_pong() {
            self.direction = 1;
        }
    }

    /// Force every tunable back into range.
    ///
    /// Ranged values saturate; cyclic selectors (repeat counts, the reset
    /// anchor, the position) wrap to the opposite end instead.
    pub fn clamp_parameters(&mut self) {
        self.reset_window = self.reset_window.clamp(RESET_WINDOW_MIN, RESET_WINDOW_MAX);
        self.note_high = self.note_high.clamp(1, 127);
        self.note_low = self.note_low.clamp(0, 126);

        for step in &mut self.steps {
            step.repeat_count = wrap_repeat(step.repeat_count);
        }

        if self.reset_anchor > LAST_STEP {
            self.reset_anchor = FIRST_STEP;
        } else if self.reset_anchor < FIRST_STEP {
            self.reset_anchor = LAST_STEP;
        }

        if self.position > WRAP_ABOVE {
            self.position = FIRST_STEP;
        } else if self.position < WRAP_BELOW {
            self.position = LAST_STEP;
        }
    }

    /// Map a step's normalized pitch onto the configured note range.
    ///
    /// The stored pitch is inverted (0.0 is the highest note). The value
    /// is scaled onto the full MIDI range first and rescaled onto
    /// [note_low, note_high] second; both conversions truncate.
    pub fn note_for_pitch(&self, pitch: f32) -> u8 {
        let full = ((1.0 - pitch.clamp(0.0, 1.0)) * 127.0) as i32;
        let mapped = map_clamped(
            full as f32,
            0.0,
            127.0,
            self.note_low as f32,
            self.note_high as f32,
        );
        (mapped as i32).clamp(0, 127) as u8
    }

    // --- accessors ---

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn reset_enabled(&self) -> bool {
        self.reset_enabled
    }

    pub fn reset_anchor(&self) -> i32 {
        self.reset_anchor
    }

    pub fn reset_window(&self) -> i32 {
        self.reset_window
    }

    pub fn reset_countdown(&self) -> i32 {
        self.reset_countdown
    }

    pub fn note_low(&self) -> i32 {
        self.note_low
    }

    pub fn note_high(&self) -> i32 {
        self.note_high
    }

    /// Playable step at a slot; `None` for the boundary slots.
    pub fn step(&self, slot: i32) -> Option<&Step> {
        Self::playable_index(slot).map(|i| &self.steps[i])
    }

    // --- setters (each ends with the validation pass) ---

    pub fn set_step_pitch(&mut self, slot: i32, pitch: f32) {
        if let Some(i) = Self::playable_index(slot) {
            self.steps[i].pitch = pitch.clamp(0.0, 1.0);
        }
        self.clamp_parameters();
    }

    pub fn set_step_active(&mut self, slot: i32, active: bool) {
        if let Some(i) = Self::playable_index(slot) {
            self.steps[i].active = active;
        }
        self.clamp_parameters();
    }

    pub fn set_step_audible(&mut self, slot: i32, audible: bool) {
        if let Some(i) = Self::playable_index(slot) {
            self.steps[i].audible = audible;
        }
        self.clamp_parameters();
    }

    pub fn set_step_repeat(&mut self, slot: i32, count: i32) {
        if let Some(i) = Self::playable_index(slot) {
            self.steps[i].set_repeat_count(count);
        }
        self.clamp_parameters();
    }

    /// Changing mode restarts the traversal forward.
    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
        self.direction = 1;
        self.clamp_parameters();
    }

    pub fn set_mode_index(&mut self, index: i32) {
        self.set_mode(PlayMode::from_index(index));
    }

    /// Enabling the reset reloads its countdown.
    pub fn set_reset_enabled(&mut self, enabled: bool) {
        self.reset_enabled = enabled;
        if enabled {
            self.reset_countdown = self.reset_window;
        }
        self.clamp_parameters();
    }

    /// Setting the window reloads the countdown.
    pub fn set_reset_window(&mut self, window: i32) {
        self.reset_window = window;
        self.clamp_parameters();
        self.reset_countdown = self.reset_window;
    }

    pub fn set_reset_anchor(&mut self, anchor: i32) {
        self.reset_anchor = anchor;
        self.clamp_parameters();
    }

    /// Keeps `note_low < note_high` by pushing the other bound.
    pub fn set_note_high(&mut self, high: i32) {
        self.note_high = high;
        self.clamp_parameters();
        if self.note_low >= self.note_high {
            self.note_low = self.note_high - 1;
        }
    }

    pub fn set_note_low(&mut self, low: i32) {
        self.note_low = low;
        self.clamp_parameters();
        if self.note_low >= self.note_high {
            self.note_high = self.note_low + 1;
        }
    }

    pub fn set_position(&mut self, slot: i32) {
        self.position = slot;
        self.clamp_parameters();
    }

    // --- helpers ---

    /// Array index for a playable slot; `None` for the boundary slots.
    fn playable_index(slot: i32) -> Option<usize> {
        if (FIRST_STEP..=LAST_STEP).contains(&slot) {
            Some((slot - FIRST_STEP) as usize)
        } else {
            None
        }
    }

    fn slot_is_active(&self, slot: i32) -> bool {
        Self::playable_index(slot).is_some_and(|i| self.steps[i].active)
    }
}

impl Default for SequencerEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Linear rescale from [in_min, in_max] onto [out_min, out_max], clamping
/// the result to the output range.
fn map_clamped(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    let scaled = (value - in_min) / (in_max - in_min) * (out_max - out_min) + out_min;
    scaled.clamp(out_min, out_max)
}
