// Sequencer module
// The step-cycle state machine and the note dispatch built on top of it

pub mod engine;
pub mod mode;
pub mod player;
pub mod step;

pub use engine::{
    FIRST_STEP, LAST_STEP, RESET_WINDOW_MAX, RESET_WINDOW_MIN, SequencerEngine, SequencerError,
    WRAP_ABOVE, WRAP_BELOW,
};
pub use mode::PlayMode;
pub use player::{NOTE_VELOCITY, NotePlayer};
pub use step::{REPEAT_MAX, REPEAT_MIN, STEP_COUNT, Step};
