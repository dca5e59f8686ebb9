// StepCycle - library exports for tests and the binary

pub mod config;
pub mod messaging;
pub mod midi;
pub mod sequencer;
pub mod timing;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use messaging::channels::{CommandConsumer, CommandProducer, create_command_channel};
pub use messaging::command::Command;
pub use midi::event::MidiEvent;
pub use sequencer::{
    FIRST_STEP, LAST_STEP, NotePlayer, PlayMode, STEP_COUNT, SequencerEngine, SequencerError, Step,
    WRAP_ABOVE, WRAP_BELOW,
};
pub use timing::PulseTimer;
