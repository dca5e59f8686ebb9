use stepcycle::config::AppConfig;
use stepcycle::messaging::channels::create_command_channel;
use stepcycle::midi::input::ClockInput;
use stepcycle::midi::output::NoteOutput;
use stepcycle::ui::app::SequencerApp;

// Ringbuffer capacity constant
// Sized for bursts of clock pulses between two UI frames: MIDI delivers
// well under 1000 messages per second and frames drain every ~16 ms.
const PULSE_RINGBUFFER_CAPACITY: usize = 512;

fn main() {
    println!("=== StepCycle ===");

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load settings ({}), using defaults", e);
            AppConfig::default()
        }
    };

    let (command_tx, command_rx) = create_command_channel(PULSE_RINGBUFFER_CAPACITY);

    println!("\nMIDI initialisation...");
    let clock_input = ClockInput::new(command_tx, config.midi_input_port.as_deref());
    let note_output = NoteOutput::new(config.midi_output_port.as_deref(), config.channel);

    println!("\nSequencer ready. Space = manual pulse, R = reset.\n");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([980.0, 560.0])
            .with_title("StepCycle"),
        ..Default::default()
    };

    let _ = eframe::run_native(
        "StepCycle",
        native_options,
        Box::new(|_cc| {
            Ok(Box::new(SequencerApp::new(
                command_rx,
                clock_input,
                note_output,
                config,
            )))
        }),
    );
}
