// Sequencer panel - egui front end
// Step columns on the right, transport controls on the left

use crate::config::AppConfig;
use crate::messaging::channels::CommandConsumer;
use crate::messaging::command::Command;
use crate::midi::device::{MidiPortInfo, MidiPortScanner};
use crate::midi::input::ClockInput;
use crate::midi::output::NoteOutput;
use crate::sequencer::engine::{
    FIRST_STEP, LAST_STEP, RESET_WINDOW_MAX, RESET_WINDOW_MIN, SequencerEngine, SequencerError,
};
use crate::sequencer::mode::PlayMode;
use crate::sequencer::player::NotePlayer;
use crate::sequencer::step::{REPEAT_MAX, REPEAT_MIN};
use crate::timing::PulseTimer;
use eframe::egui;
use std::time::Duration;

pub struct SequencerApp {
    engine: SequencerEngine,
    player: NotePlayer,
    blink: PulseTimer,
    command_rx: CommandConsumer,
    clock_input: ClockInput,
    note_output: NoteOutput,
    // Port management
    port_scanner: MidiPortScanner,
    available_inputs: Vec<MidiPortInfo>,
    available_outputs: Vec<MidiPortInfo>,
    selected_input: String,
    selected_output: String,
    // Settings
    note_length_ms: u64,
    config: AppConfig,
    last_error: Option<SequencerError>,
}

impl SequencerApp {
    pub fn new(
        command_rx: CommandConsumer,
        clock_input: ClockInput,
        note_output: NoteOutput,
        config: AppConfig,
    ) -> Self {
        let port_scanner = MidiPortScanner::new();
        let available_inputs = port_scanner.list_input_ports();
        let available_outputs = port_scanner.list_output_ports();

        let selected_input = clock_input.port_name().unwrap_or_default().to_string();
        let selected_output = note_output.port_name().unwrap_or_default().to_string();

        Self {
            engine: SequencerEngine::new(),
            player: NotePlayer::new(Duration::from_millis(config.note_length_ms)),
            blink: PulseTimer::new(Duration::from_millis(config.blink_ms)),
            command_rx,
            clock_input,
            note_output,
            port_scanner,
            available_inputs,
            available_outputs,
            selected_input,
            selected_output,
            note_length_ms: config.note_length_ms,
            config,
            last_error: None,
        }
    }

    fn refresh_ports(&mut self) {
        self.available_inputs = self.port_scanner.list_input_ports();
        self.available_outputs = self.port_scanner.list_output_ports();
    }

    /// One clock pulse: advance, then dispatch whatever the step implies.
    fn handle_pulse(&mut self) {
        self.blink.restart();

        match self.engine.advance() {
            Ok(_) => {
                self.last_error = None;
                for event in self.player.pulse(&mut self.engine) {
                    self.note_output.send(event);
                }
            }
            Err(e) => self.last_error = Some(e),
        }
    }

    fn drain_commands(&mut self) {
        while let Some(command) = ringbuf::traits::Consumer::try_pop(&mut self.command_rx) {
            match command {
                Command::Pulse => self.handle_pulse(),
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        // Space = manual pulse, R = manual reset
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.handle_pulse();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.engine.reset();
        }
    }

    fn draw_midi_ports(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Clock input:");
            let previous_input = self.selected_input.clone();
            egui::ComboBox::from_id_salt("midi_input_selector")
                .selected_text(&self.selected_input)
                .show_ui(ui, |ui| {
                    if self.available_inputs.is_empty() {
                        ui.label("No MIDI input available");
                    } else {
                        for port in &self.available_inputs {
                            let label = if port.is_default {
                                format!("{} (default)", port.name)
                            } else {
                                port.name.clone()
                            };
                            ui.selectable_value(&mut self.selected_input, port.name.clone(), label);
                        }
                    }
                });
            if previous_input != self.selected_input {
                let target = self.selected_input.clone();
                if self.clock_input.connect_to(&target) {
                    self.config.midi_input_port = Some(target);
                }
            }

            ui.label("Note output:");
            let previous_output = self.selected_output.clone();
            egui::ComboBox::from_id_salt("midi_output_selector")
                .selected_text(&self.selected_output)
                .show_ui(ui, |ui| {
                    if self.available_outputs.is_empty() {
                        ui.label("No MIDI output available");
                    } else {
                        for port in &self.available_outputs {
                            let label = if port.is_default {
                                format!("{} (default)", port.name)
                            } else {
                                port.name.clone()
                            };
                            ui.selectable_value(
                                &mut self.selected_output,
                                port.name.clone(),
                                label,
                            );
                        }
                    }
                });
            if previous_output != self.selected_output {
                let target = self.selected_output.clone();
                if self.note_output.connect_to(&target) {
                    self.config.midi_output_port = Some(target);
                }
            }

            ui.label("Channel:");
            let mut channel = self.note_output.channel() as i32;
            if ui
                .add(egui::DragValue::new(&mut channel).range(1..=16))
                .changed()
            {
                self.note_output.set_channel(channel as u8);
                self.config.channel = channel as u8;
            }

            if ui.button("Refresh").on_hover_text("Rescan MIDI ports").clicked() {
                self.refresh_ports();
            }
        });
    }

    fn draw_controls(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Current step: {}", self.engine.position()));
        ui.add_space(10.0);

        // Reset windowing
        ui.horizontal(|ui| {
            let mut reset_enabled = self.engine.reset_enabled();
            if ui.checkbox(&mut reset_enabled, "Reset").changed() {
                self.engine.set_reset_enabled(reset_enabled);
            }

            let countdown = format!("countdown {}", self.engine.reset_countdown());
            if self.engine.reset_enabled() {
                ui.label(countdown);
            } else {
                ui.weak(countdown);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Reset window:");
            let mut window = self.engine.reset_window();
            if ui
                .add(egui::Slider::new(
                    &mut window,
                    RESET_WINDOW_MIN..=RESET_WINDOW_MAX,
                ))
                .changed()
            {
                self.engine.set_reset_window(window);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Reset position:");
            let mut anchor = self.engine.reset_anchor();
            if ui
                .add(egui::Slider::new(&mut anchor, FIRST_STEP..=LAST_STEP))
                .changed()
            {
                self.engine.set_reset_anchor(anchor);
            }
        });

        ui.add_space(10.0);

        // Traversal mode
        ui.horizontal(|ui| {
            ui.label("Mode:");
            let previous_mode = self.engine.mode();
            let mut selected = previous_mode;
            egui::ComboBox::from_id_salt("mode_selector")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for mode in [
                        PlayMode::Forward,
                        PlayMode::Backward,
                        PlayMode::PingPong,
                        PlayMode::PingPongFixed,
                    ] {
                        ui.selectable_value(&mut selected, mode, mode.label());
                    }
                });
            if selected != previous_mode {
                self.engine.set_mode(selected);
            }
        });

        ui.add_space(10.0);

        // Note length and range
        ui.horizontal(|ui| {
            ui.label("Note length:");
            let mut length = self.note_length_ms;
            if ui
                .add(egui::Slider::new(&mut length, 0..=1000).suffix(" ms"))
                .changed()
            {
                self.note_length_ms = length;
                self.player.set_note_length(Duration::from_millis(length));
            }
        });

        ui.horizontal(|ui| {
            ui.label("Note high:");
            let mut high = self.engine.note_high();
            if ui.add(egui::Slider::new(&mut high, 1..=127)).changed() {
                self.engine.set_note_high(high);
            }
        });

        ui.horizontal(|ui| {
            ui.label("Note low:");
            let mut low = self.engine.note_low();
            if ui.add(egui::Slider::new(&mut low, 0..=126)).changed() {
                self.engine.set_note_low(low);
            }
        });
    }

    fn draw_steps(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for slot in FIRST_STEP..=LAST_STEP {
                let step = match self.engine.step(slot) {
                    Some(step) => *step,
                    None => continue,
                };
                let is_current = self.engine.position() == slot;

                ui.vertical(|ui| {
                    if step.active {
                        ui.label(format!("{}", slot));
                    } else {
                        ui.weak(format!("{}", slot));
                    }

                    // Current-step lamp, lit while the blink timer runs
                    let lamp = if is_current && step.active {
                        if self.blink.is_running() {
                            egui::Color32::WHITE
                        } else {
                            egui::Color32::GRAY
                        }
                    } else {
                        egui::Color32::from_gray(40)
                    };
                    let (rect, _) =
                        ui.allocate_exact_size(egui::vec2(44.0, 18.0), egui::Sense::hover());
                    ui.painter().circle_filled(rect.center(), 7.0, lamp);

                    // Pitch: the slider shows note height, the stored
                    // pitch is inverted (0.0 = top of the range).
                    let mut level = 1.0 - step.pitch;
                    if ui
                        .add(
                            egui::Slider::new(&mut level, 0.0..=1.0)
                                .vertical()
                                .show_value(false),
                        )
                        .changed()
                    {
                        self.engine.set_step_pitch(slot, 1.0 - level);
                    }
                    ui.label(format!("{}", self.engine.note_for_pitch(1.0 - level)));

                    let mut active = step.active;
                    if ui.toggle_value(&mut active, "On").changed() {
                        self.engine.set_step_active(slot, active);
                    }

                    let mut muted = !step.audible;
                    if ui.toggle_value(&mut muted, "Mute").changed() {
                        self.engine.set_step_audible(slot, !muted);
                    }

                    // Repeat count with its live countdown
                    let mut repeat = step.repeat_count;
                    if ui
                        .add(
                            egui::Slider::new(&mut repeat, REPEAT_MIN..=REPEAT_MAX)
                                .vertical()
                                .show_value(false),
                        )
                        .changed()
                    {
                        self.engine.set_step_repeat(slot, repeat);
                    }
                    ui.label(format!("{}/{}", step.repeat_remaining, step.repeat_count));
                });
            }
        });
    }

    fn draw_status_bar(&mut self, ui: &mut egui::Ui) {
        ui.separator();
        ui.horizontal(|ui| {
            match self.last_error {
                Some(SequencerError::NoActiveStep) => {
                    let color = egui::Color32::from_rgb(255, 165, 0);
                    ui.colored_label(color, "⚠");
                    ui.colored_label(color, "No active step - enable one to resume");
                }
                None => {
                    ui.label("Ready");
                }
            }

            if let Some(note) = self.player.held_note() {
                ui.add_space(10.0);
                ui.label(format!("Playing note {}", note));
            }
        });
    }
}

impl eframe::App for SequencerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint continuously: pulses arrive between UI events.
        ctx.request_repaint();

        self.drain_commands();
        self.handle_shortcuts(ctx);

        // Settle parameter edits between pulses.
        match self.engine.resolve() {
            Ok(_) => self.last_error = None,
            Err(e) => self.last_error = Some(e),
        }

        // Release the held note once its gate elapses.
        if let Some(event) = self.player.tick() {
            self.note_output.send(event);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("StepCycle");
            ui.separator();

            self.draw_midi_ports(ui);
            ui.add_space(10.0);
            ui.separator();

            ui.horizontal(|ui| {
                ui.vertical(|ui| self.draw_controls(ui));
                ui.separator();
                self.draw_steps(ui);
            });

            self.draw_status_bar(ui);
        });
    }
}

impl Drop for SequencerApp {
    fn drop(&mut self) {
        // Never leave a note hanging on the synth.
        if let Some(event) = self.player.all_notes_off() {
            self.note_output.send(event);
        }

        self.config.note_length_ms = self.note_length_ms;
        if let Err(e) = self.config.save() {
            eprintln!("Failed to save settings: {}", e);
        }
    }
}
