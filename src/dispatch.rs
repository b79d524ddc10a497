//! Dispatch Mapper
//!
//! Turns drained control events into engine actions, applying the parameter
//! curves and keeping the visual mirrors (particle spread, selection alpha)
//! in step with their audio parameters.
//!
//! Events are applied in drained order with no coalescing, so the last event
//! of a kind in a batch wins.

use grainctl_midi::{ControlEvent, ControlKind};
use tracing::warn;

use crate::curve;
use crate::engine::ControlAction;
use crate::keyboard::KeyCommand;
use crate::state::{PlaybackState, WaveState};
use crate::Config;

#[derive(Debug, Clone)]
pub struct Dispatcher {
    wave: usize,
    num_chunks: usize,
    max_selection_num_chunks: usize,
    max_grain_duration_coeff: f64,
    min_filter_cutoff_freq: f64,
    max_filter_cutoff_freq: f64,
}

impl Dispatcher {
    pub fn new(config: &Config) -> Self {
        Self {
            wave: config.midi_wave,
            num_chunks: config.num_chunks,
            max_selection_num_chunks: config.max_selection_num_chunks,
            max_grain_duration_coeff: config.max_grain_duration_coeff,
            min_filter_cutoff_freq: config.min_filter_cutoff_freq,
            max_filter_cutoff_freq: config.max_filter_cutoff_freq,
        }
    }

    /// Wave the dispatched actions target.
    pub fn wave(&self) -> usize {
        self.wave
    }

    pub fn dispatch(&self, events: &[ControlEvent], state: &mut PlaybackState) -> Vec<ControlAction> {
        let mut actions = Vec::with_capacity(events.len());
        self.dispatch_into(events, state, &mut actions);
        actions
    }

    /// Append the actions for `events` to `actions`.
    pub fn dispatch_into(
        &self,
        events: &[ControlEvent],
        state: &mut PlaybackState,
        actions: &mut Vec<ControlAction>,
    ) {
        let Some(wave) = self.target(state) else {
            return;
        };
        for event in events {
            self.dispatch_event(event, wave, actions);
        }
    }

    fn target<'a>(&self, state: &'a mut PlaybackState) -> Option<&'a mut WaveState> {
        let num_waves = state.num_waves();
        let wave = state.wave_mut(self.wave);
        if wave.is_none() {
            warn!(
                "control target wave {} missing ({} waves), dropping batch",
                self.wave, num_waves
            );
        }
        wave
    }

    fn dispatch_event(
        &self,
        event: &ControlEvent,
        wave: &mut WaveState,
        actions: &mut Vec<ControlAction>,
    ) {
        let value = event.value();
        match event.kind() {
            ControlKind::NoteOn => actions.push(ControlAction::NoteOn { key: value as u8 }),
            ControlKind::NoteOff => actions.push(ControlAction::NoteOff { key: value as u8 }),
            ControlKind::Record => actions.push(ControlAction::Record),
            ControlKind::LoopToggle => toggle_loop(wave, actions),
            ControlKind::SelectionStart => {
                let chunk = curve::chunk_index(value, self.num_chunks);
                move_start(wave, chunk, actions);
            }
            ControlKind::SelectionSize => {
                let chunks = curve::selection_chunks(value, self.max_selection_num_chunks);
                wave.selection.set_size(chunks);
                actions.push(ControlAction::SelectionSize {
                    chunks: wave.selection.size(),
                });
            }
            ControlKind::Duration => {
                let coeff = curve::grain_duration_coeff(value, self.max_grain_duration_coeff);
                set_grain_duration(wave, coeff, actions);
            }
            ControlKind::FilterFreq => {
                let hz = curve::filter_cutoff(
                    value,
                    self.min_filter_cutoff_freq,
                    self.max_filter_cutoff_freq,
                );
                actions.push(ControlAction::FilterCutoff { hz });
                wave.selection_alpha = value;
            }
            ControlKind::Gain => actions.push(ControlAction::Gain {
                multiplier: curve::gain_multiplier(value),
            }),
        }
    }

    /// Apply a keyboard command with the same state coupling as MIDI.
    pub fn apply_key(&self, command: KeyCommand, state: &mut PlaybackState) -> Vec<ControlAction> {
        let mut actions = Vec::new();
        let Some(wave) = self.target(state) else {
            return actions;
        };

        match command {
            KeyCommand::Record => actions.push(ControlAction::Record),
            KeyCommand::ToggleLoop => toggle_loop(wave, &mut actions),
            KeyCommand::GrowSelection => {
                wave.selection.set_size(wave.selection.size() + 1);
                actions.push(ControlAction::SelectionSize {
                    chunks: wave.selection.size(),
                });
            }
            KeyCommand::ShrinkSelection => {
                wave.selection.set_size(wave.selection.size().saturating_sub(1));
                actions.push(ControlAction::SelectionSize {
                    chunks: wave.selection.size(),
                });
            }
            KeyCommand::MoveSelectionForward => {
                let chunk = wave.selection.start() + 1;
                move_start(wave, chunk, &mut actions);
            }
            KeyCommand::MoveSelectionBack => {
                if let Some(chunk) = wave.selection.start().checked_sub(1) {
                    move_start(wave, chunk, &mut actions);
                }
            }
            KeyCommand::DecreaseGrainDuration => {
                let coeff = wave.selection.particle_spread().round();
                if coeff > 1.0 {
                    set_grain_duration(wave, coeff - 1.0, &mut actions);
                }
            }
            KeyCommand::IncreaseGrainDuration => {
                let coeff = wave.selection.particle_spread().round();
                if coeff < self.max_grain_duration_coeff {
                    set_grain_duration(wave, coeff + 1.0, &mut actions);
                }
            }
        }
        actions
    }
}

/// The decoded event carries no payload, so the flag lives here and the
/// engine receives the resulting state.
fn toggle_loop(wave: &mut WaveState, actions: &mut Vec<ControlAction>) {
    wave.looping = !wave.looping;
    actions.push(ControlAction::Loop(wave.looping));
}

fn move_start(wave: &mut WaveState, chunk: usize, actions: &mut Vec<ControlAction>) {
    let size_before = wave.selection.size();
    wave.selection.set_start(chunk);
    actions.push(ControlAction::SelectionStart {
        chunk: wave.selection.start(),
    });

    let size = wave.selection.size();
    if size != size_before {
        actions.push(ControlAction::SelectionSize { chunks: size });
    }
}

fn set_grain_duration(wave: &mut WaveState, coeff: f64, actions: &mut Vec<ControlAction>) {
    actions.push(ControlAction::GrainDuration { coeff });
    wave.selection.set_particle_spread(coeff);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup(config: Config) -> (Dispatcher, PlaybackState) {
        (Dispatcher::new(&config), PlaybackState::new(&config))
    }

    fn cc(kind: ControlKind, value: f32) -> ControlEvent {
        ControlEvent::new(kind, value)
    }

    #[test]
    fn test_notes() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions = dispatcher.dispatch(
            &[ControlEvent::note_on(60), ControlEvent::note_off(60)],
            &mut state,
        );
        assert_eq!(
            actions,
            vec![
                ControlAction::NoteOn { key: 60 },
                ControlAction::NoteOff { key: 60 }
            ]
        );
    }

    #[test]
    fn test_record_is_a_trigger() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions =
            dispatcher.dispatch(&[ControlEvent::trigger(ControlKind::Record)], &mut state);
        assert_eq!(actions, vec![ControlAction::Record]);
    }

    #[test]
    fn test_loop_toggle_emits_explicit_state() {
        let (dispatcher, mut state) = setup(Config::default());
        let toggle = ControlEvent::trigger(ControlKind::LoopToggle);

        let actions = dispatcher.dispatch(&[toggle, toggle, toggle], &mut state);
        assert_eq!(
            actions,
            vec![
                ControlAction::Loop(true),
                ControlAction::Loop(false),
                ControlAction::Loop(true)
            ]
        );
        assert!(state.wave(0).unwrap().looping);
    }

    #[test]
    fn test_selection_size_floor_and_ceiling() {
        let config = Config {
            max_selection_num_chunks: 150,
            ..Config::default()
        };
        let (dispatcher, mut state) = setup(config);

        let actions = dispatcher.dispatch(&[cc(ControlKind::SelectionSize, 0.0)], &mut state);
        assert_eq!(actions, vec![ControlAction::SelectionSize { chunks: 1 }]);

        let actions = dispatcher.dispatch(&[cc(ControlKind::SelectionSize, 1.0)], &mut state);
        assert_eq!(actions, vec![ControlAction::SelectionSize { chunks: 150 }]);
    }

    #[test]
    fn test_selection_start_without_size_change() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions = dispatcher.dispatch(&[cc(ControlKind::SelectionStart, 0.5)], &mut state);
        assert_eq!(actions, vec![ControlAction::SelectionStart { chunk: 75 }]);
    }

    #[test]
    fn test_selection_start_reemits_clamped_size() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions = dispatcher.dispatch(
            &[
                cc(ControlKind::SelectionSize, 1.0),
                cc(ControlKind::SelectionStart, 1.0),
            ],
            &mut state,
        );
        assert_eq!(
            actions,
            vec![
                ControlAction::SelectionSize { chunks: 37 },
                ControlAction::SelectionStart { chunk: 149 },
                ControlAction::SelectionSize { chunks: 1 },
            ]
        );
    }

    #[test]
    fn test_duration_keeps_particle_spread_in_step() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions = dispatcher.dispatch(&[cc(ControlKind::Duration, 1.0)], &mut state);
        assert_eq!(actions, vec![ControlAction::GrainDuration { coeff: 8.0 }]);
        assert_eq!(state.wave(0).unwrap().selection.particle_spread(), 8.0);
    }

    #[test]
    fn test_filter_cutoff_and_alpha() {
        let config = Config {
            min_filter_cutoff_freq: 20.0,
            max_filter_cutoff_freq: 4000.0,
            ..Config::default()
        };
        let (dispatcher, mut state) = setup(config);
        let actions = dispatcher.dispatch(&[cc(ControlKind::FilterFreq, 0.5)], &mut state);

        match actions.as_slice() {
            [ControlAction::FilterCutoff { hz }] => assert_relative_eq!(*hz, 89.4427, epsilon = 1e-3),
            other => panic!("unexpected actions {:?}", other),
        }
        assert_eq!(state.wave(0).unwrap().selection_alpha, 0.5);
    }

    #[test]
    fn test_gain_range() {
        let (dispatcher, mut state) = setup(Config::default());
        let actions = dispatcher.dispatch(
            &[cc(ControlKind::Gain, 0.0), cc(ControlKind::Gain, 1.0)],
            &mut state,
        );
        assert_eq!(
            actions,
            vec![
                ControlAction::Gain { multiplier: 0.25 },
                ControlAction::Gain { multiplier: 4.0 }
            ]
        );
    }

    #[test]
    fn test_last_event_of_kind_wins() {
        let (dispatcher, mut state) = setup(Config::default());
        dispatcher.dispatch(
            &[
                cc(ControlKind::FilterFreq, 0.1),
                cc(ControlKind::FilterFreq, 0.9),
            ],
            &mut state,
        );
        assert_eq!(state.wave(0).unwrap().selection_alpha, 0.9);
    }

    #[test]
    fn test_targets_configured_wave_only() {
        let config = Config {
            midi_wave: 1,
            ..Config::default()
        };
        let (dispatcher, mut state) = setup(config);
        dispatcher.dispatch(&[cc(ControlKind::SelectionStart, 1.0)], &mut state);
        assert_eq!(state.wave(0).unwrap().selection.start(), 0);
        assert_eq!(state.wave(1).unwrap().selection.start(), 149);
        assert_eq!(dispatcher.wave(), 1);
    }

    #[test]
    fn test_missing_wave_drops_batch() {
        let dispatcher = Dispatcher::new(&Config {
            midi_wave: 1,
            ..Config::default()
        });
        let mut state = PlaybackState::new(&Config {
            num_waves: 1,
            ..Config::default()
        });
        let actions = dispatcher.dispatch(&[ControlEvent::note_on(1)], &mut state);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_keyboard_selection_moves() {
        let (dispatcher, mut state) = setup(Config::default());

        assert!(dispatcher
            .apply_key(KeyCommand::MoveSelectionBack, &mut state)
            .is_empty());
        assert_eq!(
            dispatcher.apply_key(KeyCommand::MoveSelectionForward, &mut state),
            vec![ControlAction::SelectionStart { chunk: 1 }]
        );
        assert_eq!(
            dispatcher.apply_key(KeyCommand::GrowSelection, &mut state),
            vec![ControlAction::SelectionSize { chunks: 2 }]
        );
        assert_eq!(
            dispatcher.apply_key(KeyCommand::ShrinkSelection, &mut state),
            vec![ControlAction::SelectionSize { chunks: 1 }]
        );
        assert_eq!(
            dispatcher.apply_key(KeyCommand::ShrinkSelection, &mut state),
            vec![ControlAction::SelectionSize { chunks: 1 }]
        );
        assert_eq!(
            dispatcher.apply_key(KeyCommand::MoveSelectionBack, &mut state),
            vec![ControlAction::SelectionStart { chunk: 0 }]
        );
    }

    #[test]
    fn test_keyboard_grain_duration_bounds() {
        let (dispatcher, mut state) = setup(Config::default());

        assert!(dispatcher
            .apply_key(KeyCommand::DecreaseGrainDuration, &mut state)
            .is_empty());
        assert_eq!(
            dispatcher.apply_key(KeyCommand::IncreaseGrainDuration, &mut state),
            vec![ControlAction::GrainDuration { coeff: 2.0 }]
        );

        for _ in 0..20 {
            dispatcher.apply_key(KeyCommand::IncreaseGrainDuration, &mut state);
        }
        assert_eq!(state.wave(0).unwrap().selection.particle_spread(), 8.0);
        assert!(dispatcher
            .apply_key(KeyCommand::IncreaseGrainDuration, &mut state)
            .is_empty());
    }

    #[test]
    fn test_keyboard_loop_shares_midi_flag() {
        let (dispatcher, mut state) = setup(Config::default());
        dispatcher.dispatch(&[ControlEvent::trigger(ControlKind::LoopToggle)], &mut state);
        assert_eq!(
            dispatcher.apply_key(KeyCommand::ToggleLoop, &mut state),
            vec![ControlAction::Loop(false)]
        );
    }
}
