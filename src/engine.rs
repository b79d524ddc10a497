//! Boundary to the granular playback engine.
//!
//! Dispatch produces [`ControlAction`]s; the engine applies them without
//! interpreting any MIDI semantics.

/// One already-transformed parameter update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    NoteOn { key: u8 },
    NoteOff { key: u8 },
    Record,
    /// Explicit loop state, never a toggle.
    Loop(bool),
    SelectionStart { chunk: usize },
    SelectionSize { chunks: usize },
    GrainDuration { coeff: f64 },
    FilterCutoff { hz: f64 },
    Gain { multiplier: f64 },
}

/// The playback engine as seen from the control pipeline.
///
/// Actions are applied in batch order; applying the same action twice must
/// leave the engine in the same state as applying it once (except for
/// `Record` and note events, which are triggers).
pub trait PlaybackEngine {
    fn apply(&mut self, wave: usize, action: ControlAction);
}

impl<E: PlaybackEngine + ?Sized> PlaybackEngine for Box<E> {
    fn apply(&mut self, wave: usize, action: ControlAction) {
        (**self).apply(wave, action)
    }
}

/// Engine that only records what it was asked to do.
///
/// Useful headless and in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingEngine {
    applied: Vec<(usize, ControlAction)>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> &[(usize, ControlAction)] {
        &self.applied
    }

    /// Actions only, for single-wave assertions.
    pub fn actions(&self) -> Vec<ControlAction> {
        self.applied.iter().map(|(_, action)| *action).collect()
    }

    pub fn last(&self) -> Option<ControlAction> {
        self.applied.last().map(|(_, action)| *action)
    }

    pub fn clear(&mut self) {
        self.applied.clear();
    }
}

impl PlaybackEngine for RecordingEngine {
    fn apply(&mut self, wave: usize, action: ControlAction) {
        self.applied.push((wave, action));
    }
}
