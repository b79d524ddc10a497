//! Controller-number table for the control surface.
//!
//! The table is compiled in and never mutated. The default layout matches the
//! hardware panel: CC 52-58 drive the recorder, looper, selection, filter,
//! grain duration and gain.

use crate::event::ControlKind;

/// MIDI CC number (0-127)
pub type CCNumber = u8;

/// Read-only association of CC numbers to control kinds.
#[derive(Debug, Clone, Copy)]
pub struct ControllerMap {
    entries: &'static [(CCNumber, ControlKind)],
}

/// Panel layout: CC 52 through 58.
pub const DEFAULT_CONTROLLER_MAP: ControllerMap = ControllerMap::new(&[
    (52, ControlKind::Record),
    (53, ControlKind::LoopToggle),
    (54, ControlKind::SelectionSize),
    (55, ControlKind::FilterFreq),
    (56, ControlKind::Duration),
    (57, ControlKind::Gain),
    (58, ControlKind::SelectionStart),
]);

impl ControllerMap {
    pub const fn new(entries: &'static [(CCNumber, ControlKind)]) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn lookup(&self, cc_number: CCNumber) -> Option<ControlKind> {
        self.entries
            .iter()
            .find(|(cc, _)| *cc == cc_number)
            .map(|(_, kind)| *kind)
    }

    /// CC number bound to `kind`, if any.
    pub fn cc_for(&self, kind: ControlKind) -> Option<CCNumber> {
        self.entries
            .iter()
            .find(|(_, k)| *k == kind)
            .map(|(cc, _)| *cc)
    }

    pub fn entries(&self) -> &'static [(CCNumber, ControlKind)] {
        self.entries
    }
}

impl Default for ControllerMap {
    fn default() -> Self {
        DEFAULT_CONTROLLER_MAP
    }
}
