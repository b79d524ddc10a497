//! Control events decoded from hardware MIDI input.

use serde::{Deserialize, Serialize};

/// What a control event asks the playback engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKind {
    NoteOn,
    NoteOff,
    Record,
    LoopToggle,
    SelectionSize,
    FilterFreq,
    Duration,
    Gain,
    SelectionStart,
}

impl ControlKind {
    /// Kinds whose payload is a controller value normalized to `[0, 1]`.
    #[inline]
    pub fn is_continuous(self) -> bool {
        matches!(
            self,
            ControlKind::SelectionSize
                | ControlKind::FilterFreq
                | ControlKind::Duration
                | ControlKind::Gain
                | ControlKind::SelectionStart
        )
    }

    /// Note kinds carry the key number instead of a normalized value.
    #[inline]
    pub fn is_note(self) -> bool {
        matches!(self, ControlKind::NoteOn | ControlKind::NoteOff)
    }
}

/// A single decoded control event.
///
/// Immutable once produced. The meaning of `value` depends on `kind`:
/// - `NoteOn` / `NoteOff`: the key number (0-127), not the velocity
/// - `Record` / `LoopToggle`: always 0
/// - everything else: controller value normalized to `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlEvent {
    kind: ControlKind,
    value: f32,
}

impl ControlEvent {
    pub const fn new(kind: ControlKind, value: f32) -> Self {
        Self { kind, value }
    }

    /// Event with no payload.
    pub const fn trigger(kind: ControlKind) -> Self {
        Self { kind, value: 0.0 }
    }

    pub fn note_on(key: u8) -> Self {
        Self::new(ControlKind::NoteOn, key as f32)
    }

    pub fn note_off(key: u8) -> Self {
        Self::new(ControlKind::NoteOff, key as f32)
    }

    #[inline]
    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Key number for note events.
    pub fn key(&self) -> Option<u8> {
        if self.kind.is_note() {
            Some(self.value as u8)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_events_carry_key() {
        let on = ControlEvent::note_on(60);
        assert_eq!(on.kind(), ControlKind::NoteOn);
        assert_eq!(on.value(), 60.0);
        assert_eq!(on.key(), Some(60));

        let off = ControlEvent::note_off(127);
        assert_eq!(off.key(), Some(127));
    }

    #[test]
    fn test_trigger_has_zero_payload() {
        let record = ControlEvent::trigger(ControlKind::Record);
        assert_eq!(record.value(), 0.0);
        assert_eq!(record.key(), None);
    }

    #[test]
    fn test_kind_classification() {
        assert!(ControlKind::Gain.is_continuous());
        assert!(ControlKind::SelectionStart.is_continuous());
        assert!(!ControlKind::Record.is_continuous());
        assert!(!ControlKind::LoopToggle.is_continuous());
        assert!(ControlKind::NoteOff.is_note());
        assert!(!ControlKind::FilterFreq.is_note());
    }
}
