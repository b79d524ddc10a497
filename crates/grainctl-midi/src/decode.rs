//! Raw voice message -> [`ControlEvent`].
//!
//! ```text
//! Voice Message     Status   Data Byte 1         Data Byte 2
//! Note off          8x       Key number          Note off velocity
//! Note on           9x       Key number          Note on velocity
//! Control Change    Bx       Controller number   Controller value
//! ```
//!
//! Everything else (poly/channel pressure, program change, pitch bend,
//! system messages) decodes to `None` and is dropped.

use crate::controller::{ControllerMap, DEFAULT_CONTROLLER_MAP};
use crate::event::{ControlEvent, ControlKind};

pub const VOICE_NOTE_OFF: u8 = 0x8;
pub const VOICE_NOTE_ON: u8 = 0x9;
pub const VOICE_CONTROL_CHANGE: u8 = 0xB;

/// Full-scale 7-bit controller value.
pub const CC_MAX: f32 = 127.0;

/// Stateless decoder bound to a controller table.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    map: ControllerMap,
}

impl Decoder {
    pub const fn new(map: ControllerMap) -> Self {
        Self { map }
    }

    pub fn controller_map(&self) -> &ControllerMap {
        &self.map
    }

    pub fn decode(&self, raw: [u8; 3]) -> Option<ControlEvent> {
        let [status, data1, data2] = raw;
        let voice = status >> 4;

        match voice {
            VOICE_NOTE_ON => {
                // velocity 0 is the running-status alias for note off
                if data2 != 0 {
                    Some(ControlEvent::note_on(data1))
                } else {
                    Some(ControlEvent::note_off(data1))
                }
            }
            VOICE_NOTE_OFF => Some(ControlEvent::note_off(data1)),
            VOICE_CONTROL_CHANGE => {
                let kind = self.map.lookup(data1)?;
                if kind.is_continuous() {
                    Some(ControlEvent::new(kind, data2 as f32 / CC_MAX))
                } else {
                    Some(ControlEvent::trigger(kind))
                }
            }
            _ => None,
        }
    }

    /// Decode a message as delivered by a driver callback.
    ///
    /// Only complete three-byte channel voice messages are considered.
    pub fn decode_message(&self, message: &[u8]) -> Option<ControlEvent> {
        self.decode(voice_bytes(message)?)
    }
}

/// Decode with the default panel layout.
pub fn decode(raw: [u8; 3]) -> Option<ControlEvent> {
    Decoder::new(DEFAULT_CONTROLLER_MAP).decode(raw)
}

/// Extract a three-byte channel voice message, rejecting other lengths and
/// system messages.
pub fn voice_bytes(message: &[u8]) -> Option<[u8; 3]> {
    match *message {
        [status, data1, data2] if status & 0x80 != 0 && status < 0xF0 => {
            Some([status, data1, data2])
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_note_on() {
        let event = decode([0x90, 60, 100]).unwrap();
        assert_eq!(event.kind(), ControlKind::NoteOn);
        assert_eq!(event.value(), 60.0);
    }

    #[test]
    fn test_note_on_velocity_zero_is_note_off() {
        let event = decode([0x93, 64, 0]).unwrap();
        assert_eq!(event.kind(), ControlKind::NoteOff);
        assert_eq!(event.key(), Some(64));
    }

    #[test]
    fn test_note_off_ignores_velocity() {
        let event = decode([0x80, 61, 90]).unwrap();
        assert_eq!(event.kind(), ControlKind::NoteOff);
        assert_eq!(event.value(), 61.0);
    }

    #[test]
    fn test_channel_is_ignored() {
        assert_eq!(decode([0xB0, 57, 64]), decode([0xBF, 57, 64]));
    }

    #[test]
    fn test_every_mapped_controller_and_value() {
        let expected = [
            (52, ControlKind::Record),
            (53, ControlKind::LoopToggle),
            (54, ControlKind::SelectionSize),
            (55, ControlKind::FilterFreq),
            (56, ControlKind::Duration),
            (57, ControlKind::Gain),
            (58, ControlKind::SelectionStart),
        ];
        for (cc, kind) in expected {
            for value in 0..=127u8 {
                let event = decode([0xB0, cc, value]).unwrap();
                assert_eq!(event.kind(), kind);
                let want = if kind.is_continuous() {
                    value as f32 / 127.0
                } else {
                    0.0
                };
                assert_eq!(event.value(), want, "cc {cc} value {value}");
            }
        }
    }

    #[test]
    fn test_normalization_endpoints() {
        for cc in 54..=58 {
            assert_eq!(decode([0xB0, cc, 0]).unwrap().value(), 0.0);
            assert_eq!(decode([0xB0, cc, 127]).unwrap().value(), 1.0);
        }
    }

    #[test]
    fn test_other_voices_dropped() {
        assert_eq!(decode([0xA0, 60, 10]), None); // poly pressure
        assert_eq!(decode([0xC0, 5, 0]), None); // program change
        assert_eq!(decode([0xD0, 40, 0]), None); // channel pressure
        assert_eq!(decode([0xE0, 0, 64]), None); // pitch bend
        assert_eq!(decode([0xF8, 0, 0]), None); // clock
    }

    #[test]
    fn test_voice_bytes_framing() {
        assert_eq!(voice_bytes(&[0x90, 60, 100]), Some([0x90, 60, 100]));
        assert_eq!(voice_bytes(&[0xC0, 5]), None);
        assert_eq!(voice_bytes(&[0xF0, 1, 2]), None);
        assert_eq!(voice_bytes(&[0x40, 1, 2]), None);
        assert_eq!(voice_bytes(&[0x90, 60, 100, 0]), None);
        assert_eq!(voice_bytes(&[]), None);
    }

    #[test]
    fn test_decode_message() {
        let decoder = Decoder::default();
        assert_eq!(
            decoder.decode_message(&[0xB0, 52, 127]),
            Some(ControlEvent::trigger(ControlKind::Record))
        );
        assert_eq!(decoder.decode_message(&[0xB0, 52]), None);
    }

    proptest! {
        #[test]
        fn prop_velocity_zero_aliases_note_off(key in 0u8..128, velocity in 0u8..128, channel in 0u8..16) {
            let alias = decode([0x90 | channel, key, 0]).unwrap();
            let off = decode([0x80 | channel, key, velocity]).unwrap();
            prop_assert_eq!(alias, off);
            prop_assert_eq!(off, ControlEvent::note_off(key));
        }

        #[test]
        fn prop_nonzero_velocity_is_note_on(key in 0u8..128, velocity in 1u8..128) {
            prop_assert_eq!(decode([0x90, key, velocity]), Some(ControlEvent::note_on(key)));
        }

        #[test]
        fn prop_unmapped_controllers_dropped(cc in 0u8..128, value in 0u8..128) {
            prop_assume!(!(52..=58).contains(&cc));
            prop_assert_eq!(decode([0xB0, cc, value]), None);
        }

        #[test]
        fn prop_continuous_values_in_unit_range(cc in 54u8..=58, value in 0u8..128) {
            let v = decode([0xB0, cc, value]).unwrap().value();
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }
}
