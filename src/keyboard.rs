//! Keyboard shortcuts for the control panel.
//!
//! Keys act on the same wave as MIDI and go through
//! [`Dispatcher::apply_key`](crate::Dispatcher::apply_key).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    /// `r`
    Record,
    /// `w`
    GrowSelection,
    /// `s`
    ShrinkSelection,
    /// `d`
    MoveSelectionForward,
    /// `a`
    MoveSelectionBack,
    /// space
    ToggleLoop,
    /// `9`
    DecreaseGrainDuration,
    /// `0`
    IncreaseGrainDuration,
}

impl KeyCommand {
    /// Map a typed character to its command. Letters are case-insensitive.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Self::Record),
            'w' => Some(Self::GrowSelection),
            's' => Some(Self::ShrinkSelection),
            'd' => Some(Self::MoveSelectionForward),
            'a' => Some(Self::MoveSelectionBack),
            ' ' => Some(Self::ToggleLoop),
            '9' => Some(Self::DecreaseGrainDuration),
            '0' => Some(Self::IncreaseGrainDuration),
            _ => None,
        }
    }
}
