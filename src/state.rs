//! UI-side playback state mutated by dispatch and engine feedback.

use std::collections::BTreeMap;

use crate::selection::Selection;
use crate::Config;

/// Peak pair of one recorded chunk.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChunkPeak {
    pub min: f32,
    pub max: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaveState {
    pub selection: Selection,
    /// Selection highlight; mirrors the filter knob.
    pub selection_alpha: f32,
    pub looping: bool,
    chunks: Vec<ChunkPeak>,
    /// Active grain voices, synth id -> chunk the cursor sits on.
    cursors: BTreeMap<u32, usize>,
}

impl WaveState {
    pub fn new(num_chunks: usize) -> Self {
        Self {
            selection: Selection::new(num_chunks),
            selection_alpha: 0.5,
            looping: false,
            chunks: vec![ChunkPeak::default(); num_chunks],
            cursors: BTreeMap::new(),
        }
    }

    pub fn chunks(&self) -> &[ChunkPeak] {
        &self.chunks
    }

    /// Out-of-range indices are ignored.
    pub fn set_chunk(&mut self, index: usize, min: f32, max: f32) {
        if let Some(chunk) = self.chunks.get_mut(index) {
            *chunk = ChunkPeak { min, max };
        }
    }

    /// Clear recorded chunks; the selection is kept.
    pub fn reset_chunks(&mut self) {
        self.chunks.fill(ChunkPeak::default());
    }

    pub fn cursors(&self) -> &BTreeMap<u32, usize> {
        &self.cursors
    }

    /// Place (or move) a voice cursor at the selection start.
    pub fn set_cursor(&mut self, synth_id: u32) {
        self.cursors.insert(synth_id, self.selection.start());
    }

    pub fn remove_cursor(&mut self, synth_id: u32) {
        self.cursors.remove(&synth_id);
    }
}

/// State for every wave.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    waves: Vec<WaveState>,
}

impl PlaybackState {
    pub fn new(config: &Config) -> Self {
        Self {
            waves: (0..config.num_waves)
                .map(|_| WaveState::new(config.num_chunks))
                .collect(),
        }
    }

    pub fn wave(&self, index: usize) -> Option<&WaveState> {
        self.waves.get(index)
    }

    pub fn wave_mut(&mut self, index: usize) -> Option<&mut WaveState> {
        self.waves.get_mut(index)
    }

    pub fn waves(&self) -> &[WaveState] {
        &self.waves
    }

    pub fn num_waves(&self) -> usize {
        self.waves.len()
    }
}
