//! Engine -> UI feedback.
//!
//! The engine reports recording progress and grain cursor positions from its
//! own thread. Each wave gets a pair of [`SwapChannel`]s; the update loop
//! drains them into [`PlaybackState`] once per frame.

use std::sync::Arc;

use grainctl_midi::SwapChannel;
use tracing::trace;

use crate::state::PlaybackState;
use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordWaveMsg {
    /// A new recording started; previous chunk peaks are stale.
    Start,
    Chunk { index: usize, min: f32, max: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTriggerMsg {
    Start { synth_id: u32 },
    Update { synth_id: u32 },
    End { synth_id: u32 },
}

#[derive(Debug)]
struct WaveFeedback {
    record: Arc<SwapChannel<RecordWaveMsg>>,
    cursor: Arc<SwapChannel<CursorTriggerMsg>>,
}

/// Per-wave feedback channels.
#[derive(Debug)]
pub struct EngineFeedback {
    waves: Vec<WaveFeedback>,
    record_batch: Vec<RecordWaveMsg>,
    cursor_batch: Vec<CursorTriggerMsg>,
}

impl EngineFeedback {
    pub fn new(config: &Config) -> Self {
        let capacity = config.cursor_trigger_buffer_size;
        Self {
            waves: (0..config.num_waves)
                .map(|_| WaveFeedback {
                    record: Arc::new(SwapChannel::with_capacity(config.num_chunks)),
                    cursor: Arc::new(SwapChannel::with_capacity(capacity)),
                })
                .collect(),
            record_batch: Vec::with_capacity(config.num_chunks),
            cursor_batch: Vec::with_capacity(capacity),
        }
    }

    /// Producer side for the engine's recorder on `wave`.
    pub fn record_producer(&self, wave: usize) -> Option<Arc<SwapChannel<RecordWaveMsg>>> {
        self.waves.get(wave).map(|w| Arc::clone(&w.record))
    }

    /// Producer side for the engine's grain voices on `wave`.
    pub fn cursor_producer(&self, wave: usize) -> Option<Arc<SwapChannel<CursorTriggerMsg>>> {
        self.waves.get(wave).map(|w| Arc::clone(&w.cursor))
    }

    /// Apply everything published since the last call. Returns the number of
    /// messages applied.
    pub fn drain_into(&mut self, state: &mut PlaybackState) -> usize {
        let mut applied = 0;
        for (index, feedback) in self.waves.iter().enumerate() {
            feedback.record.drain_into(&mut self.record_batch);
            feedback.cursor.drain_into(&mut self.cursor_batch);
            applied += self.record_batch.len() + self.cursor_batch.len();

            let Some(wave) = state.wave_mut(index) else {
                trace!("feedback for unknown wave {} dropped", index);
                continue;
            };

            for msg in &self.record_batch {
                match *msg {
                    RecordWaveMsg::Start => wave.reset_chunks(),
                    RecordWaveMsg::Chunk { index, min, max } => wave.set_chunk(index, min, max),
                }
            }
            for msg in &self.cursor_batch {
                match *msg {
                    CursorTriggerMsg::Start { synth_id } | CursorTriggerMsg::Update { synth_id } => {
                        wave.set_cursor(synth_id)
                    }
                    CursorTriggerMsg::End { synth_id } => wave.remove_cursor(synth_id),
                }
            }
        }
        applied
    }
}
