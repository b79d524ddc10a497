//! Runtime configuration.
//!
//! Values match the installation the control panel was built for. Loading
//! from disk is left to the host application; anything that deserializes
//! with serde works, and missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::curve::FILTER_CURVE_PIVOT_HZ;
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Chunks per recorded wave.
    pub num_chunks: usize,
    pub wave_len_seconds: f64,
    /// Upper bound for the selection-size knob.
    pub max_selection_num_chunks: usize,
    pub max_grain_duration_coeff: f64,
    pub min_filter_cutoff_freq: f64,
    pub max_filter_cutoff_freq: f64,
    pub num_waves: usize,
    /// Wave that MIDI and keyboard controls act on.
    pub midi_wave: usize,
    /// Initial capacity of the engine feedback buffers.
    pub cursor_trigger_buffer_size: usize,
    pub midi_client_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_chunks: 150,
            wave_len_seconds: 2.0,
            max_selection_num_chunks: 37,
            max_grain_duration_coeff: 8.0,
            min_filter_cutoff_freq: 200.0,
            max_filter_cutoff_freq: 22050.0,
            num_waves: 2,
            midi_wave: 0,
            cursor_trigger_buffer_size: 512,
            midi_client_name: "grainctl input".to_string(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.num_chunks == 0 {
            return Err(invalid("num_chunks must be at least 1"));
        }
        if self.max_selection_num_chunks == 0 || self.max_selection_num_chunks > self.num_chunks {
            return Err(invalid(format!(
                "max_selection_num_chunks must be in 1..={}, got {}",
                self.num_chunks, self.max_selection_num_chunks
            )));
        }
        if !(self.wave_len_seconds > 0.0) {
            return Err(invalid("wave_len_seconds must be positive"));
        }
        if !(self.max_grain_duration_coeff >= 1.0) {
            return Err(invalid("max_grain_duration_coeff must be at least 1"));
        }
        if !(self.min_filter_cutoff_freq > 0.0) {
            return Err(invalid("min_filter_cutoff_freq must be positive"));
        }
        // Below the pivot the cutoff curve runs backwards.
        if !(self.max_filter_cutoff_freq > FILTER_CURVE_PIVOT_HZ) {
            return Err(invalid(format!(
                "max_filter_cutoff_freq must exceed {} Hz, got {}",
                FILTER_CURVE_PIVOT_HZ, self.max_filter_cutoff_freq
            )));
        }
        if self.midi_wave >= self.num_waves {
            return Err(invalid(format!(
                "midi_wave {} out of range for {} waves",
                self.midi_wave, self.num_waves
            )));
        }
        Ok(())
    }

    pub fn samples_per_chunk(&self, sample_rate: f64) -> f64 {
        self.wave_len_seconds * sample_rate / self.num_chunks as f64
    }

    /// Convert a chunk count or chunk index to samples.
    pub fn chunks_to_samples(&self, chunks: usize, sample_rate: f64) -> usize {
        (chunks as f64 * self.samples_per_chunk(sample_rate)) as usize
    }

    pub fn seconds_per_chunk(&self) -> f64 {
        self.wave_len_seconds / self.num_chunks as f64
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig(message.into())
}
