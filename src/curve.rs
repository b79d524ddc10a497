//! Controller value -> engine parameter curves.
//!
//! Inputs are normalized controller values in `[0, 1]`. Nothing here clamps
//! its input; the decoder only ever produces values in range.
//!
//! # Example
//!
//! ```
//! use grainctl::curve;
//!
//! // 20 Hz .. 4 kHz, knob at half travel
//! let hz = curve::filter_cutoff(0.5, 20.0, 4000.0);
//! assert!((hz - 89.4427).abs() < 1e-3);
//!
//! // never below one chunk
//! assert_eq!(curve::selection_chunks(0.0, 37), 1);
//! ```

/// Reference frequency of the cutoff curve.
///
/// `cutoff = min * (max / pivot)^value`, so the sweep ends at
/// `min * max / pivot`, which equals `max` when `min` equals the pivot.
pub const FILTER_CURVE_PIVOT_HZ: f64 = 200.0;

pub const MIN_GAIN: f64 = 0.25;
pub const MAX_GAIN: f64 = 4.0;

/// Linear remap of `value` from `[in_min, in_max]` to `[out_min, out_max]`.
#[inline]
pub fn lmap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    out_min + (out_max - out_min) * ((value - in_min) / (in_max - in_min))
}

/// Selection start chunk: `round(value * (total_chunks - 1))`.
#[inline]
pub fn chunk_index(value: f32, total_chunks: usize) -> usize {
    let last = total_chunks.saturating_sub(1) as f64;
    (value as f64 * last).round() as usize
}

/// Selection size in chunks: `round(value * (max - 1)) + 1`, at least 1.
#[inline]
pub fn selection_chunks(value: f32, max_selection_chunks: usize) -> usize {
    chunk_index(value, max_selection_chunks) + 1
}

/// Grain duration coefficient in `[1, max_coeff]`.
#[inline]
pub fn grain_duration_coeff(value: f32, max_coeff: f64) -> f64 {
    value as f64 * (max_coeff - 1.0) + 1.0
}

/// Exponential cutoff sweep, perceptually linear in pitch.
#[inline]
pub fn filter_cutoff(value: f32, min_cutoff: f64, max_cutoff: f64) -> f64 {
    min_cutoff * (max_cutoff / FILTER_CURVE_PIVOT_HZ).powf(value as f64)
}

/// Amplitude multiplier in `[0.25, 4.0]`.
#[inline]
pub fn gain_multiplier(value: f32) -> f64 {
    lmap(value as f64, 0.0, 1.0, MIN_GAIN, MAX_GAIN)
}
