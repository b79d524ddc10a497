//! Tolerance constants for curve assertions.

/// Frequencies from the exponential cutoff curve.
pub const FREQ_EPSILON: f64 = 1e-3;

/// Normalized controller values (`n / 127`).
pub const CC_EPSILON: f32 = 1e-6;
