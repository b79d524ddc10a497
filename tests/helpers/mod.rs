//! Test helpers and fixtures for grainctl integration tests.
//!
//! Everything runs against [`VirtualBackend`] so no hardware is needed.

pub mod tolerances;

use grainctl::prelude::*;
use grainctl::VirtualBackend;

/// Route `tracing` output to the test harness. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Config used by the curve scenarios: 20 Hz .. 4 kHz cutoff, full-width
/// selection knob.
pub fn test_config() -> Config {
    Config {
        min_filter_cutoff_freq: 20.0,
        max_filter_cutoff_freq: 4000.0,
        max_selection_num_chunks: 150,
        ..Config::default()
    }
}

/// Pipeline wired to `backend`, plus fresh state and engine.
pub fn test_pipeline(
    backend: &VirtualBackend,
    config: Config,
) -> (ControlPipeline, PlaybackState, RecordingEngine) {
    let pipeline = ControlPipeline::builder()
        .config(config.clone())
        .backend(backend.clone())
        .build()
        .expect("Failed to create test pipeline");
    (pipeline, PlaybackState::new(&config), RecordingEngine::new())
}

pub fn cc(controller: u8, value: u8) -> [u8; 3] {
    [0xB0, controller, value]
}

pub fn note_on(key: u8, velocity: u8) -> [u8; 3] {
    [0x90, key, velocity]
}

pub fn note_off(key: u8) -> [u8; 3] {
    [0x80, key, 0]
}
