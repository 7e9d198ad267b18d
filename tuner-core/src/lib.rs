// tuner-core/src/lib.rs

//! The core logic for the instrument tuner.
//! This crate decides which note a detected pitch belongs to and which way
//! the player should tune. It does no audio capture or pitch detection and
//! contains no UI code.

pub mod classify;
pub mod direction;
pub mod error;
pub mod notes;
pub mod tuner;
pub mod tuning;

pub use classify::{ClassificationMode, MatchedReference, Selection};
pub use direction::Direction;
pub use error::{Result, TunerError};
pub use tuner::{ChannelCallback, Tuner, TunerCallback, TunerEvent};
pub use tuning::{Instrument, TargetString, TuningCatalog, TuningPreset};

/// One frame of output from the pitch detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchFrame {
    /// The detected fundamental frequency in Hz.
    pub frequency_hz: f32,
    /// The detector's confidence in that frequency (0.0 to 1.0).
    pub probability: f32,
}

impl PitchFrame {
    pub fn new(frequency_hz: f32, probability: f32) -> Self {
        Self {
            frequency_hz,
            probability,
        }
    }
}

/// Represents the result of evaluating a single confident frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TuneResult {
    /// Label of the matched note or string.
    pub label: String,
    /// Which way to tune.
    pub direction: Direction,
    /// Interval from the detected pitch to the target in cents.
    pub cents: f32,
    /// The frequency being tuned toward in Hz.
    pub target_hz: f32,
}
