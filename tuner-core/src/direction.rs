//! # Direction Module
//!
//! Decides which way the player has to turn the peg, based on the pitch
//! distance in cents between what is heard and the target.

use std::fmt;

/// Half-width of the in-tune band in cents. Deviations of exactly this much
/// still count as in tune.
pub const IN_TUNE_CENTS: f32 = 10.0;

/// Which way the player should adjust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The pitch is flat: tune up.
    Up,
    /// The pitch is sharp: tune down.
    Down,
    /// Within the in-tune band.
    InTune,
}

impl Direction {
    /// Classifies a signed interval measured from the current pitch to the target.
    ///
    /// Positive cents mean the target is higher than what is playing.
    pub fn from_cents(cents: f32) -> Self {
        if cents > IN_TUNE_CENTS {
            Direction::Up
        } else if cents < -IN_TUNE_CENTS {
            Direction::Down
        } else {
            Direction::InTune
        }
    }

    /// Direction to move from `current_hz` (the detected pitch) toward
    /// `target_hz` (the reference). Swapping the arguments swaps Up and Down.
    ///
    /// Both frequencies must be positive and finite; see [`cents_between`].
    pub fn evaluate(current_hz: f32, target_hz: f32) -> Self {
        Self::from_cents(cents_between(current_hz, target_hz))
    }

    /// Name sent to direction callbacks: `"up"`, `"down"` or `"none"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::InTune => "none",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Interval in cents from `current_hz` up to `target_hz`.
///
/// Cents are a logarithmic unit of pitch measurement where:
/// - 100 cents = 1 semitone
/// - 1200 cents = 1 octave
/// - Positive values mean the current pitch is flat of the target
///
/// Both frequencies must be positive and finite. Otherwise the result is NaN,
/// which [`Direction::from_cents`] would read as in tune. The classifier
/// rejects such input before it gets here.
pub fn cents_between(current_hz: f32, target_hz: f32) -> f32 {
    debug_assert!(
        current_hz.is_finite() && current_hz > 0.0 && target_hz.is_finite() && target_hz > 0.0,
        "cents_between needs positive frequencies, got {current_hz} -> {target_hz}"
    );
    1200.0 * (target_hz / current_hz).log2()
}
