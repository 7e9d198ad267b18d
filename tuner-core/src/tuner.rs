//! # Tuner Module
//!
//! Ties classification and direction together for one detector frame and
//! hands the result to whoever is listening.
//!
//! The tuner holds no mutable state. Selection comes in with every call, so a
//! single `Tuner` can be shared between threads.

use crossbeam_channel::Sender;

use crate::classify::{self, ClassificationMode, MatchedReference, Selection};
use crate::direction::{Direction, cents_between};
use crate::error::Result;
use crate::tuning::TuningCatalog;
use crate::{PitchFrame, TuneResult};

/// Detector confidence a frame must exceed before its result is reported.
///
/// Kept in `f64`: a detector reporting `0.92_f32` is slightly above 0.92 and
/// counts as confident.
pub const CONFIDENCE_THRESHOLD: f64 = 0.92;

/// Receives tuner output. Both methods are called together, note first.
pub trait TunerCallback {
    fn on_note_update(&mut self, label: &str);
    fn on_direction_update(&mut self, direction: Direction);
}

/// A single callback notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunerEvent {
    Note(String),
    Direction(Direction),
}

/// Forwards callbacks as [`TunerEvent`]s over a crossbeam channel.
///
/// A disconnected receiver is ignored, matching how frames are dropped when
/// nobody is listening.
#[derive(Debug, Clone)]
pub struct ChannelCallback {
    sender: Sender<TunerEvent>,
}

impl ChannelCallback {
    pub fn new(sender: Sender<TunerEvent>) -> Self {
        Self { sender }
    }
}

impl TunerCallback for ChannelCallback {
    fn on_note_update(&mut self, label: &str) {
        let _ = self.sender.send(TunerEvent::Note(label.to_string()));
    }

    fn on_direction_update(&mut self, direction: Direction) {
        let _ = self.sender.send(TunerEvent::Direction(direction));
    }
}

/// Classifies detector frames against a tuning catalog.
#[derive(Debug, Clone, Default)]
pub struct Tuner {
    catalog: TuningCatalog,
}

impl Tuner {
    pub fn new(catalog: TuningCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &TuningCatalog {
        &self.catalog
    }

    /// Nearest reference for a frequency, with no confidence gate.
    pub fn nearest(
        &self,
        frequency_hz: f32,
        mode: &ClassificationMode,
    ) -> Result<Option<MatchedReference>> {
        classify::classify(frequency_hz, mode, &self.catalog)
    }

    /// Evaluates one frame.
    ///
    /// The nearest reference is always computed, so bad input is reported even
    /// for low-confidence frames.
    ///
    /// # Returns
    /// * `Ok(Some(result))` - Confident frame with a selected mode
    /// * `Ok(None)` - Confidence at or below [`CONFIDENCE_THRESHOLD`], or mode
    ///   is `Unselected`
    pub fn evaluate(
        &self,
        frame: PitchFrame,
        mode: &ClassificationMode,
    ) -> Result<Option<TuneResult>> {
        let Some(matched) = self.nearest(frame.frequency_hz, mode)? else {
            return Ok(None);
        };
        if f64::from(frame.probability) <= CONFIDENCE_THRESHOLD {
            return Ok(None);
        }

        let cents = cents_between(frame.frequency_hz, matched.frequency);
        let direction = Direction::from_cents(cents);
        log::debug!(
            "[TUNER] {:.2} Hz (p={:.2}) -> {} {:+.1} cents, {}",
            frame.frequency_hz,
            frame.probability,
            matched.label,
            cents,
            direction
        );

        Ok(Some(TuneResult {
            label: matched.label,
            direction,
            cents,
            target_hz: matched.frequency,
        }))
    }

    /// Evaluates a frame for a UI selection and notifies `callback` if a
    /// result is produced.
    pub fn process<C: TunerCallback + ?Sized>(
        &self,
        frame: PitchFrame,
        selection: &Selection,
        callback: &mut C,
    ) -> Result<Option<TuneResult>> {
        let mode = ClassificationMode::from_selection(selection);
        let result = self.evaluate(frame, &mode)?;
        if let Some(result) = &result {
            callback.on_note_update(&result.label);
            callback.on_direction_update(result.direction);
        }
        Ok(result)
    }
}
