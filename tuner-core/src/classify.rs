//! # Frequency Classifier Module
//!
//! Maps a detected frequency to the reference it is closest to:
//! - **Chromatic**: the nearest equal-tempered semitone (A4 = 440 Hz),
//!   reported as a pitch class without octave
//! - **Fixed tuning**: the nearest target string of the selected preset

use crate::error::{Result, TunerError};
use crate::notes::{A4_FREQUENCY, NoteName};
use crate::tuning::{Instrument, TuningCatalog, TuningPreset};

/// What the detected pitch should be compared against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationMode {
    /// Nothing selected yet. Classification yields no match.
    Unselected,
    /// Any note of the 12-tone equal-tempered scale.
    Chromatic,
    /// The strings of the named tuning preset.
    FixedTuning(String),
}

/// The caller's snapshot of the instrument and tuning pickers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub instrument: Option<String>,
    pub tuning: Option<String>,
}

impl Selection {
    pub fn new(instrument: impl Into<String>, tuning: Option<&str>) -> Self {
        Self {
            instrument: Some(instrument.into()),
            tuning: tuning.map(str::to_string),
        }
    }

    pub fn chromatic() -> Self {
        Self::new(Instrument::Chromatic.as_str(), None)
    }
}

impl ClassificationMode {
    /// Turns a UI selection into a mode.
    ///
    /// `Chromatic` ignores the tuning. Other known instruments need a tuning
    /// name. Anything else, including an unrecognised instrument, is
    /// `Unselected`. Whether the tuning name exists is checked at
    /// classification time.
    pub fn from_selection(selection: &Selection) -> Self {
        let instrument = selection
            .instrument
            .as_deref()
            .and_then(|name| name.parse::<Instrument>().ok());
        match (instrument, &selection.tuning) {
            (Some(Instrument::Chromatic), _) => ClassificationMode::Chromatic,
            (Some(_), Some(tuning)) => ClassificationMode::FixedTuning(tuning.clone()),
            _ => ClassificationMode::Unselected,
        }
    }
}

/// The reference a frequency was matched to.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedReference {
    /// Frequency of the reference in Hz (the pitch to tune toward)
    pub frequency: f32,
    /// Display label of the reference
    pub label: String,
}

fn check_frequency(frequency_hz: f32) -> Result<()> {
    if frequency_hz.is_finite() && frequency_hz > 0.0 {
        Ok(())
    } else {
        Err(TunerError::InvalidFrequency(frequency_hz))
    }
}

/// Signed number of semitones from A4 to the nearest equal-tempered note.
pub fn semitone_offset(frequency_hz: f32) -> Result<i32> {
    check_frequency(frequency_hz)?;
    Ok((12.0 * (frequency_hz / A4_FREQUENCY).log2()).round() as i32)
}

/// Finds the nearest note of the chromatic scale.
///
/// # Returns
/// * `(note, target_frequency)` - Pitch class and its equal-tempered frequency
///   in the octave of the input
pub fn nearest_chromatic(frequency_hz: f32) -> Result<(NoteName, f32)> {
    let offset = semitone_offset(frequency_hz)?;
    let target = A4_FREQUENCY * 2.0_f32.powf(offset as f32 / 12.0);
    Ok((NoteName::from_semitone_offset(offset), target))
}

/// Finds the string of a preset whose target is closest to `frequency_hz`.
///
/// Ties go to the string listed first.
pub fn nearest_string(frequency_hz: f32, preset: &TuningPreset) -> Result<MatchedReference> {
    check_frequency(frequency_hz)?;
    let mut strings = preset.strings.iter();
    let first = strings
        .next()
        .ok_or_else(|| TunerError::EmptyPreset(preset.name.clone()))?;

    let mut closest = first;
    let mut difference = (first.frequency - frequency_hz).abs();
    for string in strings {
        let d = (string.frequency - frequency_hz).abs();
        if d < difference {
            closest = string;
            difference = d;
        }
    }

    Ok(MatchedReference {
        frequency: closest.frequency,
        label: closest.label.clone(),
    })
}

/// Classifies a frequency under the given mode.
///
/// # Returns
/// * `Ok(Some(reference))` - The closest reference
/// * `Ok(None)` - Mode is `Unselected`
///
/// # Errors
/// * `InvalidFrequency` - `frequency_hz` is not positive and finite
/// * `UnknownTuning` - The preset is not in `catalog`
pub fn classify(
    frequency_hz: f32,
    mode: &ClassificationMode,
    catalog: &TuningCatalog,
) -> Result<Option<MatchedReference>> {
    check_frequency(frequency_hz)?;
    let matched = match mode {
        ClassificationMode::Unselected => return Ok(None),
        ClassificationMode::Chromatic => {
            let (note, frequency) = nearest_chromatic(frequency_hz)?;
            MatchedReference {
                frequency,
                label: note.to_string(),
            }
        }
        ClassificationMode::FixedTuning(name) => {
            nearest_string(frequency_hz, catalog.get(name)?)?
        }
    };
    log::debug!(
        "[CLASSIFY] {:.2} Hz -> {} ({:.2} Hz)",
        frequency_hz,
        matched.label,
        matched.frequency
    );
    Ok(Some(matched))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::NOTE_CYCLE;
    use crate::tuning::TargetString;

    fn chromatic(frequency_hz: f32) -> MatchedReference {
        classify(frequency_hz, &ClassificationMode::Chromatic, TuningCatalog::builtin())
            .unwrap()
            .unwrap()
    }

    #[test]
    fn test_chromatic_examples() {
        assert_eq!(chromatic(440.0).label, "A");
        assert_eq!(chromatic(220.0).label, "A");
        assert_eq!(chromatic(261.63).label, "C");
        assert_eq!(chromatic(261.63).frequency.round(), 262.0);
    }

    #[test]
    fn test_chromatic_equal_tempered_grid() {
        for k in -48i32..=39 {
            let f = 440.0 * 2.0_f32.powf(k as f32 / 12.0);
            let expected = NOTE_CYCLE[k.rem_euclid(12) as usize];
            assert_eq!(chromatic(f).label, expected.as_str(), "k = {k}");
            assert_eq!(semitone_offset(f).unwrap(), k);
        }
    }

    #[test]
    fn test_chromatic_target_is_nearest_semitone() {
        let (note, target) = nearest_chromatic(430.0).unwrap();
        assert_eq!(note, NoteName::A);
        assert_eq!(target, 440.0);

        let (note, target) = nearest_chromatic(455.0).unwrap();
        assert_eq!(note, NoteName::ASharp);
        assert!((target - 466.16).abs() < 0.01);
    }

    #[test]
    fn test_guitar_standard_low_e() {
        let mode = ClassificationMode::FixedTuning("Standard Tuning".to_string());
        let matched = classify(83.0, &mode, TuningCatalog::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(matched.frequency, 82.41);
        assert_eq!(matched.label, "E");
    }

    #[test]
    fn test_fixed_tuning_labels_attached_to_strings() {
        let mode = ClassificationMode::FixedTuning("E-Flat".to_string());
        let matched = classify(190.0, &mode, TuningCatalog::builtin())
            .unwrap()
            .unwrap();
        assert_eq!(matched.label, "Gb");
        assert_eq!(matched.frequency, 185.0);
    }

    #[test]
    fn test_nearest_string_tie_goes_to_first() {
        let preset = TuningPreset {
            name: "Tie".to_string(),
            instrument: Instrument::Guitar,
            strings: vec![
                TargetString::new(100.0, "first"),
                TargetString::new(120.0, "second"),
            ],
        };
        assert_eq!(nearest_string(110.0, &preset).unwrap().label, "first");
        assert_eq!(nearest_string(111.0, &preset).unwrap().label, "second");
    }

    #[test]
    fn test_unknown_tuning_is_an_error() {
        let mode = ClassificationMode::FixedTuning("Nashville".to_string());
        assert_eq!(
            classify(100.0, &mode, TuningCatalog::builtin()),
            Err(TunerError::UnknownTuning("Nashville".to_string()))
        );
    }

    #[test]
    fn test_invalid_frequency() {
        let catalog = TuningCatalog::builtin();
        for f in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            for mode in [
                ClassificationMode::Unselected,
                ClassificationMode::Chromatic,
                ClassificationMode::FixedTuning("Standard Tuning".to_string()),
            ] {
                assert!(matches!(
                    classify(f, &mode, catalog),
                    Err(TunerError::InvalidFrequency(_))
                ));
            }
        }
    }

    #[test]
    fn test_unselected_yields_nothing() {
        assert_eq!(
            classify(440.0, &ClassificationMode::Unselected, TuningCatalog::builtin()),
            Ok(None)
        );
    }

    #[test]
    fn test_mode_from_selection() {
        assert_eq!(
            ClassificationMode::from_selection(&Selection::chromatic()),
            ClassificationMode::Chromatic
        );
        assert_eq!(
            ClassificationMode::from_selection(&Selection::new("Guitar", Some("Drop D"))),
            ClassificationMode::FixedTuning("Drop D".to_string())
        );
        assert_eq!(
            ClassificationMode::from_selection(&Selection::new("Guitar", None)),
            ClassificationMode::Unselected
        );
        assert_eq!(
            ClassificationMode::from_selection(&Selection::new("Banjo", Some("Open G"))),
            ClassificationMode::Unselected
        );
        assert_eq!(
            ClassificationMode::from_selection(&Selection::default()),
            ClassificationMode::Unselected
        );
    }
}
