//! # Reference Notes Module
//!
//! Static pitch reference data for the tuner:
//! - The fixed 12-note cycle used by chromatic classification
//! - The reference-pitch table (C0 to C8) used to label target frequencies
//!
//! The table keeps the spellings it was authored with. Some octaves use flats
//! (`Db`, `Eb`, `Ab`, `Gb`, `Bb`) where others use sharps.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::{Result, TunerError};

/// Concert pitch for A4 in Hz. Chromatic classification is relative to it.
pub const A4_FREQUENCY: f32 = 440.0;

/// Largest distance at which a frequency still matches a reference pitch.
///
/// The table is authored to two decimals, so lookups compare values rounded
/// to hundredths of a hertz.
pub const LABEL_MATCH_TOLERANCE_HZ: f32 = 0.005;

/// One of the 12 pitch classes, ignoring octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    A,
    ASharp,
    B,
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
}

/// The 12-tone cycle starting at A. A note's index here is its semitone
/// distance above A, modulo the octave.
pub const NOTE_CYCLE: [NoteName; 12] = [
    NoteName::A,
    NoteName::ASharp,
    NoteName::B,
    NoteName::C,
    NoteName::CSharp,
    NoteName::D,
    NoteName::DSharp,
    NoteName::E,
    NoteName::F,
    NoteName::FSharp,
    NoteName::G,
    NoteName::GSharp,
];

impl NoteName {
    /// Maps a signed semitone offset from A to its pitch class.
    ///
    /// Uses floor modulo, so `-1` is `G#` and `-9` is `C`.
    pub fn from_semitone_offset(offset: i32) -> Self {
        NOTE_CYCLE[offset.rem_euclid(12) as usize]
    }

    /// Position of this note in [`NOTE_CYCLE`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Sharp spelling of the note, e.g. `"C#"`.
    pub fn as_str(self) -> &'static str {
        match self {
            NoteName::A => "A",
            NoteName::ASharp => "A#",
            NoteName::B => "B",
            NoteName::C => "C",
            NoteName::CSharp => "C#",
            NoteName::D => "D",
            NoteName::DSharp => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::FSharp => "F#",
            NoteName::G => "G",
            NoteName::GSharp => "G#",
        }
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A frequency in the reference table together with its display label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePitch {
    /// Frequency in Hz
    pub frequency: f32,
    /// Label as authored (sharp or flat spelling, no octave)
    pub label: &'static str,
}

const fn pitch(frequency: f32, label: &'static str) -> ReferencePitch {
    ReferencePitch { frequency, label }
}

/// Reference pitches from C0 (16.35 Hz) to C8 (4186.01 Hz), strictly increasing.
#[rustfmt::skip]
pub static REFERENCE_PITCHES: [ReferencePitch; 97] = [
    pitch(16.35, "C"), pitch(17.32, "C#"), pitch(18.35, "D"), pitch(19.45, "D#"),
    pitch(20.60, "E"), pitch(21.83, "F"), pitch(23.12, "F#"), pitch(24.50, "G"),
    pitch(25.96, "G#"), pitch(27.50, "A"), pitch(29.14, "A#"), pitch(30.87, "B"),
    pitch(32.70, "C"), pitch(34.65, "C#"), pitch(36.71, "D"), pitch(38.90, "D#"),
    pitch(41.20, "E"), pitch(43.65, "F"), pitch(46.25, "F#"), pitch(49.00, "G"),
    pitch(51.91, "G#"), pitch(55.00, "A"), pitch(58.27, "A#"), pitch(61.74, "B"),
    pitch(65.40, "C"), pitch(69.30, "Db"), pitch(73.42, "D"), pitch(77.78, "Eb"),
    pitch(82.41, "E"), pitch(87.31, "F"), pitch(92.50, "F#"), pitch(98.00, "G"),
    pitch(103.83, "Ab"), pitch(110.00, "A"), pitch(116.54, "A#"), pitch(123.47, "B"),
    pitch(130.81, "C"), pitch(138.59, "Db"), pitch(146.83, "D"), pitch(155.56, "D#"),
    pitch(164.81, "E"), pitch(174.61, "F"), pitch(185.00, "Gb"), pitch(196.00, "G"),
    pitch(207.65, "G#"), pitch(220.00, "A"), pitch(233.08, "Bb"), pitch(246.94, "B"),
    pitch(261.63, "C"), pitch(277.18, "C#"), pitch(293.66, "D"), pitch(311.13, "Eb"),
    pitch(329.63, "E"), pitch(349.23, "F"), pitch(370.00, "Gb"), pitch(392.00, "G"),
    pitch(415.30, "G#"), pitch(440.00, "A"), pitch(466.16, "A#"), pitch(493.88, "B"),
    pitch(523.25, "C"), pitch(554.37, "C#"), pitch(587.33, "D"), pitch(622.25, "D#"),
    pitch(659.26, "E"), pitch(698.46, "F"), pitch(739.99, "F#"), pitch(784.00, "G"),
    pitch(830.61, "G#"), pitch(880.00, "A"), pitch(932.33, "A#"), pitch(987.76, "B"),
    pitch(1046.50, "C"), pitch(1108.73, "C#"), pitch(1174.66, "D"), pitch(1244.50, "D#"),
    pitch(1318.51, "E"), pitch(1396.91, "F"), pitch(1479.98, "F#"), pitch(1567.98, "G"),
    pitch(1661.22, "G#"), pitch(1760.00, "A"), pitch(1864.66, "A#"), pitch(1975.53, "B"),
    pitch(2093.01, "C"), pitch(2217.46, "C#"), pitch(2349.32, "D"), pitch(2489.02, "D#"),
    pitch(2637.02, "E"), pitch(2793.83, "F"), pitch(2959.96, "F#"), pitch(3135.96, "G"),
    pitch(3322.44, "G#"), pitch(3520.00, "A"), pitch(3729.31, "A#"), pitch(3951.07, "B"),
    pitch(4186.01, "C"),
];

/// Static map from a frequency in hundredths of a hertz to its label.
///
/// Built once on first use. Every table entry gets its own key.
static LABEL_MAP: Lazy<BTreeMap<u32, &'static str>> = Lazy::new(|| {
    REFERENCE_PITCHES
        .iter()
        .map(|p| (centihertz(p.frequency), p.label))
        .collect()
});

fn centihertz(frequency: f32) -> u32 {
    (frequency as f64 * 100.0).round() as u32
}

/// Looks up the reference label for a frequency.
///
/// Matches when `frequency` is within [`LABEL_MATCH_TOLERANCE_HZ`] of a table
/// entry, so a preset authored as `82.41` resolves to `"E"`.
///
/// # Errors
/// * `LabelLookupFailure` - No table entry at this frequency
/// * `InvalidFrequency` - The frequency is not positive and finite
pub fn label_for_frequency(frequency: f32) -> Result<&'static str> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(TunerError::InvalidFrequency(frequency));
    }
    LABEL_MAP
        .get(&centihertz(frequency))
        .copied()
        .ok_or(TunerError::LabelLookupFailure(frequency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_starts_at_a() {
        assert_eq!(NOTE_CYCLE[0], NoteName::A);
        assert_eq!(NOTE_CYCLE[3], NoteName::C);
        for (i, note) in NOTE_CYCLE.iter().enumerate() {
            assert_eq!(note.index(), i);
        }
    }

    #[test]
    fn test_negative_offsets_wrap() {
        assert_eq!(NoteName::from_semitone_offset(-1), NoteName::GSharp);
        assert_eq!(NoteName::from_semitone_offset(-9), NoteName::C);
        assert_eq!(NoteName::from_semitone_offset(-12), NoteName::A);
        assert_eq!(NoteName::from_semitone_offset(-13), NoteName::GSharp);
        assert_eq!(NoteName::from_semitone_offset(14), NoteName::B);
    }

    #[test]
    fn test_table_strictly_increasing() {
        for pair in REFERENCE_PITCHES.windows(2) {
            assert!(pair[0].frequency < pair[1].frequency, "{:?}", pair);
        }
        assert_eq!(LABEL_MAP.len(), REFERENCE_PITCHES.len());
    }

    #[test]
    fn test_table_keeps_authored_spellings() {
        assert_eq!(label_for_frequency(69.30), Ok("Db"));
        assert_eq!(label_for_frequency(185.00), Ok("Gb"));
        assert_eq!(label_for_frequency(739.99), Ok("F#"));
        assert_eq!(label_for_frequency(440.0), Ok("A"));
    }

    #[test]
    fn test_label_lookup_tolerance() {
        assert_eq!(label_for_frequency(82.412), Ok("E"));
        assert_eq!(
            label_for_frequency(82.5),
            Err(TunerError::LabelLookupFailure(82.5))
        );
        assert_eq!(
            label_for_frequency(0.0),
            Err(TunerError::InvalidFrequency(0.0))
        );
    }
}
