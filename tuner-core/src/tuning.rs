//! # Tuning Presets Module
//!
//! Instruments and their named string tunings.
//!
//! ## Features
//! - Built-in guitar, bass and ukulele presets
//! - Display labels attached to every target string
//! - JSON catalogs, with labels either authored or resolved from the
//!   reference-pitch table

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TunerError};
use crate::notes::label_for_frequency;

/// The instruments a user can pick. `Chromatic` has no presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    Chromatic,
    Guitar,
    Bass,
    Ukulele,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [
        Instrument::Chromatic,
        Instrument::Guitar,
        Instrument::Bass,
        Instrument::Ukulele,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Instrument::Chromatic => "Chromatic",
            Instrument::Guitar => "Guitar",
            Instrument::Bass => "Bass",
            Instrument::Ukulele => "Ukulele",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Instrument {
    type Err = String;

    /// Parses an instrument name, ignoring case.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Instrument::ALL
            .into_iter()
            .find(|i| i.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown instrument: {s:?}"))
    }
}

/// One string of a tuning: the frequency to tune toward and its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetString {
    /// Target frequency in Hz
    pub frequency: f32,
    /// Display label (e.g. "E", "Eb")
    pub label: String,
}

impl TargetString {
    pub fn new(frequency: f32, label: impl Into<String>) -> Self {
        Self {
            frequency,
            label: label.into(),
        }
    }

    /// Builds a target whose label comes from the reference-pitch table.
    pub fn from_reference(frequency: f32) -> Result<Self> {
        let label = label_for_frequency(frequency)?;
        Ok(Self::new(frequency, label))
    }
}

/// A named tuning: the target strings as authored, usually low to high.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuningPreset {
    pub name: String,
    pub instrument: Instrument,
    pub strings: Vec<TargetString>,
}

impl TuningPreset {
    fn validate(&self) -> Result<()> {
        if self.strings.is_empty() {
            return Err(TunerError::EmptyPreset(self.name.clone()));
        }
        match self
            .strings
            .iter()
            .find(|s| !s.frequency.is_finite() || s.frequency <= 0.0)
        {
            Some(bad) => Err(TunerError::InvalidFrequency(bad.frequency)),
            None => Ok(()),
        }
    }
}

/// On-disk form of a preset. Exactly one of `strings` or bare `frequencies`.
#[derive(Debug, Deserialize)]
struct PresetDef {
    name: String,
    instrument: Instrument,
    #[serde(default)]
    strings: Vec<TargetString>,
    #[serde(default)]
    frequencies: Vec<f32>,
}

impl PresetDef {
    fn into_preset(self) -> Result<TuningPreset> {
        if !self.strings.is_empty() && !self.frequencies.is_empty() {
            return Err(TunerError::ConflictingStrings(self.name));
        }
        let strings = if self.strings.is_empty() {
            self.frequencies
                .into_iter()
                .map(TargetString::from_reference)
                .collect::<Result<Vec<_>>>()?
        } else {
            self.strings
        };
        Ok(TuningPreset {
            name: self.name,
            instrument: self.instrument,
            strings,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDef {
    presets: Vec<PresetDef>,
}

#[derive(Serialize)]
struct CatalogRef<'a> {
    presets: &'a [TuningPreset],
}

/// An ordered set of tuning presets with unique names.
#[derive(Debug, Clone, PartialEq)]
pub struct TuningCatalog {
    presets: Vec<TuningPreset>,
}

impl TuningCatalog {
    /// Builds a catalog, rejecting duplicate names and empty or invalid presets.
    pub fn new(presets: Vec<TuningPreset>) -> Result<Self> {
        for (i, preset) in presets.iter().enumerate() {
            preset.validate()?;
            if presets[..i].iter().any(|p| p.name == preset.name) {
                return Err(TunerError::DuplicatePreset(preset.name.clone()));
            }
        }
        Ok(Self { presets })
    }

    /// The presets shipped with the tuner.
    pub fn builtin() -> &'static TuningCatalog {
        &BUILTIN_CATALOG
    }

    /// Parses a JSON catalog.
    ///
    /// ```json
    /// { "presets": [ { "name": "Drop D", "instrument": "Guitar",
    ///                  "frequencies": [73.42, 110.0, 146.83, 196.0, 246.94, 329.63] } ] }
    /// ```
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let def: CatalogDef = serde_json::from_str(json).context("malformed preset catalog")?;
        let presets = def
            .presets
            .into_iter()
            .map(PresetDef::into_preset)
            .collect::<Result<Vec<_>>>()?;
        let catalog = Self::new(presets)?;
        log::debug!("[CATALOG] Parsed {} presets", catalog.len());
        Ok(catalog)
    }

    /// Loads a JSON catalog from a file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read preset catalog {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("failed to load preset catalog {}", path.display()))
    }

    /// Serializes the catalog with explicit labels on every string.
    pub fn to_json_string(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(&CatalogRef {
            presets: &self.presets,
        })?)
    }

    /// Finds a preset by exact name.
    pub fn get(&self, name: &str) -> Result<&TuningPreset> {
        self.presets
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| TunerError::UnknownTuning(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TuningPreset> {
        self.presets.iter()
    }

    /// Presets for one instrument, in catalog order.
    pub fn for_instrument(&self, instrument: Instrument) -> impl Iterator<Item = &TuningPreset> {
        self.presets
            .iter()
            .filter(move |p| p.instrument == instrument)
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

impl Default for TuningCatalog {
    fn default() -> Self {
        BUILTIN_CATALOG.clone()
    }
}

fn preset(name: &str, instrument: Instrument, strings: &[(f32, &str)]) -> TuningPreset {
    TuningPreset {
        name: name.to_string(),
        instrument,
        strings: strings
            .iter()
            .map(|&(frequency, label)| TargetString::new(frequency, label))
            .collect(),
    }
}

/// Built-in presets. Every frequency and label is also an entry of the
/// reference table.
#[rustfmt::skip]
static BUILTIN_CATALOG: Lazy<TuningCatalog> = Lazy::new(|| {
    use Instrument::{Bass, Guitar, Ukulele};

    let presets = vec![
        // --- Guitar ---
        preset("Standard Tuning", Guitar, &[
            (82.41, "E"), (110.00, "A"), (146.83, "D"), (196.00, "G"), (246.94, "B"), (329.63, "E"),
        ]),
        preset("E-Flat", Guitar, &[
            (77.78, "Eb"), (103.83, "Ab"), (138.59, "Db"), (185.00, "Gb"), (233.08, "Bb"), (311.13, "Eb"),
        ]),
        preset("Drop D", Guitar, &[
            (73.42, "D"), (110.00, "A"), (146.83, "D"), (196.00, "G"), (246.94, "B"), (329.63, "E"),
        ]),
        preset("Drop Db", Guitar, &[
            (69.30, "Db"), (103.83, "Ab"), (138.59, "Db"), (185.00, "Gb"), (233.08, "Bb"), (311.13, "Eb"),
        ]),
        preset("Double Drop D", Guitar, &[
            (73.42, "D"), (110.00, "A"), (146.83, "D"), (196.00, "G"), (246.94, "B"), (293.66, "D"),
        ]),
        preset("DADGAD", Guitar, &[
            (73.42, "D"), (110.00, "A"), (146.83, "D"), (196.00, "G"), (220.00, "A"), (293.66, "D"),
        ]),
        preset("Open D", Guitar, &[
            (73.42, "D"), (110.00, "A"), (146.83, "D"), (185.00, "Gb"), (220.00, "A"), (293.66, "D"),
        ]),
        preset("Open A", Guitar, &[
            (82.41, "E"), (110.00, "A"), (164.81, "E"), (220.00, "A"), (277.18, "C#"), (329.63, "E"),
        ]),
        preset("Open E", Guitar, &[
            (82.41, "E"), (123.47, "B"), (164.81, "E"), (207.65, "G#"), (246.94, "B"), (329.63, "E"),
        ]),
        preset("Open G", Guitar, &[
            (73.42, "D"), (98.00, "G"), (146.83, "D"), (196.00, "G"), (246.94, "B"), (293.66, "D"),
        ]),
        // --- Bass ---
        preset("4 String Standard", Bass, &[
            (41.20, "E"), (55.00, "A"), (73.42, "D"), (98.00, "G"),
        ]),
        preset("5 String Standard", Bass, &[
            (30.87, "B"), (41.20, "E"), (55.00, "A"), (73.42, "D"), (98.00, "G"),
        ]),
        preset("6 String Standard", Bass, &[
            (30.87, "B"), (41.20, "E"), (55.00, "A"), (73.42, "D"), (98.00, "G"), (130.81, "C"),
        ]),
        preset("4 String Drop D", Bass, &[
            (36.71, "D"), (55.00, "A"), (73.42, "D"), (98.00, "G"),
        ]),
        preset("4 String D Standard", Bass, &[
            (36.71, "D"), (49.00, "G"), (65.40, "C"), (87.31, "F"),
        ]),
        preset("4 String Drop C", Bass, &[
            (32.70, "C"), (49.00, "G"), (65.40, "C"), (87.31, "F"),
        ]),
        // --- Ukulele ---
        preset("Standard Reentrant", Ukulele, &[
            (392.00, "G"), (261.63, "C"), (329.63, "E"), (440.00, "A"),
        ]),
        preset("Traditional Soprano", Ukulele, &[
            (440.00, "A"), (293.66, "D"), (370.00, "Gb"), (493.88, "B"),
        ]),
        preset("Baritone", Ukulele, &[
            (146.83, "D"), (196.00, "G"), (246.94, "B"), (329.63, "E"),
        ]),
        preset("Bass", Ukulele, &[
            (41.20, "E"), (55.00, "A"), (73.42, "D"), (98.00, "G"),
        ]),
    ];

    TuningCatalog { presets }
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::label_for_frequency;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = TuningCatalog::builtin();
        assert_eq!(catalog.len(), 20);
        assert!(TuningCatalog::new(catalog.iter().cloned().collect()).is_ok());
    }

    #[test]
    fn test_builtin_labels_match_reference_table() {
        for preset in TuningCatalog::builtin().iter() {
            for target in &preset.strings {
                assert_eq!(
                    label_for_frequency(target.frequency),
                    Ok(target.label.as_str()),
                    "{} at {} Hz",
                    preset.name,
                    target.frequency
                );
            }
        }
    }

    #[test]
    fn test_open_d_keeps_table_spelling() {
        let catalog = TuningCatalog::builtin();
        assert_eq!(catalog.get("Open D").unwrap().strings[3].label, "Gb");
        assert_eq!(catalog.get("Traditional Soprano").unwrap().strings[2].label, "Gb");
    }

    #[test]
    fn test_builtin_counts_per_instrument() {
        let catalog = TuningCatalog::builtin();
        assert_eq!(catalog.for_instrument(Instrument::Guitar).count(), 10);
        assert_eq!(catalog.for_instrument(Instrument::Bass).count(), 6);
        assert_eq!(catalog.for_instrument(Instrument::Ukulele).count(), 4);
        assert_eq!(catalog.for_instrument(Instrument::Chromatic).count(), 0);
    }

    #[test]
    fn test_unknown_tuning() {
        let err = TuningCatalog::builtin().get("Nashville").unwrap_err();
        assert_eq!(err, TunerError::UnknownTuning("Nashville".to_string()));
    }

    #[test]
    fn test_instrument_parse() {
        assert_eq!("guitar".parse::<Instrument>(), Ok(Instrument::Guitar));
        assert_eq!(" Chromatic ".parse::<Instrument>(), Ok(Instrument::Chromatic));
        assert!("banjo".parse::<Instrument>().is_err());
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let a = preset("Custom", Instrument::Guitar, &[(82.41, "E")]);
        let b = preset("Custom", Instrument::Bass, &[(41.20, "E")]);
        assert_eq!(
            TuningCatalog::new(vec![a.clone(), b]),
            Err(TunerError::DuplicatePreset("Custom".to_string()))
        );

        let empty = preset("Nothing", Instrument::Guitar, &[]);
        assert_eq!(
            TuningCatalog::new(vec![empty]),
            Err(TunerError::EmptyPreset("Nothing".to_string()))
        );

        let bad = preset("Broken", Instrument::Guitar, &[(-1.0, "?")]);
        assert_eq!(
            TuningCatalog::new(vec![a, bad]),
            Err(TunerError::InvalidFrequency(-1.0))
        );
    }

    #[test]
    fn test_json_frequencies_resolve_labels() {
        let json = r#"{ "presets": [
            { "name": "Half Step Down", "instrument": "Guitar",
              "frequencies": [77.78, 103.83, 138.59, 185.0, 233.08, 311.13] },
            { "name": "Custom", "instrument": "Ukulele",
              "strings": [ { "frequency": 392.0, "label": "G4" } ] }
        ] }"#;
        let catalog = TuningCatalog::from_json_str(json).unwrap();
        let labels: Vec<_> = catalog
            .get("Half Step Down")
            .unwrap()
            .strings
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, ["Eb", "Ab", "Db", "Gb", "Bb", "Eb"]);
        assert_eq!(catalog.get("Custom").unwrap().strings[0].label, "G4");
    }

    #[test]
    fn test_json_rejects_strings_and_frequencies_together() {
        let json = r#"{ "presets": [
            { "name": "Both", "instrument": "Guitar",
              "strings": [ { "frequency": 82.41, "label": "E" } ],
              "frequencies": [110.0] }
        ] }"#;
        let err = TuningCatalog::from_json_str(json).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TunerError>(),
            Some(&TunerError::ConflictingStrings("Both".to_string()))
        );
    }

    #[test]
    fn test_json_unknown_frequency_fails() {
        let json = r#"{ "presets": [
            { "name": "Odd", "instrument": "Guitar", "frequencies": [82.0] }
        ] }"#;
        let err = TuningCatalog::from_json_str(json).unwrap_err();
        assert_eq!(
            err.downcast_ref::<TunerError>(),
            Some(&TunerError::LabelLookupFailure(82.0))
        );
    }

    #[test]
    fn test_json_round_trip_keeps_builtin() {
        let json = TuningCatalog::builtin().to_json_string().unwrap();
        let parsed = TuningCatalog::from_json_str(&json).unwrap();
        assert_eq!(&parsed, TuningCatalog::builtin());
    }
}
