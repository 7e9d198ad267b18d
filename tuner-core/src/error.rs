//! # Error Module
//!
//! Errors raised by the classification core. All of them point at bad input
//! or misauthored reference data, never at the environment, so nothing here
//! is worth retrying.

/// Errors from frequency classification and tuning catalog handling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TunerError {
    /// The detected frequency was zero, negative, NaN or infinite.
    #[error("invalid frequency: {0} Hz")]
    InvalidFrequency(f32),
    /// No preset with this name exists in the catalog.
    #[error("unknown tuning preset: {0:?}")]
    UnknownTuning(String),
    /// A target frequency has no entry in the reference-pitch table.
    #[error("no reference pitch label for {0} Hz")]
    LabelLookupFailure(f32),
    /// Two presets in one catalog share a name.
    #[error("duplicate tuning preset: {0:?}")]
    DuplicatePreset(String),
    /// A catalog preset gave both labelled `strings` and bare `frequencies`.
    #[error("tuning preset {0:?} gives both strings and frequencies")]
    ConflictingStrings(String),
    /// A preset was authored without any target strings.
    #[error("tuning preset {0:?} has no strings")]
    EmptyPreset(String),
}

pub type Result<T> = std::result::Result<T, TunerError>;
