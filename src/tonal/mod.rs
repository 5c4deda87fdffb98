// Purpose: static musical tables (scales, chord progressions, tuning)

pub mod pitch;
pub mod scale;

pub use pitch::{midi_to_frequency, NoteName};
pub use scale::Scale;

/// Errors from strict parsing of musical names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TonalError {
    /// Scale name not present in the scale table
    UnknownScale(String),
    /// Not a recognizable pitch class (expects e.g. "C", "F#", "Bb")
    UnknownNote(String),
}

impl std::fmt::Display for TonalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TonalError::UnknownScale(name) => write!(f, "Unknown scale: {:?}", name),
            TonalError::UnknownNote(name) => {
                write!(f, "Unknown note name: {:?} (expected e.g. C, F#, Bb)", name)
            }
        }
    }
}

impl std::error::Error for TonalError {}
