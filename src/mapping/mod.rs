// Purpose: Turn graph nodes into notes
// Pitch, rhythm and dynamics follow one shared MusicalState so consecutive
// nodes form phrases over a chord progression instead of random tones.

pub mod config;
pub mod dynamics;
pub mod engine;
pub mod hash;
pub mod instrument;
pub mod phrase;
pub mod pitch;
pub mod rhythm;
pub mod state;
pub mod timeline;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use config::MappingConfig;
pub use engine::MappingEngine;
pub use hash::TitleHasher;
pub use instrument::{FamilyPreferences, InstrumentFamily, InstrumentRegistry, FALLBACK_INSTRUMENT};
pub use phrase::PhrasePosition;
pub use state::{ChordContext, MusicalState};
pub use timeline::{Spacing, TimelineConfig};

/// One playable note derived from one graph node
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct NoteMapping {
    pub node_id: String,
    /// Hz
    pub pitch: f64,
    /// Seconds, within `rhythm::MIN_DURATION..=rhythm::MAX_DURATION`
    pub duration: f64,
    /// 0.1..=1.0
    pub velocity: f64,
    /// Seconds from playback start
    pub timing: f64,
    /// Instrument registry key
    pub instrument: String,
}

impl NoteMapping {
    /// Seconds from playback start until the note has finished sounding
    pub fn end(&self) -> f64 {
        self.timing + self.duration
    }

    pub fn family(&self) -> Option<InstrumentFamily> {
        InstrumentFamily::of(&self.instrument)
    }
}
