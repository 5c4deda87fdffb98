#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tonal::{NoteName, Scale};

use super::instrument::{FamilyPreferences, InstrumentRegistry};
use super::state::MusicalState;
use super::timeline::TimelineConfig;

/// Everything the mapping engine needs to know about the user's settings.
///
/// Independent of any host settings schema. Missing fields take the defaults
/// below when deserialized.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct MappingConfig {
    /// Scale all pitches are quantized to (default: major)
    pub scale: Scale,
    /// Tonic pitch class (default: C)
    pub root_note: NoteName,
    /// Octave of the tonic; 4 puts C at middle C
    pub root_octave: i32,
    /// Seconds before phrase and size adjustments (default: 0.3)
    pub base_duration: f64,
    /// Notes per phrase (default: 8)
    pub phrase_length: usize,
    pub instruments: InstrumentRegistry,
    pub family_preferences: FamilyPreferences,
    pub timeline: TimelineConfig,
    /// Re-roll seed. `None` keeps results purely content-derived.
    pub seed: Option<u64>,
}

impl MappingConfig {
    pub const DEFAULT_BASE_DURATION: f64 = 0.3;
    pub const DEFAULT_ROOT_OCTAVE: i32 = 4;
    pub const MAX_ROOT_OCTAVE: i32 = 8;

    pub fn scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn root(mut self, root_note: NoteName, octave: i32) -> Self {
        self.root_note = root_note;
        self.root_octave = octave;
        self
    }

    pub fn base_duration(mut self, seconds: f64) -> Self {
        self.base_duration = seconds;
        self
    }

    pub fn phrase_length(mut self, notes: usize) -> Self {
        self.phrase_length = notes;
        self
    }

    pub fn instruments(mut self, instruments: InstrumentRegistry) -> Self {
        self.instruments = instruments;
        self
    }

    pub fn timeline(mut self, timeline: TimelineConfig) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Repair out-of-range values, logging each repair.
    ///
    /// Configuration mistakes degrade to defaults instead of failing the pass.
    pub fn sanitized(mut self) -> Self {
        if self.phrase_length < 2 {
            tracing::warn!(
                phrase_length = self.phrase_length,
                "phrase length too short, using default"
            );
            self.phrase_length = MusicalState::DEFAULT_PHRASE_LENGTH;
        }

        if !(self.base_duration.is_finite() && self.base_duration > 0.0) {
            tracing::warn!(
                base_duration = self.base_duration,
                "invalid base duration, using default"
            );
            self.base_duration = Self::DEFAULT_BASE_DURATION;
        }

        if !(0..=Self::MAX_ROOT_OCTAVE).contains(&self.root_octave) {
            let clamped = self.root_octave.clamp(0, Self::MAX_ROOT_OCTAVE);
            tracing::warn!(
                root_octave = self.root_octave,
                clamped,
                "root octave out of range"
            );
            self.root_octave = clamped;
        }

        let total = self.timeline.total_duration;
        if !(total.is_finite() && total > 0.0) {
            tracing::warn!(total_duration = total, "invalid timeline duration, using default");
            self.timeline.total_duration = TimelineConfig::DEFAULT_TOTAL_DURATION;
        }

        if self.instruments.enabled_count() == 0 {
            tracing::warn!("no instruments enabled; every note will use the fallback instrument");
        }

        self
    }

    /// Frequency of the tonic in Hz
    pub fn root_frequency(&self) -> f64 {
        self.root_note.frequency(self.root_octave)
    }
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            scale: Scale::Major,
            root_note: NoteName::C,
            root_octave: Self::DEFAULT_ROOT_OCTAVE,
            base_duration: Self::DEFAULT_BASE_DURATION,
            phrase_length: MusicalState::DEFAULT_PHRASE_LENGTH,
            instruments: InstrumentRegistry::default(),
            family_preferences: FamilyPreferences::default(),
            timeline: TimelineConfig::default(),
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = MappingConfig::default();
        assert_eq!(config.clone().sanitized(), config);
        assert!((config.root_frequency() - 261.63).abs() < 0.01);
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let config = MappingConfig::default()
            .phrase_length(1)
            .base_duration(-2.0)
            .root(NoteName::A, 12)
            .timeline(TimelineConfig {
                total_duration: f64::NAN,
                ..TimelineConfig::default()
            })
            .sanitized();

        assert_eq!(config.phrase_length, 8);
        assert_eq!(config.base_duration, MappingConfig::DEFAULT_BASE_DURATION);
        assert_eq!(config.root_octave, MappingConfig::MAX_ROOT_OCTAVE);
        assert_eq!(config.timeline.total_duration, TimelineConfig::DEFAULT_TOTAL_DURATION);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_accepts_loose_and_unknown_scale_names() {
        let loose: MappingConfig = toml::from_str("scale = \"Harmonic Minor\"").unwrap();
        assert_eq!(loose.scale, Scale::HarmonicMinor);

        let unknown: MappingConfig = toml::from_str("scale = \"hungarian_gypsy\"").unwrap();
        assert_eq!(unknown.scale, Scale::Major);
        assert_eq!(unknown.scale.progression(), Scale::Major.progression());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn toml_reads_root_notes_as_written() {
        let sharp: MappingConfig = toml::from_str("root_note = \"F#\"\nroot_octave = 3").unwrap();
        assert_eq!(sharp.root_note, NoteName::Fs);
        assert_eq!(sharp.root_octave, 3);

        let flat: MappingConfig = toml::from_str("root_note = \"Bb\"").unwrap();
        assert_eq!(flat.root_note, NoteName::As);

        assert!(toml::from_str::<MappingConfig>("root_note = \"H\"").is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn names_serialize_the_way_they_display() {
        let scale = serde_json::to_value(Scale::WholeTone).unwrap();
        let root = serde_json::to_value(NoteName::Fs).unwrap();
        assert_eq!(scale, "whole_tone");
        assert_eq!(root, "F#");

        assert_eq!(serde_json::from_value::<Scale>(scale).unwrap(), Scale::WholeTone);
        assert_eq!(serde_json::from_value::<NoteName>(root).unwrap(), NoteName::Fs);
    }

    #[test]
    fn sanitize_keeps_empty_registry() {
        let config = MappingConfig::default()
            .instruments(InstrumentRegistry::empty())
            .sanitized();
        assert_eq!(config.instruments.enabled_count(), 0);
    }
}
