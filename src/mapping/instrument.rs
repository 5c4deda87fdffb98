use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::NodeType;

use super::hash::TitleHasher;

/// Returned when no instrument at all is enabled
pub const FALLBACK_INSTRUMENT: &str = "piano";

/// Instruments that belong to no family. Still selectable as a fallback.
pub const UNGROUPED_INSTRUMENTS: &[&str] = &["choir", "vocal_pads"];

/// Coarse timbre groups used for content-aware instrument choice
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentFamily {
    Keyboard,
    Strings,
    Woodwinds,
    Brass,
    Electronic,
    Experimental,
}

impl InstrumentFamily {
    pub const ALL: [InstrumentFamily; 6] = [
        InstrumentFamily::Keyboard,
        InstrumentFamily::Strings,
        InstrumentFamily::Woodwinds,
        InstrumentFamily::Brass,
        InstrumentFamily::Electronic,
        InstrumentFamily::Experimental,
    ];

    /// Instrument keys in this family, in selection order
    pub const fn members(self) -> &'static [&'static str] {
        match self {
            InstrumentFamily::Keyboard => {
                &["piano", "organ", "electric_piano", "harpsichord", "celesta"]
            }
            InstrumentFamily::Strings => {
                &["strings", "violin", "cello", "contrabass", "guitar", "harp"]
            }
            InstrumentFamily::Woodwinds => &["flute", "clarinet", "saxophone", "oboe"],
            InstrumentFamily::Brass => &["trumpet", "french_horn", "trombone", "tuba"],
            InstrumentFamily::Electronic => &["lead_synth", "bass_synth", "arp_synth", "pad"],
            InstrumentFamily::Experimental => &["whale_humpback", "gong", "tibetan_bowl"],
        }
    }

    /// Family of an instrument key, if it belongs to one
    pub fn of(instrument: &str) -> Option<InstrumentFamily> {
        Self::ALL
            .into_iter()
            .find(|family| family.members().contains(&instrument))
    }

    /// Default family preference order for a content type
    pub const fn preferred_for(node_type: NodeType) -> &'static [InstrumentFamily] {
        use InstrumentFamily::*;
        match node_type {
            NodeType::Note => &[Keyboard, Strings],
            NodeType::Image => &[Strings, Woodwinds],
            NodeType::Pdf => &[Brass, Keyboard],
            NodeType::Audio => &[Woodwinds, Electronic],
            NodeType::Video => &[Strings, Brass],
            NodeType::Other => &[Electronic, Experimental],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            InstrumentFamily::Keyboard => "keyboard",
            InstrumentFamily::Strings => "strings",
            InstrumentFamily::Woodwinds => "woodwinds",
            InstrumentFamily::Brass => "brass",
            InstrumentFamily::Electronic => "electronic",
            InstrumentFamily::Experimental => "experimental",
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentSettings {
    pub enabled: bool,
}

/// Instrument key → settings, read once per mapping pass
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentRegistry {
    instruments: BTreeMap<String, InstrumentSettings>,
}

impl InstrumentRegistry {
    /// Registry with nothing in it
    pub fn empty() -> Self {
        Self {
            instruments: BTreeMap::new(),
        }
    }

    /// Registry where exactly the given keys are enabled
    pub fn with_enabled<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::empty();
        for key in keys {
            registry.set_enabled(key, true);
        }
        registry
    }

    pub fn set_enabled(&mut self, key: impl Into<String>, enabled: bool) {
        self.instruments
            .insert(key.into(), InstrumentSettings { enabled });
    }

    pub fn is_enabled(&self, key: &str) -> bool {
        self.instruments.get(key).is_some_and(|s| s.enabled)
    }

    /// Enabled keys in sorted order
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.instruments
            .iter()
            .filter(|(_, s)| s.enabled)
            .map(|(k, _)| k.as_str())
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled().count()
    }
}

impl Default for InstrumentRegistry {
    /// The whole catalogue, all enabled
    fn default() -> Self {
        let families = InstrumentFamily::ALL.into_iter().flat_map(|f| f.members());
        Self::with_enabled(families.chain(UNGROUPED_INSTRUMENTS).copied())
    }
}

/// Per-type overrides of the family preference table
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FamilyPreferences {
    overrides: BTreeMap<NodeType, Vec<InstrumentFamily>>,
}

impl FamilyPreferences {
    pub fn set(&mut self, node_type: NodeType, families: Vec<InstrumentFamily>) {
        self.overrides.insert(node_type, families);
    }

    pub fn for_type(&self, node_type: NodeType) -> &[InstrumentFamily] {
        match self.overrides.get(&node_type) {
            Some(families) => families.as_slice(),
            None => InstrumentFamily::preferred_for(node_type),
        }
    }
}

/// Choose an enabled instrument for a content type.
///
/// Walks the type's preferred families in order and picks from the first one
/// with an enabled member. Falls back to enabled instruments outside every
/// family, then to anything enabled, then to [`FALLBACK_INSTRUMENT`].
pub fn select_instrument<'a>(
    node_type: NodeType,
    registry: &'a InstrumentRegistry,
    preferences: &FamilyPreferences,
    hasher: &TitleHasher,
) -> &'a str {
    for &family in preferences.for_type(node_type) {
        let candidates: Vec<&'static str> = family
            .members()
            .iter()
            .copied()
            .filter(|key| registry.is_enabled(key))
            .collect();
        if candidates.is_empty() {
            continue;
        }
        let seed = format!("{}{}", node_type.name(), family.name());
        let pick = hasher.hash(&seed).unsigned_abs() as usize % candidates.len();
        return candidates[pick];
    }

    let ungrouped: Vec<&'a str> = registry
        .enabled()
        .filter(|key| InstrumentFamily::of(key).is_none())
        .collect();
    let pool: Vec<&'a str> = if ungrouped.is_empty() {
        registry.enabled().collect()
    } else {
        ungrouped
    };

    if pool.is_empty() {
        tracing::warn!(
            node_type = %node_type,
            fallback = FALLBACK_INSTRUMENT,
            "no instruments enabled"
        );
        return FALLBACK_INSTRUMENT;
    }

    let pick = hasher.hash(node_type.name()).unsigned_abs() as usize % pool.len();
    pool[pick]
}
