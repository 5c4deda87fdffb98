use crate::graph::GraphNode;

use super::hash::TitleHasher;
use super::phrase::PhrasePosition;

pub const MIN_DURATION: f64 = 0.05;
pub const MAX_DURATION: f64 = 3.0;
/// Near-silent "rest" length
pub const REST_DURATION: f64 = 0.05;
/// Cap on the file-size contribution
const MAX_SIZE_TERM: f64 = 0.3;

const START_STRETCH: f64 = 3.0;
const CADENCE_STRETCH: f64 = 4.0;
const MIDDLE_STRETCH: f64 = 1.5;
const OFFBEAT_SHORTEN: f64 = 0.3;
const SYNCOPATION: f64 = 0.4;

const SYNCOPATION_PERCENT: u32 = 5;
const REST_PERCENT: u32 = 10;

/// Note length in seconds for a node at a phrase position.
///
/// Phrase boundaries are stretched (emphasis, cadence), off-beats shortened.
/// Mid-phrase notes occasionally syncopate or collapse into a rest, decided
/// by title hash. Always within [`MIN_DURATION`]..=[`MAX_DURATION`].
pub fn map_duration(
    node: &GraphNode,
    phrase: PhrasePosition,
    base_duration: f64,
    hasher: &TitleHasher,
) -> f64 {
    let size = ((node.file_size.max(1) as f64).log10() / 10.0).min(MAX_SIZE_TERM);
    let mut duration = base_duration + size;

    let mut stretch = if phrase.is_start() {
        START_STRETCH
    } else if phrase.is_end() {
        CADENCE_STRETCH
    } else if phrase.is_middle() {
        MIDDLE_STRETCH
    } else if phrase.is_odd() {
        OFFBEAT_SHORTEN
    } else {
        1.0
    };

    if !phrase.is_boundary() {
        if hasher.roll(&node.title, "syncopation") % 100 < SYNCOPATION_PERCENT {
            stretch = SYNCOPATION;
        }
        duration *= stretch;
        if hasher.roll(&node.title, "rest") % 100 < REST_PERCENT {
            duration = REST_DURATION;
        }
    } else {
        duration *= stretch;
    }

    duration.clamp(MIN_DURATION, MAX_DURATION)
}
