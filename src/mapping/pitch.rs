use crate::graph::GraphNode;

use super::config::MappingConfig;
use super::hash::TitleHasher;
use super::phrase::PhrasePosition;
use super::state::{ChordContext, MusicalState};

/*
Pitch Selection
===============

Two questions per note: WHICH scale degree, and WHICH octave.

Degree (melody)
---------------
  phrase start   → chord root               (re-establish the tonal center)
  phrase end     → tonic on the final chord (full cadence)
                   chord root or fifth otherwise (half cadence)
  mid-phrase     → 70%: step ±1/±2 from the previous degree (smooth line)
                   30%: any chord tone                      (harmonic anchor)

The 70/30 split and every choice inside it come from hashing the node title,
so the melody is reproducible.

Octave (register)
-----------------
Three node features push the register around:

  log10(file size) / 10          bigger files sit higher
  -0.5 * min(links / 20, 1)      hubs sit lower (grounding)
  -0.3 * min(depth / 5, 1)       deeply nested files sit lower

The sum is rounded to whole octaves, then notes 2..=5 of every phrase get an
extra octave so each phrase rises and falls.

    f = root * 2^((semitone + 12 * octave) / 12)
*/

/// Steps available for stepwise motion
const MELODIC_STEPS: [isize; 4] = [-2, -1, 1, 2];
/// Percent of mid-phrase notes that move stepwise
const STEPWISE_PERCENT: u32 = 70;

pub const MIN_OCTAVE_OFFSET: i32 = -2;
pub const MAX_OCTAVE_OFFSET: i32 = 3;

/// Outcome of pitch selection for one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchChoice {
    pub degree: usize,
    pub semitone: u8,
    pub octave_offset: i32,
    /// Hz
    pub frequency: f64,
}

/// Pick a scale-quantized pitch for `node` and advance the melodic state.
///
/// Loads the scale's progression on the first call of a session. Phrase
/// position and chord are read before the state advances, so callers that
/// also need them should snapshot first.
pub fn map_pitch(
    node: &GraphNode,
    state: &mut MusicalState,
    config: &MappingConfig,
    hasher: &TitleHasher,
) -> PitchChoice {
    state.ensure_progression(config.scale);

    let phrase = state.phrase_position();
    let chord = state.chord();
    let scale_len = config.scale.len();

    let degree = select_degree(
        &node.title,
        phrase,
        &chord,
        state.last_scale_degree,
        scale_len,
        hasher,
    );
    let semitone = config.scale.semitone(degree);
    let octave_offset = octave_offset(node, phrase);

    let frequency = config.root_frequency()
        * 2f64.powf((semitone as f64 + 12.0 * octave_offset as f64) / 12.0);

    state.advance(degree, chord_change_after(&node.title, hasher));

    PitchChoice {
        degree,
        semitone,
        octave_offset,
        frequency,
    }
}

fn select_degree(
    title: &str,
    phrase: PhrasePosition,
    chord: &ChordContext,
    previous: Option<usize>,
    scale_len: usize,
    hasher: &TitleHasher,
) -> usize {
    let degree = if phrase.is_start() {
        chord.root()
    } else if phrase.is_end() {
        if chord.is_final {
            0
        } else if hasher.roll(title, "cadence") % 2 == 0 {
            chord.root()
        } else {
            chord.fifth()
        }
    } else {
        match previous {
            Some(last) if hasher.percent(title) < STEPWISE_PERCENT => {
                let step = MELODIC_STEPS[hasher.pick(title, "step", MELODIC_STEPS.len())];
                (last as isize + step).rem_euclid(scale_len as isize) as usize
            }
            _ => chord.tones[hasher.pick(title, "chord-tone", chord.tones.len())],
        }
    };

    degree % scale_len
}

/// Register shift in whole octaves from node size, links and folder depth
pub fn octave_offset(node: &GraphNode, phrase: PhrasePosition) -> i32 {
    let size = (node.file_size.max(1) as f64).log10() / 10.0;
    let grounding = (node.connection_count() as f64 / 20.0).min(1.0) * 0.5;
    let nesting = (node.path_depth() as f64 / 5.0).min(1.0) * 0.3;

    let mut octave = (size - grounding - nesting).round() as i32;
    if phrase.in_arch_peak() {
        octave += 1;
    }
    octave.clamp(MIN_OCTAVE_OFFSET, MAX_OCTAVE_OFFSET)
}

/// Notes until the next chord change: 4 to 8, varying with content
pub fn chord_change_after(title: &str, hasher: &TitleHasher) -> usize {
    4 + hasher.pick(title, "harmony", 5)
}
