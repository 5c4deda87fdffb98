use crate::tonal::Scale;

use super::phrase::PhrasePosition;

/// Harmony in effect for one note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordContext {
    /// Scale degrees of the chord: root, third, fifth
    pub tones: [usize; 3],
    /// Position in the progression
    pub index: usize,
    /// Last chord of the progression (cadence target)
    pub is_final: bool,
}

impl ChordContext {
    pub fn root(&self) -> usize {
        self.tones[0]
    }

    pub fn fifth(&self) -> usize {
        self.tones[2]
    }
}

/// Melodic continuity carried across one sequence of node conversions.
///
/// One instance belongs to one playback session. Reset it (or make a new one)
/// when the node set, scale or seed changes; never share it between
/// independent passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MusicalState {
    pub last_scale_degree: Option<usize>,
    pub current_chord_index: usize,
    /// Progression resolved for the active scale, loaded on first use
    pub current_progression: Vec<[usize; 3]>,
    /// Notes mapped so far in this session
    pub notes_in_current_phrase: usize,
    pub phrase_length: usize,
    notes_since_chord_change: usize,
}

impl MusicalState {
    pub const DEFAULT_PHRASE_LENGTH: usize = 8;

    pub fn new(phrase_length: usize) -> Self {
        Self {
            last_scale_degree: None,
            current_chord_index: 0,
            current_progression: Vec::new(),
            notes_in_current_phrase: 0,
            phrase_length: phrase_length.max(PhrasePosition::MIN_LENGTH),
            notes_since_chord_change: 0,
        }
    }

    /// Forget all continuity, keeping the phrase length.
    pub fn reset(&mut self) {
        *self = Self::new(self.phrase_length);
    }

    /// Load the scale's progression if this is the first note of the session.
    pub fn ensure_progression(&mut self, scale: Scale) {
        if self.current_progression.is_empty() {
            self.current_progression = scale.progression().to_vec();
            self.current_chord_index = 0;
        }
    }

    pub fn phrase_position(&self) -> PhrasePosition {
        PhrasePosition::new(self.notes_in_current_phrase, self.phrase_length)
    }

    pub fn chord(&self) -> ChordContext {
        let len = self.current_progression.len();
        let index = if len == 0 { 0 } else { self.current_chord_index % len };
        ChordContext {
            tones: self
                .current_progression
                .get(index)
                .copied()
                .unwrap_or([0, 2, 4]),
            index,
            is_final: len > 0 && index == len - 1,
        }
    }

    /// Record a mapped note.
    ///
    /// `chord_change_after` is how many notes the current chord lasts; the
    /// chord advances once that many notes have been mapped under it.
    pub fn advance(&mut self, degree: usize, chord_change_after: usize) {
        self.last_scale_degree = Some(degree);
        self.notes_in_current_phrase += 1;
        self.notes_since_chord_change += 1;

        if self.notes_since_chord_change >= chord_change_after.max(1) {
            self.notes_since_chord_change = 0;
            if !self.current_progression.is_empty() {
                self.current_chord_index =
                    (self.current_chord_index + 1) % self.current_progression.len();
            }
        }
    }
}

impl Default for MusicalState {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PHRASE_LENGTH)
    }
}
