/*
Phrase Shape
============

Notes are grouped into fixed-length phrases (8 notes by default). The
position inside the phrase drives three independent shapes:

  position   0   1   2   3   4   5   6   7
             │                           │
             start                     end (cadence)
                     └── arch peak ──┘        pitch: +1 octave
             ╱‾‾‾‾‾‾‾‾‾‾‾╲                     velocity: crescendo → diminuendo
             ×3  ×.3  ×1  ×.3 ×1.5 ×.3 ×1  ×4  duration multipliers

The start anchors the chord root, the end resolves, the middle (index
length/2) gets a secondary accent.
*/

/// Position of one note inside its phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhrasePosition {
    index: usize,
    length: usize,
}

impl PhrasePosition {
    pub const MIN_LENGTH: usize = 2;

    /// Position of the `count`-th note (zero based) for a phrase length
    pub fn new(count: usize, length: usize) -> Self {
        let length = length.max(Self::MIN_LENGTH);
        Self {
            index: count % length,
            length,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_start(&self) -> bool {
        self.index == 0
    }

    pub fn is_end(&self) -> bool {
        self.index == self.length - 1
    }

    /// Exact middle of the phrase (index 4 of 8)
    pub fn is_middle(&self) -> bool {
        self.index == self.length / 2
    }

    pub fn is_boundary(&self) -> bool {
        self.is_start() || self.is_end()
    }

    pub fn is_odd(&self) -> bool {
        self.index % 2 == 1
    }

    /// Inner half of the phrase where the melody is lifted an octave
    pub fn in_arch_peak(&self) -> bool {
        self.index >= self.length / 4 && self.index < self.length * 3 / 4
    }

    /// Dynamics arch in `0.0..=1.0`: rises across the first half, falls
    /// across the second.
    pub fn arch(&self) -> f64 {
        let half = self.length / 2;
        if self.index < half {
            self.index as f64 / (half.saturating_sub(1)).max(1) as f64
        } else {
            let falling = self.length - 1 - self.index;
            falling as f64 / (self.length - half).saturating_sub(1).max(1) as f64
        }
    }
}
