use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TonalError;

/*
Scales and Progressions
=======================

A scale is an ordered list of semitone offsets from the root. Index into that
list with a "scale degree" (0 = root, 1 = second, ...) to get a semitone.

    Major:        C  D  E  F  G  A  B
    semitones:    0  2  4  5  7  9  11
    degree:       0  1  2  3  4  5  6

A chord is written as a triple of scale degrees, not semitones. Stacking
every other degree gives the diatonic triad on any root:

    I   = [0, 2, 4]   C E G
    IV  = [3, 5, 0]   F A C
    V   = [4, 6, 1]   G B D
    vi  = [5, 0, 2]   A C E

Each scale carries one hand-picked 4-chord progression. The mapping engine
walks it while converting nodes to notes so consecutive notes share a
harmonic center. Indices always stay inside the scale's length, so short
scales (pentatonic, blues, whole tone) use their own triples.
*/

type Chord = [usize; 3];

const MAJOR: &[u8] = &[0, 2, 4, 5, 7, 9, 11];
const MINOR: &[u8] = &[0, 2, 3, 5, 7, 8, 10];
const DORIAN: &[u8] = &[0, 2, 3, 5, 7, 9, 10];
const PHRYGIAN: &[u8] = &[0, 1, 3, 5, 7, 8, 10];
const LYDIAN: &[u8] = &[0, 2, 4, 6, 7, 9, 11];
const MIXOLYDIAN: &[u8] = &[0, 2, 4, 5, 7, 9, 10];
const LOCRIAN: &[u8] = &[0, 1, 3, 5, 6, 8, 10];
const HARMONIC_MINOR: &[u8] = &[0, 2, 3, 5, 7, 8, 11];
const PENTATONIC: &[u8] = &[0, 2, 4, 7, 9];
const MINOR_PENTATONIC: &[u8] = &[0, 3, 5, 7, 10];
const BLUES: &[u8] = &[0, 3, 5, 6, 7, 10];
const WHOLE_TONE: &[u8] = &[0, 2, 4, 6, 8, 10];
const CHROMATIC: &[u8] = &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

// I - V - vi - IV
const MAJOR_PROGRESSION: &[Chord] = &[[0, 2, 4], [4, 6, 1], [5, 0, 2], [3, 5, 0]];
// i - VI - III - VII
const MINOR_PROGRESSION: &[Chord] = &[[0, 2, 4], [5, 0, 2], [2, 4, 6], [6, 1, 3]];
// i - IV - i - v
const DORIAN_PROGRESSION: &[Chord] = &[[0, 2, 4], [3, 5, 0], [0, 2, 4], [4, 6, 1]];
// i - II - VII - i
const PHRYGIAN_PROGRESSION: &[Chord] = &[[0, 2, 4], [1, 3, 5], [6, 1, 3], [0, 2, 4]];
// I - II - vii - I
const LYDIAN_PROGRESSION: &[Chord] = &[[0, 2, 4], [1, 3, 5], [6, 1, 3], [0, 2, 4]];
// I - VII - IV - I
const MIXOLYDIAN_PROGRESSION: &[Chord] = &[[0, 2, 4], [6, 1, 3], [3, 5, 0], [0, 2, 4]];
// i - II - v - i
const LOCRIAN_PROGRESSION: &[Chord] = &[[0, 2, 4], [1, 3, 5], [4, 6, 1], [0, 2, 4]];
// i - iv - V - i
const HARMONIC_MINOR_PROGRESSION: &[Chord] = &[[0, 2, 4], [3, 5, 0], [4, 6, 1], [0, 2, 4]];
const PENTATONIC_PROGRESSION: &[Chord] = &[[0, 2, 4], [1, 3, 0], [2, 4, 1], [3, 0, 2]];
const BLUES_PROGRESSION: &[Chord] = &[[0, 2, 4], [2, 4, 0], [3, 5, 1], [0, 2, 4]];
const WHOLE_TONE_PROGRESSION: &[Chord] = &[[0, 2, 4], [1, 3, 5], [0, 2, 4], [1, 3, 5]];
// Chromatic degrees are semitones, so these are plain major triads.
const CHROMATIC_PROGRESSION: &[Chord] = &[[0, 4, 7], [7, 11, 2], [9, 0, 4], [5, 9, 0]];

/// Musical scales the mapping engine can quantize to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Scale {
    #[default]
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Locrian,
    HarmonicMinor,
    Pentatonic,
    MinorPentatonic,
    Blues,
    WholeTone,
    Chromatic,
}

impl Scale {
    pub const ALL: [Scale; 13] = [
        Scale::Major,
        Scale::Minor,
        Scale::Dorian,
        Scale::Phrygian,
        Scale::Lydian,
        Scale::Mixolydian,
        Scale::Locrian,
        Scale::HarmonicMinor,
        Scale::Pentatonic,
        Scale::MinorPentatonic,
        Scale::Blues,
        Scale::WholeTone,
        Scale::Chromatic,
    ];

    /// Semitone offsets from the root, ascending.
    pub const fn intervals(self) -> &'static [u8] {
        match self {
            Scale::Major => MAJOR,
            Scale::Minor => MINOR,
            Scale::Dorian => DORIAN,
            Scale::Phrygian => PHRYGIAN,
            Scale::Lydian => LYDIAN,
            Scale::Mixolydian => MIXOLYDIAN,
            Scale::Locrian => LOCRIAN,
            Scale::HarmonicMinor => HARMONIC_MINOR,
            Scale::Pentatonic => PENTATONIC,
            Scale::MinorPentatonic => MINOR_PENTATONIC,
            Scale::Blues => BLUES,
            Scale::WholeTone => WHOLE_TONE,
            Scale::Chromatic => CHROMATIC,
        }
    }

    /// The scale's canonical chord progression as scale-degree triples.
    pub const fn progression(self) -> &'static [[usize; 3]] {
        match self {
            Scale::Major => MAJOR_PROGRESSION,
            Scale::Minor => MINOR_PROGRESSION,
            Scale::Dorian => DORIAN_PROGRESSION,
            Scale::Phrygian => PHRYGIAN_PROGRESSION,
            Scale::Lydian => LYDIAN_PROGRESSION,
            Scale::Mixolydian => MIXOLYDIAN_PROGRESSION,
            Scale::Locrian => LOCRIAN_PROGRESSION,
            Scale::HarmonicMinor => HARMONIC_MINOR_PROGRESSION,
            Scale::Pentatonic | Scale::MinorPentatonic => PENTATONIC_PROGRESSION,
            Scale::Blues => BLUES_PROGRESSION,
            Scale::WholeTone => WHOLE_TONE_PROGRESSION,
            Scale::Chromatic => CHROMATIC_PROGRESSION,
        }
    }

    /// Number of degrees in the scale
    pub const fn len(self) -> usize {
        self.intervals().len()
    }

    /// Semitone offset for a scale degree, wrapping past the octave.
    pub fn semitone(self, degree: usize) -> u8 {
        let intervals = self.intervals();
        intervals[degree % intervals.len()]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Scale::Major => "major",
            Scale::Minor => "minor",
            Scale::Dorian => "dorian",
            Scale::Phrygian => "phrygian",
            Scale::Lydian => "lydian",
            Scale::Mixolydian => "mixolydian",
            Scale::Locrian => "locrian",
            Scale::HarmonicMinor => "harmonic_minor",
            Scale::Pentatonic => "pentatonic",
            Scale::MinorPentatonic => "minor_pentatonic",
            Scale::Blues => "blues",
            Scale::WholeTone => "whole_tone",
            Scale::Chromatic => "chromatic",
        }
    }

    /// Lenient lookup used for host-provided names.
    ///
    /// Unknown names fall back to [`Scale::Major`] so the engine always has a
    /// table and a progression to work with.
    pub fn from_name(name: &str) -> Scale {
        match name.parse() {
            Ok(scale) => scale,
            Err(err) => {
                tracing::warn!(%err, "falling back to major scale");
                Scale::Major
            }
        }
    }
}

impl FromStr for Scale {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        let scale = match key.as_str() {
            "major" | "ionian" => Scale::Major,
            "minor" | "aeolian" | "naturalminor" => Scale::Minor,
            "dorian" => Scale::Dorian,
            "phrygian" => Scale::Phrygian,
            "lydian" => Scale::Lydian,
            "mixolydian" => Scale::Mixolydian,
            "locrian" => Scale::Locrian,
            "harmonicminor" | "harmonic" => Scale::HarmonicMinor,
            "pentatonic" | "majorpentatonic" | "penta" => Scale::Pentatonic,
            "minorpentatonic" => Scale::MinorPentatonic,
            "blues" => Scale::Blues,
            "wholetone" | "whole" => Scale::WholeTone,
            "chromatic" => Scale::Chromatic,
            _ => return Err(TonalError::UnknownScale(s.to_string())),
        };
        Ok(scale)
    }
}

impl From<String> for Scale {
    fn from(name: String) -> Self {
        Scale::from_name(&name)
    }
}

impl From<Scale> for String {
    fn from(scale: Scale) -> Self {
        scale.name().to_string()
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_lengths_are_within_bounds() {
        for scale in Scale::ALL {
            let len = scale.len();
            assert!((5..=12).contains(&len), "{scale} has {len} degrees");
        }
    }

    #[test]
    fn intervals_start_at_root_and_ascend() {
        for scale in Scale::ALL {
            let intervals = scale.intervals();
            assert_eq!(intervals[0], 0);
            assert!(intervals.windows(2).all(|w| w[0] < w[1]), "{scale} not ascending");
            assert!(*intervals.last().unwrap() < 12);
        }
    }

    #[test]
    fn progressions_stay_inside_scale() {
        for scale in Scale::ALL {
            let progression = scale.progression();
            assert_eq!(progression.len(), 4, "{scale} should have a 4-chord progression");
            for chord in progression {
                for &degree in chord {
                    assert!(degree < scale.len(), "{scale}: degree {degree} out of range");
                }
            }
        }
    }

    #[test]
    fn major_progression_is_one_five_six_four() {
        let roots: Vec<u8> = Scale::Major
            .progression()
            .iter()
            .map(|chord| Scale::Major.semitone(chord[0]))
            .collect();
        // C, G, A, F
        assert_eq!(roots, vec![0, 7, 9, 5]);
    }

    #[test]
    fn parses_loose_names() {
        assert_eq!("Harmonic Minor".parse::<Scale>().unwrap(), Scale::HarmonicMinor);
        assert_eq!("whole-tone".parse::<Scale>().unwrap(), Scale::WholeTone);
        assert_eq!("MAJOR".parse::<Scale>().unwrap(), Scale::Major);
        assert!(matches!("lydian-dominant".parse::<Scale>(), Err(TonalError::UnknownScale(_))));
    }

    #[test]
    fn unknown_names_fall_back_to_major() {
        let scale = Scale::from_name("hungarian gypsy");
        assert_eq!(scale, Scale::Major);
        assert_eq!(scale.progression(), Scale::Major.progression());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for scale in Scale::ALL {
            assert_eq!(scale.to_string().parse::<Scale>().unwrap(), scale);
        }
    }

    #[test]
    fn semitone_wraps_degrees() {
        assert_eq!(Scale::Pentatonic.semitone(5), 0);
        assert_eq!(Scale::Pentatonic.semitone(6), 2);
    }
}
