/*
Note Names and Equal Temperament
================================

Roots are chosen by pitch class (C, C#, D, ...) plus an octave. Octave
numbering follows scientific pitch notation, so middle C is C4 and the
tuning reference A4 sits at 440 Hz.

The MIDI formula: note_number = 12 * (octave + 1) + semitone
Where semitone: C=0, C#=1, D=2, D#=3, E=4, F=5, F#=6, G=7, G#=8, A=9, A#=10, B=11

Frequency from a MIDI note number (12-tone equal temperament):

    f = 440 * 2^((midi - 69) / 12)

Example: C4 = MIDI 60 → 440 * 2^(-9/12) ≈ 261.63 Hz
*/

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::TonalError;

/// A4, the tuning reference
pub const A4_MIDI: u8 = 69;
pub const A4_FREQUENCY: f64 = 440.0;

/// Convert a (possibly fractional) MIDI note number to Hz.
pub fn midi_to_frequency(midi: f64) -> f64 {
    A4_FREQUENCY * 2f64.powf((midi - A4_MIDI as f64) / 12.0)
}

/// Pitch class of a root note. Sharps and flats share a variant.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NoteName {
    #[default]
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl NoteName {
    pub const ALL: [NoteName; 12] = [
        NoteName::C,
        NoteName::Cs,
        NoteName::D,
        NoteName::Ds,
        NoteName::E,
        NoteName::F,
        NoteName::Fs,
        NoteName::G,
        NoteName::Gs,
        NoteName::A,
        NoteName::As,
        NoteName::B,
    ];

    /// Semitones above C
    pub const fn semitone(self) -> u8 {
        self as u8
    }

    /// MIDI note number of this pitch class in the given octave
    pub fn midi(self, octave: i32) -> i32 {
        12 * (octave + 1) + self.semitone() as i32
    }

    /// Equal-tempered frequency in Hz
    pub fn frequency(self, octave: i32) -> f64 {
        midi_to_frequency(self.midi(octave) as f64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            NoteName::C => "C",
            NoteName::Cs => "C#",
            NoteName::D => "D",
            NoteName::Ds => "D#",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::Fs => "F#",
            NoteName::G => "G",
            NoteName::Gs => "G#",
            NoteName::A => "A",
            NoteName::As => "A#",
            NoteName::B => "B",
        }
    }
}

impl FromStr for NoteName {
    type Err = TonalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .map(|c| c.to_ascii_uppercase())
            .ok_or_else(|| TonalError::UnknownNote(s.to_string()))?;

        let natural: i32 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(TonalError::UnknownNote(s.to_string())),
        };

        let accidental: i32 = match chars.as_str().to_ascii_lowercase().as_str() {
            "" => 0,
            "#" | "s" | "♯" => 1,
            "b" | "f" | "♭" => -1,
            _ => return Err(TonalError::UnknownNote(s.to_string())),
        };

        let semitone = (natural + accidental).rem_euclid(12) as usize;
        Ok(NoteName::ALL[semitone])
    }
}

impl TryFrom<String> for NoteName {
    type Error = TonalError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

impl From<NoteName> for String {
    fn from(note: NoteName) -> Self {
        note.name().to_string()
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn middle_c_is_60() {
        assert_eq!(NoteName::C.midi(4), 60);
    }

    #[test]
    fn a440_is_69() {
        assert_eq!(NoteName::A.midi(4), 69);
        assert!(approx(NoteName::A.frequency(4), 440.0));
    }

    #[test]
    fn middle_c_frequency() {
        assert!(approx(NoteName::C.frequency(4), 261.63));
    }

    #[test]
    fn octaves_double_frequency() {
        let c4 = NoteName::C.frequency(4);
        let c5 = NoteName::C.frequency(5);
        assert!(approx(c5 / c4, 2.0));
    }

    #[test]
    fn sharps_and_flats_are_equal() {
        assert_eq!("C#".parse::<NoteName>().unwrap(), NoteName::Cs);
        assert_eq!("Db".parse::<NoteName>().unwrap(), NoteName::Cs);
        assert_eq!("gb".parse::<NoteName>().unwrap(), NoteName::Fs);
        assert_eq!("As".parse::<NoteName>().unwrap(), NoteName::As);
    }

    #[test]
    fn flats_wrap_around_c() {
        assert_eq!("Cb".parse::<NoteName>().unwrap(), NoteName::B);
        assert_eq!("B#".parse::<NoteName>().unwrap(), NoteName::C);
    }

    #[test]
    fn rejects_garbage() {
        assert!("H".parse::<NoteName>().is_err());
        assert!("".parse::<NoteName>().is_err());
        assert!("C##".parse::<NoteName>().is_err());
    }

    #[test]
    fn chromatic_scale() {
        for (i, note) in NoteName::ALL.iter().enumerate() {
            assert_eq!(note.midi(4), 60 + i as i32);
        }
    }
}
