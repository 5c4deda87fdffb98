#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer};

use crate::mapping::{InstrumentFamily, NoteMapping};

#[cfg(feature = "rtrb")]
use super::sink::{AudioSink, SinkError};

/// Control-thread to audio-thread message.
///
/// `Copy` and allocation-free so it can cross a lock-free ring.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlaybackMessage {
    NoteOn {
        frequency: f32,
        velocity: f32,
        /// Seconds until release
        duration: f32,
        family: Option<InstrumentFamily>,
    },
    AllNotesOff,
}

impl PlaybackMessage {
    pub fn note_on(note: &NoteMapping) -> Self {
        PlaybackMessage::NoteOn {
            frequency: note.pitch as f32,
            velocity: note.velocity as f32,
            duration: note.duration as f32,
            family: note.family(),
        }
    }
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<PlaybackMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<PlaybackMessage> {
    fn pop(&mut self) -> Option<PlaybackMessage> {
        Consumer::pop(self).ok()
    }
}

#[cfg(feature = "rtrb")]
impl AudioSink for Producer<PlaybackMessage> {
    fn play_note_immediate(
        &mut self,
        note: &NoteMapping,
        _timestamp: f64,
    ) -> Result<(), SinkError> {
        self.push(PlaybackMessage::note_on(note)).map_err(|_| SinkError::QueueFull)
    }
}
