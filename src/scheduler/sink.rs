use crate::mapping::NoteMapping;

/// Why the audio side refused a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// Message queue to the audio thread is full
    QueueFull,
    /// The synth rejected the note (unknown instrument, bad parameters, ...)
    Rejected(String),
    /// No audio output is running
    Unavailable,
}

impl std::fmt::Display for SinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SinkError::QueueFull => write!(f, "audio queue is full"),
            SinkError::Rejected(reason) => write!(f, "note rejected: {}", reason),
            SinkError::Unavailable => write!(f, "audio output unavailable"),
        }
    }
}

impl std::error::Error for SinkError {}

/// Where triggered notes go to be heard
pub trait AudioSink {
    /// Start `note` now. `timestamp` is the scheduler's clock reading at
    /// trigger time.
    fn play_note_immediate(&mut self, note: &NoteMapping, timestamp: f64) -> Result<(), SinkError>;
}

/// Where triggered notes go to be seen (graph node highlighting)
pub trait VisualSink {
    fn highlight(&mut self, node_id: &str);
    fn unhighlight(&mut self, node_id: &str);
}

/// Silent sink
impl AudioSink for () {
    fn play_note_immediate(
        &mut self,
        _note: &NoteMapping,
        _timestamp: f64,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Invisible sink
impl VisualSink for () {
    fn highlight(&mut self, _node_id: &str) {}
    fn unhighlight(&mut self, _node_id: &str) {}
}

impl<A: AudioSink + ?Sized> AudioSink for &mut A {
    fn play_note_immediate(&mut self, note: &NoteMapping, timestamp: f64) -> Result<(), SinkError> {
        (**self).play_note_immediate(note, timestamp)
    }
}

impl<V: VisualSink + ?Sized> VisualSink for &mut V {
    fn highlight(&mut self, node_id: &str) {
        (**self).highlight(node_id)
    }

    fn unhighlight(&mut self, node_id: &str) {
        (**self).unhighlight(node_id)
    }
}
