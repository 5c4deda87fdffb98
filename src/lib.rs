//! Sonify a note-link graph.
//!
//! [`mapping`] turns graph nodes into scale-aware notes, [`scheduler`] plays
//! them back in real time against a clock, an audio sink and a visual sink.

pub mod graph; // Node model and graph sources
pub mod mapping; // Node -> note conversion
pub mod scheduler; // Poll-driven playback
pub mod tonal; // Scales, chords, tuning

pub use graph::{GraphNode, GraphSource, NodeType, StaticGraph};
pub use mapping::{MappingConfig, MappingEngine, NoteMapping};
pub use scheduler::{Scheduler, SchedulerState};
