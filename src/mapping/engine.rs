use crate::graph::{GraphNode, GraphSource};

use super::config::MappingConfig;
use super::dynamics::map_velocity;
use super::hash::TitleHasher;
use super::instrument::select_instrument;
use super::pitch::map_pitch;
use super::rhythm::map_duration;
use super::state::MusicalState;
use super::timeline;
use super::NoteMapping;

/// Converts graph nodes into notes.
///
/// The engine itself is immutable; all continuity lives in the
/// [`MusicalState`] passed to [`MappingEngine::map_node`], or in the fresh
/// state [`MappingEngine::map_nodes`] creates for each pass.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    config: MappingConfig,
    hasher: TitleHasher,
}

impl MappingEngine {
    pub fn new(config: MappingConfig) -> Self {
        let config = config.sanitized();
        let hasher = TitleHasher::seeded(config.seed);
        Self { config, hasher }
    }

    /// Same settings, different seed (the "re-roll" button)
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self.hasher = TitleHasher::seeded(seed);
        self
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Fresh continuity state sized for this engine's phrase length
    pub fn new_state(&self) -> MusicalState {
        MusicalState::new(self.config.phrase_length)
    }

    /// Map one node at a known onset, advancing `state`.
    pub fn map_node(&self, node: &GraphNode, timing: f64, state: &mut MusicalState) -> NoteMapping {
        state.ensure_progression(self.config.scale);
        let phrase = state.phrase_position();
        let chord = state.chord();

        let pitch = map_pitch(node, state, &self.config, &self.hasher);
        let duration = map_duration(node, phrase, self.config.base_duration, &self.hasher);
        let velocity = map_velocity(node, phrase, &chord, &self.hasher);
        let instrument = select_instrument(
            node.node_type,
            &self.config.instruments,
            &self.config.family_preferences,
            &self.hasher,
        );

        NoteMapping {
            node_id: node.id.clone(),
            pitch: pitch.frequency,
            duration,
            velocity,
            timing: timing.max(0.0),
            instrument: instrument.to_string(),
        }
    }

    /// Map a whole node set with a fresh [`MusicalState`].
    ///
    /// Nodes are visited in playback order, so phrases follow what the
    /// listener hears. The result is sorted by `timing`.
    pub fn map_nodes(&self, nodes: &[GraphNode]) -> Vec<NoteMapping> {
        let mut state = self.new_state();
        let notes: Vec<NoteMapping> = timeline::layout(nodes, &self.config.timeline)
            .into_iter()
            .map(|(i, timing)| self.map_node(&nodes[i], timing, &mut state))
            .collect();

        tracing::debug!(
            notes = notes.len(),
            scale = %self.config.scale,
            root = %self.config.root_note,
            seed = ?self.config.seed,
            "mapped node set"
        );
        notes
    }

    pub fn map_source<S: GraphSource + ?Sized>(&self, source: &S) -> Vec<NoteMapping> {
        self.map_nodes(source.nodes())
    }
}

impl Default for MappingEngine {
    fn default() -> Self {
        Self::new(MappingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::instrument::{InstrumentRegistry, FALLBACK_INSTRUMENT};
    use crate::mapping::timeline::{Spacing, TimelineConfig};
    use crate::tonal::Scale;

    fn vault() -> Vec<GraphNode> {
        (0..24)
            .map(|i| {
                GraphNode::new(
                    format!("n{i}"),
                    format!("Note number {i}"),
                    format!("dir{}/n{i}.md", i % 3),
                )
                .with_file_size(500 + i * 731)
                .with_connections((0..i % 5).map(|c| format!("n{c}")))
                .with_creation_date(1_000 + (i as i64 * 37) % 24)
            })
            .collect()
    }

    #[test]
    fn alpha_at_phrase_start() {
        let engine = MappingEngine::default();
        let mut state = engine.new_state();
        let alpha = GraphNode::new("alpha", "Alpha", "a/b.md").with_file_size(1024);

        let note = engine.map_node(&alpha, 0.0, &mut state);

        assert!((note.pitch - 261.63).abs() < 0.01);
        let expected = (0.3 + 1024f64.log10() / 10.0) * 3.0;
        assert!((note.duration - expected).abs() < 1e-12);
        assert_eq!(note.node_id, "alpha");
    }

    #[test]
    fn identical_runs_are_identical() {
        let engine = MappingEngine::default();
        assert_eq!(engine.map_nodes(&vault()), engine.map_nodes(&vault()));

        let other = MappingEngine::new(MappingConfig::default());
        assert_eq!(engine.map_nodes(&vault()), other.map_nodes(&vault()));
    }

    #[test]
    fn reroll_changes_the_melody_but_not_the_timeline() {
        let engine = MappingEngine::default();
        let first = engine.map_nodes(&vault());
        let rerolled = engine.clone().with_seed(Some(42)).map_nodes(&vault());

        assert_ne!(first, rerolled);
        let timings = |notes: &[NoteMapping]| notes.iter().map(|n| n.timing).collect::<Vec<_>>();
        assert_eq!(timings(&first), timings(&rerolled));

        let again = engine.with_seed(Some(42)).map_nodes(&vault());
        assert_eq!(rerolled, again);
    }

    #[test]
    fn output_is_sorted_and_covers_every_node() {
        let notes = MappingEngine::default().map_nodes(&vault());
        assert_eq!(notes.len(), 24);
        assert!(notes.windows(2).all(|w| w[0].timing <= w[1].timing));

        let mut ids: Vec<&str> = notes.iter().map(|n| n.node_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 24);
    }

    #[test]
    fn each_pass_starts_from_fresh_state() {
        let engine = MappingEngine::new(MappingConfig::default().timeline(TimelineConfig {
            total_duration: 12.0,
            spacing: Spacing::Sequential,
        }));
        let nodes = vault();
        let full = engine.map_nodes(&nodes);
        let again = engine.map_nodes(&nodes);
        assert_eq!(full[0], again[0]);
    }

    #[test]
    fn pitches_follow_the_scale() {
        let engine = MappingEngine::new(MappingConfig::default().scale(Scale::Pentatonic));
        let root = engine.config().root_frequency();
        for note in engine.map_nodes(&vault()) {
            let semitones = (12.0 * (note.pitch / root).log2()).round() as i32;
            let pitch_class = semitones.rem_euclid(12) as u8;
            assert!(Scale::Pentatonic.intervals().contains(&pitch_class), "{}", note.pitch);
        }
    }

    #[test]
    fn empty_registry_uses_fallback_instrument() {
        let engine = MappingEngine::new(
            MappingConfig::default().instruments(InstrumentRegistry::empty()),
        );
        assert!(engine
            .map_nodes(&vault())
            .iter()
            .all(|n| n.instrument == FALLBACK_INSTRUMENT));
    }

    #[test]
    fn maps_vaults_spanning_the_whole_date_range() {
        let nodes = vec![
            GraphNode::new("old", "Old", "old.md").with_creation_date(i64::MIN),
            GraphNode::new("new", "New", "new.md").with_creation_date(i64::MAX),
        ];
        let engine = MappingEngine::default();
        let notes = engine.map_nodes(&nodes);

        assert_eq!(notes[0].node_id, "old");
        assert_eq!(notes[0].timing, 0.0);
        assert_eq!(notes[1].node_id, "new");
        assert!((notes[1].timing - engine.config().timeline.total_duration).abs() < 1e-9);
    }

    #[test]
    fn maps_through_a_graph_source() {
        let nodes = vault();
        let engine = MappingEngine::default();
        assert_eq!(engine.map_source(nodes.as_slice()), engine.map_nodes(&nodes));
    }
}
