use crate::graph::GraphNode;

use super::hash::TitleHasher;
use super::phrase::PhrasePosition;
use super::state::ChordContext;

pub const MIN_VELOCITY: f64 = 0.1;
pub const MAX_VELOCITY: f64 = 1.0;

const BASE_VELOCITY: f64 = 0.5;
/// Peak of the crescendo/diminuendo arch
const ARCH_DEPTH: f64 = 0.4;

const START_ACCENT: f64 = 0.5;
const MIDDLE_ACCENT: f64 = 0.3;
const CADENCE_ACCENT: f64 = 0.6;
const OFFBEAT_DROP: f64 = -0.3;

const CONNECTION_BONUS_PER_LINK: f64 = 0.02;
const MAX_CONNECTION_BONUS: f64 = 0.2;
const TEXT_BONUS: f64 = 0.1;
/// ± humanization range
const HUMANIZE: f64 = 0.05;

/// Loudness in `0.1..=1.0` for a node at a phrase position.
pub fn map_velocity(
    node: &GraphNode,
    phrase: PhrasePosition,
    chord: &ChordContext,
    hasher: &TitleHasher,
) -> f64 {
    let mut velocity = BASE_VELOCITY + phrase.arch() * ARCH_DEPTH;

    velocity += if phrase.is_start() {
        START_ACCENT
    } else if phrase.is_middle() {
        MIDDLE_ACCENT
    } else if phrase.is_end() && chord.is_final {
        CADENCE_ACCENT
    } else if phrase.is_odd() {
        OFFBEAT_DROP
    } else {
        0.0
    };

    velocity +=
        (node.connection_count() as f64 * CONNECTION_BONUS_PER_LINK).min(MAX_CONNECTION_BONUS);

    if node.node_type.is_text_like() {
        velocity += TEXT_BONUS;
    }

    // 0..=100 → -0.05..=+0.05
    let jitter = (hasher.roll(&node.title, "humanize") % 101) as f64 / 100.0;
    velocity += (jitter * 2.0 - 1.0) * HUMANIZE;

    velocity.clamp(MIN_VELOCITY, MAX_VELOCITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;

    const PLAIN_CHORD: ChordContext = ChordContext {
        tones: [0, 2, 4],
        index: 0,
        is_final: false,
    };
    const FINAL_CHORD: ChordContext = ChordContext {
        tones: [3, 5, 0],
        index: 3,
        is_final: true,
    };

    fn image(title: &str) -> GraphNode {
        GraphNode::new(title, title, "pic.png")
    }

    fn velocity_at(node: &GraphNode, index: usize, chord: &ChordContext) -> f64 {
        map_velocity(node, PhrasePosition::new(index, 8), chord, &TitleHasher::new())
    }

    #[test]
    fn phrase_start_is_accented() {
        let n = image("Sunset");
        // 0.5 base + 0.5 accent ± 0.05
        let v = velocity_at(&n, 0, &PLAIN_CHORD);
        assert!(v >= 0.95);
    }

    #[test]
    fn offbeats_are_softer_than_downbeats() {
        let n = image("Harbor");
        assert!(velocity_at(&n, 1, &PLAIN_CHORD) < velocity_at(&n, 2, &PLAIN_CHORD));
    }

    #[test]
    fn final_cadence_is_accented_only_on_last_chord() {
        let n = image("Coda");
        let cadence = velocity_at(&n, 7, &FINAL_CHORD);
        let half_cadence = velocity_at(&n, 7, &PLAIN_CHORD);
        assert!((cadence - half_cadence - 0.9).abs() < 1e-9 || cadence == MAX_VELOCITY);
        assert!(half_cadence < 0.3);
    }

    #[test]
    fn text_and_links_add_weight() {
        let hasher = TitleHasher::new();
        // offbeat keeps every variant well under the ceiling
        let phrase = PhrasePosition::new(1, 8);
        let plain = GraphNode::new("x", "Same", "same.png");
        let linked = plain
            .clone()
            .with_connections((0..50).map(|i| i.to_string()));
        let text = plain.clone().with_type(NodeType::Note);

        let base = map_velocity(&plain, phrase, &PLAIN_CHORD, &hasher);
        let with_links = map_velocity(&linked, phrase, &PLAIN_CHORD, &hasher);
        let with_text = map_velocity(&text, phrase, &PLAIN_CHORD, &hasher);

        assert!((with_links - base - MAX_CONNECTION_BONUS).abs() < 1e-9);
        assert!((with_text - base - TEXT_BONUS).abs() < 1e-9);
    }

    #[test]
    fn always_within_range() {
        let hasher = TitleHasher::seeded(Some(11));
        for i in 0..300 {
            let n = GraphNode::new("n", format!("title {i}"), "a.md")
                .with_connections((0..i % 30).map(|c| c.to_string()));
            for index in 0..8 {
                for chord in [PLAIN_CHORD, FINAL_CHORD] {
                    let v = map_velocity(&n, PhrasePosition::new(index, 8), &chord, &hasher);
                    assert!((MIN_VELOCITY..=MAX_VELOCITY).contains(&v));
                }
            }
        }
    }
}
