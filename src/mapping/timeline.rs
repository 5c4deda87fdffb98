#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::GraphNode;

/// How nodes are spread across the playback timeline
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Spacing {
    /// Position proportional to creation date (the vault "grows" over time)
    #[default]
    Chronological,
    /// Input order, evenly spaced (used for local soundscapes)
    Sequential,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineConfig {
    /// Seconds from the first to the last note onset
    pub total_duration: f64,
    pub spacing: Spacing,
}

impl TimelineConfig {
    pub const DEFAULT_TOTAL_DURATION: f64 = 60.0;
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            total_duration: Self::DEFAULT_TOTAL_DURATION,
            spacing: Spacing::Chronological,
        }
    }
}

/// Playback order for a node set: `(node index, onset seconds)`, ascending by
/// onset. Ties keep input order.
pub fn layout(nodes: &[GraphNode], config: &TimelineConfig) -> Vec<(usize, f64)> {
    let mut order: Vec<usize> = (0..nodes.len()).collect();

    let span = match config.spacing {
        Spacing::Chronological => {
            order.sort_by_key(|&i| nodes[i].creation_date);
            let first = order.first().map(|&i| nodes[i].creation_date);
            let last = order.last().map(|&i| nodes[i].creation_date);
            match (first, last) {
                (Some(first), Some(last)) if last > first => Some((first, last)),
                _ => None,
            }
        }
        Spacing::Sequential => None,
    };

    match span {
        Some((first, last)) => {
            // i128 so any pair of i64 timestamps fits
            let range = (last as i128 - first as i128) as f64;
            order
                .into_iter()
                .map(|i| {
                    let offset = (nodes[i].creation_date as i128 - first as i128) as f64;
                    (i, offset / range * config.total_duration)
                })
                .collect()
        }
        None => {
            let step = config.total_duration / nodes.len().max(1) as f64;
            order
                .into_iter()
                .enumerate()
                .map(|(slot, i)| (i, slot as f64 * step))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(id: &str, date: i64) -> GraphNode {
        GraphNode::new(id, id, format!("{id}.md")).with_creation_date(date)
    }

    #[test]
    fn chronological_spreads_by_date() {
        let nodes = vec![dated("late", 300), dated("early", 100), dated("mid", 200)];
        let config = TimelineConfig {
            total_duration: 10.0,
            spacing: Spacing::Chronological,
        };

        let timeline = layout(&nodes, &config);
        assert_eq!(timeline, vec![(1, 0.0), (2, 5.0), (0, 10.0)]);
    }

    #[test]
    fn equal_dates_fall_back_to_even_spacing() {
        let nodes = vec![dated("a", 5), dated("b", 5), dated("c", 5), dated("d", 5)];
        let config = TimelineConfig {
            total_duration: 8.0,
            spacing: Spacing::Chronological,
        };

        let timeline = layout(&nodes, &config);
        assert_eq!(timeline, vec![(0, 0.0), (1, 2.0), (2, 4.0), (3, 6.0)]);
    }

    #[test]
    fn sequential_keeps_input_order() {
        let nodes = vec![dated("z", 900), dated("y", 1)];
        let config = TimelineConfig {
            total_duration: 4.0,
            spacing: Spacing::Sequential,
        };

        assert_eq!(layout(&nodes, &config), vec![(0, 0.0), (1, 2.0)]);
    }

    #[test]
    fn onsets_are_sorted_and_non_negative() {
        let nodes: Vec<GraphNode> = (0..50)
            .map(|i| dated(&format!("n{i}"), (i * 7919) % 113))
            .collect();
        let timeline = layout(&nodes, &TimelineConfig::default());

        assert_eq!(timeline.len(), nodes.len());
        assert!(timeline.windows(2).all(|w| w[0].1 <= w[1].1));
        assert!(timeline.iter().all(|&(_, t)| t >= 0.0));
    }

    #[test]
    fn extreme_dates_do_not_overflow() {
        let nodes = vec![dated("max", i64::MAX), dated("zero", 0), dated("min", i64::MIN)];
        let config = TimelineConfig {
            total_duration: 10.0,
            spacing: Spacing::Chronological,
        };

        let timeline = layout(&nodes, &config);
        let order: Vec<usize> = timeline.iter().map(|&(i, _)| i).collect();
        assert_eq!(order, vec![2, 1, 0]);
        assert_eq!(timeline[0].1, 0.0);
        assert!((timeline[1].1 - 5.0).abs() < 1e-9);
        assert!((timeline[2].1 - 10.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_single_node_sets() {
        assert!(layout(&[], &TimelineConfig::default()).is_empty());
        assert_eq!(layout(&[dated("solo", 3)], &TimelineConfig::default()), vec![(0, 0.0)]);
    }
}
