//! Highlight board: the player's stand-in for a graph view.

use std::collections::VecDeque;

use sonic_graph::scheduler::VisualSink;

const HISTORY: usize = 12;

/// Node ids currently lit, plus a short trail of recent triggers
#[derive(Debug, Default)]
pub struct HighlightBoard {
    lit: Vec<String>,
    recent: VecDeque<String>,
}

impl HighlightBoard {
    pub fn lit(&self) -> &[String] {
        &self.lit
    }

    /// Most recent first
    pub fn recent(&self) -> impl Iterator<Item = &str> {
        self.recent.iter().rev().map(String::as_str)
    }
}

impl VisualSink for HighlightBoard {
    fn highlight(&mut self, node_id: &str) {
        if !self.lit.iter().any(|id| id == node_id) {
            self.lit.push(node_id.to_string());
        }
        if self.recent.len() == HISTORY {
            self.recent.pop_front();
        }
        self.recent.push_back(node_id.to_string());
    }

    fn unhighlight(&mut self, node_id: &str) {
        self.lit.retain(|id| id != node_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lights_once_and_clears() {
        let mut board = HighlightBoard::default();
        board.highlight("a");
        board.highlight("a");
        board.highlight("b");
        assert_eq!(board.lit(), ["a", "b"]);

        board.unhighlight("a");
        assert_eq!(board.lit(), ["b"]);
        assert_eq!(board.recent().collect::<Vec<_>>(), ["b", "a", "a"]);
    }

    #[test]
    fn history_is_bounded() {
        let mut board = HighlightBoard::default();
        for i in 0..50 {
            board.highlight(&format!("n{i}"));
        }
        assert_eq!(board.recent().count(), HISTORY);
        assert_eq!(board.recent().next(), Some("n49"));
    }
}
