//! Node panels: what is sounding now and what comes next

use std::collections::HashMap;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use sonic_graph::NoteMapping;

use super::board::HighlightBoard;

fn title<'a>(titles: &'a HashMap<String, String>, id: &'a str) -> &'a str {
    titles.get(id).map_or(id, String::as_str)
}

pub fn render_lit(
    frame: &mut Frame,
    area: Rect,
    board: &HighlightBoard,
    titles: &HashMap<String, String>,
) {
    let lit = board.lit();
    let sounding = lit.iter().map(|id| {
        ListItem::new(Line::from(Span::styled(
            format!(" ● {}", title(titles, id)),
            Style::default().fg(Color::Yellow),
        )))
    });
    // Recently played nodes that have already faded
    let faded = board
        .recent()
        .filter(|id| !lit.iter().any(|lit_id| lit_id.as_str() == *id))
        .map(|id| {
            ListItem::new(Line::from(Span::styled(
                format!("   {}", title(titles, id)),
                Style::default().fg(Color::DarkGray),
            )))
        });
    let items: Vec<ListItem> = sounding.chain(faded).collect();

    let block = Block::default().title(" Highlighted ").borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}

pub fn render_upcoming(
    frame: &mut Frame,
    area: Rect,
    upcoming: &[NoteMapping],
    titles: &HashMap<String, String>,
) {
    let rows = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = upcoming
        .iter()
        .take(rows)
        .map(|note| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {:>6.2}s ", note.timing),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:>7.1} Hz ", note.pitch),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(
                    format!("{:<14} ", note.instrument),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(title(titles, &note.node_id).to_string()),
            ]))
        })
        .collect();

    let block = Block::default().title(" Up next ").borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}
