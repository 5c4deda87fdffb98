//! Transport bar: play state, position, counters and mapping settings

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use sonic_graph::mapping::MappingConfig;
use sonic_graph::scheduler::{SchedulerState, SchedulerStats};

/// Snapshot of everything the transport shows
pub struct TransportInfo<'a> {
    pub state: SchedulerState,
    pub elapsed: f64,
    pub length: f64,
    pub progress: f64,
    pub stats: SchedulerStats,
    pub note_count: usize,
    pub config: &'a MappingConfig,
    pub output: &'a str,
}

pub fn render_transport(frame: &mut Frame, area: Rect, info: &TransportInfo) {
    let block = Block::default().title(" sonic graph ").borders(Borders::ALL);

    let (symbol, color) = match info.state {
        SchedulerState::Scheduled => ("▶", Color::Green),
        SchedulerState::Completed => ("■", Color::Cyan),
        SchedulerState::Idle => ("·", Color::DarkGray),
        SchedulerState::Paused | SchedulerState::Stopped => ("⏸", Color::Yellow),
    };

    let seed = info
        .config
        .seed
        .map_or_else(|| "content".to_string(), |s| s.to_string());

    let line = Line::from(vec![
        Span::styled(format!(" {} {:<9} ", symbol, info.state), Style::default().fg(color)),
        Span::styled(
            format!("{:>6.1}s / {:.1}s  ", info.elapsed, info.length),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!(
                "{} notes  {} played  {} failed  ",
                info.note_count, info.stats.triggered, info.stats.failed
            ),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!(
                "{} {}{}  seed {}  ",
                info.config.scale, info.config.root_note, info.config.root_octave, seed
            ),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(info.output.to_string(), Style::default().fg(Color::Magenta)),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

pub fn render_progress(frame: &mut Frame, area: Rect, progress: f64) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress.clamp(0.0, 1.0));
    frame.render_widget(gauge, area);
}
