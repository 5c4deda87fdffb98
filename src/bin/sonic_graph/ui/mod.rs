//! Terminal player
//!
//! The UI thread owns the scheduler: every frame it asks the poll timer
//! whether a scheduler tick is due, then redraws.

mod board;
mod highlights;
mod transport;

use std::collections::HashMap;
use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};

use sonic_graph::scheduler::{Clock, MonotonicClock, PollInterval, PollTimer, Scheduler};
use sonic_graph::{GraphNode, MappingEngine, NoteMapping};

use crate::audio::Output;

use board::HighlightBoard;

use highlights::{render_lit, render_upcoming};
use transport::{render_progress, render_transport, TransportInfo};

/// Redraw/input cadence, ~60 fps
const FRAME: Duration = Duration::from_millis(16);

pub struct UiApp {
    engine: MappingEngine,
    nodes: Vec<GraphNode>,
    notes: Vec<NoteMapping>,
    titles: HashMap<String, String>,
    /// Latest `timing + duration`, for the position display
    length: f64,
    scheduler: Scheduler,
    clock: MonotonicClock,
    timer: PollTimer,
    output: Output,
    output_label: String,
    board: HighlightBoard,
    should_quit: bool,
}

impl UiApp {
    pub fn new(engine: MappingEngine, nodes: Vec<GraphNode>, output: Output) -> Self {
        let titles = nodes
            .iter()
            .map(|n| (n.id.clone(), n.title.clone()))
            .collect();
        let output_label = output.describe();

        let mut app = Self {
            engine,
            nodes,
            notes: Vec::new(),
            titles,
            length: 0.0,
            scheduler: Scheduler::new(),
            clock: MonotonicClock::new(),
            timer: PollTimer::new(PollInterval::DEFAULT),
            output,
            output_label,
            board: HighlightBoard::default(),
            should_quit: false,
        };
        app.remap();
        app
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.play();

        while !self.should_quit {
            let now = self.clock.now();
            if self.timer.due(now) {
                self.scheduler.poll(now, &mut self.output, &mut self.board);
            }

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(FRAME)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.halt();
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                if self.scheduler.is_playing() {
                    self.halt();
                } else {
                    self.play();
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let seed = self.engine.config().seed.map_or(1, |s| s.wrapping_add(1));
                self.engine = self.engine.clone().with_seed(Some(seed));
                tracing::info!(seed, "re-rolled");
                self.halt();
                self.remap();
                self.play();
            }
            _ => {}
        }
    }

    fn remap(&mut self) {
        self.notes = self.engine.map_nodes(&self.nodes);
        self.length = self
            .notes
            .iter()
            .map(NoteMapping::end)
            .fold(0.0, f64::max);
        self.timer
            .reset(PollInterval::for_note_count(self.notes.len()));
    }

    fn play(&mut self) {
        if self.scheduler.start(self.notes.clone(), self.clock.now()) {
            self.timer
                .reset(PollInterval::for_note_count(self.notes.len()));
        }
    }

    fn halt(&mut self) {
        self.scheduler.stop(&mut self.board);
        self.output.silence();
    }

    fn render(&self, frame: &mut Frame) {
        let now = self.clock.now();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport
                Constraint::Length(3), // Progress
                Constraint::Min(6),    // Panels
                Constraint::Length(1), // Help
            ])
            .split(frame.area());

        let info = TransportInfo {
            state: self.scheduler.state(),
            elapsed: self.scheduler.elapsed(now),
            length: self.length,
            progress: self.scheduler.progress(now),
            stats: self.scheduler.stats(),
            note_count: self.notes.len(),
            config: self.engine.config(),
            output: &self.output_label,
        };
        render_transport(frame, chunks[0], &info);
        render_progress(frame, chunks[1], info.progress);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(chunks[2]);

        render_lit(frame, panels[0], &self.board, &self.titles);
        let next = self.scheduler.note_count() - self.scheduler.remaining();
        render_upcoming(frame, panels[1], &self.notes[next.min(self.notes.len())..], &self.titles);

        let help = Paragraph::new(" [Q] Quit  [Space] Stop/Replay  [R] Re-roll")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
