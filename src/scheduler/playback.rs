use crate::mapping::NoteMapping;

use super::sink::{AudioSink, VisualSink};

/*
Poll-Driven Playback
====================

One timer calls `poll(now)` every ~100 ms. Each poll walks a cursor over the
timing-sorted notes:

    notes:   [a @0.0] [b @0.05] [c @0.4] [d @1.2] ...
                 ^cursor
    elapsed = now - start_time

    while notes[cursor].timing <= elapsed + TRIGGER_TOLERANCE:
        cursor += 1            (advance FIRST: a note fires at most once,
        highlight + play        even if the audio sink fails)

The tolerance lets a note that is due just after this poll fire now instead
of a whole interval late.

Highlights live until `trigger time + duration` and are swept on every poll.
Playback completes once every note has fired and the longest note has had
time to ring out:

    elapsed > max(timing + duration) + COMPLETION_BUFFER

State machine:

    Idle ──start──> Scheduled ──poll──> Completed
                       │  │
                       │  └──pause──> Paused
                       └──stop───> Stopped

Stop and pause apply from every started state, Completed included. Any
non-Scheduled state may `start` again.
*/

/// Notes due this close to the current poll fire now
pub const TRIGGER_TOLERANCE: f64 = 0.05;
/// Ring-out time after the last note before playback counts as complete
pub const COMPLETION_BUFFER: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    #[default]
    Idle,
    Scheduled,
    /// Stopped by the user; the position is not kept
    Paused,
    Completed,
    Stopped,
}

impl SchedulerState {
    pub const fn name(self) -> &'static str {
        match self {
            SchedulerState::Idle => "idle",
            SchedulerState::Scheduled => "playing",
            SchedulerState::Paused => "paused",
            SchedulerState::Completed => "completed",
            SchedulerState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A node currently lit up in the graph view
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub node_id: String,
    /// Clock time at which the highlight is removed
    pub until: f64,
}

/// What one `poll` did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    pub triggered: usize,
    /// Triggered notes the audio sink refused
    pub failed: usize,
    pub expired: usize,
    pub completed: bool,
}

/// Running totals since the last `start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    pub triggered: usize,
    pub failed: usize,
    pub expired: usize,
}

/// Realtime note scheduler
#[derive(Debug, Default)]
pub struct Scheduler {
    /// Notes sorted by timing
    notes: Vec<NoteMapping>,
    /// Index of the next note to trigger
    cursor: usize,
    /// Clock time of `timing == 0`
    start_time: f64,
    /// Latest `timing + duration` over all notes
    playback_end: f64,
    /// Elapsed time at the last poll, kept after playback ends
    last_elapsed: f64,
    state: SchedulerState,
    active: Vec<Highlight>,
    stats: SchedulerStats,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `notes` relative to clock time `start_time`.
    ///
    /// Returns `false` (and changes nothing) for an empty list or while a
    /// playback is already scheduled.
    pub fn start(&mut self, notes: Vec<NoteMapping>, start_time: f64) -> bool {
        if self.state == SchedulerState::Scheduled {
            tracing::warn!("playback already scheduled; stop it before starting again");
            return false;
        }

        let total = notes.len();
        let mut notes: Vec<NoteMapping> = notes
            .into_iter()
            .filter(|n| n.timing.is_finite() && n.duration.is_finite())
            .collect();
        if notes.len() < total {
            tracing::warn!(
                dropped = total - notes.len(),
                "ignoring notes with non-finite timing or duration"
            );
        }

        if notes.is_empty() {
            tracing::warn!("no notes to schedule");
            return false;
        }

        if !notes.windows(2).all(|w| w[0].timing <= w[1].timing) {
            tracing::warn!("notes not sorted by timing; sorting");
            notes.sort_by(|a, b| a.timing.total_cmp(&b.timing));
        }

        self.playback_end = notes
            .iter()
            .map(NoteMapping::end)
            .fold(f64::NEG_INFINITY, f64::max);
        self.notes = notes;
        self.cursor = 0;
        self.start_time = start_time;
        self.last_elapsed = 0.0;
        self.active.clear();
        self.stats = SchedulerStats::default();
        self.state = SchedulerState::Scheduled;

        tracing::info!(
            notes = self.notes.len(),
            length = self.playback_end,
            "playback scheduled"
        );
        true
    }

    /// Advance playback to clock time `now`.
    ///
    /// Does nothing unless a playback is scheduled. Sink failures are logged
    /// and counted, never returned.
    pub fn poll<A, V>(&mut self, now: f64, audio: &mut A, visual: &mut V) -> TickReport
    where
        A: AudioSink + ?Sized,
        V: VisualSink + ?Sized,
    {
        let mut report = TickReport::default();
        if self.state != SchedulerState::Scheduled {
            return report;
        }

        let elapsed = now - self.start_time;
        self.last_elapsed = elapsed.max(0.0);

        while let Some(note) = self.notes.get(self.cursor) {
            if note.timing > elapsed + TRIGGER_TOLERANCE {
                break;
            }
            self.cursor += 1;

            visual.highlight(&note.node_id);
            if let Err(err) = audio.play_note_immediate(note, now) {
                tracing::warn!(node = %note.node_id, error = %err, "failed to play note");
                report.failed += 1;
            }
            tracing::debug!(
                node = %note.node_id,
                timing = note.timing,
                elapsed,
                pitch = note.pitch,
                instrument = %note.instrument,
                "note triggered"
            );

            let until = now + note.duration;
            match self.active.iter_mut().find(|h| h.node_id == note.node_id) {
                Some(highlight) => highlight.until = highlight.until.max(until),
                None => self.active.push(Highlight {
                    node_id: note.node_id.clone(),
                    until,
                }),
            }
            report.triggered += 1;
        }

        self.active.retain(|h| {
            if now >= h.until {
                visual.unhighlight(&h.node_id);
                report.expired += 1;
                false
            } else {
                true
            }
        });

        self.stats.triggered += report.triggered;
        self.stats.failed += report.failed;
        self.stats.expired += report.expired;

        if self.cursor >= self.notes.len() && elapsed > self.playback_end + COMPLETION_BUFFER {
            self.clear_highlights(visual);
            self.state = SchedulerState::Completed;
            report.completed = true;
            tracing::info!(
                triggered = self.stats.triggered,
                failed = self.stats.failed,
                "playback completed"
            );
        }

        report
    }

    /// Stop playback and drop the schedule. Safe to call repeatedly.
    pub fn stop<V: VisualSink + ?Sized>(&mut self, visual: &mut V) {
        self.halt(SchedulerState::Stopped, visual);
    }

    /// Same as [`Scheduler::stop`]; resuming is not supported, `start` again
    /// to replay.
    pub fn pause<V: VisualSink + ?Sized>(&mut self, visual: &mut V) {
        self.halt(SchedulerState::Paused, visual);
    }

    fn halt<V: VisualSink + ?Sized>(&mut self, next: SchedulerState, visual: &mut V) {
        self.clear_highlights(visual);
        self.notes.clear();
        self.cursor = 0;

        // Idle has nothing to halt
        if self.state != SchedulerState::Idle && self.state != next {
            tracing::info!(
                from = %self.state,
                state = %next,
                triggered = self.stats.triggered,
                "playback halted"
            );
            self.state = next;
        }
    }

    fn clear_highlights<V: VisualSink + ?Sized>(&mut self, visual: &mut V) {
        for highlight in self.active.drain(..) {
            visual.unhighlight(&highlight.node_id);
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == SchedulerState::Scheduled
    }

    /// Seconds since `start_time`; frozen at the last poll once playback ends
    pub fn elapsed(&self, now: f64) -> f64 {
        match self.state {
            SchedulerState::Scheduled => (now - self.start_time).max(0.0),
            SchedulerState::Idle => 0.0,
            _ => self.last_elapsed,
        }
    }

    /// Fraction of the playback length covered, 0.0..=1.0
    pub fn progress(&self, now: f64) -> f64 {
        match self.state {
            SchedulerState::Idle => 0.0,
            SchedulerState::Completed => 1.0,
            _ if self.playback_end <= 0.0 => 0.0,
            _ => (self.elapsed(now) / self.playback_end).clamp(0.0, 1.0),
        }
    }

    /// Highlights in trigger order
    pub fn active_highlights(&self) -> &[Highlight] {
        &self.active
    }

    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Notes in the current schedule
    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    /// Scheduled notes that have not fired yet
    pub fn remaining(&self) -> usize {
        self.notes.len() - self.cursor
    }
}
