use std::time::Duration;

use super::clock::Clock;
use super::playback::{Scheduler, SchedulerState};
use super::sink::{AudioSink, VisualSink};

/// How often the scheduler is polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollInterval(Duration);

impl PollInterval {
    pub const DEFAULT: PollInterval = PollInterval(Duration::from_millis(100));
    /// Used for very large schedules to keep per-poll work bounded
    pub const WIDE: PollInterval = PollInterval(Duration::from_millis(400));
    pub const WIDE_ABOVE_NOTES: usize = 400;

    pub fn for_note_count(notes: usize) -> Self {
        if notes > Self::WIDE_ABOVE_NOTES {
            Self::WIDE
        } else {
            Self::DEFAULT
        }
    }

    pub fn duration(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl Default for PollInterval {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<Duration> for PollInterval {
    fn from(duration: Duration) -> Self {
        PollInterval(duration)
    }
}

/// Single repeating timer for hosts that own their own event loop (the TUI).
///
/// `due(now)` answers whether a poll should run now. Only one deadline is
/// ever tracked, so restarting playback can never leave a second timer
/// running.
#[derive(Debug, Clone, Copy)]
pub struct PollTimer {
    interval: f64,
    next: Option<f64>,
}

impl PollTimer {
    pub fn new(interval: PollInterval) -> Self {
        Self {
            interval: interval.as_secs_f64(),
            next: None,
        }
    }

    pub fn due(&mut self, now: f64) -> bool {
        match self.next {
            Some(next) if now < next => false,
            _ => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }

    /// Seconds until the next poll, zero if one is due
    pub fn until_due(&self, now: f64) -> f64 {
        self.next.map_or(0.0, |next| (next - now).max(0.0))
    }

    /// Change the interval; the next `due` fires immediately
    pub fn reset(&mut self, interval: PollInterval) {
        self.interval = interval.as_secs_f64();
        self.next = None;
    }
}

/// Poll `scheduler` on the current thread until playback ends.
///
/// `keep_running` is checked before every poll; returning `false` stops
/// playback (clearing highlights). Returns the final state.
pub fn run_blocking<C, A, V, F>(
    scheduler: &mut Scheduler,
    clock: &C,
    interval: PollInterval,
    audio: &mut A,
    visual: &mut V,
    mut keep_running: F,
) -> SchedulerState
where
    C: Clock + ?Sized,
    A: AudioSink + ?Sized,
    V: VisualSink + ?Sized,
    F: FnMut(&Scheduler) -> bool,
{
    while scheduler.is_playing() {
        if !keep_running(scheduler) {
            scheduler.stop(visual);
            break;
        }

        scheduler.poll(clock.now(), audio, visual);

        if scheduler.is_playing() {
            std::thread::sleep(interval.duration());
        }
    }

    scheduler.state()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::NoteMapping;
    use crate::scheduler::clock::ManualClock;

    fn notes(count: usize) -> Vec<NoteMapping> {
        (0..count)
            .map(|i| NoteMapping {
                node_id: format!("n{i}"),
                pitch: 220.0,
                duration: 0.1,
                velocity: 0.5,
                timing: i as f64 * 0.1,
                instrument: "pad".into(),
            })
            .collect()
    }

    #[test]
    fn interval_widens_for_large_schedules() {
        assert_eq!(PollInterval::for_note_count(10), PollInterval::DEFAULT);
        assert_eq!(PollInterval::for_note_count(400), PollInterval::DEFAULT);
        assert_eq!(PollInterval::for_note_count(401), PollInterval::WIDE);
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let mut timer = PollTimer::new(PollInterval::DEFAULT);
        assert!(timer.due(0.0));
        assert!(!timer.due(0.05));
        assert!(timer.due(0.1));
        assert!(!timer.due(0.15));
        assert!((timer.until_due(0.15) - 0.05).abs() < 1e-12);

        timer.reset(PollInterval::WIDE);
        assert!(timer.due(0.16));
        assert!(!timer.due(0.5));
    }

    #[test]
    fn runs_to_completion() {
        let clock = ManualClock::new(0.0);
        let mut scheduler = Scheduler::new();
        scheduler.start(notes(5), 0.0);

        let tick = PollInterval::from(Duration::from_micros(10));
        let state = run_blocking(&mut scheduler, &clock, tick, &mut (), &mut (), |_| {
            clock.advance(0.1);
            true
        });

        assert_eq!(state, SchedulerState::Completed);
        assert_eq!(scheduler.stats().triggered, 5);
    }

    #[test]
    fn keep_running_false_stops() {
        let clock = ManualClock::new(0.0);
        let mut scheduler = Scheduler::new();
        scheduler.start(notes(50), 0.0);

        let tick = PollInterval::from(Duration::from_micros(10));
        let mut polls = 0;
        let state = run_blocking(&mut scheduler, &clock, tick, &mut (), &mut (), |_| {
            clock.advance(0.1);
            polls += 1;
            polls <= 3
        });

        assert_eq!(state, SchedulerState::Stopped);
        assert!(scheduler.active_highlights().is_empty());
        // polls at 0.1, 0.2, 0.3 reach n0..=n3 with tolerance
        assert_eq!(scheduler.stats().triggered, 4);
    }
}
