// Purpose: Realtime playback of mapped notes
// A single poll loop triggers each note once, lights up its node for the
// note's duration and detects the end of playback. Audio and visuals are
// reached only through the sink traits.

pub mod clock;
pub mod driver;
pub mod message;
pub mod playback;
pub mod sink;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use driver::{run_blocking, PollInterval, PollTimer};
pub use message::{MessageReceiver, PlaybackMessage};
pub use playback::{
    Highlight, Scheduler, SchedulerState, SchedulerStats, TickReport, COMPLETION_BUFFER,
    TRIGGER_TOLERANCE,
};
pub use sink::{AudioSink, SinkError, VisualSink};
