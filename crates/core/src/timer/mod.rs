//! Countdown timer and the tick sources that drive it.

/// Jam countdown state machine.
pub mod jam;
/// Cancellable tick scheduling.
pub mod schedule;

pub use jam::{format_clock, JamTimer, TickOutcome, TimerState};
pub use schedule::{ManualScheduler, TickHandle, TickScheduler, TokioScheduler};
