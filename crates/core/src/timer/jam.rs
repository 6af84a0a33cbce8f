use std::time::Duration;

use tracing::{debug, info};

use super::schedule::{TickHandle, TickScheduler};

/// Lifecycle of the jam countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Nothing counting down.
    Idle,
    /// Counting down.
    Running {
        /// Seconds left on the clock.
        remaining: u32,
    },
    /// Reached zero. Stays here until restarted or cancelled.
    Expired,
}

/// Result of feeding a tick to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick belonged to no live countdown and was dropped.
    Ignored,
    /// One second elapsed.
    Ticked {
        /// Seconds left after this tick.
        remaining: u32,
    },
    /// This tick brought the countdown to zero.
    Expired,
}

/// The single jam-session countdown.
///
/// Holds at most one tick handle; every `start` and `cancel` releases the previous
/// handle before anything else happens, so there is never more than one live tick
/// source for the timer.
#[derive(Debug, Clone)]
pub struct JamTimer {
    state: TimerState,
    handle: Option<TickHandle>,
    period: Duration,
}

impl JamTimer {
    /// Timer that ticks every `period` (one second in production).
    pub fn new(period: Duration) -> Self {
        Self {
            state: TimerState::Idle,
            handle: None,
            period,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether a countdown is in progress.
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Seconds left, or `None` when idle.
    pub fn remaining_seconds(&self) -> Option<u32> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { remaining } => Some(remaining),
            TimerState::Expired => Some(0),
        }
    }

    /// `m:ss` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_clock(self.remaining_seconds().unwrap_or(0))
    }

    /// The live tick handle, if running.
    pub fn handle(&self) -> Option<TickHandle> {
        self.handle
    }

    /// Whether `handle` is this timer's live tick source.
    pub fn owns(&self, handle: TickHandle) -> bool {
        self.handle == Some(handle)
    }

    /// Begin a countdown of `minutes`, replacing any countdown in progress.
    ///
    /// Zero minutes is ignored and leaves the timer untouched.
    pub fn start<S: TickScheduler>(&mut self, minutes: u32, scheduler: &mut S) -> bool {
        if minutes == 0 {
            debug!("Ignoring zero-length jam");
            return false;
        }
        self.release(scheduler);
        let remaining = minutes.saturating_mul(60);
        self.state = TimerState::Running { remaining };
        self.handle = Some(scheduler.every(self.period));
        info!(minutes, display = %self.display(), "Jam countdown started");
        true
    }

    /// Advance by one second if `handle` is the live tick source.
    pub fn tick<S: TickScheduler>(&mut self, handle: TickHandle, scheduler: &mut S) -> TickOutcome {
        if !self.owns(handle) {
            return TickOutcome::Ignored;
        }
        let TimerState::Running { remaining } = self.state else {
            return TickOutcome::Ignored;
        };

        let remaining = remaining.saturating_sub(1);
        if remaining == 0 {
            self.release(scheduler);
            self.state = TimerState::Expired;
            info!("Jam countdown finished");
            TickOutcome::Expired
        } else {
            self.state = TimerState::Running { remaining };
            TickOutcome::Ticked { remaining }
        }
    }

    /// Stop any countdown and return to idle.
    pub fn cancel<S: TickScheduler>(&mut self, scheduler: &mut S) {
        if self.is_running() {
            info!(remaining = ?self.remaining_seconds(), "Jam countdown cancelled");
        }
        self.release(scheduler);
        self.state = TimerState::Idle;
    }

    fn release<S: TickScheduler>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }
}

/// Format seconds as `m:ss` with unpadded minutes.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;

    const SECOND: Duration = Duration::from_secs(1);

    fn drive(timer: &mut JamTimer, scheduler: &mut ManualScheduler, by: Duration) -> Vec<TickOutcome> {
        let deadline = scheduler.now() + by;
        let mut outcomes = Vec::new();
        while let Some(handle) = scheduler.fire_next(deadline) {
            outcomes.push(timer.tick(handle, scheduler));
        }
        scheduler.settle(deadline);
        outcomes
    }

    #[test]
    fn start_renders_before_first_tick() {
        let mut scheduler = ManualScheduler::new();
        let mut timer = JamTimer::new(SECOND);
        assert!(timer.start(5, &mut scheduler));
        assert_eq!(timer.remaining_seconds(), Some(300));
        assert_eq!(timer.display(), "5:00");

        drive(&mut timer, &mut scheduler, SECOND);
        assert_eq!(timer.remaining_seconds(), Some(299));
        assert_eq!(timer.display(), "4:59");
    }

    #[test]
    fn restart_keeps_a_single_tick_source() {
        let mut scheduler = ManualScheduler::new();
        let mut timer = JamTimer::new(SECOND);
        timer.start(5, &mut scheduler);
        drive(&mut timer, &mut scheduler, Duration::from_secs(3));
        let stale = timer.handle().expect("running");

        timer.start(2, &mut scheduler);
        assert_eq!(scheduler.active_count(), 1);
        assert!(!scheduler.is_active(stale));

        drive(&mut timer, &mut scheduler, SECOND);
        assert_eq!(timer.remaining_seconds(), Some(119));
        assert_eq!(timer.tick(stale, &mut scheduler), TickOutcome::Ignored);
        assert_eq!(timer.remaining_seconds(), Some(119));
    }

    #[test]
    fn expires_exactly_once_and_stops() {
        let mut scheduler = ManualScheduler::new();
        let mut timer = JamTimer::new(SECOND);
        timer.start(1, &mut scheduler);

        let outcomes = drive(&mut timer, &mut scheduler, Duration::from_secs(120));
        let expirations = outcomes
            .iter()
            .filter(|outcome| **outcome == TickOutcome::Expired)
            .count();
        assert_eq!(expirations, 1);
        assert_eq!(outcomes.len(), 60);
        assert_eq!(timer.state(), TimerState::Expired);
        assert_eq!(timer.remaining_seconds(), Some(0));
        assert_eq!(timer.display(), "0:00");
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn cancel_stops_future_ticks() {
        let mut scheduler = ManualScheduler::new();
        let mut timer = JamTimer::new(SECOND);
        timer.start(5, &mut scheduler);
        drive(&mut timer, &mut scheduler, Duration::from_secs(10));

        timer.cancel(&mut scheduler);
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_seconds(), None);
        assert!(drive(&mut timer, &mut scheduler, Duration::from_secs(600)).is_empty());
    }

    #[test]
    fn zero_minutes_is_ignored() {
        let mut scheduler = ManualScheduler::new();
        let mut timer = JamTimer::new(SECOND);
        assert!(!timer.start(0, &mut scheduler));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(59), "0:59");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(481), "8:01");
    }
}
