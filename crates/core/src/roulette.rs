//! Idea roulette: a short "rolling" delay followed by a uniform pick.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info};

use crate::timer::{TickHandle, TickScheduler};

/// Where the roulette is in its spin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoulettePhase {
    /// Not spinning and nothing picked.
    Idle,
    /// Waiting for the rolling delay to elapse.
    Rolling {
        /// One-shot handle that ends the roll.
        handle: TickHandle,
    },
    /// Landed on the idea at `index`; starting a jam is allowed.
    Landed {
        /// Position in the catalog's idea list.
        index: usize,
    },
}

/// Spin state for the idea roulette modal.
#[derive(Debug, Clone)]
pub struct IdeaRoulette {
    phase: RoulettePhase,
    delay: Duration,
}

impl IdeaRoulette {
    /// Roulette whose roll lasts `delay`.
    pub fn new(delay: Duration) -> Self {
        Self {
            phase: RoulettePhase::Idle,
            delay,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> RoulettePhase {
        self.phase
    }

    /// Whether the roll is still in progress.
    pub fn is_rolling(&self) -> bool {
        matches!(self.phase, RoulettePhase::Rolling { .. })
    }

    /// Index of the picked idea, once landed.
    pub fn selection(&self) -> Option<usize> {
        match self.phase {
            RoulettePhase::Landed { index } => Some(index),
            _ => None,
        }
    }

    /// Whether `handle` ends the current roll.
    pub fn owns(&self, handle: TickHandle) -> bool {
        self.phase == RoulettePhase::Rolling { handle }
    }

    /// Start a new roll, abandoning any roll or pick in progress.
    pub fn spin<S: TickScheduler>(&mut self, scheduler: &mut S) {
        self.reset(scheduler);
        let handle = scheduler.after(self.delay);
        self.phase = RoulettePhase::Rolling { handle };
        debug!(handle = handle.id(), "Roulette rolling");
    }

    /// Finish the roll identified by `handle`, picking uniformly among
    /// `idea_count` ideas. Stale handles are ignored.
    pub fn land<S, R>(
        &mut self,
        handle: TickHandle,
        idea_count: usize,
        rng: &mut R,
        scheduler: &mut S,
    ) -> Option<usize>
    where
        S: TickScheduler,
        R: Rng + ?Sized,
    {
        if !self.owns(handle) {
            return None;
        }
        scheduler.cancel(handle);
        match pick_index(rng, idea_count) {
            Some(index) => {
                self.phase = RoulettePhase::Landed { index };
                info!(index, "Roulette landed");
                Some(index)
            }
            None => {
                self.phase = RoulettePhase::Idle;
                debug!("Roulette has no ideas to pick from");
                None
            }
        }
    }

    /// Take the pick and return to idle.
    pub fn take_selection(&mut self) -> Option<usize> {
        let selection = self.selection();
        if selection.is_some() {
            self.phase = RoulettePhase::Idle;
        }
        selection
    }

    /// Drop any roll or pick.
    pub fn reset<S: TickScheduler>(&mut self, scheduler: &mut S) {
        if let RoulettePhase::Rolling { handle } = self.phase {
            scheduler.cancel(handle);
        }
        self.phase = RoulettePhase::Idle;
    }
}

/// Uniform index into a list of `len` items.
pub fn pick_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::ManualScheduler;
    use rand::{rngs::SmallRng, SeedableRng};

    const DELAY: Duration = Duration::from_millis(1500);

    #[test]
    fn selection_only_after_delay() {
        let mut scheduler = ManualScheduler::new();
        let mut rng = SmallRng::seed_from_u64(11);
        let mut roulette = IdeaRoulette::new(DELAY);

        roulette.spin(&mut scheduler);
        assert!(roulette.is_rolling());
        assert_eq!(roulette.selection(), None);
        assert!(scheduler.advance(Duration::from_millis(1499)).is_empty());

        let fired = scheduler.advance(Duration::from_millis(1));
        assert_eq!(fired.len(), 1);
        let picked = roulette.land(fired[0], 8, &mut rng, &mut scheduler);
        assert!(picked.is_some());
        assert_eq!(roulette.selection(), picked);
    }

    #[test]
    fn respin_discards_pending_roll() {
        let mut scheduler = ManualScheduler::new();
        let mut rng = SmallRng::seed_from_u64(3);
        let mut roulette = IdeaRoulette::new(DELAY);

        roulette.spin(&mut scheduler);
        let RoulettePhase::Rolling { handle: first } = roulette.phase() else {
            panic!("expected rolling");
        };
        roulette.spin(&mut scheduler);
        assert_eq!(scheduler.active_count(), 1);
        assert_eq!(roulette.land(first, 8, &mut rng, &mut scheduler), None);
        assert!(roulette.is_rolling());
    }

    #[test]
    fn reset_cancels_roll() {
        let mut scheduler = ManualScheduler::new();
        let mut roulette = IdeaRoulette::new(DELAY);
        roulette.spin(&mut scheduler);
        roulette.reset(&mut scheduler);
        assert_eq!(roulette.phase(), RoulettePhase::Idle);
        assert!(scheduler.advance(Duration::from_secs(5)).is_empty());
    }

    #[test]
    fn empty_idea_list_lands_nowhere() {
        let mut scheduler = ManualScheduler::new();
        let mut rng = SmallRng::seed_from_u64(0);
        let mut roulette = IdeaRoulette::new(DELAY);
        roulette.spin(&mut scheduler);
        let fired = scheduler.advance(DELAY);
        assert_eq!(roulette.land(fired[0], 0, &mut rng, &mut scheduler), None);
        assert_eq!(roulette.phase(), RoulettePhase::Idle);
    }

    #[test]
    fn picks_are_uniform() {
        const IDEAS: usize = 8;
        const TRIALS: usize = 80_000;
        let mut rng = SmallRng::seed_from_u64(0x5eed);
        let mut counts = [0usize; IDEAS];
        for _ in 0..TRIALS {
            let index = pick_index(&mut rng, IDEAS).expect("non-empty");
            counts[index] += 1;
        }

        let expected = TRIALS / IDEAS;
        for count in counts {
            let deviation = count.abs_diff(expected);
            assert!(
                deviation < expected / 16,
                "count {count} too far from {expected}: {counts:?}"
            );
        }
    }
}
