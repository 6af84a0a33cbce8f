use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Identifies one scheduled tick source.
///
/// Handles are never reused by a scheduler, so a tick carrying an old handle can
/// always be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

impl TickHandle {
    /// Raw numeric id, for logging.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Source of delayed and repeating ticks.
///
/// Schedulers only deliver handles; the owner routes each handle to whichever
/// component asked for it.
pub trait TickScheduler {
    /// Deliver `handle` every `period`, first after one full period.
    fn every(&mut self, period: Duration) -> TickHandle;
    /// Deliver `handle` once after `delay`.
    fn after(&mut self, delay: Duration) -> TickHandle;
    /// Stop delivering `handle`. Unknown or finished handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
    /// Whether `handle` may still be delivered.
    fn is_active(&self, handle: TickHandle) -> bool;
}

#[derive(Debug, Clone)]
struct ManualEntry {
    handle: TickHandle,
    due: Duration,
    period: Option<Duration>,
}

/// Deterministic scheduler driven by an explicit simulated clock.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    entries: Vec<ManualEntry>,
}

impl ManualScheduler {
    /// Fresh scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of handles that can still fire.
    pub fn active_count(&self) -> usize {
        self.entries.len()
    }

    /// Pop the earliest handle due at or before `deadline`, moving the clock to
    /// its due time. Repeating handles are rescheduled one period later.
    pub fn fire_next(&mut self, deadline: Duration) -> Option<TickHandle> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= deadline)
            .min_by_key(|(_, entry)| (entry.due, entry.handle))
            .map(|(idx, _)| idx)?;

        let ManualEntry {
            handle,
            due,
            period,
        } = self.entries[idx].clone();
        self.now = due;
        match period {
            Some(period) => self.entries[idx].due += period,
            None => {
                self.entries.remove(idx);
            }
        }
        Some(handle)
    }

    /// Move the clock forward to `deadline` without firing anything.
    pub fn settle(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Fire everything due within `by`, collecting the handles in order.
    ///
    /// Cancellations made by the caller between firings are not observed; use
    /// [`fire_next`](Self::fire_next) when the handles drive state changes.
    pub fn advance(&mut self, by: Duration) -> Vec<TickHandle> {
        let deadline = self.now + by;
        let mut fired = Vec::new();
        while let Some(handle) = self.fire_next(deadline) {
            fired.push(handle);
        }
        self.settle(deadline);
        fired
    }

    fn allocate(&mut self) -> TickHandle {
        self.next_id += 1;
        TickHandle(self.next_id)
    }
}

impl TickScheduler for ManualScheduler {
    fn every(&mut self, period: Duration) -> TickHandle {
        let handle = self.allocate();
        self.entries.push(ManualEntry {
            handle,
            due: self.now + period,
            period: Some(period),
        });
        handle
    }

    fn after(&mut self, delay: Duration) -> TickHandle {
        let handle = self.allocate();
        self.entries.push(ManualEntry {
            handle,
            due: self.now + delay,
            period: None,
        });
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }

    fn is_active(&self, handle: TickHandle) -> bool {
        self.entries.iter().any(|entry| entry.handle == handle)
    }
}

/// Scheduler backed by tokio tasks that push handles into a channel.
///
/// Must be used from within a tokio runtime.
pub struct TokioScheduler {
    sender: mpsc::Sender<TickHandle>,
    next_id: u64,
    tasks: HashMap<TickHandle, JoinHandle<()>>,
}

impl TokioScheduler {
    /// Ticks are delivered to `sender`.
    pub fn new(sender: mpsc::Sender<TickHandle>) -> Self {
        Self {
            sender,
            next_id: 0,
            tasks: HashMap::new(),
        }
    }

    fn allocate(&mut self) -> TickHandle {
        self.next_id += 1;
        TickHandle(self.next_id)
    }

    fn prune(&mut self) {
        self.tasks.retain(|_, task| !task.is_finished());
    }
}

impl TickScheduler for TokioScheduler {
    fn every(&mut self, period: Duration) -> TickHandle {
        self.prune();
        let handle = self.allocate();
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if sender.send(handle).await.is_err() {
                    break;
                }
            }
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn after(&mut self, delay: Duration) -> TickHandle {
        self.prune();
        let handle = self.allocate();
        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            time::sleep(delay).await;
            let _ = sender.send(handle).await;
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!(handle = handle.id(), "Tick source aborted");
        }
    }

    fn is_active(&self, handle: TickHandle) -> bool {
        self.tasks
            .get(&handle)
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for task in self.tasks.values() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn manual_repeating_and_one_shot() {
        let mut scheduler = ManualScheduler::new();
        let every = scheduler.every(SECOND);
        let once = scheduler.after(Duration::from_millis(1500));

        let fired = scheduler.advance(Duration::from_secs(3));
        assert_eq!(fired, vec![every, once, every, every]);
        assert_eq!(scheduler.now(), Duration::from_secs(3));
        assert!(scheduler.is_active(every));
        assert!(!scheduler.is_active(once));
    }

    #[test]
    fn manual_cancel_stops_delivery() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.every(SECOND);
        assert_eq!(scheduler.advance(SECOND), vec![handle]);

        scheduler.cancel(handle);
        assert!(scheduler.advance(Duration::from_secs(60)).is_empty());
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut scheduler = ManualScheduler::new();
        let first = scheduler.every(SECOND);
        scheduler.cancel(first);
        let second = scheduler.every(SECOND);
        assert_ne!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_scheduler_delivers_then_stops_after_cancel() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = TokioScheduler::new(tx);
        let started = Instant::now();

        let handle = scheduler.every(SECOND);
        assert_eq!(rx.recv().await, Some(handle));
        assert!(started.elapsed() >= SECOND);
        assert!(scheduler.is_active(handle));

        scheduler.cancel(handle);
        assert!(!scheduler.is_active(handle));
        let late = time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(late.is_err(), "no tick may arrive after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_one_shot_fires_once() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut scheduler = TokioScheduler::new(tx);

        let handle = scheduler.after(Duration::from_millis(1500));
        assert_eq!(rx.recv().await, Some(handle));
        let again = time::timeout(Duration::from_secs(10), rx.recv()).await;
        assert!(again.is_err());
    }
}
