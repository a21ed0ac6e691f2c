//! Cooperative timers for the single-threaded card loop.
//!
//! Three ways to defer work, matching what the cards need:
//!
//! - [`Scheduler`]: single-shot and repeating timers. Each returns a
//!   [`TaskHandle`]; dropping the handle cancels the task. Storing a new
//!   handle in the same field therefore supersedes the old timer.
//! - [`Debouncer`]: trailing-edge debounce for container resize bursts.
//! - [`FrameQueue`]: work that must wait one or more animation frames, e.g.
//!   measuring glyphs after a layout pass.
//!
//! Nothing here reads the clock. Callers pass `now` in, which keeps tests
//! deterministic.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Trailing-edge delay for container resize notifications.
pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(150);

/// Shortest repeat period. Guards against a zero period spinning forever.
const MIN_PERIOD: Duration = Duration::from_millis(1);

// =============================================================================
// Task Handle
// =============================================================================

/// Owner's end of a scheduled task. Cancels the task when dropped.
#[derive(Debug)]
pub struct TaskHandle {
    cancelled: Rc<Cell<bool>>,
}

impl TaskHandle {
    /// Cancel explicitly. Same as dropping the handle.
    pub fn cancel(self) {}

    /// Whether the scheduler may still fire this task.
    pub fn is_active(&self) -> bool { !self.cancelled.get() }
}

impl Drop for TaskHandle {
    fn drop(&mut self) { self.cancelled.set(true); }
}

// =============================================================================
// Scheduler
// =============================================================================

struct Task<T> {
    seq: u64,
    due: Instant,
    period: Option<Duration>,
    payload: T,
    cancelled: Rc<Cell<bool>>,
}

/// Timer queue polled from the frame loop.
pub struct Scheduler<T> {
    tasks: Vec<Task<T>>,
    next_seq: u64,
}

impl<T: Clone> Scheduler<T> {
    pub const fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_seq: 0,
        }
    }

    /// Fire `payload` once, `delay` after `now`.
    pub fn schedule_once(
        &mut self,
        now: Instant,
        delay: Duration,
        payload: T,
    ) -> TaskHandle {
        self.push(now + delay, None, payload)
    }

    /// Fire `payload` every `period`, first at `now + period`.
    pub fn schedule_repeating(
        &mut self,
        now: Instant,
        period: Duration,
        payload: T,
    ) -> TaskHandle {
        let period = period.max(MIN_PERIOD);
        self.push(now + period, Some(period), payload)
    }

    fn push(
        &mut self,
        due: Instant,
        period: Option<Duration>,
        payload: T,
    ) -> TaskHandle {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.push(Task {
            seq: self.next_seq,
            due,
            period,
            payload,
            cancelled: Rc::clone(&cancelled),
        });
        self.next_seq += 1;
        TaskHandle { cancelled }
    }

    /// Number of live (not cancelled) tasks.
    pub fn pending(&self) -> usize { self.tasks.iter().filter(|t| !t.cancelled.get()).count() }

    /// Earliest deadline among live tasks.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tasks
            .iter()
            .filter(|t| !t.cancelled.get())
            .map(|t| t.due)
            .min()
    }

    /// Collect every firing due at or before `now`, in deadline order.
    ///
    /// A repeating task that missed several periods fires once per missed
    /// period. Single-shot tasks are removed after firing; cancelled tasks
    /// are dropped without firing.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> Vec<T> {
        self.tasks.retain(|t| !t.cancelled.get());

        let mut fired: Vec<(Instant, u64, T)> = Vec::new();
        for task in &mut self.tasks {
            while task.due <= now {
                fired.push((task.due, task.seq, task.payload.clone()));
                match task.period {
                    Some(period) => task.due += period,
                    None => break,
                }
            }
        }
        self.tasks.retain(|t| t.period.is_some() || t.due > now);

        fired.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, payload)| payload).collect()
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Debouncer
// =============================================================================

/// Trailing-edge debounce: fires once, `delay` after the last notification.
#[derive(Clone, Copy, Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self { Self { delay, deadline: None } }

    /// Record an event, pushing the deadline out.
    pub fn notify(
        &mut self,
        now: Instant,
    ) {
        self.deadline = Some(now + self.delay);
    }

    #[inline]
    pub const fn is_pending(&self) -> bool { self.deadline.is_some() }

    /// Returns `true` exactly once when the quiet period has elapsed.
    pub fn poll(
        &mut self,
        now: Instant,
    ) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self { Self::new(RESIZE_DEBOUNCE) }
}

// =============================================================================
// Frame Queue
// =============================================================================

/// Work deferred by a number of animation frames.
pub struct FrameQueue<T> {
    pending: Vec<(u32, T)>,
}

impl<T> FrameQueue<T> {
    pub const fn new() -> Self { Self { pending: Vec::new() } }

    /// Run `task` after `frames` frames (at least one).
    pub fn defer(
        &mut self,
        frames: u32,
        task: T,
    ) {
        self.pending.push((frames.max(1), task));
    }

    #[inline]
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    /// Advance one frame, returning tasks that are now due in the order they
    /// were deferred.
    pub fn next_frame(&mut self) -> Vec<T> {
        let mut due = Vec::new();
        let mut waiting = Vec::with_capacity(self.pending.len());
        for (frames, task) in self.pending.drain(..) {
            if frames <= 1 {
                due.push(task);
            } else {
                waiting.push((frames - 1, task));
            }
        }
        self.pending = waiting;
        due
    }
}

impl<T> Default for FrameQueue<T> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_once_fires_once() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let _handle = scheduler.schedule_once(t0, 10 * MS, "a");

        assert!(scheduler.poll(t0 + 9 * MS).is_empty(), "Not due yet");
        assert_eq!(scheduler.poll(t0 + 10 * MS), vec!["a"]);
        assert!(scheduler.poll(t0 + 100 * MS).is_empty(), "Single-shot is gone");
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_repeating_catches_up() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let _handle = scheduler.schedule_repeating(t0, 100 * MS, 1);

        assert_eq!(scheduler.poll(t0 + 350 * MS), vec![1, 1, 1], "Three missed periods");
        assert_eq!(scheduler.poll(t0 + 399 * MS), Vec::<i32>::new());
        assert_eq!(scheduler.poll(t0 + 400 * MS), vec![1]);
    }

    #[test]
    fn test_drop_handle_cancels() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let handle = scheduler.schedule_repeating(t0, 10 * MS, ());
        assert!(handle.is_active());
        drop(handle);

        assert!(scheduler.poll(t0 + 50 * MS).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_replacing_handle_supersedes() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let mut timer = Some(scheduler.schedule_repeating(t0, 10 * MS, "old"));
        assert!(timer.as_ref().is_some_and(TaskHandle::is_active));
        timer = Some(scheduler.schedule_repeating(t0, 10 * MS, "new"));

        assert_eq!(scheduler.poll(t0 + 10 * MS), vec!["new"]);
        drop(timer);
    }

    #[test]
    fn test_poll_orders_by_deadline() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let _a = scheduler.schedule_once(t0, 30 * MS, "late");
        let _b = scheduler.schedule_once(t0, 10 * MS, "early");
        let _c = scheduler.schedule_repeating(t0, 20 * MS, "tick");

        assert_eq!(scheduler.poll(t0 + 40 * MS), vec!["early", "tick", "late", "tick"]);
        assert_eq!(scheduler.next_deadline(), Some(t0 + 60 * MS));
    }

    #[test]
    fn test_zero_period_does_not_spin() {
        let t0 = Instant::now();
        let mut scheduler = Scheduler::new();
        let _handle = scheduler.schedule_repeating(t0, Duration::ZERO, ());
        assert_eq!(scheduler.poll(t0 + 5 * MS).len(), 5);
    }

    #[test]
    fn test_debouncer_trailing_edge() {
        let t0 = Instant::now();
        let mut debounce = Debouncer::default();

        debounce.notify(t0);
        debounce.notify(t0 + 100 * MS);
        assert!(!debounce.poll(t0 + 200 * MS), "Second notify pushed the deadline");
        assert!(debounce.poll(t0 + 250 * MS));
        assert!(!debounce.poll(t0 + 300 * MS), "Fires once");
        assert!(!debounce.is_pending());
    }

    #[test]
    fn test_frame_queue_nesting() {
        let mut frames = FrameQueue::new();
        frames.defer(2, "measure");
        frames.defer(1, "paint");
        frames.defer(0, "asap");

        assert_eq!(frames.next_frame(), vec!["paint", "asap"]);
        assert_eq!(frames.next_frame(), vec!["measure"]);
        assert!(frames.is_empty());
    }
}
