//! Deadline scheduler driven by the frame clock.
//!
//! Deferred work (staggered launches, the periodic batch launcher, message
//! dismissal) is registered here instead of on platform timers. Time only
//! moves when [`FrameScheduler::advance`] is called, so a test can replay an
//! entire show by stepping a virtual clock.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

type StopPredicate = Box<dyn Fn(Duration) -> bool + Send + Sync>;

struct Repeat {
    interval: Duration,
    until: StopPredicate,
}

struct ScheduledTask<T> {
    task: T,
    repeat: Option<Repeat>,
}

enum Firing<T> {
    Once,
    Expired,
    Again(T, Duration),
}

/// Heap key: earliest deadline first, then scheduling order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Deadline {
    at: Duration,
    seq: u64,
    id: TaskId,
}

pub struct FrameScheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Deadline>>,
    tasks: HashMap<TaskId, ScheduledTask<T>>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            queue: BinaryHeap::new(),
            tasks: HashMap::new(),
        }
    }
}

impl<T: Clone> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time accumulated through [`advance`](Self::advance).
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Run `task` once, `delay` after the current virtual time.
    pub fn schedule_after(&mut self, delay: Duration, task: T) -> TaskId {
        let id = self.allocate_id();
        self.tasks.insert(id, ScheduledTask { task, repeat: None });
        self.push_deadline(self.now.saturating_add(delay), id);
        id
    }

    /// Run `task` every `interval`, starting one interval from now.
    ///
    /// Before each firing `until` is evaluated with the firing time; once it
    /// returns `true` the task is dropped without running again.
    pub fn schedule_repeating<P>(&mut self, interval: Duration, task: T, until: P) -> TaskId
    where
        P: Fn(Duration) -> bool + Send + Sync + 'static,
    {
        // A zero interval would re-arm forever inside a single advance.
        let interval = interval.max(Duration::from_millis(1));
        let id = self.allocate_id();
        self.tasks.insert(
            id,
            ScheduledTask {
                task,
                repeat: Some(Repeat {
                    interval,
                    until: Box::new(until),
                }),
            },
        );
        self.push_deadline(self.now.saturating_add(interval), id);
        id
    }

    /// Returns `false` if the task already ran (one-shot) or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
        self.queue.clear();
    }

    /// Move the clock forward by `delta` and return every task that came due,
    /// ordered by deadline and then by scheduling order.
    pub fn advance(&mut self, delta: Duration) -> Vec<T> {
        self.now = self.now.saturating_add(delta);
        let mut due = Vec::new();

        while let Some(Reverse(deadline)) = self.queue.peek().copied() {
            if deadline.at > self.now {
                break;
            }
            self.queue.pop();

            let firing = match self.tasks.get(&deadline.id) {
                // Cancelled entries leave stale heap keys behind.
                None => continue,
                Some(ScheduledTask { repeat: None, .. }) => Firing::Once,
                Some(ScheduledTask {
                    task,
                    repeat: Some(repeat),
                }) => {
                    match deadline.at.checked_add(repeat.interval) {
                        Some(next_at) if !(repeat.until)(deadline.at) => {
                            Firing::Again(task.clone(), next_at)
                        }
                        _ => Firing::Expired,
                    }
                }
            };

            match firing {
                Firing::Once => {
                    if let Some(entry) = self.tasks.remove(&deadline.id) {
                        due.push(entry.task);
                    }
                }
                Firing::Expired => {
                    self.tasks.remove(&deadline.id);
                }
                Firing::Again(task, next_at) => {
                    due.push(task);
                    self.push_deadline(next_at, deadline.id);
                }
            }
        }

        due
    }

    fn allocate_id(&mut self) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push_deadline(&mut self, at: Duration, id: TaskId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Deadline { at, seq, id }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_after(ms(100), "hide");

        assert!(scheduler.advance(ms(99)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec!["hide"]);
        assert!(scheduler.advance(ms(500)).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn due_tasks_come_out_in_deadline_then_insertion_order() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_after(ms(30), 3);
        scheduler.schedule_after(ms(10), 1);
        scheduler.schedule_after(ms(10), 2);

        assert_eq!(scheduler.advance(ms(50)), vec![1, 2, 3]);
    }

    #[test]
    fn zero_delay_runs_on_next_advance() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_after(Duration::ZERO, 'a');
        assert_eq!(scheduler.advance(Duration::ZERO), vec!['a']);
    }

    #[test]
    fn repeating_task_catches_up_within_large_step() {
        let mut scheduler = FrameScheduler::new();
        scheduler.schedule_repeating(ms(100), "tick", |_| false);

        assert_eq!(scheduler.advance(ms(350)).len(), 3);
        assert_eq!(scheduler.advance(ms(50)).len(), 1);
    }

    #[test]
    fn repeating_task_stops_when_predicate_holds() {
        let mut scheduler = FrameScheduler::new();
        let id = scheduler.schedule_repeating(ms(100), "batch", |at| at >= ms(300));

        assert_eq!(scheduler.advance(ms(250)).len(), 2);
        assert!(scheduler.advance(ms(100)).is_empty());
        assert!(!scheduler.is_scheduled(id));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = FrameScheduler::new();
        let once = scheduler.schedule_after(ms(10), 1);
        let repeating = scheduler.schedule_repeating(ms(10), 2, |_| false);

        assert!(scheduler.cancel(once));
        assert!(scheduler.cancel(repeating));
        assert!(!scheduler.cancel(once));
        assert!(scheduler.advance(ms(100)).is_empty());
    }

    #[test]
    fn clock_accumulates() {
        let mut scheduler: FrameScheduler<()> = FrameScheduler::new();
        scheduler.advance(ms(16));
        scheduler.advance(ms(17));
        assert_eq!(scheduler.now(), ms(33));
    }

    #[test]
    fn far_future_deadlines_saturate_instead_of_overflowing() {
        let mut scheduler = FrameScheduler::new();
        scheduler.advance(ms(10));
        scheduler.schedule_after(Duration::MAX, "never");
        scheduler.schedule_repeating(Duration::MAX, "never again", |_| false);
        assert!(scheduler.advance(ms(1000)).is_empty());
        assert_eq!(scheduler.pending(), 2);
    }
}
