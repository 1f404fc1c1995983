//! A manually pumped scheduler.
//!
//! Frames run only when the test calls [`ManualScheduler::run_frame`];
//! timeouts fire only as the test advances the virtual clock. This makes
//! frame-coalescing and deferred-attachment behavior fully deterministic.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use photowall_foundation::{Scheduler, TimerId};

/// Scheduler over an explicit frame queue and a virtual clock.
#[derive(Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<SchedulerInner>>,
}

#[derive(Default)]
struct SchedulerInner {
    frames: Vec<Box<dyn FnOnce()>>,
    timers: Vec<PendingTimer>,
    now: Duration,
    next_timer_id: u64,
}

struct PendingTimer {
    id: TimerId,
    deadline: Duration,
    callback: Box<dyn FnOnce()>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of callbacks waiting for the next frame.
    pub fn pending_frames(&self) -> usize {
        self.inner.borrow().frames.len()
    }

    /// Number of timeouts that have not fired or been cancelled.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.len()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now
    }

    /// Runs everything queued for the next frame. Callbacks scheduling
    /// further frames land in the following batch.
    pub fn run_frame(&self) {
        let frames: Vec<_> = std::mem::take(&mut self.inner.borrow_mut().frames);
        for frame in frames {
            frame();
        }
    }

    /// Advances the virtual clock by `delta`, firing due timeouts in
    /// deadline order. A callback may schedule new timeouts; those fire in
    /// the same advance if they fall within it.
    pub fn advance(&self, delta: Duration) {
        let target = self.inner.borrow().now + delta;
        loop {
            let due = {
                let mut inner = self.inner.borrow_mut();
                let position = inner
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, timer)| timer.deadline <= target)
                    .min_by_key(|(_, timer)| timer.deadline)
                    .map(|(position, _)| position);
                match position {
                    Some(position) => {
                        let timer = inner.timers.remove(position);
                        inner.now = timer.deadline;
                        Some(timer.callback)
                    }
                    None => {
                        inner.now = target;
                        None
                    }
                }
            };
            match due {
                Some(callback) => callback(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.inner.borrow_mut().frames.push(callback);
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        inner.next_timer_id += 1;
        let id = TimerId(inner.next_timer_id);
        let deadline = inner.now + delay;
        inner.timers.push(PendingTimer {
            id,
            deadline,
            callback,
        });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.inner.borrow_mut().timers.retain(|timer| timer.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn test_frames_run_in_batches() {
        let scheduler = Rc::new(ManualScheduler::new());
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        let inner = Rc::clone(&scheduler);
        scheduler.request_frame(Box::new(move || {
            log_a.borrow_mut().push("a");
            let log_b = Rc::clone(&log_a);
            inner.request_frame(Box::new(move || log_b.borrow_mut().push("b")));
        }));

        scheduler.run_frame();
        assert_eq!(*log.borrow(), vec!["a"]);
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.run_frame();
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let scheduler = ManualScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_late = Rc::clone(&log);
        scheduler.set_timeout(
            Duration::from_millis(200),
            Box::new(move || log_late.borrow_mut().push("late")),
        );
        let log_early = Rc::clone(&log);
        scheduler.set_timeout(
            Duration::from_millis(50),
            Box::new(move || log_early.borrow_mut().push("early")),
        );

        scheduler.advance(Duration::from_millis(300));
        assert_eq!(*log.borrow(), vec!["early", "late"]);
    }

    #[test]
    fn test_cleared_timer_does_not_fire() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let fired_in = Rc::clone(&fired);
        let id = scheduler.set_timeout(
            Duration::from_millis(50),
            Box::new(move || *fired_in.borrow_mut() = true),
        );

        scheduler.clear_timeout(id);
        scheduler.advance(Duration::from_millis(100));
        assert!(!*fired.borrow());
        assert_eq!(scheduler.pending_timers(), 0);
    }

    #[test]
    fn test_partial_advance_leaves_future_timers() {
        let scheduler = ManualScheduler::new();
        let fired = Rc::new(RefCell::new(false));
        let fired_in = Rc::clone(&fired);
        scheduler.set_timeout(
            Duration::from_millis(100),
            Box::new(move || *fired_in.borrow_mut() = true),
        );

        scheduler.advance(Duration::from_millis(99));
        assert!(!*fired.borrow());
        assert_eq!(scheduler.pending_timers(), 1);

        scheduler.advance(Duration::from_millis(1));
        assert!(*fired.borrow());
    }
}
