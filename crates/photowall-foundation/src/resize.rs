//! Resize coalescing.
//!
//! Window resize events arrive at high frequency while the user drags; the
//! [`ResizeCoalescer`] folds any burst of notifications into at most one
//! downstream flush per rendered frame, using the same running-flag pattern
//! the visibility pass uses for scroll events.

use std::cell::RefCell;
use std::rc::Rc;

use crate::scheduler::Scheduler;

/// Coalesces resize notifications into one per-frame flush across a list
/// of independent subscriber callbacks.
pub struct ResizeCoalescer {
    inner: Rc<RefCell<CoalescerInner>>,
    scheduler: Rc<dyn Scheduler>,
}

struct CoalescerInner {
    /// Subscribers, paired with their registration ids.
    callbacks: Vec<(u64, Rc<dyn Fn()>)>,
    next_id: u64,
    /// Set while a flush is scheduled; further notifications are folded
    /// into the pending flush.
    running: bool,
}

impl ResizeCoalescer {
    /// Creates a coalescer that flushes on `scheduler`'s frames.
    pub fn new(scheduler: Rc<dyn Scheduler>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CoalescerInner {
                callbacks: Vec::new(),
                next_id: 1,
                running: false,
            })),
            scheduler,
        }
    }

    /// Registers a subscriber; returns an id for [`ResizeCoalescer::unsubscribe`].
    pub fn subscribe(&self, callback: Rc<dyn Fn()>) -> u64 {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.push((id, callback));
        id
    }

    /// Removes a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.callbacks.retain(|(callback_id, _)| *callback_id != id);
    }

    /// Reports one raw resize notification.
    ///
    /// The first notification of a burst schedules a flush on the next
    /// frame; the rest are absorbed by the running flag.
    pub fn notify(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.running {
                return;
            }
            inner.running = true;
        }

        let inner = Rc::clone(&self.inner);
        self.scheduler.request_frame(Box::new(move || {
            // Snapshot subscribers so a callback may re-enter subscribe or
            // unsubscribe without holding the borrow.
            let callbacks: Vec<Rc<dyn Fn()>> = inner
                .borrow()
                .callbacks
                .iter()
                .map(|(_, callback)| Rc::clone(callback))
                .collect();
            for callback in callbacks {
                callback();
            }
            inner.borrow_mut().running = false;
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::time::Duration;

    /// Minimal frame queue for exercising the coalescer without the full
    /// testing crate (which lives downstream of this one).
    #[derive(Default)]
    struct FrameQueue {
        frames: RefCell<Vec<Box<dyn FnOnce()>>>,
    }

    impl FrameQueue {
        fn run_frame(&self) {
            let frames: Vec<_> = self.frames.borrow_mut().drain(..).collect();
            for frame in frames {
                frame();
            }
        }

        fn pending(&self) -> usize {
            self.frames.borrow().len()
        }
    }

    impl Scheduler for FrameQueue {
        fn request_frame(&self, callback: Box<dyn FnOnce()>) {
            self.frames.borrow_mut().push(callback);
        }

        fn set_timeout(&self, _delay: Duration, _callback: Box<dyn FnOnce()>) -> crate::TimerId {
            unimplemented!("not used by the coalescer")
        }

        fn clear_timeout(&self, _id: crate::TimerId) {}
    }

    #[test]
    fn test_burst_coalesces_to_one_flush() {
        let scheduler = Rc::new(FrameQueue::default());
        let coalescer = ResizeCoalescer::new(scheduler.clone());

        let count = Rc::new(Cell::new(0));
        let count_in = Rc::clone(&count);
        coalescer.subscribe(Rc::new(move || count_in.set(count_in.get() + 1)));

        for _ in 0..10 {
            coalescer.notify();
        }
        assert_eq!(scheduler.pending(), 1);

        scheduler.run_frame();
        assert_eq!(count.get(), 1);

        // A fresh notification after the flush schedules a new frame.
        coalescer.notify();
        scheduler.run_frame();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn test_all_subscribers_flushed() {
        let scheduler = Rc::new(FrameQueue::default());
        let coalescer = ResizeCoalescer::new(scheduler.clone());

        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));
        let first_in = Rc::clone(&first);
        let second_in = Rc::clone(&second);
        coalescer.subscribe(Rc::new(move || first_in.set(true)));
        coalescer.subscribe(Rc::new(move || second_in.set(true)));

        coalescer.notify();
        scheduler.run_frame();
        assert!(first.get());
        assert!(second.get());
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let scheduler = Rc::new(FrameQueue::default());
        let coalescer = ResizeCoalescer::new(scheduler.clone());

        let count = Rc::new(Cell::new(0));
        let count_in = Rc::clone(&count);
        let id = coalescer.subscribe(Rc::new(move || count_in.set(count_in.get() + 1)));

        coalescer.unsubscribe(id);
        coalescer.notify();
        scheduler.run_frame();
        assert_eq!(count.get(), 0);
    }
}
