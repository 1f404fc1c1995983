//! Injectable cooperative scheduler.
//!
//! The grid never talks to a real frame or timer source directly; the host
//! platform supplies a [`Scheduler`] bound to its animation-frame and
//! timeout facilities (or a manually pumped one in tests). All callbacks
//! run on the single host thread.

use std::time::Duration;

/// Handle to a pending timeout, used for cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

/// Frame and timeout scheduling as provided by the host platform.
///
/// Contract: callbacks are invoked at most once, never synchronously from
/// inside the scheduling call, and always on the thread that scheduled
/// them. A platform without an animation-frame source may implement
/// [`Scheduler::request_frame`] with a short fixed interval (around one
/// frame at 15 fps is the customary fallback).
pub trait Scheduler {
    /// Schedules `callback` for the next paint frame.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);

    /// Schedules `callback` to run once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancels a pending timeout. Cancelling an already-fired or unknown
    /// timer is a no-op.
    fn clear_timeout(&self, id: TimerId);
}
