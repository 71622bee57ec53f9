// ~/ignite/src/platform/mod.rs
//! Seam between the theme services and the windowing system.

pub mod headless;
#[cfg(windows)]
pub mod win32;

use std::{
    cell::Cell,
    rc::Rc,
    time::{Duration, Instant},
};

use serde::Serialize;

use crate::animation::AnimationKind;

/// Opaque window reference (an `HWND` value on Windows).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WindowId(pub isize);

impl WindowId {
    pub const NULL: WindowId = WindowId(0);

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// Handle returned by `WindowHost::set_timer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimerId(pub usize);

/// What the theme services need from the windowing system.
///
/// Every call happens on the UI thread that owns the windows.
pub trait WindowHost {
    /// True while `window` refers to a live window.
    fn is_window(&self, window: WindowId) -> bool;

    /// Request a full repaint of `window`.
    fn invalidate(&self, window: WindowId);

    /// Deliver the "animation complete" notification to `window`.
    fn post_animation_complete(&self, window: WindowId, kind: AnimationKind);

    /// Arm a repeating timer. `None` when the host could not create one.
    fn set_timer(&self, interval: Duration) -> Option<TimerId>;

    fn kill_timer(&self, timer: TimerId);
}

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}
