// ~/ignite/src/platform/headless.rs

use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
    time::Duration,
};

use crate::{
    animation::AnimationKind,
    info,
    platform::{TimerId, WindowHost, WindowId},
};

/// In-memory window host: windows are integers, repaints and completion
/// notifications are recorded instead of dispatched.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    live: RefCell<HashSet<WindowId>>,
    next_window: Cell<isize>,
    invalidations: RefCell<HashMap<WindowId, usize>>,
    completions: RefCell<Vec<(WindowId, AnimationKind)>>,
    timer: Cell<Option<TimerId>>,
    timer_interval: Cell<Option<Duration>>,
    next_timer: Cell<usize>,
    timers_armed: Cell<usize>,
    timers_killed: Cell<usize>,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_window(&self) -> WindowId {
        let id = WindowId(self.next_window.get() + 1);
        self.next_window.set(id.0);
        self.live.borrow_mut().insert(id);
        info!("[Headless] Created window {:?}", id);
        id
    }

    pub fn destroy_window(&self, window: WindowId) {
        if self.live.borrow_mut().remove(&window) {
            info!("[Headless] Destroyed window {:?}", window);
        }
    }

    /// Take every completion notification delivered so far.
    pub fn drain_completions(&self) -> Vec<(WindowId, AnimationKind)> {
        std::mem::take(&mut *self.completions.borrow_mut())
    }

    pub fn completions_for(&self, window: WindowId) -> usize {
        self.completions
            .borrow()
            .iter()
            .filter(|(w, _)| *w == window)
            .count()
    }

    pub fn invalidation_count(&self, window: WindowId) -> usize {
        self.invalidations.borrow().get(&window).copied().unwrap_or(0)
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.get().is_some()
    }

    pub fn timer_interval(&self) -> Option<Duration> {
        self.timer_interval.get()
    }

    /// (armed, killed) totals since creation.
    pub fn timer_counts(&self) -> (usize, usize) {
        (self.timers_armed.get(), self.timers_killed.get())
    }
}

impl WindowHost for HeadlessHost {
    fn is_window(&self, window: WindowId) -> bool {
        self.live.borrow().contains(&window)
    }

    fn invalidate(&self, window: WindowId) {
        *self.invalidations.borrow_mut().entry(window).or_insert(0) += 1;
    }

    fn post_animation_complete(&self, window: WindowId, kind: AnimationKind) {
        self.completions.borrow_mut().push((window, kind));
    }

    fn set_timer(&self, interval: Duration) -> Option<TimerId> {
        let id = TimerId(self.next_timer.get() + 1);
        self.next_timer.set(id.0);
        self.timer.set(Some(id));
        self.timer_interval.set(Some(interval));
        self.timers_armed.set(self.timers_armed.get() + 1);
        Some(id)
    }

    fn kill_timer(&self, timer: TimerId) {
        if self.timer.get() == Some(timer) {
            self.timer.set(None);
            self.timer_interval.set(None);
        }
        self.timers_killed.set(self.timers_killed.get() + 1);
    }
}
