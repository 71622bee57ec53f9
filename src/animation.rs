// ~/ignite/src/animation.rs
//! Per-window animation registry driven by one shared repaint timer.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::{
    config::{DuplicateStart, ThemeConfig},
    easing::Easing,
    error::{Result, ThemeError},
    platform::{Clock, SystemClock, TimerId, WindowHost, WindowId},
    info, warn,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    FadeIn = 1,
    FadeOut,
    SlideInLeft,
    SlideInRight,
    SlideInUp,
    SlideInDown,
    ScaleIn,
    ScaleOut,
    Bounce,
}

impl AnimationKind {
    pub const ALL: [AnimationKind; 9] = [
        AnimationKind::FadeIn,
        AnimationKind::FadeOut,
        AnimationKind::SlideInLeft,
        AnimationKind::SlideInRight,
        AnimationKind::SlideInUp,
        AnimationKind::SlideInDown,
        AnimationKind::ScaleIn,
        AnimationKind::ScaleOut,
        AnimationKind::Bounce,
    ];

    /// Wire code used in completion messages (1-based).
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    /// True for kinds that end with the window hidden.
    pub fn is_exit(self) -> bool {
        matches!(self, AnimationKind::FadeOut | AnimationKind::ScaleOut)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationEntry {
    pub target: WindowId,
    pub kind: AnimationKind,
    pub duration_ms: u32,
    pub started: Instant,
}

impl AnimationEntry {
    /// Whole milliseconds since start, truncated.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started).as_millis() as u64
    }

    /// `min(1, elapsed / duration)`; a zero duration is already finished.
    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed_ms(now) as f32 / self.duration_ms as f32).clamp(0.0, 1.0)
    }

    pub fn is_complete_at(&self, now: Instant) -> bool {
        self.elapsed_ms(now) >= u64::from(self.duration_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Maximum number of windows animating at once.
    pub capacity: usize,
    pub tick_interval: Duration,
    pub duplicate_start: DuplicateStart,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self::from(&ThemeConfig::default())
    }
}

impl From<&ThemeConfig> for RegistryOptions {
    fn from(cfg: &ThemeConfig) -> Self {
        Self {
            capacity: cfg.max_concurrent_animations.max(1),
            tick_interval: Duration::from_millis(cfg.tick_interval_ms.max(1)),
            duplicate_start: cfg.duplicate_start,
        }
    }
}

/// Outcome of one timer tick.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Finished this tick; each was notified exactly once.
    pub completed: Vec<(WindowId, AnimationKind)>,
    /// Dropped because the window no longer exists. Not notified.
    pub evicted: Vec<WindowId>,
    /// Still running; a repaint was requested.
    pub redrawn: usize,
}

impl TickReport {
    pub fn is_idle(&self) -> bool {
        self.completed.is_empty() && self.evicted.is_empty() && self.redrawn == 0
    }
}

/// In-flight animations keyed by target window, in registration order.
///
/// While at least one entry exists the registry keeps a repeating host timer
/// armed; the host calls [`AnimationRegistry::tick`] on every expiry.
#[derive(Debug)]
pub struct AnimationRegistry<C: Clock = SystemClock> {
    entries: IndexMap<WindowId, AnimationEntry>,
    options: RegistryOptions,
    clock: C,
    timer: Option<TimerId>,
}

impl AnimationRegistry<SystemClock> {
    pub fn new(options: RegistryOptions) -> Self {
        Self::with_clock(options, SystemClock)
    }
}

impl<C: Clock> AnimationRegistry<C> {
    pub fn with_clock(options: RegistryOptions, clock: C) -> Self {
        info!(
            "[Anim] Registry ready (capacity {}, tick {}ms)",
            options.capacity,
            options.tick_interval.as_millis()
        );
        Self {
            entries: IndexMap::with_capacity(options.capacity),
            options,
            clock,
            timer: None,
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Register an animation on `target`, starting now.
    ///
    /// Arms the shared timer if it is not running.
    pub fn start<H: WindowHost + ?Sized>(
        &mut self,
        host: &H,
        target: WindowId,
        kind: AnimationKind,
        duration_ms: u32,
    ) -> Result<()> {
        if target.is_null() || !host.is_window(target) {
            warn!("[Anim] Refusing {:?} on dead window {:?}", kind, target);
            return Err(ThemeError::InvalidArgument(format!(
                "window {:?} is not live",
                target
            )));
        }

        let now = self.clock.now();

        if let Some(entry) = self.entries.get_mut(&target) {
            match self.options.duplicate_start {
                DuplicateStart::Replace => {
                    info!(
                        "[Anim] Restarting {:?}: {:?} -> {:?} ({}ms)",
                        target, entry.kind, kind, duration_ms
                    );
                    entry.kind = kind;
                    entry.duration_ms = duration_ms;
                    entry.started = now;
                }
                DuplicateStart::Reject => {
                    warn!("[Anim] {:?} already animating {:?}", target, entry.kind);
                    return Err(ThemeError::InvalidArgument(format!(
                        "window {:?} already animating",
                        target
                    )));
                }
            }
        } else {
            if self.entries.len() >= self.options.capacity {
                warn!(
                    "[Anim] Registry full ({}), dropping {:?} on {:?}",
                    self.options.capacity, kind, target
                );
                return Err(ThemeError::RegistryFull {
                    capacity: self.options.capacity,
                });
            }

            self.entries.insert(
                target,
                AnimationEntry {
                    target,
                    kind,
                    duration_ms,
                    started: now,
                },
            );
            info!("[Anim] Started {:?} on {:?} ({}ms)", kind, target, duration_ms);
        }

        self.ensure_timer(host);
        Ok(())
    }

    /// Remove the animation on `target`. False if there was none.
    ///
    /// No completion notification is sent.
    pub fn stop(&mut self, target: WindowId) -> bool {
        match self.entries.shift_remove(&target) {
            Some(entry) => {
                info!("[Anim] Stopped {:?} on {:?}", entry.kind, target);
                true
            }
            None => false,
        }
    }

    /// Progress of the animation on `target` in 0..=1, or 0 when none runs.
    pub fn progress(&self, target: WindowId) -> f32 {
        let now = self.clock.now();
        self.entries
            .get(&target)
            .map(|e| e.progress_at(now))
            .unwrap_or(0.0)
    }

    pub fn progress_eased(&self, target: WindowId, easing: Easing) -> f32 {
        easing.apply(self.progress(target))
    }

    pub fn is_running(&self, target: WindowId) -> bool {
        self.entries.contains_key(&target)
    }

    pub fn get(&self, target: WindowId) -> Option<&AnimationEntry> {
        self.entries.get(&target)
    }

    pub fn entries(&self) -> impl Iterator<Item = &AnimationEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Advance every animation: finished ones are notified and removed, dead
    /// targets are evicted, the rest get a repaint. Disarms the timer once
    /// nothing is left.
    pub fn tick<H: WindowHost + ?Sized>(&mut self, host: &H) -> TickReport {
        let now = self.clock.now();
        let mut report = TickReport::default();

        self.entries.retain(|target, entry| {
            if !host.is_window(*target) {
                warn!("[Anim] Evicting {:?}: window destroyed mid-animation", target);
                report.evicted.push(*target);
                return false;
            }

            if entry.is_complete_at(now) {
                host.post_animation_complete(*target, entry.kind);
                info!("[Anim] Completed {:?} on {:?}", entry.kind, target);
                report.completed.push((*target, entry.kind));
                false
            } else {
                host.invalidate(*target);
                report.redrawn += 1;
                true
            }
        });

        if self.entries.is_empty() {
            self.disarm_timer(host);
        }

        report
    }

    /// Drop every animation without notifying and disarm the timer.
    pub fn clear<H: WindowHost + ?Sized>(&mut self, host: &H) {
        if !self.entries.is_empty() {
            info!("[Anim] Clearing {} animation(s)", self.entries.len());
        }
        self.entries.clear();
        self.disarm_timer(host);
    }

    fn ensure_timer<H: WindowHost + ?Sized>(&mut self, host: &H) {
        if self.timer.is_some() {
            return;
        }
        self.timer = host.set_timer(self.options.tick_interval);
        if self.timer.is_none() {
            warn!("[Anim] Host refused animation timer; will retry on next start");
        }
    }

    fn disarm_timer<H: WindowHost + ?Sized>(&mut self, host: &H) {
        if let Some(timer) = self.timer.take() {
            host.kill_timer(timer);
            info!("[Anim] Animation timer disarmed");
        }
    }
}
