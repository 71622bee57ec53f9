// ~/ignite/src/boot.rs
//! Boot screen timeline: logo fade, progress bar, loading, fade out.

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::{
    platform::{Clock, SystemClock},
    info,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BootPhase {
    Init,
    LogoFadeIn,
    ProgressShow,
    Loading,
    FadeOut,
    Complete,
}

impl BootPhase {
    fn next(self) -> BootPhase {
        match self {
            BootPhase::Init => BootPhase::LogoFadeIn,
            BootPhase::LogoFadeIn => BootPhase::ProgressShow,
            BootPhase::ProgressShow => BootPhase::Loading,
            BootPhase::Loading => BootPhase::FadeOut,
            BootPhase::FadeOut | BootPhase::Complete => BootPhase::Complete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootTimings {
    pub init: Duration,
    pub logo_fade_in: Duration,
    pub progress_show: Duration,
    pub loading: Duration,
    pub fade_out: Duration,
}

impl Default for BootTimings {
    fn default() -> Self {
        Self {
            init: Duration::from_millis(500),
            logo_fade_in: Duration::from_millis(1000),
            progress_show: Duration::from_millis(500),
            loading: Duration::from_millis(3000),
            fade_out: Duration::from_millis(500),
        }
    }
}

impl BootTimings {
    fn of(&self, phase: BootPhase) -> Option<Duration> {
        match phase {
            BootPhase::Init => Some(self.init),
            BootPhase::LogoFadeIn => Some(self.logo_fade_in),
            BootPhase::ProgressShow => Some(self.progress_show),
            BootPhase::Loading => Some(self.loading),
            BootPhase::FadeOut => Some(self.fade_out),
            BootPhase::Complete => None,
        }
    }

    pub fn total(&self) -> Duration {
        self.init + self.logo_fade_in + self.progress_show + self.loading + self.fade_out
    }
}

/// What the boot screen paints this frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BootFrame {
    pub phase: BootPhase,
    pub logo_alpha: f32,
    pub progress_alpha: f32,
    /// Loading bar fill, 0..=1.
    pub progress: f32,
}

impl BootFrame {
    /// Whole percent shown under the bar while loading.
    pub fn percent(&self) -> u32 {
        (self.progress * 100.0) as u32
    }
}

#[derive(Debug)]
pub struct BootSequence<C: Clock = SystemClock> {
    clock: C,
    timings: BootTimings,
    phase: BootPhase,
    phase_started: Instant,
}

impl<C: Clock> BootSequence<C> {
    pub fn new(clock: C, timings: BootTimings) -> Self {
        let phase_started = clock.now();
        info!("[Boot] Boot sequence started ({}ms)", timings.total().as_millis());
        Self {
            clock,
            timings,
            phase: BootPhase::Init,
            phase_started,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == BootPhase::Complete
    }

    /// Advance to the current time and describe the frame.
    ///
    /// Each phase starts where the previous one ended, so a slow frame can
    /// cross several phases without stretching the timeline.
    pub fn update(&mut self) -> BootFrame {
        let now = self.clock.now();

        while let Some(length) = self.timings.of(self.phase) {
            if now.saturating_duration_since(self.phase_started) < length {
                break;
            }
            self.phase_started += length;
            self.phase = self.phase.next();
            info!("[Boot] Entered {:?}", self.phase);
        }

        let elapsed = now.saturating_duration_since(self.phase_started);
        self.frame(elapsed)
    }

    fn frame(&self, elapsed: Duration) -> BootFrame {
        let fraction = |length: Duration| -> f32 {
            if length.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f32() / length.as_secs_f32()).min(1.0)
            }
        };

        let (logo_alpha, progress_alpha, progress) = match self.phase {
            BootPhase::Init => (0.0, 0.0, 0.0),
            BootPhase::LogoFadeIn => (fraction(self.timings.logo_fade_in), 0.0, 0.0),
            BootPhase::ProgressShow => (1.0, fraction(self.timings.progress_show), 0.0),
            BootPhase::Loading => (1.0, 1.0, fraction(self.timings.loading)),
            BootPhase::FadeOut => {
                let fade = (1.0 - fraction(self.timings.fade_out)).max(0.0);
                (fade, fade, 1.0)
            }
            BootPhase::Complete => (0.0, 0.0, 1.0),
        };

        BootFrame {
            phase: self.phase,
            logo_alpha,
            progress_alpha,
            progress,
        }
    }
}
