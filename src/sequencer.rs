// ~/ignite/src/sequencer.rs
//! Multi-step surface transitions chained on completion notifications, so
//! e.g. "hide, resize, show again" never blocks the UI thread waiting.

use std::collections::{HashMap, VecDeque};

use crate::{
    animation::{AnimationKind, AnimationRegistry, TickReport},
    error::ThemeError,
    platform::{Clock, WindowHost, WindowId},
    info, warn,
};

/// One step of a transition. `A` is whatever the surface does between
/// animations (hide, resize, destroy, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Step<A> {
    Animate { kind: AnimationKind, duration_ms: u32 },
    Action(A),
}

/// A transition stopped because an animation step could not start.
///
/// `actions` were popped before the failing step and still have to be
/// performed. The window's remaining steps are discarded.
#[derive(Debug)]
pub struct Aborted<A> {
    pub actions: Vec<A>,
    pub error: ThemeError,
}

#[derive(Debug)]
pub struct TransitionSequencer<A> {
    queues: HashMap<WindowId, VecDeque<Step<A>>>,
}

impl<A> Default for TransitionSequencer<A> {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }
}

impl<A: std::fmt::Debug> TransitionSequencer<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append steps for `window`; they run after anything already queued.
    pub fn queue(&mut self, window: WindowId, steps: impl IntoIterator<Item = Step<A>>) {
        self.queues.entry(window).or_default().extend(steps);
    }

    /// Run queued steps for `window` now unless it is mid-animation.
    ///
    /// Returns the actions the caller must perform, in order.
    pub fn begin<C: Clock, H: WindowHost + ?Sized>(
        &mut self,
        registry: &mut AnimationRegistry<C>,
        host: &H,
        window: WindowId,
    ) -> Result<Vec<A>, Aborted<A>> {
        if registry.is_running(window) {
            return Ok(Vec::new());
        }
        self.advance(registry, host, window)
    }

    /// Feed one tick's outcome: each completed window moves to its next steps,
    /// evicted windows lose their queue.
    pub fn handle_tick<C: Clock, H: WindowHost + ?Sized>(
        &mut self,
        registry: &mut AnimationRegistry<C>,
        host: &H,
        report: &TickReport,
    ) -> Vec<(WindowId, A)> {
        for window in &report.evicted {
            if self.queues.remove(window).is_some() {
                info!("[Sequencer] Dropped transition of destroyed window {:?}", window);
            }
        }

        let mut actions = Vec::new();
        for (window, _) in &report.completed {
            match self.advance(registry, host, *window) {
                Ok(done) => actions.extend(done.into_iter().map(|a| (*window, a))),
                Err(aborted) => {
                    warn!("[Sequencer] Transition of {:?} aborted: {}", window, aborted.error);
                    actions.extend(aborted.actions.into_iter().map(|a| (*window, a)));
                }
            }
        }
        actions
    }

    pub fn cancel(&mut self, window: WindowId) -> bool {
        self.queues.remove(&window).is_some()
    }

    pub fn pending(&self, window: WindowId) -> usize {
        self.queues.get(&window).map_or(0, VecDeque::len)
    }

    pub fn is_idle(&self) -> bool {
        self.queues.is_empty()
    }

    /// Pop actions until the next animation starts or the queue runs dry.
    /// The queue is taken out while it runs and only put back if steps remain.
    fn advance<C: Clock, H: WindowHost + ?Sized>(
        &mut self,
        registry: &mut AnimationRegistry<C>,
        host: &H,
        window: WindowId,
    ) -> Result<Vec<A>, Aborted<A>> {
        let mut actions = Vec::new();
        let Some(mut queue) = self.queues.remove(&window) else {
            return Ok(actions);
        };

        while let Some(step) = queue.pop_front() {
            match step {
                Step::Action(action) => {
                    info!("[Sequencer] {:?}: {:?}", window, action);
                    actions.push(action);
                }
                Step::Animate { kind, duration_ms } => {
                    if let Err(error) = registry.start(host, window, kind, duration_ms) {
                        return Err(Aborted { actions, error });
                    }
                    break;
                }
            }
        }

        if !queue.is_empty() {
            self.queues.insert(window, queue);
        }
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        animation::RegistryOptions,
        error::ThemeError,
        platform::{headless::HeadlessHost, ManualClock},
    };

    #[derive(Debug, Clone, PartialEq)]
    enum MenuAction {
        Hide,
        Resize,
        Show,
    }

    fn toggle_fullscreen() -> Vec<Step<MenuAction>> {
        vec![
            Step::Animate { kind: AnimationKind::ScaleOut, duration_ms: 250 },
            Step::Action(MenuAction::Hide),
            Step::Action(MenuAction::Resize),
            Step::Action(MenuAction::Show),
            Step::Animate { kind: AnimationKind::ScaleIn, duration_ms: 250 },
        ]
    }

    #[test]
    fn test_actions_wait_for_completion() {
        let clock = ManualClock::new();
        let host = HeadlessHost::new();
        let mut reg = AnimationRegistry::with_clock(RegistryOptions::default(), clock.clone());
        let mut seq = TransitionSequencer::new();
        let menu = host.create_window();

        seq.queue(menu, toggle_fullscreen());
        assert!(seq.begin(&mut reg, &host, menu).unwrap().is_empty());
        assert_eq!(reg.get(menu).map(|e| e.kind), Some(AnimationKind::ScaleOut));

        clock.advance_ms(100);
        let report = reg.tick(&host);
        assert!(seq.handle_tick(&mut reg, &host, &report).is_empty());
        assert_eq!(seq.pending(menu), 4);

        clock.advance_ms(150);
        let report = reg.tick(&host);
        let actions = seq.handle_tick(&mut reg, &host, &report);
        assert_eq!(
            actions,
            vec![(menu, MenuAction::Hide), (menu, MenuAction::Resize), (menu, MenuAction::Show)]
        );
        assert_eq!(reg.get(menu).map(|e| e.kind), Some(AnimationKind::ScaleIn));
        assert!(seq.is_idle());
    }

    #[test]
    fn test_begin_defers_while_animating() {
        let clock = ManualClock::new();
        let host = HeadlessHost::new();
        let mut reg = AnimationRegistry::with_clock(RegistryOptions::default(), clock.clone());
        let mut seq = TransitionSequencer::new();
        let w = host.create_window();

        reg.start(&host, w, AnimationKind::FadeIn, 100).unwrap();
        seq.queue(w, [Step::Action(MenuAction::Show)]);
        assert!(seq.begin(&mut reg, &host, w).unwrap().is_empty());
        assert_eq!(seq.pending(w), 1);

        clock.advance_ms(100);
        let report = reg.tick(&host);
        assert_eq!(seq.handle_tick(&mut reg, &host, &report), vec![(w, MenuAction::Show)]);
    }

    #[test]
    fn test_destroyed_window_drops_queue() {
        let clock = ManualClock::new();
        let host = HeadlessHost::new();
        let mut reg = AnimationRegistry::with_clock(RegistryOptions::default(), clock.clone());
        let mut seq = TransitionSequencer::new();
        let w = host.create_window();

        seq.queue(w, toggle_fullscreen());
        seq.begin(&mut reg, &host, w).unwrap();
        host.destroy_window(w);

        clock.advance_ms(16);
        let report = reg.tick(&host);
        assert!(seq.handle_tick(&mut reg, &host, &report).is_empty());
        assert!(seq.is_idle());
    }

    #[test]
    fn test_failed_start_surfaces_error() {
        let clock = ManualClock::new();
        let host = HeadlessHost::new();
        let mut reg = AnimationRegistry::with_clock(RegistryOptions::default(), clock);
        let mut seq: TransitionSequencer<MenuAction> = TransitionSequencer::new();
        let w = host.create_window();
        host.destroy_window(w);

        seq.queue(w, toggle_fullscreen());
        let aborted = seq.begin(&mut reg, &host, w).unwrap_err();
        assert!(matches!(aborted.error, ThemeError::InvalidArgument(_)));
        assert!(aborted.actions.is_empty());
        assert!(seq.is_idle());
        assert!(!seq.cancel(w));
    }

    #[test]
    fn test_failed_begin_returns_popped_actions() {
        let host = HeadlessHost::new();
        let options = RegistryOptions { capacity: 1, ..RegistryOptions::default() };
        let mut reg = AnimationRegistry::with_clock(options, ManualClock::new());
        let mut seq = TransitionSequencer::new();
        let busy = host.create_window();
        let w = host.create_window();

        reg.start(&host, busy, AnimationKind::FadeIn, 100).unwrap();
        seq.queue(
            w,
            [
                Step::Action(MenuAction::Hide),
                Step::Animate { kind: AnimationKind::ScaleIn, duration_ms: 250 },
                Step::Action(MenuAction::Show),
            ],
        );

        let aborted = seq.begin(&mut reg, &host, w).unwrap_err();
        assert!(matches!(aborted.error, ThemeError::RegistryFull { capacity: 1 }));
        assert_eq!(aborted.actions, vec![MenuAction::Hide]);
        assert_eq!(seq.pending(w), 0);
        assert!(seq.is_idle());
    }

    #[test]
    fn test_failed_step_after_completion_keeps_actions() {
        let clock = ManualClock::new();
        let host = HeadlessHost::new();
        let options = RegistryOptions { capacity: 1, ..RegistryOptions::default() };
        let mut reg = AnimationRegistry::with_clock(options, clock.clone());
        let mut seq = TransitionSequencer::new();
        let w = host.create_window();

        seq.queue(w, toggle_fullscreen());
        seq.begin(&mut reg, &host, w).unwrap();

        clock.advance_ms(250);
        let report = reg.tick(&host);
        host.destroy_window(w);
        let actions = seq.handle_tick(&mut reg, &host, &report);
        assert_eq!(
            actions,
            vec![(w, MenuAction::Hide), (w, MenuAction::Resize), (w, MenuAction::Show)]
        );
        assert!(reg.is_empty());
        assert!(seq.is_idle());
    }
}
