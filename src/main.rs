// ~/ignite/src/main.rs

#![windows_subsystem = "windows"]

use ignite::{
    animation::{AnimationKind, AnimationRegistry, RegistryOptions},
    attributes::WindowAttributeStore,
    config::{self, ThemeConfig},
    logging,
    paths::ignite_root_dir,
    platform::{WindowHost, WindowId},
    render::{GraphicsBackend, HeadlessBackend, RecordingTarget, RectF, RenderContext},
    sequencer::{Step, TransitionSequencer},
    snap::SnapTracker,
    status::{write_status_json, StatusSnapshot},
    visual::{visual_state_for, VisualParams},
    info, warn, error,
};

/// Things a shell surface does between two animations.
#[derive(Debug, Clone, PartialEq)]
enum ShellAction {
    Show,
    Hide,
    SetFullScreen(bool),
}

/// A themed top-level window and the rect it paints.
struct Surface {
    name: &'static str,
    window: WindowId,
    bounds: RectF,
    full_screen: bool,
    visible: bool,
}

struct IgniteDaemon<H: WindowHost, B: GraphicsBackend> {
    config: ThemeConfig,
    host: H,
    context: RenderContext<B>,
    animations: AnimationRegistry,
    attributes: WindowAttributeStore,
    snaps: SnapTracker,
    transitions: TransitionSequencer<ShellAction>,
    surfaces: Vec<Surface>,
    visual: VisualParams,
}

impl<H: WindowHost, B: GraphicsBackend> IgniteDaemon<H, B> {
    pub fn new(config: ThemeConfig, host: H, backend: B) -> Self {
        info!("Initializing IgniteDaemon services");
        Self {
            animations: AnimationRegistry::new(RegistryOptions::from(&config)),
            context: RenderContext::with_config(backend, config.clone()),
            attributes: WindowAttributeStore::new(),
            snaps: SnapTracker::new(),
            transitions: TransitionSequencer::new(),
            surfaces: Vec::new(),
            visual: VisualParams::default(),
            config,
            host,
        }
    }

    pub fn start(&mut self) -> ignite::Result<()> {
        self.context.initialize()?;
        self.context.bind_render_target(Box::new(RecordingTarget::new()))?;
        Ok(())
    }

    fn duration(&self, ms: u32) -> u32 {
        if self.config.animations_enabled {
            ms
        } else {
            0
        }
    }

    fn theme_window(&mut self, window: WindowId, corner_radius: f32) -> ignite::Result<()> {
        let blur = if self.config.blur_enabled { self.config.blur_radius } else { 0.0 };
        self.attributes.set_acrylic(&self.host, window, self.config.acrylic_enabled)?;
        self.attributes.set_corner_radius(&self.host, window, corner_radius)?;
        self.attributes.set_drop_shadow(&self.host, window, corner_radius > 0.0)?;
        self.attributes.set_blur_amount(&self.host, window, blur)?;
        Ok(())
    }

    /// Theme `window` and play its entrance.
    fn attach_surface(&mut self, name: &'static str, window: WindowId, bounds: RectF, corner_radius: f32, entrance: AnimationKind) {
        if let Err(e) = self.theme_window(window, corner_radius) {
            warn!("Could not theme {name}: {e}");
            return;
        }

        self.surfaces.push(Surface {
            name,
            window,
            bounds,
            full_screen: false,
            visible: true,
        });

        let duration = self.duration(self.config.animation_duration_ms);
        self.transitions.queue(window, [Step::Animate { kind: entrance, duration_ms: duration }]);
        self.begin_transition(window);
    }

    /// Start queued steps for `window` and perform any leading actions, even
    /// those popped before a failed animation step.
    fn begin_transition(&mut self, window: WindowId) {
        let actions = match self.transitions.begin(&mut self.animations, &self.host, window) {
            Ok(actions) => actions,
            Err(aborted) => {
                warn!("Transition of {:?} aborted: {}", window, aborted.error);
                aborted.actions
            }
        };
        for action in actions {
            self.perform(window, action);
        }
    }

    /// Hide `window`, flip its full-screen flag, and bring it back, each step
    /// triggered by the previous animation finishing.
    #[cfg_attr(windows, allow(dead_code))]
    fn toggle_full_screen(&mut self, window: WindowId) {
        let Some(full) = self.surfaces.iter().find(|s| s.window == window).map(|s| s.full_screen) else {
            return;
        };
        let out = self.duration(self.config.animation_duration_ms);
        self.transitions.queue(
            window,
            [
                Step::Animate { kind: AnimationKind::ScaleOut, duration_ms: out },
                Step::Action(ShellAction::Hide),
                Step::Action(ShellAction::SetFullScreen(!full)),
                Step::Action(ShellAction::Show),
                Step::Animate { kind: AnimationKind::ScaleIn, duration_ms: out },
            ],
        );
        // Runs now if idle, otherwise once the current animation completes.
        self.begin_transition(window);
    }

    /// Timer expiry: advance animations, run follow-up steps, repaint.
    /// Returns false once nothing is left to do.
    pub fn on_timer(&mut self) -> bool {
        let report = self.animations.tick(&self.host);
        for window in &report.evicted {
            self.attributes.on_window_destroyed(*window);
            self.surfaces.retain(|s| s.window != *window);
        }

        for (window, action) in self.transitions.handle_tick(&mut self.animations, &self.host, &report) {
            self.perform(window, action);
        }

        self.paint();
        !(self.animations.is_empty() && self.transitions.is_idle())
    }

    fn perform(&mut self, window: WindowId, action: ShellAction) {
        let Some(surface) = self.surfaces.iter_mut().find(|s| s.window == window) else {
            return;
        };
        info!("{} -> {:?}", surface.name, action);
        match action {
            ShellAction::Show => surface.visible = true,
            ShellAction::Hide => surface.visible = false,
            ShellAction::SetFullScreen(full) => {
                surface.full_screen = full;
                surface.bounds = if full {
                    RectF::new(0.0, 0.0, 1920.0, 1032.0)
                } else {
                    RectF::new(640.0, 252.0, 1280.0, 972.0)
                };
            }
        }
    }

    /// Paint every visible surface with its current animation frame.
    fn paint(&mut self) {
        let opacity = self.config.acrylic_opacity;
        let accent = self.config.accent_color;

        for surface in self.surfaces.iter().filter(|s| s.visible) {
            let frame = visual_state_for(&self.animations, surface.window, &self.visual);
            let attrs = self.attributes.get_or_default(surface.window);

            let b = surface.bounds;
            let (cx, cy) = ((b.left + b.right) / 2.0, (b.top + b.bottom) / 2.0);
            let (hw, hh) = (b.width() * frame.scale / 2.0, b.height() * frame.scale / 2.0);
            let rect = RectF::new(
                cx - hw + frame.offset_x,
                cy - hh + frame.offset_y,
                cx + hw + frame.offset_x,
                cy + hh + frame.offset_y,
            );

            let fill_opacity = if attrs.acrylic_enabled { opacity } else { 1.0 };
            let painted = self
                .context
                .create_acrylic_brush(accent, fill_opacity * frame.opacity)
                .and_then(|brush| self.context.draw_rounded_rect(rect, attrs.corner_radius(), &brush));
            if let Err(e) = painted {
                error!("Failed to paint {}: {e}", surface.name);
            }
        }
    }

    pub fn shutdown(&mut self) {
        info!("Shutting down IgniteDaemon");
        write_status_json(
            &StatusSnapshot::capture(&self.context, &self.animations, &self.attributes, &self.snaps),
            &ignite_root_dir(),
        );
        self.animations.clear(&self.host);
        self.transitions = TransitionSequencer::new();
        self.snaps.clear();
        self.context.shutdown();
    }
}

#[cfg(windows)]
fn run(config: ThemeConfig) -> ignite::Result<()> {
    use ignite::platform::win32::{find_shell_taskbar, Win32Host};
    use windows::Win32::UI::WindowsAndMessaging::{DispatchMessageW, GetMessageW, TranslateMessage, MSG, WM_TIMER};

    let mut daemon = IgniteDaemon::new(config, Win32Host::new(), HeadlessBackend::new());
    daemon.start()?;

    let Some(taskbar) = find_shell_taskbar() else {
        daemon.shutdown();
        return Ok(());
    };
    daemon.attach_surface("taskbar", taskbar, RectF::new(0.0, 1032.0, 1920.0, 1080.0), 0.0, AnimationKind::SlideInUp);

    unsafe {
        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).as_bool() {
            if msg.message == WM_TIMER && msg.hwnd.0.is_null() {
                if !daemon.on_timer() {
                    break;
                }
                continue;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    daemon.shutdown();
    Ok(())
}

#[cfg(not(windows))]
fn run(config: ThemeConfig) -> ignite::Result<()> {
    use ignite::platform::headless::HeadlessHost;
    use std::time::Duration;

    let tick = Duration::from_millis(config.tick_interval_ms);
    let corner = config.corner_radius;
    let host = HeadlessHost::new();
    let taskbar = host.create_window();
    let start_menu = host.create_window();

    let mut daemon = IgniteDaemon::new(config, host, HeadlessBackend::new());
    daemon.start()?;
    daemon.attach_surface("taskbar", taskbar, RectF::new(0.0, 1032.0, 1920.0, 1080.0), 0.0, AnimationKind::SlideInUp);
    daemon.attach_surface("start menu", start_menu, RectF::new(640.0, 252.0, 1280.0, 972.0), corner, AnimationKind::ScaleIn);
    daemon.toggle_full_screen(start_menu);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build()?;
    runtime.block_on(async {
        let mut interval = tokio::time::interval(tick);
        loop {
            interval.tick().await;
            if !daemon.on_timer() {
                break;
            }
        }
    });

    daemon.shutdown();
    Ok(())
}

fn main() {
    // Enable logging at startup
    if let Err(e) = logging::init(true) {
        eprintln!("ignite: logging unavailable: {e}");
    }
    info!("Ignite theme host starting");

    let config = config::load_config();
    match run(config) {
        Ok(()) => info!("Ignite theme host exiting"),
        Err(e) => error!("Ignite theme host failed: {e}"),
    }
    logging::flush();
}
