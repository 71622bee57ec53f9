// ~/ignite/src/status.rs

use serde::Serialize;
use std::path::Path;

use crate::{
    animation::{AnimationKind, AnimationRegistry},
    attributes::{WindowAttributeStore, WindowAttributes},
    config::ThemeConfig,
    platform::{Clock, WindowId},
    render::{ContextState, GraphicsBackend, RenderContext},
    snap::{SnapTracker, SnappedWindow},
    info, error,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationStatus {
    pub window: WindowId,
    pub kind: AnimationKind,
    pub duration_ms: u32,
    pub progress: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStatus {
    pub window: WindowId,
    pub attributes: WindowAttributes,
}

/// Point-in-time view of every Ignite service, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub context: ContextState,
    pub config: Option<ThemeConfig>,
    pub timer_armed: bool,
    pub animations: Vec<AnimationStatus>,
    pub windows: Vec<WindowStatus>,
    pub snapped: Vec<SnappedWindow>,
}

impl StatusSnapshot {
    pub fn capture<C: Clock, B: GraphicsBackend>(
        context: &RenderContext<B>,
        registry: &AnimationRegistry<C>,
        attributes: &WindowAttributeStore,
        snaps: &SnapTracker,
    ) -> Self {
        let animations = registry
            .entries()
            .map(|e| AnimationStatus {
                window: e.target,
                kind: e.kind,
                duration_ms: e.duration_ms,
                progress: registry.progress(e.target),
            })
            .collect();

        let mut windows: Vec<WindowStatus> = attributes
            .iter()
            .map(|(window, attrs)| WindowStatus {
                window: *window,
                attributes: *attrs,
            })
            .collect();
        windows.sort_by_key(|w| w.window);

        Self {
            context: context.state(),
            config: context.config().cloned(),
            timer_armed: registry.timer_armed(),
            animations,
            windows,
            snapped: snaps.snapped().to_vec(),
        }
    }
}

/// Write `ignite_state.json` into `root`.
pub fn write_status_json(snapshot: &StatusSnapshot, root: &Path) {
    let path = root.join("ignite_state.json");

    let json = match serde_json::to_string_pretty(snapshot) {
        Ok(j) => j,
        Err(e) => {
            error!("Failed to serialize status: {e}");
            return;
        }
    };

    if let Err(e) = std::fs::write(&path, json) {
        error!("Failed to write ignite_state.json: {e}");
    } else {
        info!("ignite_state.json updated");
    }
}
