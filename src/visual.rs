// ~/ignite/src/visual.rs
//! Turns animation progress into what a surface should paint.

use serde::Serialize;

use crate::{
    animation::{AnimationKind, AnimationRegistry},
    easing::{blend_colors, ease_in, ease_out},
    platform::{Clock, WindowId},
};

// Overshoot constant of the classic "back" ease.
const BACK_OVERSHOOT: f32 = 1.70158;

/// Transform and opacity a surface applies to its contents for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualState {
    pub opacity: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub scale: f32,
}

impl VisualState {
    pub const RESTING: VisualState = VisualState {
        opacity: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
        scale: 1.0,
    };

    /// Opacity as an 8-bit alpha for layered-window blending.
    pub fn alpha_byte(&self) -> u8 {
        (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualParams {
    /// Pixels a slide travels.
    pub slide_distance: f32,
    /// Scale at which scale-in starts and scale-out ends.
    pub scale_from: f32,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            slide_distance: 40.0,
            scale_from: 0.9,
        }
    }
}

/// Frame for `kind` at linear progress `t` (clamped to 0..=1).
pub fn visual_state(kind: AnimationKind, t: f32, params: &VisualParams) -> VisualState {
    let t = t.clamp(0.0, 1.0);
    let enter = ease_out(t);
    let exit = ease_in(t);
    let travel = params.slide_distance * (1.0 - enter);

    let mut state = VisualState::RESTING;
    match kind {
        AnimationKind::FadeIn => state.opacity = enter,
        AnimationKind::FadeOut => state.opacity = 1.0 - exit,
        AnimationKind::SlideInLeft => {
            state.opacity = enter;
            state.offset_x = -travel;
        }
        AnimationKind::SlideInRight => {
            state.opacity = enter;
            state.offset_x = travel;
        }
        AnimationKind::SlideInUp => {
            state.opacity = enter;
            state.offset_y = travel;
        }
        AnimationKind::SlideInDown => {
            state.opacity = enter;
            state.offset_y = -travel;
        }
        AnimationKind::ScaleIn => {
            state.opacity = enter;
            state.scale = params.scale_from + (1.0 - params.scale_from) * enter;
        }
        AnimationKind::ScaleOut => {
            state.opacity = 1.0 - exit;
            state.scale = 1.0 - (1.0 - params.scale_from) * exit;
        }
        AnimationKind::Bounce => {
            state.opacity = (t * 2.0).min(1.0);
            state.scale = params.scale_from + (1.0 - params.scale_from) * ease_out_back(t);
        }
    }
    state
}

/// Frame for whatever `window` is animating, or [`VisualState::RESTING`].
pub fn visual_state_for<C: Clock>(
    registry: &AnimationRegistry<C>,
    window: WindowId,
    params: &VisualParams,
) -> VisualState {
    match registry.get(window) {
        Some(entry) => visual_state(entry.kind, registry.progress(window), params),
        None => VisualState::RESTING,
    }
}

/// Overshoots past 1 and settles back to exactly 1 at `t == 1`.
pub fn ease_out_back(t: f32) -> f32 {
    let c3 = BACK_OVERSHOOT + 1.0;
    let u = t - 1.0;
    1.0 + c3 * u * u * u + BACK_OVERSHOOT * u * u
}

/// Button background while a hover highlight fades in.
pub fn hover_color(background: u32, highlight: u32, progress: f32) -> u32 {
    blend_colors(background, highlight, progress.clamp(0.0, 1.0))
}
