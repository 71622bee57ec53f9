// ~/ignite/src/render/mod.rs
//! Render context: device/factory lifecycle plus the theme drawing helpers.

pub mod backend;

use serde::Serialize;
use std::rc::Rc;

pub use backend::{
    AcquisitionStage, ColorF, DrawCommand, GraphicsBackend, HeadlessBackend, RecordingTarget,
    RectF, RenderTarget, SolidBrush,
};

use crate::{
    config::{BlurPolicy, ThemeConfig},
    error::{Result, ThemeError},
    info, warn, error,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContextState {
    Uninitialized,
    Initialized,
}

// Held only to keep the handles alive until shutdown.
#[allow(dead_code)]
struct DeviceResources<B: GraphicsBackend> {
    imaging: B::ImagingFactory,
    text: B::TextFactory,
    factory_2d: B::Factory2D,
    device: B::Device,
}

/// Device handles and theme config shared by every themed surface.
///
/// `Uninitialized -> initialize() -> Initialized -> shutdown() -> Uninitialized`.
pub struct RenderContext<B: GraphicsBackend> {
    backend: B,
    resources: Option<DeviceResources<B>>,
    target: Option<Box<dyn RenderTarget>>,
    config: Option<ThemeConfig>,
    initial_config: ThemeConfig,
}

impl<B: GraphicsBackend> RenderContext<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, ThemeConfig::default())
    }

    /// Context that will adopt `config` (sanitized) on `initialize`.
    pub fn with_config(backend: B, config: ThemeConfig) -> Self {
        Self {
            backend,
            resources: None,
            target: None,
            config: None,
            initial_config: config.sanitized(),
        }
    }

    pub fn state(&self) -> ContextState {
        if self.resources.is_some() {
            ContextState::Initialized
        } else {
            ContextState::Uninitialized
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.state() == ContextState::Initialized
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Live theme config; `None` while uninitialized.
    pub fn config(&self) -> Option<&ThemeConfig> {
        self.config.as_ref()
    }

    pub fn config_mut(&mut self) -> Option<&mut ThemeConfig> {
        self.config.as_mut()
    }

    /// Acquire device, 2D factory, text factory and imaging factory in that
    /// order. A no-op when already initialized.
    ///
    /// On failure every handle acquired by this attempt is released and the
    /// context stays uninitialized.
    pub fn initialize(&mut self) -> Result<()> {
        if self.is_initialized() {
            info!("[Render] Already initialized, reusing devices");
            return Ok(());
        }

        let device = self
            .backend
            .create_device()
            .map_err(|e| acquisition_failed(AcquisitionStage::Device, e))?;
        let factory_2d = self
            .backend
            .create_2d_factory()
            .map_err(|e| acquisition_failed(AcquisitionStage::Factory2D, e))?;
        let text = self
            .backend
            .create_text_factory()
            .map_err(|e| acquisition_failed(AcquisitionStage::TextFactory, e))?;
        let imaging = self
            .backend
            .create_imaging_factory()
            .map_err(|e| acquisition_failed(AcquisitionStage::ImagingFactory, e))?;

        self.resources = Some(DeviceResources {
            imaging,
            text,
            factory_2d,
            device,
        });
        self.config = Some(self.initial_config.clone());

        info!("[Render] Render context initialized");
        Ok(())
    }

    /// Release everything in reverse acquisition order. Safe to repeat.
    pub fn shutdown(&mut self) {
        let target = self.target.take();

        if let Some(DeviceResources {
            imaging,
            text,
            factory_2d,
            device,
        }) = self.resources.take()
        {
            drop(imaging);
            drop(text);
            drop(target);
            drop(factory_2d);
            drop(device);
            info!("[Render] Render context shut down");
        }

        self.config = None;
    }

    /// Attach the surface subsequent draw helpers paint onto.
    pub fn bind_render_target(&mut self, target: Box<dyn RenderTarget>) -> Result<()> {
        if !self.is_initialized() {
            return Err(ThemeError::NotInitialized);
        }
        self.target = Some(target);
        Ok(())
    }

    pub fn unbind_render_target(&mut self) -> Option<Box<dyn RenderTarget>> {
        self.target.take()
    }

    pub fn has_render_target(&self) -> bool {
        self.target.is_some()
    }

    /// Solid brush with the RGB of `color` and alpha `opacity`.
    ///
    /// A real acrylic material would layer noise and blur; surfaces get the
    /// flat tint.
    pub fn create_acrylic_brush(&mut self, color: u32, opacity: f32) -> Result<SolidBrush> {
        if !opacity.is_finite() {
            return Err(ThemeError::InvalidArgument(format!("opacity {opacity}")));
        }
        let target = self.ready_target()?;
        target.create_solid_brush(ColorF::from_rgb_with_alpha(color, opacity.clamp(0.0, 1.0)))
    }

    pub fn draw_rounded_rect(&mut self, rect: RectF, radius: f32, brush: &SolidBrush) -> Result<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ThemeError::InvalidArgument(format!("corner radius {radius}")));
        }
        let target = self.ready_target()?;
        target.fill_rounded_rect(rect, radius, radius, brush);
        Ok(())
    }

    /// Blur `source` by `radius` according to the configured [`BlurPolicy`].
    ///
    /// `PassThrough` hands back another reference to the unmodified source.
    pub fn apply_blur_effect<T>(&mut self, source: &Rc<T>, radius: f32) -> Result<Rc<T>> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(ThemeError::InvalidArgument(format!("blur radius {radius}")));
        }
        self.ready_target()?;

        let policy = self
            .config
            .as_ref()
            .map(|c| c.blur_policy)
            .unwrap_or_default();

        match policy {
            BlurPolicy::PassThrough => Ok(Rc::clone(source)),
            BlurPolicy::Unsupported => {
                warn!("[Render] Blur requested (radius {}) but blur is unsupported", radius);
                Err(ThemeError::Unsupported("blur effect"))
            }
        }
    }

    /// Whether surfaces should composite themselves. Ignite always does its own
    /// composition.
    pub fn is_composition_enabled(&self) -> bool {
        true
    }

    fn ready_target(&mut self) -> Result<&mut (dyn RenderTarget + 'static)> {
        if self.resources.is_none() {
            return Err(ThemeError::NotInitialized);
        }
        match self.target.as_deref_mut() {
            Some(target) => Ok(target),
            None => Err(ThemeError::NotInitialized),
        }
    }
}

impl<B: GraphicsBackend> Drop for RenderContext<B> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn acquisition_failed(stage: AcquisitionStage, reason: String) -> ThemeError {
    error!("[Render] Failed to create {stage}: {reason}");
    ThemeError::DeviceAcquisitionFailed {
        stage: stage.name(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_context() -> (RenderContext<HeadlessBackend>, RecordingTarget) {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        ctx.initialize().unwrap();
        let target = RecordingTarget::new();
        ctx.bind_render_target(Box::new(target.clone())).unwrap();
        (ctx, target)
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        assert_eq!(ctx.state(), ContextState::Uninitialized);
        assert!(ctx.config().is_none());

        ctx.initialize().unwrap();
        ctx.initialize().unwrap();

        assert!(ctx.is_initialized());
        assert_eq!(ctx.backend().acquisitions(), 4);
        assert_eq!(ctx.backend().live_handles(), 4);
        assert_eq!(ctx.config(), Some(&ThemeConfig::default()));
    }

    #[test]
    fn test_shutdown_twice_is_safe() {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        ctx.initialize().unwrap();

        ctx.shutdown();
        assert_eq!(ctx.state(), ContextState::Uninitialized);
        assert!(ctx.config().is_none());
        assert_eq!(ctx.backend().live_handles(), 0);

        ctx.shutdown();
        assert_eq!(ctx.state(), ContextState::Uninitialized);
        assert!(ctx.config().is_none());
        assert!(!ctx.has_render_target());
    }

    #[test]
    fn test_shutdown_releases_in_reverse_order() {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        ctx.initialize().unwrap();
        ctx.shutdown();

        assert_eq!(
            ctx.backend().release_order(),
            vec![
                AcquisitionStage::ImagingFactory,
                AcquisitionStage::TextFactory,
                AcquisitionStage::Factory2D,
                AcquisitionStage::Device,
            ]
        );
    }

    #[test]
    fn test_failed_acquisition_rolls_back() {
        let mut ctx = RenderContext::new(HeadlessBackend::failing_at(AcquisitionStage::TextFactory));

        let err = ctx.initialize().unwrap_err();
        match err {
            ThemeError::DeviceAcquisitionFailed { stage, .. } => assert_eq!(stage, "text factory"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!ctx.is_initialized());
        assert_eq!(ctx.backend().acquisitions(), 2);
        assert_eq!(ctx.backend().live_handles(), 0);
        assert_eq!(
            ctx.backend().release_order(),
            vec![AcquisitionStage::Factory2D, AcquisitionStage::Device]
        );
    }

    #[test]
    fn test_reinitialize_after_shutdown() {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        ctx.initialize().unwrap();
        ctx.shutdown();
        ctx.initialize().unwrap();
        assert!(ctx.is_initialized());
        assert_eq!(ctx.backend().acquisitions(), 8);
        assert_eq!(ctx.backend().live_handles(), 4);
    }

    #[test]
    fn test_helpers_require_initialized_target() {
        let mut ctx = RenderContext::new(HeadlessBackend::new());
        assert!(matches!(
            ctx.create_acrylic_brush(0xFF0078D4, 0.85),
            Err(ThemeError::NotInitialized)
        ));
        assert!(matches!(
            ctx.bind_render_target(Box::new(RecordingTarget::new())),
            Err(ThemeError::NotInitialized)
        ));

        ctx.initialize().unwrap();
        let brush = SolidBrush {
            color: ColorF::from_rgb_with_alpha(0, 1.0),
        };
        assert!(matches!(
            ctx.draw_rounded_rect(RectF::new(0.0, 0.0, 10.0, 10.0), 4.0, &brush),
            Err(ThemeError::NotInitialized)
        ));
        assert!(matches!(
            ctx.apply_blur_effect(&Rc::new(()), 20.0),
            Err(ThemeError::NotInitialized)
        ));
    }

    #[test]
    fn test_acrylic_brush_and_rounded_rect() {
        let (mut ctx, target) = ready_context();

        let brush = ctx.create_acrylic_brush(0xFF0078D4, 0.85).unwrap();
        assert_eq!(brush.color.r, 0.0);
        assert_eq!(brush.color.g, 120.0 / 255.0);
        assert_eq!(brush.color.b, 212.0 / 255.0);
        assert_eq!(brush.color.a, 0.85);

        let rect = RectF::new(0.0, 0.0, 640.0, 720.0);
        ctx.draw_rounded_rect(rect, 12.0, &brush).unwrap();
        assert!(ctx.draw_rounded_rect(rect, -1.0, &brush).is_err());

        let cmds = target.commands();
        assert_eq!(cmds.len(), 2);
        assert_eq!(
            cmds[1],
            DrawCommand::FillRoundedRect {
                rect,
                radius_x: 12.0,
                radius_y: 12.0,
                brush,
            }
        );
    }

    #[test]
    fn test_blur_pass_through_returns_source() {
        let (mut ctx, _target) = ready_context();
        let bitmap = Rc::new(vec![0u32; 16]);

        let out = ctx.apply_blur_effect(&bitmap, 20.0).unwrap();
        assert!(Rc::ptr_eq(&bitmap, &out));
        assert_eq!(Rc::strong_count(&bitmap), 2);
    }

    #[test]
    fn test_blur_unsupported_policy() {
        let cfg = ThemeConfig {
            blur_policy: BlurPolicy::Unsupported,
            ..ThemeConfig::default()
        };
        let mut ctx = RenderContext::with_config(HeadlessBackend::new(), cfg);
        ctx.initialize().unwrap();
        ctx.bind_render_target(Box::new(RecordingTarget::new())).unwrap();

        assert!(matches!(
            ctx.apply_blur_effect(&Rc::new(1u8), 5.0),
            Err(ThemeError::Unsupported(_))
        ));
    }
}
