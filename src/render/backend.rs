// ~/ignite/src/render/backend.rs

use serde::Serialize;
use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::Rc,
};

use crate::error::Result;

/// The four handles a render context acquires, in acquisition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AcquisitionStage {
    Device,
    Factory2D,
    TextFactory,
    ImagingFactory,
}

impl AcquisitionStage {
    pub fn name(self) -> &'static str {
        match self {
            AcquisitionStage::Device => "graphics device",
            AcquisitionStage::Factory2D => "2D factory",
            AcquisitionStage::TextFactory => "text factory",
            AcquisitionStage::ImagingFactory => "imaging factory",
        }
    }
}

impl fmt::Display for AcquisitionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Creates the device and factories behind a render context.
///
/// Handles release themselves on drop.
pub trait GraphicsBackend {
    type Device;
    type Factory2D;
    type TextFactory;
    type ImagingFactory;

    fn create_device(&mut self) -> std::result::Result<Self::Device, String>;
    fn create_2d_factory(&mut self) -> std::result::Result<Self::Factory2D, String>;
    fn create_text_factory(&mut self) -> std::result::Result<Self::TextFactory, String>;
    fn create_imaging_factory(&mut self) -> std::result::Result<Self::ImagingFactory, String>;
}

/// Straight (non-premultiplied) RGBA in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorF {
    /// RGB from a packed `0xAARRGGBB`, alpha supplied separately.
    pub fn from_rgb_with_alpha(color: u32, alpha: f32) -> Self {
        Self {
            r: ((color >> 16) & 0xFF) as f32 / 255.0,
            g: ((color >> 8) & 0xFF) as f32 / 255.0,
            b: (color & 0xFF) as f32 / 255.0,
            a: alpha,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectF {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolidBrush {
    pub color: ColorF,
}

/// Surface that accepts draw commands.
pub trait RenderTarget {
    fn create_solid_brush(&mut self, color: ColorF) -> Result<SolidBrush>;
    fn fill_rounded_rect(&mut self, rect: RectF, radius_x: f32, radius_y: f32, brush: &SolidBrush);
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    CreateBrush(ColorF),
    FillRoundedRect {
        rect: RectF,
        radius_x: f32,
        radius_y: f32,
        brush: SolidBrush,
    },
}

/// Render target that records commands. Clones share one command log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    log: Rc<RefCell<Vec<DrawCommand>>>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<DrawCommand> {
        self.log.borrow().clone()
    }
}

impl RenderTarget for RecordingTarget {
    fn create_solid_brush(&mut self, color: ColorF) -> Result<SolidBrush> {
        self.log.borrow_mut().push(DrawCommand::CreateBrush(color));
        Ok(SolidBrush { color })
    }

    fn fill_rounded_rect(&mut self, rect: RectF, radius_x: f32, radius_y: f32, brush: &SolidBrush) {
        self.log.borrow_mut().push(DrawCommand::FillRoundedRect {
            rect,
            radius_x,
            radius_y,
            brush: *brush,
        });
    }
}

/// Handle from [`HeadlessBackend`]; counts itself out of the live total on drop.
#[derive(Debug)]
pub struct HeadlessHandle {
    pub stage: AcquisitionStage,
    pub serial: u32,
    live: Rc<Cell<usize>>,
    released: Rc<RefCell<Vec<AcquisitionStage>>>,
}

impl Drop for HeadlessHandle {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        self.released.borrow_mut().push(self.stage);
    }
}

/// Backend without a GPU. Can be told to fail at one stage.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    fail_at: Option<AcquisitionStage>,
    next_serial: u32,
    acquisitions: usize,
    live: Rc<Cell<usize>>,
    released: Rc<RefCell<Vec<AcquisitionStage>>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(stage: AcquisitionStage) -> Self {
        Self {
            fail_at: Some(stage),
            ..Self::default()
        }
    }

    pub fn set_fail_at(&mut self, stage: Option<AcquisitionStage>) {
        self.fail_at = stage;
    }

    /// Handles created so far, including released ones.
    pub fn acquisitions(&self) -> usize {
        self.acquisitions
    }

    /// Handles currently alive.
    pub fn live_handles(&self) -> usize {
        self.live.get()
    }

    /// Stages in the order their handles were released.
    pub fn release_order(&self) -> Vec<AcquisitionStage> {
        self.released.borrow().clone()
    }

    fn acquire(&mut self, stage: AcquisitionStage) -> std::result::Result<HeadlessHandle, String> {
        if self.fail_at == Some(stage) {
            return Err(format!("{stage} unavailable"));
        }
        self.next_serial += 1;
        self.acquisitions += 1;
        self.live.set(self.live.get() + 1);
        Ok(HeadlessHandle {
            stage,
            serial: self.next_serial,
            live: Rc::clone(&self.live),
            released: Rc::clone(&self.released),
        })
    }
}

impl GraphicsBackend for HeadlessBackend {
    type Device = HeadlessHandle;
    type Factory2D = HeadlessHandle;
    type TextFactory = HeadlessHandle;
    type ImagingFactory = HeadlessHandle;

    fn create_device(&mut self) -> std::result::Result<HeadlessHandle, String> {
        self.acquire(AcquisitionStage::Device)
    }

    fn create_2d_factory(&mut self) -> std::result::Result<HeadlessHandle, String> {
        self.acquire(AcquisitionStage::Factory2D)
    }

    fn create_text_factory(&mut self) -> std::result::Result<HeadlessHandle, String> {
        self.acquire(AcquisitionStage::TextFactory)
    }

    fn create_imaging_factory(&mut self) -> std::result::Result<HeadlessHandle, String> {
        self.acquire(AcquisitionStage::ImagingFactory)
    }
}
