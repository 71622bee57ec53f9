// ~/ignite/src/attributes.rs

use serde::Serialize;
use std::collections::HashMap;

use crate::{
    error::{Result, ThemeError},
    platform::{WindowHost, WindowId},
    info,
};

/// Fixed-point scale used for radius and blur (value × 100).
const SCALE: f32 = 100.0;

/// Theme flags attached to one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WindowAttributes {
    pub acrylic_enabled: bool,
    /// Corner radius × 100.
    pub corner_radius_scaled: u32,
    pub drop_shadow_enabled: bool,
    /// Blur amount × 100.
    pub blur_amount_scaled: u32,
}

impl WindowAttributes {
    pub fn corner_radius(&self) -> f32 {
        self.corner_radius_scaled as f32 / SCALE
    }

    pub fn blur_amount(&self) -> f32 {
        self.blur_amount_scaled as f32 / SCALE
    }

    pub fn has_rounded_corners(&self) -> bool {
        self.corner_radius_scaled > 0
    }
}

/// Side table of per-window theme attributes.
///
/// Rows live until the host reports the window destroyed.
#[derive(Debug, Default)]
pub struct WindowAttributeStore {
    table: HashMap<WindowId, WindowAttributes>,
}

impl WindowAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acrylic<H: WindowHost + ?Sized>(&mut self, host: &H, window: WindowId, enabled: bool) -> Result<()> {
        self.update(host, window, |attrs| attrs.acrylic_enabled = enabled)?;
        info!("[Attr] {:?} acrylic = {}", window, enabled);
        Ok(())
    }

    pub fn set_corner_radius<H: WindowHost + ?Sized>(&mut self, host: &H, window: WindowId, radius: f32) -> Result<()> {
        let scaled = scale(radius, "corner radius")?;
        self.update(host, window, |attrs| attrs.corner_radius_scaled = scaled)?;
        info!("[Attr] {:?} corner radius = {}", window, radius);
        Ok(())
    }

    pub fn set_drop_shadow<H: WindowHost + ?Sized>(&mut self, host: &H, window: WindowId, enabled: bool) -> Result<()> {
        self.update(host, window, |attrs| attrs.drop_shadow_enabled = enabled)?;
        info!("[Attr] {:?} drop shadow = {}", window, enabled);
        Ok(())
    }

    pub fn set_blur_amount<H: WindowHost + ?Sized>(&mut self, host: &H, window: WindowId, amount: f32) -> Result<()> {
        let scaled = scale(amount, "blur amount")?;
        self.update(host, window, |attrs| attrs.blur_amount_scaled = scaled)?;
        info!("[Attr] {:?} blur amount = {}", window, amount);
        Ok(())
    }

    pub fn get(&self, window: WindowId) -> Option<WindowAttributes> {
        self.table.get(&window).copied()
    }

    /// Attributes for painting: stored values, or all-off when none were set.
    pub fn get_or_default(&self, window: WindowId) -> WindowAttributes {
        self.get(window).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&WindowId, &WindowAttributes)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Forget `window`. Call from the host's window-destroyed handler.
    pub fn on_window_destroyed(&mut self, window: WindowId) -> Option<WindowAttributes> {
        let removed = self.table.remove(&window);
        if removed.is_some() {
            info!("[Attr] Dropped attributes of destroyed window {:?}", window);
        }
        removed
    }

    /// Drop rows whose window no longer exists. Returns how many went.
    pub fn purge_dead<H: WindowHost + ?Sized>(&mut self, host: &H) -> usize {
        let before = self.table.len();
        self.table.retain(|window, _| host.is_window(*window));
        let purged = before - self.table.len();
        if purged > 0 {
            info!("[Attr] Purged {} stale window row(s)", purged);
        }
        purged
    }

    fn update<H: WindowHost + ?Sized>(
        &mut self,
        host: &H,
        window: WindowId,
        apply: impl FnOnce(&mut WindowAttributes),
    ) -> Result<()> {
        if window.is_null() || !host.is_window(window) {
            return Err(ThemeError::InvalidArgument(format!(
                "window {:?} is not live",
                window
            )));
        }

        apply(self.table.entry(window).or_default());
        host.invalidate(window);
        Ok(())
    }
}

fn scale(value: f32, what: &str) -> Result<u32> {
    if !value.is_finite() || value < 0.0 {
        return Err(ThemeError::InvalidArgument(format!("{what} must be a non-negative number, got {value}")));
    }
    let scaled = f64::from(value) * f64::from(SCALE);
    if scaled > f64::from(u32::MAX) {
        return Err(ThemeError::InvalidArgument(format!("{what} {value} is too large")));
    }
    Ok(scaled as u32)
}
