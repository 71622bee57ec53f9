// ~/ignite/src/snap.rs
//! Snap layouts: predefined work-area regions a window can be moved into.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, ThemeError},
    platform::{WindowHost, WindowId},
    info, warn,
};

pub const MAX_SNAPPED_WINDOWS: usize = 10;

/// Integer screen rectangle, right/bottom exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapLayout {
    None,
    LeftHalf,
    RightHalf,
    TopHalf,
    BottomHalf,
    TopLeftQuarter,
    TopRightQuarter,
    BottomLeftQuarter,
    BottomRightQuarter,
    CenterThird,
    LeftThird,
    RightThird,
}

impl SnapLayout {
    /// Region of `work_area` this layout covers. `None` covers all of it.
    pub fn rect_in(self, work_area: Rect) -> Rect {
        let Rect { left, top, right, bottom } = work_area;
        let mid_x = left + work_area.width() / 2;
        let mid_y = top + work_area.height() / 2;
        let third_x = left + work_area.width() / 3;
        let two_thirds_x = left + work_area.width() * 2 / 3;

        match self {
            SnapLayout::None => work_area,
            SnapLayout::LeftHalf => Rect::new(left, top, mid_x, bottom),
            SnapLayout::RightHalf => Rect::new(mid_x, top, right, bottom),
            SnapLayout::TopHalf => Rect::new(left, top, right, mid_y),
            SnapLayout::BottomHalf => Rect::new(left, mid_y, right, bottom),
            SnapLayout::TopLeftQuarter => Rect::new(left, top, mid_x, mid_y),
            SnapLayout::TopRightQuarter => Rect::new(mid_x, top, right, mid_y),
            SnapLayout::BottomLeftQuarter => Rect::new(left, mid_y, mid_x, bottom),
            SnapLayout::BottomRightQuarter => Rect::new(mid_x, mid_y, right, bottom),
            SnapLayout::LeftThird => Rect::new(left, top, third_x, bottom),
            SnapLayout::CenterThird => Rect::new(third_x, top, two_thirds_x, bottom),
            SnapLayout::RightThird => Rect::new(two_thirds_x, top, right, bottom),
        }
    }

    /// Layout previewed while a window is dragged with the cursor at `(x, y)`.
    ///
    /// Corners pick quarters, edges pick halves, anywhere else picks nothing.
    pub fn for_drag_point(x: i32, y: i32, work_area: Rect, edge: i32) -> SnapLayout {
        let near_left = x < work_area.left + edge;
        let near_right = x >= work_area.right - edge;
        let near_top = y < work_area.top + edge;
        let near_bottom = y >= work_area.bottom - edge;

        match (near_left, near_right, near_top, near_bottom) {
            (true, _, true, _) => SnapLayout::TopLeftQuarter,
            (_, true, true, _) => SnapLayout::TopRightQuarter,
            (true, _, _, true) => SnapLayout::BottomLeftQuarter,
            (_, true, _, true) => SnapLayout::BottomRightQuarter,
            (true, _, _, _) => SnapLayout::LeftHalf,
            (_, true, _, _) => SnapLayout::RightHalf,
            (_, _, true, _) => SnapLayout::TopHalf,
            (_, _, _, true) => SnapLayout::BottomHalf,
            _ => SnapLayout::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SnappedWindow {
    pub window: WindowId,
    pub layout: SnapLayout,
    pub rect: Rect,
}

/// Windows currently snapped, up to [`MAX_SNAPPED_WINDOWS`].
#[derive(Debug, Default)]
pub struct SnapTracker {
    snapped: Vec<SnappedWindow>,
}

impl SnapTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `window` as snapped to `layout` and return the target rect.
    /// Re-snapping a tracked window replaces its layout.
    pub fn snap<H: WindowHost + ?Sized>(
        &mut self,
        host: &H,
        window: WindowId,
        layout: SnapLayout,
        work_area: Rect,
    ) -> Result<Rect> {
        if window.is_null() || !host.is_window(window) {
            return Err(ThemeError::InvalidArgument(format!("window {:?} is not live", window)));
        }

        let rect = layout.rect_in(work_area);

        if let Some(existing) = self.snapped.iter_mut().find(|s| s.window == window) {
            existing.layout = layout;
            existing.rect = rect;
        } else {
            if self.snapped.len() >= MAX_SNAPPED_WINDOWS {
                warn!("[Snap] Cannot snap {:?}: {} windows already snapped", window, MAX_SNAPPED_WINDOWS);
                return Err(ThemeError::RegistryFull {
                    capacity: MAX_SNAPPED_WINDOWS,
                });
            }
            self.snapped.push(SnappedWindow { window, layout, rect });
        }

        host.invalidate(window);
        info!("[Snap] {:?} -> {:?} {:?}", window, layout, rect);
        Ok(rect)
    }

    pub fn unsnap(&mut self, window: WindowId) -> bool {
        let before = self.snapped.len();
        self.snapped.retain(|s| s.window != window);
        before != self.snapped.len()
    }

    pub fn get(&self, window: WindowId) -> Option<&SnappedWindow> {
        self.snapped.iter().find(|s| s.window == window)
    }

    pub fn snapped(&self) -> &[SnappedWindow] {
        &self.snapped
    }

    pub fn clear(&mut self) {
        self.snapped.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessHost;

    const WORK: Rect = Rect {
        left: 0,
        top: 0,
        right: 1920,
        bottom: 1032,
    };

    #[test]
    fn test_halves_and_quarters() {
        assert_eq!(SnapLayout::LeftHalf.rect_in(WORK), Rect::new(0, 0, 960, 1032));
        assert_eq!(SnapLayout::RightHalf.rect_in(WORK), Rect::new(960, 0, 1920, 1032));
        assert_eq!(SnapLayout::BottomHalf.rect_in(WORK), Rect::new(0, 516, 1920, 1032));
        assert_eq!(SnapLayout::TopRightQuarter.rect_in(WORK), Rect::new(960, 0, 1920, 516));
        assert_eq!(SnapLayout::None.rect_in(WORK), WORK);
    }

    #[test]
    fn test_thirds_tile_the_work_area() {
        let offset = Rect::new(100, 50, 1000, 650);
        let l = SnapLayout::LeftThird.rect_in(offset);
        let c = SnapLayout::CenterThird.rect_in(offset);
        let r = SnapLayout::RightThird.rect_in(offset);

        assert_eq!(l.left, 100);
        assert_eq!(l.right, c.left);
        assert_eq!(c.right, r.left);
        assert_eq!(r.right, 1000);
        assert_eq!(l.width() + c.width() + r.width(), offset.width());
    }

    #[test]
    fn test_drag_point_preview() {
        assert_eq!(SnapLayout::for_drag_point(2, 2, WORK, 16), SnapLayout::TopLeftQuarter);
        assert_eq!(SnapLayout::for_drag_point(1919, 1031, WORK, 16), SnapLayout::BottomRightQuarter);
        assert_eq!(SnapLayout::for_drag_point(5, 500, WORK, 16), SnapLayout::LeftHalf);
        assert_eq!(SnapLayout::for_drag_point(960, 3, WORK, 16), SnapLayout::TopHalf);
        assert_eq!(SnapLayout::for_drag_point(960, 500, WORK, 16), SnapLayout::None);
    }

    #[test]
    fn test_tracker_capacity_and_resnap() {
        let host = HeadlessHost::new();
        let mut tracker = SnapTracker::new();
        let windows: Vec<_> = (0..MAX_SNAPPED_WINDOWS).map(|_| host.create_window()).collect();

        for w in &windows {
            tracker.snap(&host, *w, SnapLayout::LeftHalf, WORK).unwrap();
        }
        let extra = host.create_window();
        assert!(matches!(
            tracker.snap(&host, extra, SnapLayout::RightHalf, WORK),
            Err(ThemeError::RegistryFull { capacity: MAX_SNAPPED_WINDOWS })
        ));

        let rect = tracker.snap(&host, windows[0], SnapLayout::RightHalf, WORK).unwrap();
        assert_eq!(rect, Rect::new(960, 0, 1920, 1032));
        assert_eq!(tracker.snapped().len(), MAX_SNAPPED_WINDOWS);
        assert_eq!(tracker.get(windows[0]).map(|s| s.layout), Some(SnapLayout::RightHalf));

        assert!(tracker.unsnap(windows[1]));
        assert!(!tracker.unsnap(windows[1]));
        tracker.snap(&host, extra, SnapLayout::RightHalf, WORK).unwrap();
    }

    #[test]
    fn test_dead_window_not_snapped() {
        let host = HeadlessHost::new();
        let mut tracker = SnapTracker::new();
        let w = host.create_window();
        host.destroy_window(w);

        assert!(tracker.snap(&host, w, SnapLayout::LeftHalf, WORK).is_err());
        assert!(tracker.snapped().is_empty());
    }
}
