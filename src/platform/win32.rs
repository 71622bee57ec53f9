// ~/ignite/src/platform/win32.rs

use std::{ffi::c_void, time::Duration};
use windows::{
    core::w,
    Win32::{
        Foundation::{HWND, LPARAM, WPARAM},
        Graphics::Gdi::InvalidateRect,
        UI::WindowsAndMessaging::{FindWindowW, IsWindow, KillTimer, PostMessageW, SetTimer, WM_USER},
    },
};

use crate::{
    animation::AnimationKind,
    platform::{TimerId, WindowHost, WindowId},
    info, warn,
};

pub const WM_IGNITE_THEME_CHANGED: u32 = WM_USER + 0x1000;
/// `wParam` carries the `AnimationKind` code.
pub const WM_IGNITE_ANIMATION_COMPLETE: u32 = WM_USER + 0x1001;
pub const WM_IGNITE_ACRYLIC_UPDATE: u32 = WM_USER + 0x1002;

/// Window host backed by the calling thread's Win32 message queue.
///
/// Timers are thread timers (no owning window); their `WM_TIMER` arrives in
/// the message loop with `wParam` equal to the `TimerId`.
#[derive(Debug, Default)]
pub struct Win32Host;

impl Win32Host {
    pub fn new() -> Self {
        info!("[Win32] Window host initialized");
        Self
    }
}

fn hwnd(window: WindowId) -> HWND {
    HWND(window.0 as *mut c_void)
}

impl WindowHost for Win32Host {
    fn is_window(&self, window: WindowId) -> bool {
        if window.is_null() {
            return false;
        }
        unsafe { IsWindow(Some(hwnd(window))).as_bool() }
    }

    fn invalidate(&self, window: WindowId) {
        unsafe {
            let _ = InvalidateRect(Some(hwnd(window)), None, true);
        }
    }

    fn post_animation_complete(&self, window: WindowId, kind: AnimationKind) {
        let result = unsafe {
            PostMessageW(
                Some(hwnd(window)),
                WM_IGNITE_ANIMATION_COMPLETE,
                WPARAM(kind.code() as usize),
                LPARAM(0),
            )
        };
        if let Err(e) = result {
            warn!("[Win32] Failed to post completion to {:?}: {e}", window);
        }
    }

    fn set_timer(&self, interval: Duration) -> Option<TimerId> {
        let ms = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX).max(1);
        let id = unsafe { SetTimer(None, 0, ms, None) };
        if id == 0 {
            warn!("[Win32] SetTimer({}ms) failed", ms);
            None
        } else {
            info!("[Win32] Armed thread timer {} at {}ms", id, ms);
            Some(TimerId(id))
        }
    }

    fn kill_timer(&self, timer: TimerId) {
        if let Err(e) = unsafe { KillTimer(None, timer.0) } {
            warn!("[Win32] KillTimer({}) failed: {e}", timer.0);
        }
    }
}

/// The shell's taskbar window, if one is running.
pub fn find_shell_taskbar() -> Option<WindowId> {
    let hwnd = unsafe { FindWindowW(w!("Shell_TrayWnd"), None).ok() };
    match hwnd {
        Some(hwnd) => {
            info!("[Win32] Found Shell_TrayWnd window");
            Some(WindowId(hwnd.0 as isize))
        }
        None => {
            warn!("[Win32] Failed to find Shell_TrayWnd window");
            None
        }
    }
}
