// ~/ignite/src/config.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::{info, warn, error};
use crate::error::{Result, ThemeError};
use crate::paths::ignite_root_dir;

pub const DEFAULT_CORNER_RADIUS: f32 = 12.0;
pub const DEFAULT_BLUR_RADIUS: f32 = 20.0;
pub const DEFAULT_ACRYLIC_OPACITY: f32 = 0.85;
pub const DEFAULT_ACCENT_COLOR: u32 = 0xFF00_78D4;
pub const DEFAULT_ANIMATION_DURATION_MS: u32 = 250;
pub const DEFAULT_MAX_ANIMATIONS: usize = 32;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

/// What `apply_blur_effect` does with its source bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurPolicy {
    /// Hand back the source unmodified.
    #[default]
    PassThrough,
    /// Fail with `ThemeError::Unsupported`.
    Unsupported,
}

/// What `AnimationRegistry::start` does when the target already animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStart {
    /// Restart the existing entry with the new kind and duration.
    #[default]
    Replace,
    /// Refuse with `ThemeError::InvalidArgument`.
    Reject,
}

/// Theme configuration persisted in ignite.yaml next to the executable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub acrylic_enabled: bool,

    #[serde(default = "default_true")]
    pub animations_enabled: bool,

    #[serde(default = "default_true")]
    pub blur_enabled: bool,

    #[serde(default = "default_corner_radius")]
    pub corner_radius: f32,

    #[serde(default = "default_blur_radius")]
    pub blur_radius: f32,

    /// Fill opacity of acrylic surfaces (0.0–1.0).
    #[serde(default = "default_acrylic_opacity")]
    pub acrylic_opacity: f32,

    /// Packed 0xAARRGGBB.
    #[serde(default = "default_accent_color")]
    pub accent_color: u32,

    #[serde(default = "default_animation_duration")]
    pub animation_duration_ms: u32,

    /// Ceiling on concurrently animating windows.
    #[serde(default = "default_max_animations")]
    pub max_concurrent_animations: usize,

    /// Interval of the shared animation timer.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub blur_policy: BlurPolicy,

    #[serde(default)]
    pub duplicate_start: DuplicateStart,
}

fn default_true() -> bool {
    true
}

fn default_corner_radius() -> f32 {
    DEFAULT_CORNER_RADIUS
}

fn default_blur_radius() -> f32 {
    DEFAULT_BLUR_RADIUS
}

fn default_acrylic_opacity() -> f32 {
    DEFAULT_ACRYLIC_OPACITY
}

fn default_accent_color() -> u32 {
    DEFAULT_ACCENT_COLOR
}

fn default_animation_duration() -> u32 {
    DEFAULT_ANIMATION_DURATION_MS
}

fn default_max_animations() -> usize {
    DEFAULT_MAX_ANIMATIONS
}

fn default_tick_interval() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            acrylic_enabled: true,
            animations_enabled: true,
            blur_enabled: true,
            corner_radius: DEFAULT_CORNER_RADIUS,
            blur_radius: DEFAULT_BLUR_RADIUS,
            acrylic_opacity: DEFAULT_ACRYLIC_OPACITY,
            accent_color: DEFAULT_ACCENT_COLOR,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            max_concurrent_animations: DEFAULT_MAX_ANIMATIONS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            blur_policy: BlurPolicy::default(),
            duplicate_start: DuplicateStart::default(),
        }
    }
}

impl ThemeConfig {
    /// Copy with every numeric field pulled back into its usable range.
    pub fn sanitized(&self) -> Self {
        let mut cfg = self.clone();

        cfg.acrylic_opacity = if cfg.acrylic_opacity.is_finite() {
            cfg.acrylic_opacity.clamp(0.0, 1.0)
        } else {
            DEFAULT_ACRYLIC_OPACITY
        };
        cfg.corner_radius = non_negative_or(cfg.corner_radius, DEFAULT_CORNER_RADIUS);
        cfg.blur_radius = non_negative_or(cfg.blur_radius, DEFAULT_BLUR_RADIUS);
        cfg.max_concurrent_animations = cfg.max_concurrent_animations.max(1);
        cfg.tick_interval_ms = cfg.tick_interval_ms.max(1);

        cfg
    }
}

fn non_negative_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

// ── Persistent on-disk config ──

pub fn config_path() -> PathBuf {
    ignite_root_dir().join("ignite.yaml")
}

/// Load ignite.yaml from the runtime root (or create defaults). Call once at startup.
pub fn load_config() -> ThemeConfig {
    load_config_from(&config_path())
}

/// Load a config file, falling back to defaults on any failure.
///
/// A missing file is created with the defaults.
pub fn load_config_from(path: &Path) -> ThemeConfig {
    let cfg = if path.exists() {
        match std::fs::read_to_string(path) {
            Ok(text) => match parse_config(&text) {
                Ok(c) => {
                    info!("[Config] Loaded theme config from {}", path.display());
                    c
                }
                Err(e) => {
                    warn!("[Config] Failed to parse {}, using defaults: {e}", path.display());
                    ThemeConfig::default()
                }
            },
            Err(e) => {
                warn!("[Config] Failed to read {}, using defaults: {e}", path.display());
                ThemeConfig::default()
            }
        }
    } else {
        info!("[Config] No config found, creating defaults at {}", path.display());
        let defaults = ThemeConfig::default();
        if let Err(e) = save_config_to(path, &defaults) {
            error!("[Config] Failed to write defaults: {e}");
        }
        defaults
    };

    cfg.sanitized()
}

pub fn parse_config(text: &str) -> Result<ThemeConfig> {
    serde_yaml::from_str::<ThemeConfig>(text).map_err(|e| ThemeError::Config(e.to_string()))
}

pub fn save_config(cfg: &ThemeConfig) -> Result<()> {
    save_config_to(&config_path(), cfg)
}

pub fn save_config_to(path: &Path, cfg: &ThemeConfig) -> Result<()> {
    let text = serde_yaml::to_string(cfg).map_err(|e| ThemeError::Config(e.to_string()))?;
    std::fs::write(path, text)?;
    info!("[Config] Saved theme config to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ignite-{}-{}.yaml", name, std::process::id()))
    }

    #[test]
    fn test_defaults_match_palette() {
        let cfg = ThemeConfig::default();
        assert!(cfg.enabled && cfg.acrylic_enabled && cfg.animations_enabled && cfg.blur_enabled);
        assert_eq!(cfg.corner_radius, 12.0);
        assert_eq!(cfg.blur_radius, 20.0);
        assert_eq!(cfg.acrylic_opacity, 0.85);
        assert_eq!(cfg.accent_color, 0xFF0078D4);
        assert_eq!(cfg.animation_duration_ms, 250);
        assert_eq!(cfg.max_concurrent_animations, 32);
        assert_eq!(cfg.tick_interval_ms, 16);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let cfg = parse_config("corner_radius: 4.0\nblur_policy: unsupported\n").unwrap();
        assert_eq!(cfg.corner_radius, 4.0);
        assert_eq!(cfg.blur_policy, BlurPolicy::Unsupported);
        assert_eq!(cfg.accent_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(cfg.duplicate_start, DuplicateStart::Replace);
    }

    #[test]
    fn test_bad_yaml_is_config_error() {
        let err = parse_config("corner_radius: [oops").unwrap_err();
        assert!(matches!(err, ThemeError::Config(_)));
    }

    #[test]
    fn test_sanitized_clamps_ranges() {
        let cfg = ThemeConfig {
            acrylic_opacity: 3.0,
            corner_radius: -1.0,
            blur_radius: f32::NAN,
            max_concurrent_animations: 0,
            tick_interval_ms: 0,
            ..ThemeConfig::default()
        }
        .sanitized();

        assert_eq!(cfg.acrylic_opacity, 1.0);
        assert_eq!(cfg.corner_radius, 0.0);
        assert_eq!(cfg.blur_radius, DEFAULT_BLUR_RADIUS);
        assert_eq!(cfg.max_concurrent_animations, 1);
        assert_eq!(cfg.tick_interval_ms, 1);
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let path = scratch_path("missing");
        let _ = std::fs::remove_file(&path);

        let cfg = load_config_from(&path);
        assert_eq!(cfg, ThemeConfig::default());
        assert!(path.exists());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_saved_config_loads_back() {
        let path = scratch_path("saved");
        let cfg = ThemeConfig {
            accent_color: 0x8012_3456,
            animation_duration_ms: 400,
            duplicate_start: DuplicateStart::Reject,
            ..ThemeConfig::default()
        };

        save_config_to(&path, &cfg).unwrap();
        assert_eq!(load_config_from(&path), cfg);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_unparseable_file_falls_back() {
        let path = scratch_path("garbage");
        std::fs::write(&path, "enabled: {not a bool").unwrap();

        assert_eq!(load_config_from(&path), ThemeConfig::default());

        let _ = std::fs::remove_file(&path);
    }
}
