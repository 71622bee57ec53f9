//! Easing curves and packed-color helpers.
//!
//! Colors are packed `0xAARRGGBB`.

/// Named easing curve, so callers can pick one from config or per surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    #[default]
    EaseInOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::EaseIn => ease_in(t),
            Easing::EaseOut => ease_out(t),
            Easing::EaseInOut => ease_in_out(t),
        }
    }
}

#[inline]
pub fn ease_in(t: f32) -> f32 {
    t * t
}

#[inline]
pub fn ease_out(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Smoothstep.
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Split a packed color into `[a, r, g, b]`.
#[inline]
pub fn unpack_argb(color: u32) -> [u8; 4] {
    [
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    ]
}

#[inline]
pub fn pack_argb([a, r, g, b]: [u8; 4]) -> u32 {
    (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
}

/// Per-channel linear interpolation from `from` to `to`, alpha included.
///
/// `blend` is not clamped: values outside 0..=1 extrapolate, and each channel
/// saturates at 0 or 255 instead of wrapping.
pub fn blend_colors(from: u32, to: u32, blend: f32) -> u32 {
    let a = unpack_argb(from);
    let b = unpack_argb(to);

    let mut out = [0u8; 4];
    for (i, channel) in out.iter_mut().enumerate() {
        let start = f32::from(a[i]);
        let delta = f32::from(b[i]) - start;
        // `as` truncates toward zero and saturates.
        *channel = (start + delta * blend) as u8;
    }

    pack_argb(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_in_out_fixed_points() {
        assert_eq!(ease_in_out(0.0), 0.0);
        assert_eq!(ease_in_out(1.0), 1.0);
        assert_eq!(ease_in_out(0.5), 0.5);
    }

    #[test]
    fn test_ease_in_out_monotonic() {
        let mut prev = ease_in_out(0.0);
        for i in 1..=1000 {
            let v = ease_in_out(i as f32 / 1000.0);
            assert!(v >= prev, "dropped at step {i}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_ease_in_and_out() {
        assert_eq!(ease_in(0.5), 0.25);
        assert_eq!(ease_out(0.5), 0.75);
        assert_eq!(ease_in(1.0), 1.0);
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(Easing::Linear.apply(0.3), 0.3);
    }

    #[test]
    fn test_blend_identity_when_endpoints_equal() {
        let c = 0xF0F8_F8F8;
        for blend in [-3.0, -0.5, 0.0, 0.25, 0.5, 1.0, 7.5] {
            assert_eq!(blend_colors(c, c, blend), c);
        }
    }

    #[test]
    fn test_blend_endpoints_and_midpoint() {
        let black = 0xFF00_0000;
        let white = 0xFFFF_FFFF;
        assert_eq!(blend_colors(black, white, 0.0), black);
        assert_eq!(blend_colors(black, white, 1.0), white);
        assert_eq!(blend_colors(black, white, 0.5), 0xFF7F_7F7F);
        // Alpha channel interpolates too.
        assert_eq!(blend_colors(0x0000_0000, 0xFF00_0000, 0.5), 0x7F00_0000);
    }

    #[test]
    fn test_blend_extrapolates_and_saturates() {
        let from = 0xFF40_4040;
        let to = 0xFF80_8080;
        assert_eq!(blend_colors(from, to, 1.5), 0xFFA0_A0A0);
        assert_eq!(blend_colors(from, to, 10.0), 0xFFFF_FFFF);
        assert_eq!(blend_colors(from, to, -10.0), 0xFF00_0000);
    }

    #[test]
    fn test_pack_unpack() {
        assert_eq!(unpack_argb(0xFF00_78D4), [0xFF, 0x00, 0x78, 0xD4]);
        assert_eq!(pack_argb([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
    }
}
