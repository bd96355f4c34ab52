//! Colors used by the indicator's paints.

use bytemuck::{Pod, Zeroable};

/// A color with an alpha component.
///
/// Values are stored as `f32`s in the range `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Color {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
    /// Alpha channel.
    pub a: f32,
}

impl Color {
    /// Creates a new `Color` from four `f32` values (red, green, blue, alpha).
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new `Color` from four `u8` values (red, green, blue, alpha).
    #[inline]
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Creates a `Color` from a packed `0xAARRGGBB` value.
    #[inline]
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_rgba_u8(r, g, b, a)
    }

    /// Packs the color back into `0xAARRGGBB`, rounding each channel.
    pub fn to_argb(self) -> u32 {
        let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        u32::from_be_bytes([
            channel(self.a),
            channel(self.r),
            channel(self.g),
            channel(self.b),
        ])
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(argb: u32) -> Self {
        Self::from_argb(argb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argb_channel_order() {
        let color = Color::from_argb(0x6000FF00);
        assert_eq!(color.r, 0.0);
        assert_eq!(color.g, 1.0);
        assert_eq!(color.b, 0.0);
        assert!((color.a - 0x60 as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_argb_packing() {
        for argb in [0xFF00FF00, 0x6000FF00, 0xFF0000FF, 0xFFFF0000, 0x00000000] {
            assert_eq!(Color::from_argb(argb).to_argb(), argb);
        }
    }

    #[test]
    fn test_from_u32_matches_from_argb() {
        let color: Color = 0xFFFF0000u32.into();
        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(color, Color::from_rgba_u8(255, 0, 0, 255));
    }
}
