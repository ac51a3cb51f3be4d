use glyphon::cosmic_text;

/// RGBA color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color with explicit RGBA channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color (alpha = 255)
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Create a color from 16-bit channels, keeping the high byte of each
    pub const fn from_rgba16(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self::new(
            (r >> 8) as u8,
            (g >> 8) as u8,
            (b >> 8) as u8,
            (a >> 8) as u8,
        )
    }

    /// Get RGBA channels normalized to [0..1]
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }

    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color::new(0, 0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<image::Rgba<u8>> for Color {
    fn from(value: image::Rgba<u8>) -> Self {
        value.0.into()
    }
}

// Convert Color to cosmic_text::Color (u8 RGBA), as taken by the text renderer
impl From<Color> for cosmic_text::Color {
    fn from(value: Color) -> Self {
        cosmic_text::Color::rgba(value.r, value.g, value.b, value.a)
    }
}

// Convert Color to wgpu::Color (f64 RGBA)
impl From<Color> for wgpu::Color {
    fn from(value: Color) -> Self {
        let [r, g, b, a] = value.to_f32_array();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_channels(color: Color) -> [u8; 4] {
        let c: cosmic_text::Color = color.into();
        [c.r(), c.g(), c.b(), c.a()]
    }

    #[test]
    fn text_color_keeps_every_channel() {
        // every value of every channel survives the trip into the text API unchanged
        for v in 0..=255u8 {
            assert_eq!(text_channels(Color::new(v, 0, 0, 0)), [v, 0, 0, 0]);
            assert_eq!(text_channels(Color::new(0, v, 0, 0)), [0, v, 0, 0]);
            assert_eq!(text_channels(Color::new(0, 0, v, 0)), [0, 0, v, 0]);
            assert_eq!(text_channels(Color::new(0, 0, 0, v)), [0, 0, 0, v]);
        }
        assert_eq!(text_channels(Color::new(0x12, 0x34, 0x56, 0x78)), [0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn clear_color_is_normalized() {
        let white: wgpu::Color = Color::WHITE.into();
        assert_eq!(white, wgpu::Color::WHITE);
        let c: wgpu::Color = Color::new(0, 51, 255, 0).into();
        assert_eq!((c.r, c.b, c.a), (0.0, 1.0, 0.0));
        assert!((c.g - 0.2).abs() < 1e-6);
    }

    #[test]
    fn rgba16_keeps_high_byte() {
        assert_eq!(Color::from_rgba16(0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF), Color::WHITE);
        assert_eq!(
            Color::from_rgba16(0x80FF, 0x0100, 0x00FF, 0xFFFF),
            Color::new(0x80, 0x01, 0x00, 0xFF)
        );
    }

    #[test]
    fn from_pixels() {
        assert_eq!(Color::from([1, 2, 3, 4]), Color::new(1, 2, 3, 4));
        assert_eq!(Color::from(image::Rgba([9, 8, 7, 6])), Color::new(9, 8, 7, 6));
    }
}
