use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use glyphon::cosmic_text::fontdb;

use crate::{
    color::Color,
    encoding,
    error::{Error, Result},
    math::{Rect, Vec2},
    render::Canvas,
    window::Drawable,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Line height relative to font size
const LINE_HEIGHT: f32 = 1.2;

pub(crate) struct FontData {
    pub(crate) id: u64,
    pub(crate) family: String,
    /// Face attributes telling this file apart from others of the same family
    pub(crate) weight: fontdb::Weight,
    pub(crate) style: fontdb::Style,
    pub(crate) stretch: fontdb::Stretch,
    pub(crate) bytes: Arc<Vec<u8>>,
}

/// A TrueType font
///
/// Loading does not need a window; the font is registered with a window's
/// text renderer the first time text using it is drawn
#[derive(Clone)]
pub struct Font {
    data: Arc<FontData>,
}

impl Font {
    /// Loads a TTF file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.into(),
            source,
        })?;
        let font = Self::parse(bytes).ok_or_else(|| Error::InvalidFont {
            path: Some(path.into()),
        })?;

        log::debug!("loaded font {} ({})", path.display(), font.family());
        Ok(font)
    }

    /// Creates a font from in-memory TTF data
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::parse(bytes).ok_or(Error::InvalidFont { path: None })
    }

    fn parse(bytes: Vec<u8>) -> Option<Self> {
        let bytes = Arc::new(bytes);
        let mut db = fontdb::Database::new();
        db.load_font_source(fontdb::Source::Binary(bytes.clone()));
        let face = db.faces().next()?;
        let family = face.families.first()?.0.clone();

        Some(Self {
            data: Arc::new(FontData {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                family,
                weight: face.weight,
                style: face.style,
                stretch: face.stretch,
                bytes,
            }),
        })
    }

    /// Family name of the first face in the font
    pub fn family(&self) -> &str {
        &self.data.family
    }

    pub(crate) fn data(&self) -> &Arc<FontData> {
        &self.data
    }
}

/// A graphical text entry: a string rendered with a [`Font`] at a size & color
///
/// Size defaults to 12 & color to black
#[derive(Clone)]
pub struct Text {
    font: Font,
    text: String,
    size: f32,
    color: Color,
}

impl Text {
    pub fn new(font: &Font) -> Self {
        Self {
            font: font.clone(),
            text: String::new(),
            size: 12.0,
            color: Color::BLACK,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Font size in pixels
    pub fn size(mut self, size: f32) -> Self {
        self.set_size(size);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.set_color(color);
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_font(&mut self, font: &Font) {
        self.font = font.clone();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    pub fn font_size(&self) -> f32 {
        self.size
    }

    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT
    }

    pub fn text_color(&self) -> Color {
        self.color
    }

    /// The text as UTF-32 code units
    pub fn utf32(&self) -> Vec<u32> {
        encoding::utf32(&self.text)
    }

    /// Replaces the text with decoded UTF-32 code units
    ///
    /// On error the current text is kept
    pub fn set_utf32(&mut self, units: &[u32]) -> Result<()> {
        self.text = encoding::from_utf32(units)?;
        Ok(())
    }
}

impl Drawable for Text {
    fn draw(&self, canvas: &mut Canvas<'_>, dp: Vec2, sr: Option<Rect>) -> Result<()> {
        canvas.push_text(self, dp, clip_rect(sr)?);
        Ok(())
    }
}

/// Text has no fixed bounds, so any source rectangle with an area is a valid clip
fn clip_rect(sr: Option<Rect>) -> Result<Option<Rect>> {
    match sr {
        Some(rect) if rect.is_empty() => Err(Error::InvalidRect { rect, bounds: None }),
        _ => Ok(sr),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font() -> Font {
        Font {
            data: Arc::new(FontData {
                id: u64::MAX,
                family: "Test Sans".into(),
                weight: fontdb::Weight::NORMAL,
                style: fontdb::Style::Normal,
                stretch: fontdb::Stretch::Normal,
                bytes: Arc::new(Vec::new()),
            }),
        }
    }

    #[test]
    fn text_defaults() {
        let text = Text::new(&font());
        assert_eq!(text.as_str(), "");
        assert_eq!(text.font_size(), 12.0);
        assert_eq!(text.text_color(), Color::BLACK);
        assert_eq!(text.font().family(), "Test Sans");
    }

    #[test]
    fn builder_sets_fields() {
        let text = Text::new(&font())
            .text("TTF fonts")
            .size(32.0)
            .color(Color::WHITE);
        assert_eq!(text.as_str(), "TTF fonts");
        assert_eq!(text.font_size(), 32.0);
        assert!((text.line_height() - 38.4).abs() < 1e-4);
        assert_eq!(text.text_color(), Color::WHITE);
    }

    #[test]
    fn utf32_round_trip_through_text() {
        let mut text = Text::new(&font());
        text.set_utf32(&[0x46, 0x50, 0x53, 0x3A, 0x20, 0x1F600])
            .unwrap();
        assert_eq!(text.as_str(), "FPS: 😀");
        assert_eq!(text.utf32().len(), 6);
    }

    #[test]
    fn invalid_utf32_keeps_previous_text() {
        let mut text = Text::new(&font()).text("keep me");
        assert!(text.set_utf32(&[0x41, 0xDFFF]).is_err());
        assert_eq!(text.as_str(), "keep me");
    }

    #[test]
    fn text_clip_rects() {
        assert_eq!(clip_rect(None).unwrap(), None);
        let clip = Rect::new((-4.0, 2.0), (40.0, 10.0));
        assert_eq!(clip_rect(Some(clip)).unwrap(), Some(clip));

        let flat = Rect::new((0.0, 0.0), (0.0, 10.0));
        assert!(matches!(
            clip_rect(Some(flat)),
            Err(Error::InvalidRect { rect, bounds: None }) if rect == flat
        ));
    }

    #[test]
    fn font_errors() {
        assert!(matches!(
            Font::from_bytes(b"not a font".to_vec()),
            Err(Error::InvalidFont { path: None })
        ));
        assert!(matches!(
            Font::load("does/not/exist/Exocet.ttf"),
            Err(Error::Io { .. })
        ));
    }
}
