use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use image::RgbaImage;

use crate::{
    color::Color,
    error::{Error, Result},
    math::{Rect, Vec2, vec2},
    render::Canvas,
    window::Drawable,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) struct TextureData {
    pub(crate) id: u64,
    pub(crate) image: RgbaImage,
}

/// An image that can be drawn onto a [`Window`](crate::Window)
///
/// Loading does not need a window. Pixels are uploaded to the GPU the first
/// time the texture is drawn & released again once the last clone is dropped.
///
/// Each handle carries its own tint, so clones of one texture can be drawn in
/// different colors while sharing the GPU copy
#[derive(Clone)]
pub struct Texture {
    data: Arc<TextureData>,
    tint: Color,
}

impl Texture {
    /// Loads & decodes an image file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| Error::Io {
            path: path.into(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| Error::Image {
                path: Some(path.into()),
                source,
            })?
            .to_rgba8();

        log::debug!(
            "loaded texture {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );
        Ok(Self::from_image(image))
    }

    /// Decodes an encoded image (e.g. PNG bytes)
    pub fn from_memory(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|source| Error::Image { path: None, source })?
            .to_rgba8();
        Ok(Self::from_image(image))
    }

    /// Creates a texture from tightly packed 8-bit RGBA pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let len = pixels.len();
        if len as u64 != width as u64 * height as u64 * 4 {
            return Err(Error::PixelBuffer { width, height, len });
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(Self::from_image)
            .ok_or(Error::PixelBuffer { width, height, len })
    }

    fn from_image(image: RgbaImage) -> Self {
        Self {
            data: Arc::new(TextureData {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                image,
            }),
            tint: Color::WHITE,
        }
    }

    pub fn width(&self) -> u32 {
        self.data.image.width()
    }

    pub fn height(&self) -> u32 {
        self.data.image.height()
    }

    /// Size in pixels
    pub fn size(&self) -> Vec2 {
        vec2(self.width() as f32, self.height() as f32)
    }

    /// The whole texture as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }

    /// Returns this handle drawing with `tint` multiplied into every pixel
    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Color multiplied into every pixel when drawn; white by default
    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub(crate) fn data(&self) -> &Arc<TextureData> {
        &self.data
    }
}

impl Drawable for Texture {
    fn draw(&self, canvas: &mut Canvas<'_>, dp: Vec2, sr: Option<Rect>) -> Result<()> {
        let sr = source_rect(self.bounds(), sr)?;
        canvas.push_texture(self, Rect::new(dp, sr.size), sr);
        Ok(())
    }
}

/// Resolves the region of a texture to draw; `None` selects all of `bounds`
///
/// The region must cover some area & lie entirely inside `bounds`
fn source_rect(bounds: Rect, sr: Option<Rect>) -> Result<Rect> {
    let sr = sr.unwrap_or(bounds);
    if sr.is_empty() || !bounds.contains_rect(&sr) {
        return Err(Error::InvalidRect {
            rect: sr,
            bounds: Some(bounds),
        });
    }
    Ok(sr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decodes_png_from_memory() {
        let tex = Texture::from_memory(&png(3, 2)).unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(tex.bounds(), Rect::from_size((3.0, 2.0)));
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("easel-texture-{}.png", std::process::id()));
        std::fs::write(&path, png(4, 4)).unwrap();
        let tex = Texture::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert_eq!(tex.unwrap().size(), vec2(4.0, 4.0));
    }

    #[test]
    fn missing_file_is_io_error() {
        match Texture::load("does/not/exist/bg2.png") {
            Err(Error::Io { path, .. }) => assert!(path.ends_with("bg2.png")),
            other => panic!("unexpected {:?}", other.err()),
        }
    }

    #[test]
    fn garbage_is_image_error() {
        assert!(matches!(
            Texture::from_memory(b"definitely not a png"),
            Err(Error::Image { path: None, .. })
        ));
    }

    #[test]
    fn raw_pixels_must_match_dimensions() {
        assert!(Texture::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            Texture::from_rgba(2, 2, vec![0; 15]),
            Err(Error::PixelBuffer { len: 15, .. })
        ));
        assert!(matches!(
            Texture::from_rgba(2, 2, vec![0; 20]),
            Err(Error::PixelBuffer { len: 20, .. })
        ));
    }

    #[test]
    fn whole_texture_without_source_rect() {
        let bounds = Rect::from_size((64.0, 32.0));
        assert_eq!(source_rect(bounds, None).unwrap(), bounds);
    }

    #[test]
    fn source_rect_flush_with_edges() {
        let bounds = Rect::from_size((64.0, 32.0));
        let corner = Rect::new((48.0, 16.0), (16.0, 16.0));
        assert_eq!(source_rect(bounds, Some(corner)).unwrap(), corner);
        assert_eq!(source_rect(bounds, Some(bounds)).unwrap(), bounds);
    }

    #[test]
    fn invalid_source_rects() {
        // partial overlap, negative origin, zero width & zero height
        let bounds = Rect::from_size((64.0, 32.0));
        for rect in [
            Rect::new((56.0, 0.0), (16.0, 16.0)),
            Rect::new((0.0, 24.0), (16.0, 16.0)),
            Rect::new((-1.0, 0.0), (8.0, 8.0)),
            Rect::new((0.0, -4.0), (8.0, 8.0)),
            Rect::new((8.0, 8.0), (0.0, 8.0)),
            Rect::new((8.0, 8.0), (8.0, 0.0)),
        ] {
            match source_rect(bounds, Some(rect)) {
                Err(Error::InvalidRect {
                    rect: r,
                    bounds: Some(b),
                }) => assert_eq!((r, b), (rect, bounds)),
                other => panic!("{rect} accepted: {other:?}"),
            }
        }
    }

    #[test]
    fn empty_texture_has_nothing_to_draw() {
        let tex = Texture::from_rgba(0, 0, Vec::new()).unwrap();
        assert!(matches!(
            source_rect(tex.bounds(), None),
            Err(Error::InvalidRect { .. })
        ));
    }

    #[test]
    fn tint_is_per_handle() {
        let plain = Texture::from_rgba(1, 1, vec![255; 4]).unwrap();
        let red = plain.clone().with_tint(Color::RED);
        assert_eq!(plain.tint(), Color::WHITE);
        assert_eq!(red.tint(), Color::RED);
        assert_eq!(plain.data().id, red.data().id);

        let mut faded = red.clone();
        faded.set_tint(Color::new(255, 255, 255, 128));
        assert_eq!(red.tint(), Color::RED);
        assert_eq!(faded.tint().a, 128);
    }

    #[test]
    fn clones_share_identity() {
        // clones point at the same GPU cache entry, fresh loads do not
        let a = Texture::from_rgba(1, 1, vec![0; 4]).unwrap();
        let b = a.clone();
        let c = Texture::from_rgba(1, 1, vec![0; 4]).unwrap();
        assert_eq!(a.data().id, b.data().id);
        assert_ne!(a.data().id, c.data().id);
    }
}
