use std::collections::HashSet;

use glyphon::{
    Attrs, Buffer, Cache, Family, FontSystem, Metrics, PrepareError, RenderError, Resolution,
    Shaping, SwashCache, TextArea, TextAtlas, TextBounds, Viewport, cosmic_text::fontdb,
};
use wgpu::{Device, MultisampleState, Queue, RenderPass, TextureFormat};

use crate::{
    color::Color,
    font::{FontData, Text},
    math::{Rect, Vec2},
};

struct TextEntry {
    buffer: Buffer,
    position: Vec2,
    clip: Option<Rect>,
    color: Color,
}

/// Handles text rendering using [`glyphon`] & [`wgpu`]
///
/// Entries are shaped when queued & drawn in the frame's single render pass
pub struct TextRenderer {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    inner: glyphon::TextRenderer,
    entries: Vec<TextEntry>,
    fonts: HashSet<u64>,
}

impl TextRenderer {
    pub fn new(device: &Device, queue: &Queue, format: TextureFormat) -> Self {
        let font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let inner =
            glyphon::TextRenderer::new(&mut atlas, device, MultisampleState::default(), None);

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            inner,
            entries: Vec::new(),
            fonts: HashSet::new(),
        }
    }

    /// Shapes `text` & queues it with its top-left corner at `position`
    ///
    /// With `clip`, only the part of the text inside that source rectangle is drawn
    pub fn queue(&mut self, text: &Text, position: Vec2, clip: Option<Rect>) {
        let font = text.font().data();
        if self.fonts.insert(font.id) {
            self.font_system
                .db_mut()
                .load_font_source(fontdb::Source::Binary(font.bytes.clone()));
            log::debug!("registered font family {}", font.family);
        }

        if text.as_str().is_empty() {
            return;
        }

        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics::new(text.font_size(), text.line_height()),
        );
        buffer.set_text(
            &mut self.font_system,
            text.as_str(),
            &face_attrs(font).color(text.text_color().into()),
            Shaping::Advanced,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        self.entries.push(TextEntry {
            buffer,
            position,
            clip,
            color: text.text_color(),
        });
    }

    /// Uploads glyphs for all queued entries; must be called before [`render()`](Self::render)
    ///
    /// Clears the queue afterwards
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        w: u32,
        h: u32,
    ) -> Result<(), PrepareError> {
        self.viewport.update(
            queue,
            Resolution {
                width: w,
                height: h,
            },
        );

        let screen = TextBounds {
            left: 0,
            top: 0,
            right: w as i32,
            bottom: h as i32,
        };
        let areas = self.entries.iter().map(|entry| {
            let (left, top, bounds) = match entry.clip {
                Some(sr) => {
                    let min = entry.position;
                    let max = entry.position + sr.size;
                    (
                        min.x - sr.position.x,
                        min.y - sr.position.y,
                        TextBounds {
                            left: min.x.floor() as i32,
                            top: min.y.floor() as i32,
                            right: max.x.ceil() as i32,
                            bottom: max.y.ceil() as i32,
                        },
                    )
                }
                None => (entry.position.x, entry.position.y, screen),
            };
            TextArea {
                buffer: &entry.buffer,
                left,
                top,
                scale: 1.0,
                bounds,
                default_color: entry.color.into(),
                custom_glyphs: &[],
            }
        });

        let result = self.inner.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            areas,
            &mut self.swash_cache,
        );
        self.entries.clear();
        result
    }

    /// Renders all prepared text
    pub fn render(&self, pass: &mut RenderPass<'_>) -> Result<(), RenderError> {
        self.inner.render(&self.atlas, &self.viewport, pass)
    }

    /// Frees atlas space held by glyphs that were not used this frame
    pub fn trim(&mut self) {
        self.atlas.trim();
    }

    /// Drops queued entries without drawing them
    pub fn discard(&mut self) {
        self.entries.clear();
    }
}

/// Attributes selecting exactly the face `font` was loaded from
///
/// Several files of one family can be registered, so the family name alone
/// would let the font system pick any of them
fn face_attrs(font: &FontData) -> Attrs<'_> {
    Attrs::new()
        .family(Family::Name(&font.family))
        .weight(font.weight)
        .style(font.style)
        .stretch(font.stretch)
}
