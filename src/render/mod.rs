mod pipeline;
mod text;
mod texture;
mod vertex;

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use wgpu::{
    BufferUsages, Color as WgpuColor, Device, DeviceDescriptor, IndexFormat, Instance, LoadOp,
    Operations, PresentMode, Queue, RenderPassColorAttachment, RenderPassDescriptor,
    RequestAdapterOptions, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    util::{BufferInitDescriptor, DeviceExt},
};
use winit::window::Window;

use crate::{
    color::Color,
    error::{Error, Result},
    font::Text,
    math::{Rect, Vec2},
    texture::{Texture, TextureData},
};
use pipeline::Pipeline;
use text::TextRenderer;
use texture::GpuTexture;
use vertex::Vertex;

const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

/// Quads sharing one texture, drawn with a single call
struct DrawBatch {
    texture: u64,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl DrawBatch {
    fn new(texture: u64) -> Self {
        Self {
            texture,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    fn has_room(&self, vert_count: usize) -> bool {
        self.vertices.len() + vert_count <= u16::MAX as usize
    }

    fn push(&mut self, verts: &[Vertex], indices: &[u16]) {
        let idx_offset = self.vertices.len() as u16;
        self.vertices.extend_from_slice(verts);
        self.indices.extend(indices.iter().map(|i| i + idx_offset));
    }
}

struct CachedTexture {
    handle: Weak<TextureData>,
    gpu: GpuTexture,
}

struct RenderTarget {
    surface: Surface<'static>,
    config: SurfaceConfiguration,
}

struct Gpu {
    device: Device,
    queue: Queue,
}

/// GPU renderer built on `wgpu`
///
/// Queues textured quads & text for the current frame, then draws them in
/// one render pass when the frame is presented
pub(crate) struct Renderer {
    gpu: Gpu,
    target: RenderTarget,
    pipeline: Pipeline,
    textures: HashMap<u64, CachedTexture>,
    batches: Vec<DrawBatch>,
    text: TextRenderer,
    clear_color: WgpuColor,
}

impl Renderer {
    /// Creates a renderer presenting to `window`
    pub async fn new(window: Arc<Window>, vsync: bool) -> Result<Self> {
        let size = window.inner_size();
        // surfaces cannot be configured with a zero size
        let (w, h) = (size.width.max(1), size.height.max(1));

        let instance = Instance::default();
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&RequestAdapterOptions {
                // Force find adapter that can present to this surface
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await?;
        let (device, queue) = adapter
            .request_device(&DeviceDescriptor::default())
            .await?;

        let mut config = surface
            .get_default_config(&adapter, w, h)
            .ok_or(Error::UnsupportedSurface)?;
        config.present_mode = if vsync {
            PresentMode::Fifo
        } else {
            PresentMode::AutoNoVsync
        };
        surface.configure(&device, &config);

        log::debug!(
            "renderer ready: {} ({:?}, {:?}, {w}x{h})",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format
        );

        let pipeline = Pipeline::new(&device, config.format);
        let text = TextRenderer::new(&device, &queue, config.format);

        Ok(Self {
            gpu: Gpu { device, queue },
            target: RenderTarget { surface, config },
            pipeline,
            textures: HashMap::new(),
            batches: Vec::new(),
            text,
            clear_color: WgpuColor::BLACK,
        })
    }

    /// Current surface dimensions in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.target.config.width, self.target.config.height)
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        (self.target.config.width, self.target.config.height) = (w.max(1), h.max(1));
        self.target
            .surface
            .configure(&self.gpu.device, &self.target.config);
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color.into();
    }

    fn upload_texture(&mut self, texture: &Texture) {
        let data = texture.data();
        let Gpu { device, queue } = &self.gpu;
        let layout = &self.pipeline.texture_layout;
        self.textures.entry(data.id).or_insert_with(|| {
            log::debug!("uploading texture #{} to the GPU", data.id);
            CachedTexture {
                handle: Arc::downgrade(data),
                gpu: GpuTexture::upload(device, queue, layout, &data.image),
            }
        });
    }

    /// Draws everything queued since the last frame & presents it
    ///
    /// A lost or outdated surface is reconfigured & the frame is dropped
    pub fn render(&mut self) -> Result<()> {
        let frame = match self.target.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                log::warn!("surface lost, reconfiguring & skipping frame");
                self.target
                    .surface
                    .configure(&self.gpu.device, &self.target.config);
                self.end_frame();
                return Ok(());
            }
            Err(SurfaceError::Timeout) => {
                log::warn!("timed out acquiring frame, skipping");
                self.end_frame();
                return Ok(());
            }
            Err(err) => {
                self.end_frame();
                return Err(err.into());
            }
        };

        let (w, h) = self.size();
        let Gpu { device, queue } = &self.gpu;
        if let Err(err) = self.text.prepare(device, queue, w, h) {
            self.end_frame();
            return Err(err.into());
        }

        let view = frame.texture.create_view(&Default::default());
        let mut encoder = device.create_command_encoder(&Default::default());
        {
            let mut r_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                })],
                ..Default::default()
            });

            r_pass.set_pipeline(&self.pipeline.textured);

            for batch in &self.batches {
                let Some(texture) = self.textures.get(&batch.texture) else {
                    continue;
                };
                let vertex_buffer = device.create_buffer_init(&BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(&batch.vertices),
                    usage: BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&BufferInitDescriptor {
                    label: Some("Index Buffer"),
                    contents: bytemuck::cast_slice(&batch.indices),
                    usage: BufferUsages::INDEX,
                });

                texture.gpu.bind(&mut r_pass, 0);
                r_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                r_pass.set_index_buffer(index_buffer.slice(..), IndexFormat::Uint16);
                r_pass.draw_indexed(0..batch.indices.len() as u32, 0, 0..1);
            }

            if let Err(err) = self.text.render(&mut r_pass) {
                self.end_frame();
                return Err(err.into());
            }
        }

        queue.submit(Some(encoder.finish()));
        frame.present();

        self.text.trim();
        self.end_frame();
        Ok(())
    }

    /// Forgets this frame's queued draws & releases GPU copies of dropped textures
    fn end_frame(&mut self) {
        self.batches.clear();
        self.text.discard();
        self.textures
            .retain(|_, cached| cached.handle.strong_count() > 0);
    }
}

/// Appends a quad to the last batch if it shares the texture, else starts a new batch
fn push_quad(batches: &mut Vec<DrawBatch>, texture: u64, vertices: &[Vertex; 4]) {
    match batches.last_mut() {
        Some(batch) if batch.texture == texture && batch.has_room(vertices.len()) => {
            batch.push(vertices, &QUAD_INDICES)
        }
        _ => {
            let mut batch = DrawBatch::new(texture);
            batch.push(vertices, &QUAD_INDICES);
            batches.push(batch);
        }
    }
}

/// Converts a pixel position into normalized device coordinates
fn to_ndc(point: Vec2, screen: Vec2) -> [f32; 2] {
    [
        (point.x / screen.x) * 2.0 - 1.0,
        1.0 - (point.y / screen.y) * 2.0,
    ]
}

/// Vertices for drawing the `src` region of a `tex_size` texture onto `dst` (pixels)
fn quad(dst: Rect, src: Rect, tex_size: Vec2, screen: Vec2, tint: Color) -> [Vertex; 4] {
    let tint = tint.to_f32_array();
    let dst = dst.corners();
    let uv = src.corners().map(|c| (c / tex_size).to_array());
    std::array::from_fn(|i| Vertex::new(to_ndc(dst[i], screen), tint, uv[i]))
}

/// Drawing surface handed to [`Drawable`](crate::Drawable) implementations
///
/// Borrowed from a window for the duration of a single draw call
pub struct Canvas<'a> {
    renderer: &'a mut Renderer,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(renderer: &'a mut Renderer) -> Self {
        Self { renderer }
    }

    /// Queues the `src` region of `texture` stretched over `dst`
    pub(crate) fn push_texture(&mut self, texture: &Texture, dst: Rect, src: Rect) {
        self.renderer.upload_texture(texture);
        let (w, h) = self.renderer.size();
        let screen = Vec2::new(w as f32, h as f32);
        let vertices = quad(dst, src, texture.size(), screen, texture.tint());
        push_quad(&mut self.renderer.batches, texture.data().id, &vertices);
    }

    /// Queues `text` at `dp`, clipped to the `clip` source rectangle if given
    pub(crate) fn push_text(&mut self, text: &Text, dp: Vec2, clip: Option<Rect>) {
        self.renderer.text.queue(text, dp, clip);
    }
}
