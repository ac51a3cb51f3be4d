use std::{collections::VecDeque, sync::Arc, time::Duration};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window as OsWindow, WindowId},
};

pub use crate::render::Canvas;
use crate::{
    color::Color,
    error::{Error, Result},
    event::{self, Event},
    math::{Rect, Vec2, vec2},
    render::Renderer,
};

/// Window creation options
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Wait for the display's vertical blank when presenting
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "easel".to_string(),
            width: 640,
            height: 480,
            resizable: true,
            vsync: true,
        }
    }
}

/// Something that can be drawn onto a [`Window`]
///
/// Implemented by [`Texture`](crate::Texture) & [`Text`](crate::Text)
pub trait Drawable {
    /// Queues the drawable with its top-left corner at `dp`
    ///
    /// `sr` restricts drawing to a source rectangle in the drawable's own pixel space
    fn draw(&self, canvas: &mut Canvas<'_>, dp: Vec2, sr: Option<Rect>) -> Result<()>;
}

/// Receives winit callbacks while the window pumps its event loop
struct Host {
    config: WindowConfig,
    renderer: Option<Renderer>,
    window: Option<Arc<OsWindow>>,
    events: VecDeque<Event>,
    cursor: Vec2,
    error: Option<Error>,
}

impl Host {
    fn create(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = OsWindow::default_attributes()
            .with_title(&self.config.title)
            .with_resizable(self.config.resizable)
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);
        let renderer = pollster::block_on(Renderer::new(window.clone(), self.config.vsync))?;

        log::info!(
            "opened window \"{}\" ({}x{})",
            self.config.title,
            self.config.width,
            self.config.height
        );
        self.window = Some(window);
        self.renderer = Some(renderer);
        Ok(())
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create(event_loop) {
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::Resized(size) => {
                if let Some(r) = self.renderer.as_mut() {
                    r.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = vec2(position.x as f32, position.y as f32);
            }
            _ => {}
        }

        self.events.extend(event::translate(&event, self.cursor));
    }
}

/// An OS window with a GPU surface
///
/// The caller drives the loop: queue draws, [`update`](Self::update) to
/// present them & drain [`poll_event`](Self::poll_event) each frame.
/// The window must stay on the thread that opened it, which on most
/// platforms has to be the main thread
pub struct Window {
    host: Host,
    event_loop: EventLoop<()>,
    exited: bool,
}

impl Window {
    /// Opens a window with the given inner size & default options
    pub fn open(width: u32, height: u32) -> Result<Self> {
        Self::with_config(WindowConfig {
            width,
            height,
            ..Default::default()
        })
    }

    pub fn with_config(config: WindowConfig) -> Result<Self> {
        let mut event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut host = Host {
            config,
            renderer: None,
            window: None,
            events: VecDeque::new(),
            cursor: Vec2::ZERO,
            error: None,
        };

        // the window is created from the first `resumed` callback
        loop {
            let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut host);
            if let Some(err) = host.error.take() {
                return Err(err);
            }
            if host.renderer.is_some() {
                break;
            }
            if let PumpStatus::Exit(_) = status {
                return Err(Error::Closed);
            }
        }

        Ok(Self {
            host,
            event_loop,
            exited: false,
        })
    }

    /// Sets the color the next frame is cleared with
    pub fn clear(&mut self, color: Color) {
        if let Some(r) = self.host.renderer.as_mut() {
            r.set_clear_color(color);
        }
    }

    /// Draws the entire `src` with its top-left corner at `dp`
    pub fn draw(&mut self, dp: impl Into<Vec2>, src: &impl Drawable) -> Result<()> {
        src.draw(&mut self.canvas()?, dp.into(), None)
    }

    /// Draws the `sr` part of `src` with its top-left corner at `dp`
    pub fn draw_rect(&mut self, dp: impl Into<Vec2>, src: &impl Drawable, sr: Rect) -> Result<()> {
        src.draw(&mut self.canvas()?, dp.into(), Some(sr))
    }

    /// Renders everything drawn since the last update & shows it on screen
    pub fn update(&mut self) -> Result<()> {
        self.host.renderer.as_mut().ok_or(Error::Closed)?.render()
    }

    /// Returns the next pending event, or `None` once the queue is empty
    pub fn poll_event(&mut self) -> Option<Event> {
        if self.host.events.is_empty() && !self.exited {
            let status = self
                .event_loop
                .pump_app_events(Some(Duration::ZERO), &mut self.host);
            if let PumpStatus::Exit(code) = status {
                log::debug!("event loop exited with code {code}");
                self.exited = true;
            }
        }
        self.host.events.pop_front()
    }

    /// Current inner size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.host
            .renderer
            .as_ref()
            .map_or((self.host.config.width, self.host.config.height), |r| {
                r.size()
            })
    }

    pub fn set_title(&mut self, title: &str) {
        if let Some(w) = self.host.window.as_ref() {
            w.set_title(title);
        }
        self.host.config.title = title.to_string();
    }

    /// Closes the window & releases its GPU resources
    pub fn close(self) {}

    fn canvas(&mut self) -> Result<Canvas<'_>> {
        self.host
            .renderer
            .as_mut()
            .map(Canvas::new)
            .ok_or(Error::Closed)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        // surface before the OS window it presents to
        self.host.renderer = None;
        self.host.window = None;
        log::info!("closed window \"{}\"", self.host.config.title);
    }
}
