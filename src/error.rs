use std::{fmt, io, path::PathBuf};

use crate::math::Rect;

/// Errors reported by windows, resources & drawing
#[derive(Debug)]
pub enum Error {
    /// A resource file could not be read
    Io { path: PathBuf, source: io::Error },
    /// Image data could not be decoded
    Image {
        path: Option<PathBuf>,
        source: image::ImageError,
    },
    /// Raw pixel data does not match the given dimensions
    PixelBuffer { width: u32, height: u32, len: usize },
    /// Font data holds no usable TrueType face
    InvalidFont { path: Option<PathBuf> },
    /// A UTF-32 code unit is not a Unicode scalar value
    InvalidCodePoint { index: usize, value: u32 },
    /// A source rectangle is empty or reaches outside of its drawable
    InvalidRect { rect: Rect, bounds: Option<Rect> },
    /// The OS event loop could not be created
    EventLoop(winit::error::EventLoopError),
    /// The OS refused to create the window
    Os(winit::error::OsError),
    CreateSurface(wgpu::CreateSurfaceError),
    Adapter(wgpu::RequestAdapterError),
    Device(wgpu::RequestDeviceError),
    /// The adapter cannot present to the window surface
    UnsupportedSurface,
    Surface(wgpu::SurfaceError),
    TextPrepare(glyphon::PrepareError),
    TextRender(glyphon::RenderError),
    /// The window is gone
    Closed,
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, source } => write!(f, "unable to read {}: {source}", path.display()),
            Error::Image {
                path: Some(path),
                source,
            } => write!(f, "unable to decode image {}: {source}", path.display()),
            Error::Image { path: None, source } => write!(f, "unable to decode image: {source}"),
            Error::PixelBuffer { width, height, len } => write!(
                f,
                "{len} bytes of pixel data do not fit a {width}x{height} RGBA image"
            ),
            Error::InvalidFont { path: Some(path) } => {
                write!(f, "no TrueType face found in {}", path.display())
            }
            Error::InvalidFont { path: None } => write!(f, "no TrueType face found in font data"),
            Error::InvalidCodePoint { index, value } => {
                write!(f, "invalid code point U+{value:04X} at index {index}")
            }
            Error::InvalidRect {
                rect,
                bounds: Some(bounds),
            } => write!(f, "source rectangle {rect} is outside of {bounds}"),
            Error::InvalidRect { rect, bounds: None } => {
                write!(f, "source rectangle {rect} is empty")
            }
            Error::EventLoop(err) => write!(f, "unable to create event loop: {err}"),
            Error::Os(err) => write!(f, "unable to create window: {err}"),
            Error::CreateSurface(err) => write!(f, "unable to create surface: {err}"),
            Error::Adapter(err) => write!(f, "no suitable GPU adapter: {err}"),
            Error::Device(err) => write!(f, "unable to open GPU device: {err}"),
            Error::UnsupportedSurface => write!(f, "GPU adapter cannot present to this window"),
            Error::Surface(err) => write!(f, "unable to acquire frame: {err}"),
            Error::TextPrepare(err) => write!(f, "unable to prepare text: {err}"),
            Error::TextRender(err) => write!(f, "unable to render text: {err}"),
            Error::Closed => write!(f, "window is closed"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::Image { source, .. } => Some(source),
            Error::EventLoop(err) => Some(err),
            Error::Os(err) => Some(err),
            Error::CreateSurface(err) => Some(err),
            Error::Adapter(err) => Some(err),
            Error::Device(err) => Some(err),
            Error::Surface(err) => Some(err),
            Error::TextPrepare(err) => Some(err),
            Error::TextRender(err) => Some(err),
            _ => None,
        }
    }
}

impl From<winit::error::EventLoopError> for Error {
    fn from(err: winit::error::EventLoopError) -> Self {
        Error::EventLoop(err)
    }
}

impl From<winit::error::OsError> for Error {
    fn from(err: winit::error::OsError) -> Self {
        Error::Os(err)
    }
}

impl From<wgpu::CreateSurfaceError> for Error {
    fn from(err: wgpu::CreateSurfaceError) -> Self {
        Error::CreateSurface(err)
    }
}

impl From<wgpu::RequestAdapterError> for Error {
    fn from(err: wgpu::RequestAdapterError) -> Self {
        Error::Adapter(err)
    }
}

impl From<wgpu::RequestDeviceError> for Error {
    fn from(err: wgpu::RequestDeviceError) -> Self {
        Error::Device(err)
    }
}

impl From<wgpu::SurfaceError> for Error {
    fn from(err: wgpu::SurfaceError) -> Self {
        Error::Surface(err)
    }
}

impl From<glyphon::PrepareError> for Error {
    fn from(err: glyphon::PrepareError) -> Self {
        Error::TextPrepare(err)
    }
}

impl From<glyphon::RenderError> for Error {
    fn from(err: glyphon::RenderError) -> Self {
        Error::TextRender(err)
    }
}
