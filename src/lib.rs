//! Windows, textures & TrueType text for simple 2D programs
//!
//! Open a [`Window`], load [`Texture`]s & [`Font`]s, draw them at pixel
//! positions, present with [`Window::update`] & drain [`Window::poll_event`]
//! until an [`Event::Close`] arrives.

pub mod color;
pub mod encoding;
mod error;
pub mod event;
pub mod font;
pub mod math;
mod render;
pub mod texture;
pub mod time;
pub mod window;

pub use color::Color;
pub use error::{Error, Result};
pub use event::Event;
pub use font::{Font, Text};
pub use math::{Rect, Vec2, vec2};
pub use texture::Texture;
pub use window::{Canvas, Drawable, Window, WindowConfig};
