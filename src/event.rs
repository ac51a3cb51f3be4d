use std::fmt;

use winit::{
    event::{ElementState, MouseScrollDelta, WindowEvent},
    keyboard::PhysicalKey,
};

pub use winit::{event::MouseButton, keyboard::KeyCode};

use crate::math::{Vec2, vec2};

/// Something that happened to a window, as returned by [`Window::poll_event`]
///
/// [`Window::poll_event`]: crate::Window::poll_event
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The user asked to close the window
    Close,
    Resize { width: u32, height: u32 },
    KeyPress { key: KeyCode, repeat: bool },
    KeyRelease { key: KeyCode },
    /// A character was typed
    Char(char),
    MouseMove { x: f32, y: f32 },
    MousePress { button: MouseButton, x: f32, y: f32 },
    MouseRelease { button: MouseButton, x: f32, y: f32 },
    /// Scroll amount in lines (or pixels, for precise touchpads)
    MouseScroll { dx: f32, dy: f32 },
    MouseEnter,
    MouseLeave,
    FocusGain,
    FocusLose,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Close => write!(f, "Close"),
            Event::Resize { width, height } => write!(f, "Resize: {width}x{height}"),
            Event::KeyPress { key, repeat: false } => write!(f, "KeyPress: {key:?}"),
            Event::KeyPress { key, repeat: true } => write!(f, "KeyPress: {key:?} (repeat)"),
            Event::KeyRelease { key } => write!(f, "KeyRelease: {key:?}"),
            Event::Char(ch) => write!(f, "Char: {ch:?}"),
            Event::MouseMove { x, y } => write!(f, "MouseMove: ({x}, {y})"),
            Event::MousePress { button, x, y } => write!(f, "MousePress: {button:?} at ({x}, {y})"),
            Event::MouseRelease { button, x, y } => {
                write!(f, "MouseRelease: {button:?} at ({x}, {y})")
            }
            Event::MouseScroll { dx, dy } => write!(f, "MouseScroll: ({dx}, {dy})"),
            Event::MouseEnter => write!(f, "MouseEnter"),
            Event::MouseLeave => write!(f, "MouseLeave"),
            Event::FocusGain => write!(f, "FocusGain"),
            Event::FocusLose => write!(f, "FocusLose"),
        }
    }
}

/// Translates a winit window event into zero or more [`Event`]s
///
/// `cursor` is the last known cursor position, used to place button events
pub(crate) fn translate(event: &WindowEvent, cursor: Vec2) -> Vec<Event> {
    match event {
        WindowEvent::CloseRequested => vec![Event::Close],
        WindowEvent::Resized(size) => vec![Event::Resize {
            width: size.width,
            height: size.height,
        }],
        WindowEvent::Focused(true) => vec![Event::FocusGain],
        WindowEvent::Focused(false) => vec![Event::FocusLose],
        WindowEvent::CursorEntered { .. } => vec![Event::MouseEnter],
        WindowEvent::CursorLeft { .. } => vec![Event::MouseLeave],
        WindowEvent::CursorMoved { position, .. } => vec![Event::MouseMove {
            x: position.x as f32,
            y: position.y as f32,
        }],
        WindowEvent::MouseInput { state, button, .. } => {
            let (button, x, y) = (*button, cursor.x, cursor.y);
            vec![match state {
                ElementState::Pressed => Event::MousePress { button, x, y },
                ElementState::Released => Event::MouseRelease { button, x, y },
            }]
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let d = match delta {
                MouseScrollDelta::LineDelta(x, y) => vec2(*x, *y),
                MouseScrollDelta::PixelDelta(p) => vec2(p.x as f32, p.y as f32),
            };
            vec![Event::MouseScroll { dx: d.x, dy: d.y }]
        }
        WindowEvent::KeyboardInput { event, .. } => {
            let mut out = Vec::new();
            if let PhysicalKey::Code(key) = event.physical_key {
                out.push(match event.state {
                    ElementState::Pressed => Event::KeyPress {
                        key,
                        repeat: event.repeat,
                    },
                    ElementState::Released => Event::KeyRelease { key },
                });
            }
            if event.state == ElementState::Pressed {
                if let Some(text) = &event.text {
                    out.extend(text.chars().filter(|c| !c.is_control()).map(Event::Char));
                }
            }
            out
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::{
        dpi::{PhysicalPosition, PhysicalSize},
        event::{DeviceId, TouchPhase},
    };

    fn device() -> DeviceId {
        // SAFETY: only compared against other dummies, never handed to the platform
        unsafe { DeviceId::dummy() }
    }

    #[test]
    fn window_lifecycle_events() {
        assert_eq!(
            translate(&WindowEvent::CloseRequested, Vec2::ZERO),
            [Event::Close]
        );
        assert_eq!(
            translate(&WindowEvent::Resized(PhysicalSize::new(800, 600)), Vec2::ZERO),
            [Event::Resize {
                width: 800,
                height: 600
            }]
        );
        assert_eq!(
            translate(&WindowEvent::Focused(false), Vec2::ZERO),
            [Event::FocusLose]
        );
        assert!(translate(&WindowEvent::RedrawRequested, Vec2::ZERO).is_empty());
    }

    #[test]
    fn mouse_buttons_use_last_cursor_position() {
        let moved = WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(12.5, 40.0),
        };
        assert_eq!(
            translate(&moved, Vec2::ZERO),
            [Event::MouseMove { x: 12.5, y: 40.0 }]
        );

        let press = WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: MouseButton::Left,
        };
        assert_eq!(
            translate(&press, vec2(12.5, 40.0)),
            [Event::MousePress {
                button: MouseButton::Left,
                x: 12.5,
                y: 40.0
            }]
        );
    }

    #[test]
    fn scroll_deltas() {
        let lines = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, -1.0),
            phase: TouchPhase::Moved,
        };
        assert_eq!(
            translate(&lines, Vec2::ZERO),
            [Event::MouseScroll { dx: 0.0, dy: -1.0 }]
        );

        let pixels = WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(3.0, 4.0)),
            phase: TouchPhase::Moved,
        };
        assert_eq!(
            translate(&pixels, Vec2::ZERO),
            [Event::MouseScroll { dx: 3.0, dy: 4.0 }]
        );
    }

    #[test]
    fn display_names_the_kind() {
        assert_eq!(Event::Close.to_string(), "Close");
        assert_eq!(
            Event::KeyPress {
                key: KeyCode::Escape,
                repeat: true
            }
            .to_string(),
            "KeyPress: Escape (repeat)"
        );
        assert_eq!(Event::Char('a').to_string(), "Char: 'a'");
        assert_eq!(
            Event::MouseRelease {
                button: MouseButton::Right,
                x: 1.0,
                y: 2.5
            }
            .to_string(),
            "MouseRelease: Right at (1, 2.5)"
        );
    }
}
