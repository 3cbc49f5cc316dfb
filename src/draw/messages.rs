#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Input reported by a backend when polled.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasEvent {
    /// The user closed the window.
    Close,
    KeyDown(char),
    /// Position is in device pixels.
    MouseDown { button: MouseButton, x: f64, y: f64 },
    MouseUp { button: MouseButton, x: f64, y: f64 },
}
