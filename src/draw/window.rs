use crate::draw::backend::Backend;
use crate::draw::composite::RgbaBuffer;
use crate::draw::messages::{CanvasEvent, MouseButton};
use crate::error::{Error, Result};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

struct OpenWindow {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    cursor: PhysicalPosition<f64>,
}

/// A native window driven by pumping the winit event loop from the caller's
/// thread. Frames are uploaded through a `pixels` surface.
#[derive(Default)]
pub struct WindowBackend {
    open: Option<OpenWindow>,
}

impl WindowBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn opened(&mut self) -> Result<&mut OpenWindow> {
        self.open
            .as_mut()
            .ok_or_else(|| Error::Backend("window has not been opened".into()))
    }
}

fn map_button(button: winit::event::MouseButton) -> MouseButton {
    match button {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Other(3),
        winit::event::MouseButton::Forward => MouseButton::Other(4),
        winit::event::MouseButton::Other(id) => MouseButton::Other(id),
    }
}

/// Typed characters of a key press; releases and keys without text yield
/// nothing.
fn push_typed_text(state: ElementState, text: Option<&str>, out: &mut Vec<CanvasEvent>) {
    if let (ElementState::Pressed, Some(text)) = (state, text) {
        out.extend(text.chars().map(CanvasEvent::KeyDown));
    }
}

/// Window position to surface pixel, clamping positions left of or above
/// the surface to its edge.
fn surface_pixel(pixels: &Pixels<'static>, position: PhysicalPosition<f64>) -> (f64, f64) {
    match pixels.window_pos_to_pixel((position.x as f32, position.y as f32)) {
        Ok((x, y)) => (x as f64, y as f64),
        Err((x, y)) => (x.max(0) as f64, y.max(0) as f64),
    }
}

/// Translates one window event, appending any canvas events it produces.
/// `to_pixel` maps the tracked cursor position onto the canvas.
fn translate_window_event(
    event: WindowEvent,
    to_pixel: impl Fn(PhysicalPosition<f64>) -> (f64, f64),
    cursor: &mut PhysicalPosition<f64>,
    out: &mut Vec<CanvasEvent>,
) {
    match event {
        WindowEvent::CloseRequested => out.push(CanvasEvent::Close),
        WindowEvent::KeyboardInput {
            event: KeyEvent { state, text, .. },
            ..
        } => push_typed_text(state, text.as_deref(), out),
        WindowEvent::CursorMoved { position, .. } => *cursor = position,
        WindowEvent::MouseInput { state, button, .. } => {
            let (x, y) = to_pixel(*cursor);
            let button = map_button(button);
            out.push(match state {
                ElementState::Pressed => CanvasEvent::MouseDown { button, x, y },
                ElementState::Released => CanvasEvent::MouseUp { button, x, y },
            });
        }
        _ => {}
    }
}

impl Backend for WindowBackend {
    fn open(&mut self, width: u32, height: u32, title: &str) -> Result<()> {
        if self.open.is_some() {
            return Err(Error::Backend("window already open".into()));
        }
        let event_loop = EventLoop::new().map_err(|e| Error::Backend(e.to_string()))?;
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false)
            .build(&event_loop)
            .map_err(|e| Error::Backend(e.to_string()))?;
        let window = Arc::new(window);
        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(surface_size.width, surface_size.height, window.clone());
        let pixels =
            Pixels::new(width, height, surface).map_err(|e| Error::Backend(e.to_string()))?;
        debug!(width, height, title, "opened canvas window");
        self.open = Some(OpenWindow {
            event_loop,
            window,
            pixels,
            cursor: PhysicalPosition::new(0.0, 0.0),
        });
        Ok(())
    }

    fn present(&mut self, frame: &RgbaBuffer) -> Result<()> {
        let open = self.opened()?;
        let target = open.pixels.frame_mut();
        if target.len() != frame.pixels.len() {
            return Err(Error::Backend(format!(
                "frame is {} bytes but window surface expects {}",
                frame.pixels.len(),
                target.len()
            )));
        }
        target.copy_from_slice(&frame.pixels);
        open.window.pre_present_notify();
        open.pixels
            .render()
            .map_err(|e| Error::Backend(e.to_string()))?;
        trace!("presented frame");
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<CanvasEvent>> {
        let OpenWindow {
            event_loop,
            pixels,
            cursor,
            ..
        } = self.opened()?;
        let mut out = Vec::new();
        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _target| {
            if let Event::WindowEvent { event, .. } = event {
                translate_window_event(event, |p| surface_pixel(pixels, p), cursor, &mut out);
            }
        });
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop requested exit");
            out.push(CanvasEvent::Close);
        }
        Ok(out)
    }
}
