use crate::color::{Color, WHITE};
use crate::draw::backend::{Backend, HeadlessBackend};
use crate::draw::composite::RgbaBuffer;
use crate::draw::dialog::{DialogService, ProcessDialogService};
use crate::draw::input::InputQueue;
use crate::draw::messages::{CanvasEvent, MouseButton};
use crate::draw::pen::{Pen, DEFAULT_CANVAS_SIZE};
use crate::draw::render::{self, DeviceRect};
use crate::draw::save::{save_with_dialogs, SaveOutcome};
use crate::draw::scale::CoordinateSpace;
use crate::draw::state::{can_transition, CanvasLifecycle};
use crate::draw::text::FontBook;
use crate::draw::window::WindowBackend;
use crate::error::{Error, Result};
use crate::picture::Picture;
use crate::settings::CanvasSettings;
use std::convert::Infallible;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Drawing calls take any finite user coordinate; NaN and infinities are
/// rejected before they reach the rasterizer.
fn require_finite(operation: &str, values: &[f64]) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        return Ok(());
    }
    Err(Error::configuration(format!(
        "{operation} needs finite arguments, got {values:?}"
    )))
}

struct Surfaces {
    offscreen: RgbaBuffer,
    window: RgbaBuffer,
}

/// A drawing surface with a user coordinate system, a pen, double buffering
/// and an input queue.
///
/// The window is created lazily: by [`Canvas::set_canvas_size`] or, at the
/// default 512×512, by the first drawing or `show` call. Drawing goes to an
/// off-screen buffer that only becomes visible when [`Canvas::show`]
/// publishes it.
pub struct Canvas<B: Backend = WindowBackend> {
    backend: B,
    dialogs: Box<dyn DialogService>,
    settings: CanvasSettings,
    lifecycle: CanvasLifecycle,
    size: (u32, u32),
    space: CoordinateSpace,
    pen: Pen,
    surfaces: Option<Surfaces>,
    input: InputQueue,
    fonts: FontBook,
    last_save: Option<SaveOutcome>,
}

impl Canvas<WindowBackend> {
    /// A canvas backed by a native window, saving through dialog child
    /// processes of the current executable.
    pub fn new() -> Self {
        Self::with_backend(WindowBackend::new())
    }
}

impl Default for Canvas<WindowBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas<HeadlessBackend> {
    /// A canvas without a window; events can be injected through
    /// [`Canvas::backend_mut`].
    pub fn headless() -> Self {
        Self::with_backend(HeadlessBackend::new())
    }
}

impl<B: Backend> Canvas<B> {
    pub fn with_backend(backend: B) -> Self {
        let size = (DEFAULT_CANVAS_SIZE, DEFAULT_CANVAS_SIZE);
        Self {
            backend,
            dialogs: Box::new(ProcessDialogService::new()),
            settings: CanvasSettings::default(),
            lifecycle: CanvasLifecycle::Uncreated,
            size,
            space: CoordinateSpace::new(size.0, size.1),
            pen: Pen::default(),
            surfaces: None,
            input: InputQueue::new(),
            fonts: FontBook::new(),
            last_save: None,
        }
    }

    pub fn with_dialogs(mut self, dialogs: Box<dyn DialogService>) -> Self {
        self.dialogs = dialogs;
        self
    }

    pub fn with_settings(mut self, settings: CanvasSettings) -> Self {
        self.pen.set_color(settings.pen_color);
        self.settings = settings;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn lifecycle(&self) -> CanvasLifecycle {
        self.lifecycle
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn coordinates(&self) -> &CoordinateSpace {
        &self.space
    }

    pub fn pen(&self) -> &Pen {
        &self.pen
    }

    /// Outcome of the most recent right-click save, if any.
    pub fn last_save(&self) -> Option<&SaveOutcome> {
        self.last_save.as_ref()
    }

    fn transition(&mut self, to: CanvasLifecycle) {
        debug_assert!(
            can_transition(self.lifecycle, to),
            "illegal canvas transition {:?} -> {:?}",
            self.lifecycle,
            to
        );
        self.lifecycle = to;
    }

    // ---- pen state ----

    /// Sets the canvas to `width × height` pixels and creates the window. Must
    /// come before anything is drawn.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) -> Result<()> {
        if self.lifecycle.is_created() {
            return Err(Error::configuration("the canvas window already was created"));
        }
        if width < 1 || height < 1 {
            return Err(Error::configuration(format!(
                "width and height must be positive, got {width}x{height}"
            )));
        }
        self.size = (width, height);
        self.space.set_device_size(width, height);
        self.create_window()
    }

    pub fn set_x_scale(&mut self, min: f64, max: f64) -> Result<()> {
        self.space.set_x_range(min, max)
    }

    pub fn set_y_scale(&mut self, min: f64, max: f64) -> Result<()> {
        self.space.set_y_range(min, max)
    }

    pub fn set_pen_radius(&mut self, r: f64) -> Result<()> {
        self.pen.set_radius(r)
    }

    pub fn set_pen_color(&mut self, color: Color) {
        self.pen.set_color(color);
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.pen.set_font_family(family);
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.pen.set_font_size(size);
    }

    // ---- window lifecycle ----

    fn create_window(&mut self) -> Result<()> {
        let (width, height) = self.size;
        self.backend
            .open(width, height, &self.settings.window_title)?;
        self.surfaces = Some(Surfaces {
            offscreen: RgbaBuffer::new(width, height, WHITE),
            window: RgbaBuffer::new(width, height, WHITE),
        });
        self.transition(CanvasLifecycle::Idle);
        debug!(width, height, "canvas created");
        self.poll_events()
    }

    fn ensure_created(&mut self) -> Result<()> {
        if !self.lifecycle.is_created() {
            self.create_window()?;
        }
        Ok(())
    }

    /// Creates the window if needed and hands out the off-screen buffer.
    fn offscreen(&mut self) -> Result<&mut RgbaBuffer> {
        self.ensure_created()?;
        self.surfaces
            .as_mut()
            .map(|s| &mut s.offscreen)
            .ok_or_else(|| Error::state("canvas buffers missing after creation"))
    }

    /// Color of the off-screen buffer at device pixel (`x`, `y`).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.surfaces.as_ref()?.offscreen.pixel(x, y)
    }

    /// Color of the last published frame at device pixel (`x`, `y`).
    pub fn window_pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.surfaces.as_ref()?.window.pixel(x, y)
    }

    // ---- drawing primitives ----

    fn pixel_at(&mut self, x: f64, y: f64) -> Result<()> {
        let (dx, dy) = render::to_pixel(self.space.to_device(x, y));
        let color = self.pen.color();
        self.offscreen()?.set_pixel(dx, dy, color);
        Ok(())
    }

    pub fn point(&mut self, x: f64, y: f64) -> Result<()> {
        require_finite("point", &[x, y])?;
        let r = self.pen.radius();
        if r <= 1.0 {
            return self.pixel_at(x, y);
        }
        let (sx, sy) = self.space.to_device(x, y);
        let color = self.pen.color();
        render::fill_ellipse(
            self.offscreen()?,
            DeviceRect::new(sx - r, sy - r, 2.0 * r, 2.0 * r),
            color,
        );
        Ok(())
    }

    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Result<()> {
        require_finite("line", &[x0, y0, x1, y1])?;
        self.ensure_created()?;
        if !self.pen.draws_thick_lines() {
            let width = self.pen.line_width().round() as u32;
            let start = self.space.to_device(x0, y0);
            let end = self.space.to_device(x1, y1);
            let color = self.pen.color();
            render::draw_segment(self.offscreen()?, start, end, color, width);
            return Ok(());
        }
        self.thick_line(x0, y0, x1, y1, self.pen.radius() / DEFAULT_CANVAS_SIZE as f64)
    }

    /// Stamps filled circles of user radius `r` along the segment, halving it
    /// until each piece spans less than a device pixel on both axes. Parts of
    /// the segment farther than one radius from the canvas are cut off first.
    fn thick_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, r: f64) -> Result<()> {
        let reach = self.space.factor_x(r).max(self.space.factor_y(r)) + 2.0;
        let (width, height) = (self.size.0 as f64, self.size.1 as f64);
        let start = self.space.to_device(x0, y0);
        let end = self.space.to_device(x1, y1);
        let Some((clipped_start, clipped_end)) = render::clip_segment(
            start,
            end,
            (-reach, -reach),
            (width + reach, height + reach),
        ) else {
            return Ok(());
        };
        let to_user = |device: (f64, f64), original: (f64, f64), user: (f64, f64)| {
            if device == original {
                user
            } else {
                (self.space.unscale_x(device.0), self.space.unscale_y(device.1))
            }
        };
        let (x0, y0) = to_user(clipped_start, start, (x0, y0));
        let (x1, y1) = to_user(clipped_end, end, (x1, y1));

        let mut pending = vec![(x0, y0, x1, y1)];
        while let Some((ax, ay, bx, by)) = pending.pop() {
            let (sax, say) = self.space.to_device(ax, ay);
            let (sbx, sby) = self.space.to_device(bx, by);
            if (sax - sbx).abs() < 1.0 && (say - sby).abs() < 1.0 {
                self.filled_circle(ax, ay, r)?;
                continue;
            }
            let mx = (ax + bx) / 2.0;
            let my = (ay + by) / 2.0;
            pending.push((mx, my, bx, by));
            pending.push((ax, ay, mx, my));
        }
        Ok(())
    }

    /// Device bounding box of the circle, or `None` when it is at most one
    /// pixel across.
    fn circle_box(&self, x: f64, y: f64, r: f64) -> Option<DeviceRect> {
        let ws = self.space.factor_x(2.0 * r);
        let hs = self.space.factor_y(2.0 * r);
        if ws <= 1.0 && hs <= 1.0 {
            return None;
        }
        let (sx, sy) = self.space.to_device(x, y);
        Some(DeviceRect::new(sx - ws / 2.0, sy - hs / 2.0, ws, hs))
    }

    pub fn circle(&mut self, x: f64, y: f64, r: f64) -> Result<()> {
        require_finite("circle", &[x, y, r])?;
        let Some(rect) = self.circle_box(x, y, r) else {
            return self.pixel_at(x, y);
        };
        let color = self.pen.color();
        let width = self.pen.stroke_width();
        render::draw_ellipse(self.offscreen()?, rect, color, width);
        Ok(())
    }

    pub fn filled_circle(&mut self, x: f64, y: f64, r: f64) -> Result<()> {
        require_finite("filled_circle", &[x, y, r])?;
        let Some(rect) = self.circle_box(x, y, r) else {
            return self.pixel_at(x, y);
        };
        let color = self.pen.color();
        render::fill_ellipse(self.offscreen()?, rect, color);
        Ok(())
    }

    /// Device rectangle for a user rectangle with lower-left corner (x, y),
    /// or `None` when it is at most one pixel across.
    fn rect_box(&self, x: f64, y: f64, w: f64, h: f64) -> Option<DeviceRect> {
        let ws = self.space.factor_x(w);
        let hs = self.space.factor_y(h);
        if ws <= 1.0 && hs <= 1.0 {
            return None;
        }
        let (sx, sy) = self.space.to_device(x, y);
        Some(DeviceRect::new(sx, sy - hs, ws, hs))
    }

    pub fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        require_finite("rectangle", &[x, y, w, h])?;
        let Some(rect) = self.rect_box(x, y, w, h) else {
            return self.pixel_at(x, y);
        };
        let color = self.pen.color();
        let width = self.pen.stroke_width();
        render::draw_rect(self.offscreen()?, rect, color, width);
        Ok(())
    }

    pub fn filled_rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<()> {
        require_finite("filled_rectangle", &[x, y, w, h])?;
        let Some(rect) = self.rect_box(x, y, w, h) else {
            return self.pixel_at(x, y);
        };
        let color = self.pen.color();
        render::fill_rect(self.offscreen()?, rect, color);
        Ok(())
    }

    /// Square with sides 2r centered on (x, y).
    pub fn square(&mut self, x: f64, y: f64, r: f64) -> Result<()> {
        self.rectangle(x - r, y - r, 2.0 * r, 2.0 * r)
    }

    pub fn filled_square(&mut self, x: f64, y: f64, r: f64) -> Result<()> {
        self.filled_rectangle(x - r, y - r, 2.0 * r, 2.0 * r)
    }

    fn device_polygon(&self, xs: &[f64], ys: &[f64]) -> Result<Vec<(f64, f64)>> {
        if xs.len() != ys.len() {
            return Err(Error::configuration(format!(
                "polygon needs as many y values as x values, got {} and {}",
                xs.len(),
                ys.len()
            )));
        }
        require_finite("polygon", xs)?;
        require_finite("polygon", ys)?;
        Ok(xs
            .iter()
            .zip(ys)
            .map(|(&x, &y)| self.space.to_device(x, y))
            .collect())
    }

    /// Closed polygon through (xs[i], ys[i]); the last vertex joins the first.
    pub fn polygon(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        let points = self.device_polygon(xs, ys)?;
        let color = self.pen.color();
        let width = self.pen.stroke_width();
        render::draw_polygon(self.offscreen()?, &points, color, width);
        Ok(())
    }

    pub fn filled_polygon(&mut self, xs: &[f64], ys: &[f64]) -> Result<()> {
        let points = self.device_polygon(xs, ys)?;
        let color = self.pen.color();
        render::fill_polygon(self.offscreen()?, &points, color);
        Ok(())
    }

    /// Draws `s` centered at (x, y) in the current font and pen color.
    pub fn text(&mut self, x: f64, y: f64, s: &str) -> Result<()> {
        require_finite("text", &[x, y])?;
        self.ensure_created()?;
        let center = self.space.to_device(x, y);
        let color = self.pen.color();
        let size = self.pen.font_size();
        let family = self.pen.font_family().to_string();
        let Some(surfaces) = self.surfaces.as_mut() else {
            return Err(Error::state("canvas buffers missing after creation"));
        };
        if !self
            .fonts
            .draw_centered(&mut surfaces.offscreen, &family, size, center, s, color)
        {
            warn!(family = %family, "no font available, text skipped");
        }
        Ok(())
    }

    /// Draws `picture` centered at (x, y).
    pub fn picture(&mut self, picture: &Picture, x: f64, y: f64) -> Result<()> {
        require_finite("picture", &[x, y])?;
        let (sx, sy) = self.space.to_device(x, y);
        let left = (sx - picture.width() as f64 / 2.0).round() as i32;
        let top = (sy - picture.height() as f64 / 2.0).round() as i32;
        self.offscreen()?.blit(picture, left, top);
        Ok(())
    }

    /// Draws `picture` centered in the middle of the coordinate space.
    pub fn picture_centered(&mut self, picture: &Picture) -> Result<()> {
        let (x, y) = self.space.center();
        self.picture(picture, x, y)
    }

    pub fn clear(&mut self, color: Color) -> Result<()> {
        self.offscreen()?.fill(color);
        Ok(())
    }

    pub fn clear_default(&mut self) -> Result<()> {
        self.clear(WHITE)
    }

    /// Writes the off-screen buffer to `path`; the extension picks the format.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        self.offscreen()?.save(path)?;
        info!(path = %path.display(), "canvas saved");
        Ok(())
    }

    // ---- frame presenter ----

    fn publish(&mut self) -> Result<()> {
        self.ensure_created()?;
        let Some(surfaces) = self.surfaces.as_mut() else {
            return Err(Error::state("canvas buffers missing after creation"));
        };
        surfaces.window.copy_from(&surfaces.offscreen);
        self.backend.present(&surfaces.window)?;
        debug!("frame published");
        self.poll_events()
    }

    /// Publishes the off-screen buffer and then waits for `wait`, polling
    /// input every slice. `None` waits until the window is closed, which ends
    /// the process.
    pub fn show(&mut self, wait: Option<Duration>) -> Result<()> {
        let Some(wait) = wait else {
            let never = self.show_forever()?;
            match never {}
        };
        self.publish()?;
        self.transition(CanvasLifecycle::Showing);
        let result = self.wait_and_poll(wait);
        self.transition(CanvasLifecycle::Idle);
        result
    }

    pub fn show_millis(&mut self, millis: u64) -> Result<()> {
        self.show(Some(Duration::from_millis(millis)))
    }

    fn wait_and_poll(&mut self, wait: Duration) -> Result<()> {
        self.poll_events()?;
        let slice = self.settings.poll_interval();
        if wait < slice {
            std::thread::sleep(wait);
            return Ok(());
        }
        let mut waited = Duration::ZERO;
        while waited < wait {
            std::thread::sleep(slice);
            waited += slice;
            self.poll_events()?;
        }
        Ok(())
    }

    /// Publishes and then services input until the process is terminated.
    pub fn show_forever(&mut self) -> Result<Infallible> {
        self.publish()?;
        self.transition(CanvasLifecycle::Showing);
        let slice = self.settings.poll_interval();
        loop {
            std::thread::sleep(slice);
            self.poll_events()?;
        }
    }

    // ---- input ----

    /// Drains backend events into the input queue; a right-button release
    /// runs the save dialogs and a close request exits the process.
    pub fn poll_events(&mut self) -> Result<()> {
        for event in self.backend.poll_events()? {
            match event {
                CanvasEvent::Close => {
                    info!("canvas window closed");
                    std::process::exit(0);
                }
                CanvasEvent::KeyDown(key) => self.input.push_key(key),
                CanvasEvent::MouseDown {
                    button: MouseButton::Left,
                    x,
                    y,
                } => self.input.record_left_click((x, y)),
                CanvasEvent::MouseUp {
                    button: MouseButton::Right,
                    ..
                } => self.save_from_dialog(),
                _ => {}
            }
        }
        self.dialogs.reap();
        Ok(())
    }

    fn save_from_dialog(&mut self) {
        let Some(surfaces) = self.surfaces.as_ref() else {
            return;
        };
        let outcome = save_with_dialogs(self.dialogs.as_mut(), &surfaces.window);
        debug!(?outcome, "save dialog finished");
        self.last_save = Some(outcome);
    }

    pub fn has_next_key_typed(&self) -> bool {
        self.input.has_next_key_typed()
    }

    /// Removes and returns the most recently typed key.
    pub fn next_key_typed(&mut self) -> Result<char> {
        self.input.next_key_typed()
    }

    /// Whether the left button was clicked since the last call.
    pub fn mouse_pressed(&mut self) -> bool {
        self.input.take_mouse_pressed()
    }

    /// User-space x of the most recent left click.
    pub fn mouse_x(&self) -> Result<f64> {
        let (px, _) = self.input.last_click()?;
        Ok(self.space.unscale_x(px))
    }

    /// User-space y of the most recent left click.
    pub fn mouse_y(&self) -> Result<f64> {
        let (_, py) = self.input.last_click()?;
        Ok(self.space.unscale_y(py))
    }
}
