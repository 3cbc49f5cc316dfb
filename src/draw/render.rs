//! Device-space rasterization onto an [`RgbaBuffer`].
//!
//! Every routine takes floating point device coordinates (origin top-left, y
//! growing downward) and clips silently at the buffer edges. A pixel belongs
//! to a filled shape when its center lies inside the shape. Coordinates far
//! outside the buffer are clamped or clipped in floating point before any
//! integer arithmetic, so work stays proportional to the visible area.

use crate::color::Color;
use crate::draw::composite::RgbaBuffer;

/// Slack in pixels kept around the buffer when clamping.
const CLAMP_MARGIN: f64 = 2.0;

fn clamp_coord(v: f64, limit: u32, margin: f64) -> f64 {
    v.clamp(-margin, limit as f64 + margin)
}

/// Widest brush worth stamping on `buffer`.
fn max_stroke(buffer: &RgbaBuffer) -> u32 {
    buffer.width.max(buffer.height).saturating_add(2)
}

/// An axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DeviceRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Integer pixel bounds `[x0, x1) × [y0, y1)`, never empty, clamped to
    /// `margin` pixels around `buffer`.
    fn pixel_bounds(self, buffer: &RgbaBuffer, margin: f64) -> (i32, i32, i32, i32) {
        let (w, h) = (buffer.width, buffer.height);
        let x0 = clamp_coord(self.x.round(), w, margin) as i32;
        let y0 = clamp_coord(self.y.round(), h, margin) as i32;
        let x1 = (clamp_coord((self.x + self.width).round(), w, margin) as i32).max(x0 + 1);
        let y1 = (clamp_coord((self.y + self.height).round(), h, margin) as i32).max(y0 + 1);
        (x0, y0, x1, y1)
    }

    /// Rows worth scanning for a shape inscribed in this rectangle.
    fn visible_rows(self, buffer: &RgbaBuffer) -> std::ops::RangeInclusive<i32> {
        let first = self.y.floor().max(0.0) as i32;
        let last = (self.y + self.height)
            .ceil()
            .min(buffer.height as f64 - 1.0) as i32;
        first..=last
    }
}

/// Rounds a device coordinate to the pixel it falls in.
pub fn to_pixel(point: (f64, f64)) -> (i32, i32) {
    (point.0.round() as i32, point.1.round() as i32)
}

/// Liang–Barsky clip of the segment to the box `[min, max]`. Endpoints that
/// need no clipping come back unchanged. `None` when nothing of the segment
/// lies inside or a coordinate is not finite.
pub fn clip_segment(
    start: (f64, f64),
    end: (f64, f64),
    min: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let dx = end.0 - start.0;
    let dy = end.1 - start.1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, start.0 - min.0),
        (dx, max.0 - start.0),
        (-dy, start.1 - min.1),
        (dy, max.1 - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let clipped_start = if t0 > 0.0 {
        (start.0 + t0 * dx, start.1 + t0 * dy)
    } else {
        start
    };
    let clipped_end = if t1 < 1.0 {
        (start.0 + t1 * dx, start.1 + t1 * dy)
    } else {
        end
    };
    Some((clipped_start, clipped_end))
}

fn fill_span(buffer: &mut RgbaBuffer, x0: i32, x1: i32, y: i32, color: Color) {
    if y < 0 || y >= buffer.height as i32 {
        return;
    }
    let start = x0.max(0);
    let end = x1.min(buffer.width as i32 - 1);
    for x in start..=end {
        buffer.set_pixel(x, y, color);
    }
}

pub fn fill_rect(buffer: &mut RgbaBuffer, rect: DeviceRect, color: Color) {
    let (x0, y0, x1, y1) = rect.pixel_bounds(buffer, CLAMP_MARGIN);
    for y in y0.max(0)..y1.min(buffer.height as i32) {
        fill_span(buffer, x0, x1 - 1, y, color);
    }
}

/// Strokes the rectangle outline with `stroke_width` pixels grown inward.
pub fn draw_rect(buffer: &mut RgbaBuffer, rect: DeviceRect, color: Color, stroke_width: u32) {
    let w = stroke_width.clamp(1, max_stroke(buffer)) as i32;
    let (x0, y0, x1, y1) = rect.pixel_bounds(buffer, 2.0 * w as f64 + CLAMP_MARGIN);
    if 2 * w >= x1 - x0 || 2 * w >= y1 - y0 {
        fill_rect(buffer, rect, color);
        return;
    }
    for y in y0.max(0)..y1.min(buffer.height as i32) {
        if y < y0 + w || y >= y1 - w {
            fill_span(buffer, x0, x1 - 1, y, color);
        } else {
            fill_span(buffer, x0, x0 + w - 1, y, color);
            fill_span(buffer, x1 - w, x1 - 1, y, color);
        }
    }
}

/// Pixel columns of row `y` whose centers fall inside the ellipse, clamped
/// to a little past a buffer `limit` pixels wide.
fn ellipse_span(cx: f64, cy: f64, rx: f64, ry: f64, y: i32, limit: u32) -> Option<(i32, i32)> {
    if rx <= 0.0 || ry <= 0.0 {
        return None;
    }
    let dy = (y as f64 + 0.5 - cy) / ry;
    if dy.abs() > 1.0 {
        return None;
    }
    let half = rx * (1.0 - dy * dy).sqrt();
    let start = (cx - half - 0.5).ceil();
    let end = (cx + half - 0.5).floor();
    if start.is_nan() || end.is_nan() || start > end {
        return None;
    }
    Some((
        clamp_coord(start, limit, CLAMP_MARGIN) as i32,
        clamp_coord(end, limit, CLAMP_MARGIN) as i32,
    ))
}

pub fn fill_ellipse(buffer: &mut RgbaBuffer, rect: DeviceRect, color: Color) {
    let rx = rect.width * 0.5;
    let ry = rect.height * 0.5;
    let cx = rect.x + rx;
    let cy = rect.y + ry;
    let mut drew = false;
    for y in rect.visible_rows(buffer) {
        if let Some((start, end)) = ellipse_span(cx, cy, rx, ry, y, buffer.width) {
            fill_span(buffer, start, end, y, color);
            drew = true;
        }
    }
    if !drew {
        let (x, y) = to_pixel((cx - 0.5, cy - 0.5));
        buffer.set_pixel(x, y, color);
    }
}

/// Strokes the ellipse inscribed in `rect` with a ring `stroke_width` pixels
/// thick, grown inward from the bounding box.
pub fn draw_ellipse(buffer: &mut RgbaBuffer, rect: DeviceRect, color: Color, stroke_width: u32) {
    let w = stroke_width.max(1) as f64;
    if 2.0 * w >= rect.width.min(rect.height) {
        fill_ellipse(buffer, rect, color);
        return;
    }
    let rx = rect.width * 0.5;
    let ry = rect.height * 0.5;
    let cx = rect.x + rx;
    let cy = rect.y + ry;
    let limit = buffer.width;
    for y in rect.visible_rows(buffer) {
        let Some((outer_start, outer_end)) = ellipse_span(cx, cy, rx, ry, y, limit) else {
            continue;
        };
        match ellipse_span(cx, cy, rx - w, ry - w, y, limit) {
            Some((inner_start, inner_end)) => {
                fill_span(buffer, outer_start, inner_start - 1, y, color);
                fill_span(buffer, inner_end + 1, outer_end, y, color);
            }
            None => fill_span(buffer, outer_start, outer_end, y, color),
        }
    }
}

/// Stamps a square brush `stroke_width` pixels wide at `center`, clipped to
/// the buffer.
fn draw_brush(buffer: &mut RgbaBuffer, center: (i32, i32), color: Color, stroke_width: u32) {
    let w = stroke_width.clamp(1, max_stroke(buffer)) as i32;
    let lo = -(w - 1) / 2;
    let hi = w / 2;
    let top = center.1.saturating_add(lo).max(0);
    let bottom = center.1.saturating_add(hi).min(buffer.height as i32 - 1);
    for y in top..=bottom {
        fill_span(
            buffer,
            center.0.saturating_add(lo),
            center.0.saturating_add(hi),
            y,
            color,
        );
    }
}

/// Bresenham walk between the rounded endpoints, stamping the brush at every
/// step. The segment is first clipped to the buffer plus the brush width.
pub fn draw_segment(
    buffer: &mut RgbaBuffer,
    start: (f64, f64),
    end: (f64, f64),
    color: Color,
    stroke_width: u32,
) {
    let margin = stroke_width.clamp(1, max_stroke(buffer)) as f64 + CLAMP_MARGIN;
    let Some((start, end)) = clip_segment(
        start,
        end,
        (-margin, -margin),
        (
            buffer.width as f64 - 1.0 + margin,
            buffer.height as f64 - 1.0 + margin,
        ),
    ) else {
        return;
    };
    let (mut x0, mut y0) = to_pixel(start);
    let (x1, y1) = to_pixel(end);

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        draw_brush(buffer, (x0, y0), color, stroke_width);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

/// Strokes the closed outline through `points`.
pub fn draw_polygon(buffer: &mut RgbaBuffer, points: &[(f64, f64)], color: Color, stroke_width: u32) {
    match points {
        [] => {}
        [only] => draw_brush(buffer, to_pixel(*only), color, stroke_width),
        _ => {
            for (i, start) in points.iter().enumerate() {
                let end = points[(i + 1) % points.len()];
                draw_segment(buffer, *start, end, color, stroke_width);
            }
        }
    }
}

/// Even-odd scanline fill of the closed polygon through `points`, followed by
/// a hairline outline so zero-area polygons stay visible.
pub fn fill_polygon(buffer: &mut RgbaBuffer, points: &[(f64, f64)], color: Color) {
    if points.len() >= 3 {
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let first_row = min_y.floor().max(0.0) as i32;
        let last_row = max_y.ceil().min(buffer.height as f64 - 1.0) as i32;
        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());

        for y in first_row..=last_row {
            let yc = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.1 <= yc && yc < b.1) || (b.1 <= yc && yc < a.1) {
                    crossings.push(a.0 + (yc - a.1) * (b.0 - a.0) / (b.1 - a.1));
                }
            }
            crossings.sort_by(f64::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = clamp_coord((pair[0] - 0.5).ceil(), buffer.width, CLAMP_MARGIN) as i32;
                let end =
                    clamp_coord((pair[1] - 0.5).ceil(), buffer.width, CLAMP_MARGIN) as i32 - 1;
                if start <= end {
                    fill_span(buffer, start, end, y, color);
                }
            }
        }
    }
    draw_polygon(buffer, points, color, 1);
}

#[cfg(test)]
mod tests {
    use super::{
        clip_segment, draw_ellipse, draw_polygon, draw_rect, draw_segment, fill_ellipse,
        fill_polygon, fill_rect, DeviceRect,
    };
    use crate::color::{BLACK, WHITE};
    use crate::draw::composite::RgbaBuffer;

    fn inked(buffer: &RgbaBuffer) -> usize {
        buffer
            .pixels
            .chunks_exact(4)
            .filter(|px| px[..3] != [255, 255, 255])
            .count()
    }

    fn is_inked(buffer: &RgbaBuffer, x: u32, y: u32) -> bool {
        buffer.pixel(x, y) == Some(BLACK)
    }

    #[test]
    fn fill_rect_covers_exact_pixel_area() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        fill_rect(&mut buffer, DeviceRect::new(2.0, 3.0, 4.0, 5.0), BLACK);
        assert_eq!(inked(&buffer), 20);
        assert!(is_inked(&buffer, 2, 3));
        assert!(is_inked(&buffer, 5, 7));
        assert!(!is_inked(&buffer, 6, 7));
    }

    #[test]
    fn stroked_rect_leaves_interior_empty() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_rect(&mut buffer, DeviceRect::new(2.0, 2.0, 10.0, 10.0), BLACK, 1);
        assert_eq!(inked(&buffer), 36);
        assert!(is_inked(&buffer, 2, 7));
        assert!(is_inked(&buffer, 11, 7));
        assert!(!is_inked(&buffer, 7, 7));
    }

    #[test]
    fn thick_stroke_on_small_rect_degrades_to_fill() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_rect(&mut buffer, DeviceRect::new(0.0, 0.0, 4.0, 4.0), BLACK, 3);
        assert_eq!(inked(&buffer), 16);
    }

    #[test]
    fn filled_ellipse_is_symmetric_and_hollow_ring_is_not_filled() {
        let mut filled = RgbaBuffer::new(32, 32, WHITE);
        fill_ellipse(&mut filled, DeviceRect::new(4.0, 4.0, 20.0, 20.0), BLACK);
        assert!(is_inked(&filled, 14, 14));
        assert_eq!(is_inked(&filled, 4, 14), is_inked(&filled, 23, 14));
        assert!(!is_inked(&filled, 4, 4));

        let mut ring = RgbaBuffer::new(32, 32, WHITE);
        draw_ellipse(&mut ring, DeviceRect::new(4.0, 4.0, 20.0, 20.0), BLACK, 1);
        assert!(!is_inked(&ring, 14, 14));
        assert!(is_inked(&ring, 4, 14));
        assert!(inked(&ring) < inked(&filled));
    }

    #[test]
    fn tiny_ellipse_still_marks_one_pixel() {
        let mut buffer = RgbaBuffer::new(8, 8, WHITE);
        fill_ellipse(&mut buffer, DeviceRect::new(3.1, 3.1, 0.2, 0.2), BLACK);
        assert_eq!(inked(&buffer), 1);
    }

    #[test]
    fn hairline_segment_hits_both_endpoints() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_segment(&mut buffer, (1.0, 1.0), (12.0, 7.0), BLACK, 1);
        assert!(is_inked(&buffer, 1, 1));
        assert!(is_inked(&buffer, 12, 7));
        assert_eq!(inked(&buffer), 12);
    }

    #[test]
    fn two_pixel_segment_is_twice_as_wide() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_segment(&mut buffer, (2.0, 5.0), (10.0, 5.0), BLACK, 2);
        assert!(is_inked(&buffer, 6, 5));
        assert!(is_inked(&buffer, 6, 6));
        assert!(!is_inked(&buffer, 6, 4));
    }

    #[test]
    fn filled_triangle_contains_centroid() {
        let mut buffer = RgbaBuffer::new(32, 32, WHITE);
        let triangle = [(2.0, 2.0), (28.0, 2.0), (15.0, 28.0)];
        fill_polygon(&mut buffer, &triangle, BLACK);
        assert!(is_inked(&buffer, 15, 10));
        assert!(!is_inked(&buffer, 2, 27));
    }

    #[test]
    fn stroked_polygon_closes_back_to_first_vertex() {
        let mut buffer = RgbaBuffer::new(32, 32, WHITE);
        draw_polygon(&mut buffer, &[(2.0, 2.0), (20.0, 2.0), (20.0, 20.0)], BLACK, 1);
        // closing edge runs along the diagonal
        assert!(is_inked(&buffer, 11, 11));
        assert!(!is_inked(&buffer, 15, 10));
    }

    #[test]
    fn degenerate_polygon_is_still_visible() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        fill_polygon(&mut buffer, &[(2.0, 2.0), (8.0, 2.0), (12.0, 2.0)], BLACK);
        assert!(is_inked(&buffer, 5, 2));
    }

    #[test]
    fn clipping_keeps_inside_segments_and_drops_outside_ones() {
        let inside = ((1.0, 1.0), (5.0, 3.0));
        assert_eq!(
            clip_segment(inside.0, inside.1, (0.0, 0.0), (10.0, 10.0)),
            Some(inside)
        );
        assert_eq!(
            clip_segment((-5.0, 20.0), (15.0, 20.0), (0.0, 0.0), (10.0, 10.0)),
            None
        );
        let (a, b) = clip_segment((-1e10, 5.0), (1e10, 5.0), (0.0, 0.0), (10.0, 10.0))
            .expect("crosses the box");
        assert!((a.0 - 0.0).abs() < 1e-3 && (b.0 - 10.0).abs() < 1e-3);
        assert_eq!((a.1, b.1), (5.0, 5.0));
        assert_eq!(
            clip_segment((0.0, 0.0), (f64::NAN, 1.0), (0.0, 0.0), (10.0, 10.0)),
            None
        );
    }

    #[test]
    fn far_off_buffer_segment_inks_only_the_visible_row() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_segment(&mut buffer, (-1e10, 5.0), (1e10, 5.0), BLACK, 1);
        assert_eq!(inked(&buffer), 16);
        assert!((0..16).all(|x| is_inked(&buffer, x, 5)));

        let mut wide = RgbaBuffer::new(16, 16, WHITE);
        draw_segment(&mut wide, (8.0, -1e12), (8.0, 1e12), BLACK, u32::MAX);
        assert_eq!(inked(&wide), 256);
    }

    #[test]
    fn huge_rects_and_ellipses_clamp_to_the_buffer() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        draw_rect(
            &mut buffer,
            DeviceRect::new(-1e10, 4.0, 2e10, 8.0),
            BLACK,
            1,
        );
        // top and bottom edges only; the side edges are far away
        assert!(is_inked(&buffer, 0, 4));
        assert!(is_inked(&buffer, 15, 11));
        assert!(!is_inked(&buffer, 0, 7));
        assert_eq!(inked(&buffer), 32);

        let mut filled = RgbaBuffer::new(16, 16, WHITE);
        fill_rect(&mut filled, DeviceRect::new(-1e12, -1e12, 2e12, 2e12), BLACK);
        assert_eq!(inked(&filled), 256);

        let mut disc = RgbaBuffer::new(16, 16, WHITE);
        fill_ellipse(&mut disc, DeviceRect::new(-1e9, -1e9, 2e9, 2e9), BLACK);
        assert_eq!(inked(&disc), 256);

        let mut ring = RgbaBuffer::new(16, 16, WHITE);
        draw_ellipse(&mut ring, DeviceRect::new(-1e9, -1e9, 2e9, 2e9), BLACK, 1);
        assert_eq!(inked(&ring), 0);
    }

    #[test]
    fn polygon_with_distant_vertices_fills_the_buffer() {
        let mut buffer = RgbaBuffer::new(16, 16, WHITE);
        let triangle = [(-1e10, -1e10), (1e10, -1e10), (0.0, 1e10)];
        fill_polygon(&mut buffer, &triangle, BLACK);
        assert!(is_inked(&buffer, 8, 8));
    }
}
