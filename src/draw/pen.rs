use crate::color::{Color, BLACK};
use crate::error::{Error, Result};

/// Reference size used to turn a user pen radius into device pixels. It does
/// not follow the live canvas size.
pub const DEFAULT_CANVAS_SIZE: u32 = 512;
pub const DEFAULT_PEN_RADIUS: f64 = 0.005;
pub const DEFAULT_PEN_COLOR: Color = BLACK;
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Lines narrower than this many device pixels use a single stroke; wider
/// ones are stamped from filled circles.
pub const THICK_LINE_CUTOFF: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Pen {
    color: Color,
    /// Radius in device pixels.
    radius: f64,
    font_family: String,
    font_size: u32,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            color: DEFAULT_PEN_COLOR,
            radius: DEFAULT_PEN_RADIUS * DEFAULT_CANVAS_SIZE as f64,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Pen {
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// `r` is in reference units; 0 selects the thinnest visible pen.
    pub fn set_radius(&mut self, r: f64) -> Result<()> {
        if !r.is_finite() || r < 0.0 {
            return Err(Error::configuration(format!(
                "pen radius must be non-negative, got {r}"
            )));
        }
        self.radius = r * DEFAULT_CANVAS_SIZE as f64;
        Ok(())
    }

    pub fn set_font_family(&mut self, family: impl Into<String>) {
        self.font_family = family.into();
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size.max(1);
    }

    /// Pixel width used for strokes of circles, rectangles and polygons.
    pub fn stroke_width(&self) -> u32 {
        (self.radius.round() as u32).max(1)
    }

    /// Width of a line drawn with this pen; never below one pixel.
    pub fn line_width(&self) -> f64 {
        let width = self.radius * 2.0;
        if width == 0.0 {
            1.0
        } else {
            width
        }
    }

    pub fn draws_thick_lines(&self) -> bool {
        self.line_width() >= THICK_LINE_CUTOFF
    }
}

#[cfg(test)]
mod tests {
    use super::{Pen, DEFAULT_CANVAS_SIZE};

    #[test]
    fn radius_is_scaled_by_reference_size() {
        let mut pen = Pen::default();
        pen.set_radius(0.01).expect("radius");
        assert_eq!(pen.radius(), 0.01 * DEFAULT_CANVAS_SIZE as f64);
    }

    #[test]
    fn negative_radius_is_rejected_and_leaves_pen_untouched() {
        let mut pen = Pen::default();
        let before = pen.radius();
        for r in [-0.0001, -1.0, f64::NEG_INFINITY] {
            assert!(pen.set_radius(r).expect_err("negative").is_configuration());
        }
        assert_eq!(pen.radius(), before);
    }

    #[test]
    fn zero_radius_still_draws_one_pixel_wide() {
        let mut pen = Pen::default();
        pen.set_radius(0.0).expect("zero radius");
        assert_eq!(pen.line_width(), 1.0);
        assert_eq!(pen.stroke_width(), 1);
        assert!(!pen.draws_thick_lines());
    }

    #[test]
    fn default_pen_draws_thick_lines() {
        // 0.005 * 512 * 2 = 5.12 device pixels
        assert!(Pen::default().draws_thick_lines());
    }

    #[test]
    fn font_size_never_drops_to_zero() {
        let mut pen = Pen::default();
        pen.set_font_size(0);
        assert_eq!(pen.font_size(), 1);
        pen.set_font_family("Courier");
        assert_eq!(pen.font_family(), "Courier");
    }
}
