use crate::error::{Error, Result};

pub const DEFAULT_X_MIN: f64 = 0.0;
pub const DEFAULT_X_MAX: f64 = 1.0;
pub const DEFAULT_Y_MIN: f64 = 0.0;
pub const DEFAULT_Y_MAX: f64 = 1.0;

/// Maps the user-chosen rectangle `[x_min, x_max] × [y_min, y_max]` onto a
/// `width × height` pixel surface. User y grows upward, device y downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
    width: f64,
    height: f64,
}

impl CoordinateSpace {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x_min: DEFAULT_X_MIN,
            x_max: DEFAULT_X_MAX,
            y_min: DEFAULT_Y_MIN,
            y_max: DEFAULT_Y_MAX,
            width: width as f64,
            height: height as f64,
        }
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) -> Result<()> {
        let (min, max) = validate_range(min, max)?;
        self.x_min = min;
        self.x_max = max;
        Ok(())
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) -> Result<()> {
        let (min, max) = validate_range(min, max)?;
        self.y_min = min;
        self.y_max = max;
        Ok(())
    }

    pub(crate) fn set_device_size(&mut self, width: u32, height: u32) {
        self.width = width as f64;
        self.height = height as f64;
    }

    pub fn x_range(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    pub fn y_range(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// Midpoint of the user rectangle.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    pub fn scale_x(&self, x: f64) -> f64 {
        self.width * (x - self.x_min) / (self.x_max - self.x_min)
    }

    pub fn scale_y(&self, y: f64) -> f64 {
        self.height * (self.y_max - y) / (self.y_max - self.y_min)
    }

    pub fn factor_x(&self, w: f64) -> f64 {
        w * self.width / (self.x_max - self.x_min).abs()
    }

    pub fn factor_y(&self, h: f64) -> f64 {
        h * self.height / (self.y_max - self.y_min).abs()
    }

    pub fn unscale_x(&self, px: f64) -> f64 {
        self.x_min + px * (self.x_max - self.x_min) / self.width
    }

    pub fn unscale_y(&self, py: f64) -> f64 {
        self.y_max - py * (self.y_max - self.y_min) / self.height
    }

    pub fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
        (self.scale_x(x), self.scale_y(y))
    }
}

fn validate_range(min: f64, max: f64) -> Result<(f64, f64)> {
    if !min.is_finite() || !max.is_finite() {
        return Err(Error::configuration(format!(
            "scale bounds must be finite, got {min}..{max}"
        )));
    }
    if min >= max {
        return Err(Error::configuration(format!(
            "minimum must be less than maximum, got {min}..{max}"
        )));
    }
    Ok((min, max))
}
