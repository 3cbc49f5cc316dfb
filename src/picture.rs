use crate::color::Color;
use crate::error::{Error, Result};
use image::RgbaImage;
use std::path::Path;

pub const DEFAULT_PICTURE_WIDTH: u32 = 512;
pub const DEFAULT_PICTURE_HEIGHT: u32 = 512;

/// An in-memory bitmap that can be loaded from, and saved to, a JPG or PNG
/// file and blitted onto a canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    image: RgbaImage,
}

impl Default for Picture {
    fn default() -> Self {
        Self::new(DEFAULT_PICTURE_WIDTH, DEFAULT_PICTURE_HEIGHT)
    }
}

impl Picture {
    /// An all-black picture.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, image::Rgba([0, 0, 0, 255])),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| Error::image(path, e))?
            .to_rgba8();
        Ok(Self { image })
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        image::DynamicImage::ImageRgba8(self.image.clone())
            .to_rgb8()
            .save(path)
            .map_err(|e| Error::image(path, e))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Color> {
        self.check_bounds(x, y)?;
        Ok(Color::from_rgba_array(self.image.get_pixel(x, y).0))
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) -> Result<()> {
        self.check_bounds(x, y)?;
        self.image.put_pixel(x, y, image::Rgba(color.to_rgba_array()));
        Ok(())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::state(format!(
                "pixel ({x}, {y}) outside {}x{} picture",
                self.width(),
                self.height()
            )));
        }
        Ok(())
    }
}
