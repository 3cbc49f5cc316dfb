use crate::color::Color;
use crate::error::{Error, Result};
use crate::picture::Picture;
use image::RgbaImage;
use std::path::Path;

/// A row-major RGBA8 pixel surface. Both the off-screen buffer and the window
/// buffer of a canvas are `RgbaBuffer`s of identical size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RgbaBuffer {
    pub fn new(width: u32, height: u32, fill: Color) -> Self {
        let mut buffer = Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        };
        buffer.fill(fill);
        buffer
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn fill(&mut self, color: Color) {
        let rgba = color.to_rgba_array();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        Some(Color::rgb(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
        ))
    }

    /// Writes one pixel; coordinates outside the surface are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if !self.contains(x, y) {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_rgba_array());
    }

    /// Blends `color` over the existing pixel with the given coverage in
    /// `0.0..=1.0`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if !self.contains(x, y) {
            return;
        }
        let alpha = coverage.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        let src = [color.r, color.g, color.b];
        for (channel, value) in src.into_iter().enumerate() {
            let dst = self.pixels[idx + channel] as f32;
            self.pixels[idx + channel] =
                (value as f32 * alpha + dst * (1.0 - alpha)).round().clamp(0.0, 255.0) as u8;
        }
        self.pixels[idx + 3] = 255;
    }

    pub fn copy_from(&mut self, other: &RgbaBuffer) {
        assert_eq!(self.width, other.width);
        assert_eq!(self.height, other.height);
        self.pixels.copy_from_slice(&other.pixels);
    }

    /// Draws `picture` with its top-left corner at (`left`, `top`), blending
    /// by the picture's alpha channel and clipping to the surface.
    pub fn blit(&mut self, picture: &Picture, left: i32, top: i32) {
        let image = picture.as_image();
        for (x, y, px) in image.enumerate_pixels() {
            let dx = left.saturating_add(x as i32);
            let dy = top.saturating_add(y as i32);
            let [r, g, b, a] = px.0;
            match a {
                0 => {}
                255 => self.set_pixel(dx, dy, Color::rgb(r, g, b)),
                a => self.blend_pixel(dx, dy, Color::rgb(r, g, b), a as f32 / 255.0),
            }
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Writes the surface to `path`; the format follows the file extension.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        image::DynamicImage::ImageRgba8(self.to_image())
            .to_rgb8()
            .save(path)
            .map_err(|e| Error::image(path, e))
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + x as usize) * 4
    }
}

#[cfg(test)]
mod tests {
    use super::RgbaBuffer;
    use crate::color::{Color, BLACK, RED, WHITE};
    use crate::picture::Picture;

    #[test]
    fn new_buffer_is_filled() {
        let buffer = RgbaBuffer::new(2, 1, Color::rgb(7, 8, 9));
        assert_eq!(buffer.pixels, vec![7, 8, 9, 255, 7, 8, 9, 255]);
    }

    #[test]
    fn set_pixel_ignores_out_of_range() {
        let mut buffer = RgbaBuffer::new(2, 2, WHITE);
        buffer.set_pixel(-1, 0, RED);
        buffer.set_pixel(2, 1, RED);
        buffer.set_pixel(1, 1, RED);
        assert_eq!(buffer.pixel(1, 1), Some(RED));
        assert_eq!(
            buffer.pixels.chunks_exact(4).filter(|px| px[0] == 255 && px[1] == 0).count(),
            1
        );
    }

    #[test]
    fn half_coverage_blends_midway() {
        let mut buffer = RgbaBuffer::new(1, 1, WHITE);
        buffer.blend_pixel(0, 0, BLACK, 0.5);
        assert_eq!(buffer.pixel(0, 0), Some(Color::rgb(128, 128, 128)));
    }

    #[test]
    fn blit_clips_at_edges() {
        let mut buffer = RgbaBuffer::new(4, 4, WHITE);
        let picture = Picture::new(3, 3);
        buffer.blit(&picture, 2, -1);
        assert_eq!(buffer.pixel(2, 0), Some(BLACK));
        assert_eq!(buffer.pixel(3, 1), Some(BLACK));
        assert_eq!(buffer.pixel(3, 2), Some(WHITE));
        assert_eq!(buffer.pixel(1, 0), Some(WHITE));
    }
}
