use crate::color::Color;
use crate::draw::composite::RgbaBuffer;
use ab_glyph::{point, Font, FontArc, ScaleFont};
use once_cell::sync::Lazy;
use std::collections::HashMap;

static FONT_DEFINITIONS: Lazy<egui::FontDefinitions> = Lazy::new(egui::FontDefinitions::default);

/// Picks the bundled family that stands in for a requested font name.
pub fn resolve_family(name: &str) -> egui::FontFamily {
    let lower = name.to_ascii_lowercase();
    let monospace = ["courier", "mono", "consol", "hack"]
        .iter()
        .any(|hint| lower.contains(hint));
    if monospace {
        egui::FontFamily::Monospace
    } else {
        egui::FontFamily::Proportional
    }
}

fn load_font(family: &egui::FontFamily) -> Option<(FontArc, egui::FontTweak)> {
    let names = FONT_DEFINITIONS.families.get(family)?;
    let data = FONT_DEFINITIONS.font_data.get(names.first()?)?;
    let font = match &data.font {
        std::borrow::Cow::Borrowed(bytes) => {
            ab_glyph::FontRef::try_from_slice_and_index(*bytes, data.index)
                .map(FontArc::from)
                .ok()
        }
        std::borrow::Cow::Owned(bytes) => {
            ab_glyph::FontVec::try_from_vec_and_index(bytes.clone(), data.index)
                .map(FontArc::from)
                .ok()
        }
    }?;
    Some((font, data.tweak))
}

/// Fonts resolved so far, keyed by bundled family.
#[derive(Default)]
pub struct FontBook {
    loaded: HashMap<egui::FontFamily, Option<(FontArc, egui::FontTweak)>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&mut self, name: &str) -> Option<&(FontArc, egui::FontTweak)> {
        let family = resolve_family(name);
        self.loaded
            .entry(family.clone())
            .or_insert_with(|| {
                let font = load_font(&family);
                if font.is_none() {
                    tracing::warn!(?family, "no bundled font data for family");
                }
                font
            })
            .as_ref()
    }

    /// Width and height in pixels of `text` set in `family` at `size`.
    pub fn measure(&mut self, family: &str, size: u32, text: &str) -> Option<(f32, f32)> {
        let (font, tweak) = self.font(family)?;
        let scaled = font.as_scaled(size as f32 * tweak.scale);
        let width = text
            .chars()
            .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
            .sum();
        Some((width, scaled.ascent() - scaled.descent()))
    }

    /// Draws `text` centered on the device point `center`. Returns `false` when
    /// no font is available for the family.
    pub fn draw_centered(
        &mut self,
        buffer: &mut RgbaBuffer,
        family: &str,
        size: u32,
        center: (f64, f64),
        text: &str,
        color: Color,
    ) -> bool {
        if text.is_empty() {
            return true;
        }
        let Some((width, height)) = self.measure(family, size, text) else {
            return false;
        };
        let Some((font, tweak)) = self.font(family) else {
            return false;
        };
        let px = size as f32;
        let scaled = font.as_scaled(px * tweak.scale);
        let left = center.0 as f32 - width / 2.0;
        let top = center.1 as f32 - height / 2.0;
        let mut caret = point(left, top + scaled.ascent() + tweak.y_offset * px);
        for ch in text.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            glyph.position = caret;
            caret.x += scaled.h_advance(glyph.id);
            if let Some(outlined) = scaled.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                outlined.draw(|x, y, coverage| {
                    let gx = (bounds.min.x as i32).saturating_add(x as i32);
                    let gy = (bounds.min.y as i32).saturating_add(y as i32);
                    buffer.blend_pixel(gx, gy, color, coverage);
                });
            }
        }
        true
    }
}
