use std::path::Path;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use rusttype::{point, Font, Scale};

/// Ink box of a laid-out string. `offset_*` is where the ink starts relative
/// to the pen position, so drawing at `origin - offset` puts the ink exactly
/// at `origin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBlock {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl TextBlock {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Font used to draw the watermark.
pub enum Typeface {
    Outline(Font<'static>),
    /// 8x8 bitmap glyphs scaled up to the requested size.
    Builtin,
}

impl Typeface {
    /// Load a TrueType/OpenType font. Missing or unparsable files give the
    /// built-in font plus a warning message for the caller to surface.
    pub fn load(path: Option<&Path>) -> (Self, Option<String>) {
        let Some(path) = path else {
            return (Typeface::Builtin, None);
        };
        match std::fs::read(path) {
            Ok(bytes) => match Font::try_from_vec(bytes) {
                Some(font) => (Typeface::Outline(font), None),
                None => (
                    Typeface::Builtin,
                    Some(format!("font '{}' is not a usable font file, using built-in font", path.display())),
                ),
            },
            Err(e) => (
                Typeface::Builtin,
                Some(format!("cannot open font '{}' ({}), using built-in font", path.display(), e)),
            ),
        }
    }

    pub fn measure(&self, text: &str, size: u32) -> TextBlock {
        match self {
            Typeface::Outline(font) => measure_outline(font, text, size),
            Typeface::Builtin => {
                let cell = builtin_cell(size);
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    return TextBlock::default();
                }
                TextBlock { width: chars * 8 * cell, height: 8 * cell, offset_x: 0, offset_y: 0 }
            }
        }
    }

    /// Draw `text` so its ink box starts at `origin`. Glyph coverage scales
    /// the color's alpha; pixels outside the layer are dropped.
    pub fn draw(&self, layer: &mut RgbaImage, text: &str, size: u32, origin: (i32, i32), color: Rgba<u8>) {
        match self {
            Typeface::Outline(font) => draw_outline(font, layer, text, size, origin, color),
            Typeface::Builtin => draw_builtin(layer, text, size, origin, color),
        }
    }
}

fn builtin_cell(size: u32) -> u32 {
    ((size as f32 / 8.0).round() as u32).max(1)
}

/// Ink box from the rasterized coverage, so it matches what `draw_outline`
/// puts on the layer pixel for pixel.
fn measure_outline(font: &Font<'static>, text: &str, size: u32) -> TextBlock {
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;

    let mut bounds: Option<(i32, i32, i32, i32)> = None;
    for glyph in font.layout(text, scale, point(0.0, ascent)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            if coverage <= 0.0 {
                return;
            }
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => TextBlock {
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
            offset_x: x0,
            offset_y: y0,
        },
        None => TextBlock::default(),
    }
}

fn draw_outline(font: &Font<'static>, layer: &mut RgbaImage, text: &str, size: u32, origin: (i32, i32), color: Rgba<u8>) {
    let block = measure_outline(font, text, size);
    let scale = Scale::uniform(size as f32);
    let ascent = font.v_metrics(scale).ascent;
    // Integer shift of the measuring pen keeps the rasterization identical.
    let pen = point((origin.0 - block.offset_x) as f32, (origin.1 - block.offset_y) as f32 + ascent);

    for glyph in font.layout(text, scale, pen) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, coverage| {
            let x = gx as i32 + bb.min.x;
            let y = gy as i32 + bb.min.y;
            put_coverage(layer, x, y, color, coverage);
        });
    }
}

fn draw_builtin(layer: &mut RgbaImage, text: &str, size: u32, origin: (i32, i32), color: Rgba<u8>) {
    let cell = builtin_cell(size) as i32;
    for (i, ch) in text.chars().enumerate() {
        let Some(rows) = BASIC_FONTS.get(ch).or_else(|| BASIC_FONTS.get('?')) else {
            continue;
        };
        let left = origin.0 + i as i32 * 8 * cell;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..8 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = left + col * cell;
                let y0 = origin.1 + row as i32 * cell;
                for dy in 0..cell {
                    for dx in 0..cell {
                        put_coverage(layer, x0 + dx, y0 + dy, color, 1.0);
                    }
                }
            }
        }
    }
}

fn put_coverage(layer: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= layer.width() as i32 || y >= layer.height() as i32 {
        return;
    }
    if coverage <= 0.0 || color.0[3] == 0 {
        return;
    }
    // Any touched pixel stays visible so the ink matches the measured box.
    let alpha = (color.0[3] as f32 * coverage.min(1.0)).round().max(1.0) as u8;
    let px = layer.get_pixel_mut(x as u32, y as u32);
    // Overlapping glyph edges keep the stronger coverage.
    if alpha > px.0[3] {
        *px = Rgba([color.0[0], color.0[1], color.0[2], alpha]);
    }
}
