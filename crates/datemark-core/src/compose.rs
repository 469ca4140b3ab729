use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use crate::font::Typeface;
use crate::layout::{compute_origin, Anchor, MARGIN};
use crate::orientation::Photo;

/// Resolved watermark appearance, shared by every file in a batch.
pub struct WatermarkStyle {
    pub typeface: Typeface,
    pub font_size: u32,
    pub color: Rgba<u8>,
    pub anchor: Anchor,
    pub margin: i32,
}

impl WatermarkStyle {
    pub fn new(typeface: Typeface, font_size: u32, color: Rgba<u8>, anchor: Anchor) -> Self {
        Self { typeface, font_size, color, anchor, margin: MARGIN }
    }
}

/// Draw `text` on a transparent layer the size of `base`, composite it over
/// the base and flatten the result to RGB.
pub fn render(
    base: DynamicImage,
    text: &str,
    typeface: &Typeface,
    font_size: u32,
    color: Rgba<u8>,
    origin: (i32, i32),
) -> RgbImage {
    let mut canvas: RgbaImage = base.into_rgba8();
    let mut layer = RgbaImage::from_pixel(canvas.width(), canvas.height(), Rgba([255, 255, 255, 0]));

    typeface.draw(&mut layer, text, font_size, origin, color);
    composite_over(&mut canvas, &layer);

    DynamicImage::ImageRgba8(canvas).into_rgb8()
}

/// Porter-Duff "over": `layer` on top of `canvas`, same dimensions.
fn composite_over(canvas: &mut RgbaImage, layer: &RgbaImage) {
    for (dst, src) in canvas.pixels_mut().zip(layer.pixels()) {
        let sa = src.0[3] as f32 / 255.0;
        if sa == 0.0 {
            continue;
        }
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);

        let mut out = [0u8; 4];
        for c in 0..3 {
            let v = (src.0[c] as f32 * sa + dst.0[c] as f32 * da * (1.0 - sa)) / out_a;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round() as u8;
        *dst = Rgba(out);
    }
}

/// Measure, place and render `text` on an already upright photo.
pub fn stamp(photo: Photo, text: &str, style: &WatermarkStyle) -> RgbImage {
    let block = style.typeface.measure(text, style.font_size);
    let origin = compute_origin(photo.dimensions(), block.size(), style.anchor, style.margin);
    tracing::debug!(
        "text {}x{} at ({}, {}) anchored {}",
        block.width,
        block.height,
        origin.0,
        origin.1,
        style.anchor
    );
    render(photo.image, text, &style.typeface, style.font_size, style.color, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orientation::Orientation;
    use image::Rgb;

    fn gray(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([100, 100, 100])))
    }

    #[test]
    fn test_opaque_text_replaces_pixels() {
        let out = render(gray(120, 60), "7", &Typeface::Builtin, 16, Rgba([255, 255, 255, 255]), (10, 10));
        assert_eq!(out.dimensions(), (120, 60));
        assert!(out.pixels().any(|p| p.0 == [255, 255, 255]));
        assert_eq!(out.get_pixel(0, 0).0, [100, 100, 100]);
    }

    #[test]
    fn test_translucent_text_blends() {
        let out = render(gray(120, 60), "0000", &Typeface::Builtin, 16, Rgba([255, 255, 255, 128]), (0, 0));
        let blended = out.pixels().find(|p| p.0 != [100, 100, 100]).unwrap();
        assert!(blended.0[0] > 150 && blended.0[0] < 200);
        assert!(!out.pixels().any(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn test_fully_transparent_color_leaves_base() {
        let base = gray(50, 30);
        let expected = base.to_rgb8();
        let out = render(base, "2023-07-04", &Typeface::Builtin, 8, Rgba([255, 0, 0, 0]), (2, 2));
        assert_eq!(out, expected);
    }

    #[test]
    fn test_stamp_bottom_right() {
        let style = WatermarkStyle::new(Typeface::Builtin, 8, Rgba([255, 0, 0, 255]), Anchor::BottomRight);
        let photo = Photo::new(gray(200, 100), Orientation::Normal);
        let out = stamp(photo, "2023-07-04", &style);

        // 10 glyphs of 8px ending 20px from the right and bottom edges
        let inked: Vec<(u32, u32)> = out
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 == [255, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!inked.is_empty());
        assert!(inked.iter().all(|&(x, y)| (100..180).contains(&x) && (72..80).contains(&y)));
    }

    fn inked(out: &RgbImage) -> (u32, u32, u32, u32) {
        out.enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [100, 100, 100])
            .fold((u32::MAX, u32::MAX, 0, 0), |(x0, y0, x1, y1), (x, y, _)| {
                (x0.min(x), y0.min(y), x1.max(x), y1.max(y))
            })
    }

    #[test]
    fn test_outline_font_sits_on_margin() {
        let font = rusttype::Font::try_from_vec(include_bytes!("../tests/fixtures/DejaVuSans.ttf").to_vec()).unwrap();
        let (w, h) = (400u32, 160u32);

        let style = WatermarkStyle::new(Typeface::Outline(font), 36, Rgba([255, 255, 0, 255]), Anchor::BottomRight);
        let out = stamp(Photo::new(gray(w, h), Orientation::Normal), "2023-07-04", &style);
        let (_, _, x1, y1) = inked(&out);
        assert_eq!(w - 1 - x1, MARGIN as u32);
        assert_eq!(h - 1 - y1, MARGIN as u32);

        let style = WatermarkStyle { anchor: Anchor::TopLeft, ..style };
        let out = stamp(Photo::new(gray(w, h), Orientation::Normal), "2023-07-04", &style);
        let (x0, y0, _, _) = inked(&out);
        assert_eq!((x0, y0), (MARGIN as u32, MARGIN as u32));
    }
}
