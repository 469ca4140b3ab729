use exif::Tag;
use image::DynamicImage;

use crate::metadata::Metadata;

/// EXIF orientation flag (tag 0x0112).
///
/// 1 = Normal
/// 2 = Flipped horizontally
/// 3 = Rotated 180°
/// 4 = Flipped vertically
/// 5 = Transposed (flip horizontal + rotate 270° CW)
/// 6 = Rotated 90° CW
/// 7 = Transverse (flip horizontal + rotate 90° CW)
/// 8 = Rotated 270° CW
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
}

impl Orientation {
    pub fn from_exif(value: u32) -> Self {
        match value {
            2 => Orientation::MirrorHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::MirrorVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => Orientation::Normal,
        }
    }

    /// Orientation stored in the metadata; `Normal` when missing or out of range.
    pub fn from_metadata(meta: &Metadata) -> Self {
        meta.field(Tag::Orientation)
            .and_then(|f| f.value.get_uint(0))
            .map(Self::from_exif)
            .unwrap_or_default()
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            Orientation::Normal => img,
            Orientation::MirrorHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::MirrorVertical => img.flipv(),
            Orientation::Transpose => img.rotate270().fliph(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Transverse => img.rotate90().fliph(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

/// Decoded pixels plus the orientation flag that still has to be applied.
pub struct Photo {
    pub image: DynamicImage,
    pub orientation: Orientation,
}

impl Photo {
    pub fn new(image: DynamicImage, orientation: Orientation) -> Self {
        Self { image, orientation }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// Rotate/mirror the pixels so they match the way the photo is meant to be viewed.
/// The result is marked `Normal`, so normalizing again does nothing.
pub fn normalize_orientation(photo: Photo) -> Photo {
    Photo {
        image: photo.orientation.apply(photo.image),
        orientation: Orientation::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::testing;
    use image::{Rgb, RgbImage};

    fn marked() -> DynamicImage {
        // 3x2, red pixel at top-left
        let mut img = RgbImage::from_pixel(3, 2, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    fn red_at(photo: &Photo) -> (u32, u32) {
        let rgb = photo.image.to_rgb8();
        let (x, y, _) = rgb.enumerate_pixels().find(|(_, _, p)| p.0 == [255, 0, 0]).unwrap();
        (x, y)
    }

    #[test]
    fn test_rotate90_swaps_dimensions() {
        let photo = normalize_orientation(Photo::new(marked(), Orientation::Rotate90));
        assert_eq!(photo.dimensions(), (2, 3));
        assert_eq!(red_at(&photo), (1, 0));
        assert_eq!(photo.orientation, Orientation::Normal);
    }

    #[test]
    fn test_mirror_and_rotate180() {
        let photo = normalize_orientation(Photo::new(marked(), Orientation::MirrorHorizontal));
        assert_eq!(red_at(&photo), (2, 0));
        let photo = normalize_orientation(Photo::new(marked(), Orientation::Rotate180));
        assert_eq!(red_at(&photo), (2, 1));
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_orientation(Photo::new(marked(), Orientation::Rotate270));
        let before = once.image.to_rgb8();
        let twice = normalize_orientation(once);
        assert_eq!(twice.image.to_rgb8(), before);
    }

    #[test]
    fn test_from_metadata() {
        let bytes = testing::tagged_jpeg(8, 8, None, Some(6));
        assert_eq!(Orientation::from_metadata(&Metadata::read(&bytes)), Orientation::Rotate90);
        assert_eq!(Orientation::from_metadata(&Metadata::Missing), Orientation::Normal);
        assert_eq!(Orientation::from_exif(42), Orientation::Normal);
    }
}
