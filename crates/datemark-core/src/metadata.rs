use std::io::Cursor;

use exif::{Exif, Field, In, Reader, Tag};

/// EXIF block read from an image's raw bytes.
///
/// Images without metadata are common (PNG exports, screenshots, BMP), so a
/// missing block is a normal state rather than an error.
pub enum Metadata {
    Exif(Exif),
    Missing,
    Unreadable(String),
}

impl Metadata {
    /// Parse the EXIF container from encoded image bytes (JPEG, TIFF, PNG, ...).
    pub fn read(bytes: &[u8]) -> Self {
        // BMP has nowhere to put EXIF
        if matches!(image::guess_format(bytes), Ok(image::ImageFormat::Bmp)) {
            return Metadata::Missing;
        }
        match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
            Ok(exif) => Metadata::Exif(exif),
            Err(exif::Error::NotFound(_)) => Metadata::Missing,
            Err(e) => Metadata::Unreadable(e.to_string()),
        }
    }

    /// Look up a tag in the primary image IFD.
    pub fn field(&self, tag: Tag) -> Option<&Field> {
        match self {
            Metadata::Exif(exif) => exif.get_field(tag, In::PRIMARY),
            _ => None,
        }
    }
}
