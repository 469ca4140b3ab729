use exif::{Tag, Value};

use super::{parse_capture_date, CaptureDate, DateLookup};
use crate::metadata::Metadata;

/// EXIF `DateTimeOriginal` (36867): when the shutter fired.
pub const DATETIME_ORIGINAL_TAG: Tag = Tag::DateTimeOriginal;

/// Find the capture date, keeping track of why it might be missing.
pub fn lookup_capture_date(meta: &Metadata) -> DateLookup {
    if let Metadata::Unreadable(e) = meta {
        return DateLookup::DecodeFailed(e.clone());
    }

    let Some(field) = meta.field(DATETIME_ORIGINAL_TAG) else {
        return DateLookup::Absent;
    };

    match &field.value {
        Value::Ascii(parts) => match parts.first().map(|p| std::str::from_utf8(p)) {
            Some(Ok(s)) => parse_capture_date(s),
            Some(Err(_)) => DateLookup::Malformed("non-UTF-8 value".to_string()),
            None => DateLookup::Absent,
        },
        other => DateLookup::Malformed(format!("{:?}", other)),
    }
}

/// Capture date or nothing; every failure counts as "no date".
pub fn extract_capture_date(meta: &Metadata) -> Option<CaptureDate> {
    lookup_capture_date(meta).date()
}
