pub mod exif;

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use self::exif::{extract_capture_date, lookup_capture_date, DATETIME_ORIGINAL_TAG};

/// Calendar date a photo was taken. Time of day is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CaptureDate(NaiveDate);

impl CaptureDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CaptureDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Outcome of looking for a capture date in image metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateLookup {
    Found(CaptureDate),
    /// No metadata block, or the block has no original date/time tag.
    Absent,
    /// The tag exists but does not hold a `YYYY:MM:DD` date.
    Malformed(String),
    /// The metadata block could not be parsed.
    DecodeFailed(String),
}

impl DateLookup {
    pub fn date(&self) -> Option<CaptureDate> {
        match self {
            DateLookup::Found(d) => Some(*d),
            _ => None,
        }
    }
}

/// Parse an EXIF date/time string (`YYYY:MM:DD HH:MM:SS`, or just the date).
pub fn parse_capture_date(raw: &str) -> DateLookup {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    let date_part = trimmed.split(' ').next().unwrap_or("");
    let normalized = date_part.replace(':', "-");

    match NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
        Ok(d) if date_part.len() == 10 => DateLookup::Found(CaptureDate(d)),
        _ => DateLookup::Malformed(trimmed.to_string()),
    }
}
