pub mod color;
pub mod compose;
pub mod date;
pub mod error;
pub mod font;
pub mod layout;
pub mod media;
pub mod metadata;
pub mod orientation;
pub mod scan;
pub mod writer;

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::compose::WatermarkStyle;
use crate::date::{CaptureDate, DateLookup};
use crate::font::Typeface;
use crate::layout::Anchor;
use crate::media::Media;
use crate::metadata::Metadata;
use crate::orientation::{Orientation, Photo};

pub use crate::error::{Error, Result};

pub const DEFAULT_FONT_SIZE: u32 = 50;
pub const DEFAULT_COLOR: &str = "rgba(255, 255, 255, 180)";
/// Upper bound for `font_size`; keeps glyph rasterization and text metrics bounded.
pub const MAX_FONT_SIZE: u32 = 2000;

fn default_font_size() -> u32 {
    DEFAULT_FONT_SIZE
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_position() -> String {
    Anchor::default().to_string()
}

/// Watermark appearance as written by users (CLI flags or a JSON config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_color")]
    pub color: String,
    /// Anchor name; unknown names fall back to bottom-right.
    #[serde(default = "default_position")]
    pub position: String,
    #[serde(default)]
    pub font: Option<PathBuf>,
    #[serde(default)]
    pub parallel: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            color: default_color(),
            position: default_position(),
            font: None,
            parallel: false,
        }
    }
}

impl StyleConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let config_err = |message: String| Error::Config { path: path.to_path_buf(), message };
        let bytes = std::fs::read(path).map_err(|e| config_err(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| config_err(e.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Directory holding the source photos
    pub source_dir: PathBuf,
    #[serde(default)]
    pub style: StyleConfig,
}

/// Why a file produced no output without being an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoCaptureDate,
    MalformedCaptureDate(String),
    UnreadableMetadata(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoCaptureDate => write!(f, "no capture date"),
            SkipReason::MalformedCaptureDate(raw) => write!(f, "malformed capture date '{}'", raw),
            SkipReason::UnreadableMetadata(e) => write!(f, "unreadable metadata: {}", e),
        }
    }
}

/// What happened to one source file.
#[derive(Debug)]
pub enum Outcome {
    Watermarked { date: CaptureDate, output: PathBuf },
    Skipped(SkipReason),
    Failed(Error),
}

/// Per-file report handed to the caller's callback.
#[derive(Debug)]
pub struct FileReport {
    pub filename: String,
    pub outcome: Outcome,
}

impl fmt::Display for FileReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Watermarked { date, output } => {
                let out_name = output.file_name().and_then(|n| n.to_str()).unwrap_or("?");
                write!(f, "OK: '{}' -> '{}' ({})", self.filename, out_name, date)
            }
            Outcome::Skipped(reason) => write!(f, "Skipped: '{}' ({})", self.filename, reason),
            Outcome::Failed(e) => write!(f, "Error: processing '{}' failed: {}", self.filename, e),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessResult {
    pub output_dir: PathBuf,
    pub total: u64,
    pub written: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Type alias for the per-file report callback
pub type ReportCallback<'a> = dyn Fn(&FileReport) + Send + Sync + 'a;

/// Run the whole pipeline on one file: read, orient, date, stamp, write.
/// The source file is only read.
pub fn watermark_file(src: &Path, dest: &Path, style: &WatermarkStyle) -> Outcome {
    let bytes = match std::fs::read(src) {
        Ok(b) => b,
        Err(source) => return Outcome::Failed(Error::Read { path: src.to_path_buf(), source }),
    };
    let image = match image::load_from_memory(&bytes) {
        Ok(img) => img,
        Err(e) => return Outcome::Failed(Error::Decode(e)),
    };
    let meta = Metadata::read(&bytes);

    let photo = orientation::normalize_orientation(Photo::new(image, Orientation::from_metadata(&meta)));

    let date = match date::lookup_capture_date(&meta) {
        DateLookup::Found(d) => d,
        DateLookup::Absent => return Outcome::Skipped(SkipReason::NoCaptureDate),
        DateLookup::Malformed(raw) => return Outcome::Skipped(SkipReason::MalformedCaptureDate(raw)),
        DateLookup::DecodeFailed(e) => return Outcome::Skipped(SkipReason::UnreadableMetadata(e)),
    };

    let stamped = compose::stamp(photo, &date.to_string(), style);
    if let Err(e) = writer::write_jpeg(&stamped, dest) {
        return Outcome::Failed(e);
    }
    writer::set_capture_mtime(dest, date);

    Outcome::Watermarked { date, output: dest.to_path_buf() }
}

/// Resolve a [`StyleConfig`] into a ready-to-draw style. Font problems are
/// logged and fall back to the built-in font; a bad color or font size is
/// an error.
pub fn resolve_style(config: &StyleConfig) -> Result<WatermarkStyle> {
    if config.font_size == 0 || config.font_size > MAX_FONT_SIZE {
        return Err(Error::InvalidFontSize(config.font_size));
    }
    let color = color::parse_color(&config.color)?;
    let anchor = Anchor::from_name_lossy(&config.position);
    let (typeface, warning) = Typeface::load(config.font.as_deref());
    if let Some(w) = warning {
        tracing::warn!("{}", w);
    }
    Ok(WatermarkStyle::new(typeface, config.font_size, color, anchor))
}

/// Watermark every supported image in `options.source_dir`.
///
/// Only configuration problems (bad source dir, bad color, output dir that
/// cannot be created) return `Err`; per-file problems are reported through
/// `report` in filename order and never stop the batch.
pub fn process(options: &ProcessOptions, report: &ReportCallback<'_>) -> Result<ProcessResult> {
    let source_dir = &options.source_dir;
    if !source_dir.is_dir() {
        return Err(Error::NotADirectory(source_dir.clone()));
    }

    let style = resolve_style(&options.style)?;
    let output_dir = writer::output_dir_for(source_dir)?;
    writer::prepare_output_dir(&output_dir)?;
    tracing::info!("watermarked images go to {}", output_dir.display());

    let media = scan::scan_dir(source_dir)?;
    tracing::debug!("{} candidate image(s) in {}", media.len(), source_dir.display());

    let run_one = |m: &Media| FileReport {
        filename: m.filename.clone(),
        outcome: watermark_file(&m.path, &output_dir.join(&m.filename), &style),
    };

    let mut result = ProcessResult { output_dir: output_dir.clone(), total: media.len() as u64, ..Default::default() };
    let mut tally = |r: &FileReport| {
        match r.outcome {
            Outcome::Watermarked { .. } => result.written += 1,
            Outcome::Skipped(_) => result.skipped += 1,
            Outcome::Failed(_) => result.failed += 1,
        }
        report(r);
    };

    if options.style.parallel {
        let reports: Vec<FileReport> = media.par_iter().map(run_one).collect();
        reports.iter().for_each(&mut tally);
    } else {
        for m in &media {
            tally(&run_one(m));
        }
    }

    Ok(result)
}
