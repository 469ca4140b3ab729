use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong in a run, fatal or per file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("'{0}' is not a valid directory")]
    NotADirectory(PathBuf),

    #[error("cannot derive an output directory name from '{0}'")]
    NoDirName(PathBuf),

    #[error("font size {0} is out of range (1..={max})", max = crate::MAX_FONT_SIZE)]
    InvalidFontSize(u32),

    #[error("cannot create output directory {path}: {source}")]
    OutputDir { path: PathBuf, source: io::Error },

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("failed to encode JPEG: {0}")]
    Encode(#[source] image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;
