use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use crate::date::CaptureDate;
use crate::error::{Error, Result};

/// Output is always JPEG at this quality.
pub const JPEG_QUALITY: u8 = 95;

/// Suffix appended to the source directory name for the output directory.
pub const OUTPUT_SUFFIX: &str = "_watermark";

/// `<parent>/<name>_watermark` next to the source directory.
pub fn output_dir_for(source_dir: &Path) -> Result<PathBuf> {
    let resolved = fs::canonicalize(source_dir)
        .map_err(|source| Error::Read { path: source_dir.to_path_buf(), source })?;
    let name = resolved
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::NoDirName(resolved.clone()))?;
    let parent = resolved.parent().unwrap_or_else(|| Path::new("."));
    Ok(parent.join(format!("{}{}", name, OUTPUT_SUFFIX)))
}

/// Create the output directory; an existing one is fine.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputDir { path: dir.to_path_buf(), source })
}

/// Encode `img` as JPEG at [`JPEG_QUALITY`] into `dest`. Nothing is created
/// at `dest` unless encoding succeeds.
pub fn write_jpeg(img: &RgbImage, dest: &Path) -> Result<()> {
    let mut encoded = Vec::new();
    JpegEncoder::new_with_quality(&mut encoded, JPEG_QUALITY)
        .encode_image(img)
        .map_err(Error::Encode)?;
    fs::write(dest, &encoded).map_err(|source| Error::Write { path: dest.to_path_buf(), source })
}

/// Set the file's mtime to local midnight of the capture date. Best effort.
pub fn set_capture_mtime(dest: &Path, date: CaptureDate) {
    let Some(midnight) = date.date().and_hms_opt(0, 0, 0) else {
        return;
    };
    if let Some(local) = midnight.and_local_timezone(chrono::Local).single() {
        let ft = filetime::FileTime::from_unix_time(local.timestamp(), 0);
        filetime::set_file_mtime(dest, ft).ok();
    }
}
