use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::media::{self, Media};

/// List the supported image files directly inside `dir`, sorted by filename.
/// Subdirectories and other files are ignored.
pub fn scan_dir(dir: &Path) -> Result<Vec<Media>> {
    let entries = fs::read_dir(dir).map_err(|source| Error::Read { path: dir.to_path_buf(), source })?;

    let mut media = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() || !media::is_supported(&path) {
            continue;
        }
        let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            tracing::warn!("skipping non UTF-8 filename {}", path.display());
            continue;
        };
        media.push(Media::new(path, filename));
    }

    media.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(media)
}
