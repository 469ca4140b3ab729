use std::path::{Path, PathBuf};

/// Extensions (lowercase) picked up from the source directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "tif"];

#[derive(Debug, Clone)]
pub struct Media {
    /// Full path of the source file
    pub path: PathBuf,
    /// Just the filename, reused for the output file
    pub filename: String,
}

impl Media {
    pub fn new(path: PathBuf, filename: String) -> Self {
        Self { path, filename }
    }
}

/// Whether a file name has one of the supported image extensions.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("a.jpg")));
        assert!(is_supported(Path::new("B.JPEG")));
        assert!(is_supported(Path::new("scan.Tif")));
        assert!(is_supported(Path::new("x.bmp")));
        assert!(!is_supported(Path::new("clip.mp4")));
        assert!(!is_supported(Path::new("README")));
        assert!(!is_supported(Path::new(".jpg")));
    }
}
