//! Utility helpers shared across modules
//!
//! **Used by**: sequence (directory scans), cli (input validation)

/// Image file type detection
pub mod media {
    use std::path::Path;

    /// Supported image file extensions
    pub const IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "webp", "tif", "tiff", "bmp"];

    /// Check if file is a supported image format
    pub fn is_image(path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|s| IMAGE_EXTS.contains(&s.to_lowercase().as_str()))
            .unwrap_or(false)
    }
}
