//! Frame sequence construction and indexing
//!
//! **Why**: Scrub sources come in several shapes: explicit path lists
//! (externally hosted frames), numbered filename patterns
//! (`frames#####.png`, `frames%05d.png`), globs over existing renders,
//! or a plain directory of stills. All collapse to one ordered,
//! fixed-length path list.
//!
//! **Used by**: Scrubber (slot construction), CLI (input resolution)
//!
//! # Frame Numbering
//!
//! Patterns expand as `start + i * step`, zero-padded to the pattern's
//! declared width (`#` run length or `%0Nd`). Stepped numbering matters:
//! rendered sequences are commonly decimated (every 3rd frame) without
//! renumbering the files.

use log::info;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::frame::FrameError;
use crate::utils::media;

/// Ordered, fixed-length list of frame source paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    paths: Vec<PathBuf>,
}

impl FrameSequence {
    /// Create sequence from an explicit ordered path list
    ///
    /// Identifier format is opaque: paths are handed to the loader as-is.
    pub fn from_paths(paths: Vec<PathBuf>) -> Result<Self, FrameError> {
        if paths.is_empty() {
            return Err(FrameError::EmptySequence);
        }
        Ok(Self { paths })
    }

    /// Create sequence by expanding a numbered filename pattern
    ///
    /// Pattern carries the padding: `frames#####.png` (run of `#`) or
    /// `frames%05d.png` (printf-style). Frame number for slot `i` is
    /// `start + i * step`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use scrubba::sequence::FrameSequence;
    /// let seq = FrameSequence::from_pattern("cyl/frames#####.png", 7, 3, 67)?;
    /// assert_eq!(seq.len(), 67);
    /// assert_eq!(seq.get(0).unwrap().to_str().unwrap(), "cyl/frames00007.png");
    /// assert_eq!(seq.get(1).unwrap().to_str().unwrap(), "cyl/frames00010.png");
    /// # Ok::<(), scrubba::frame::FrameError>(())
    /// ```
    pub fn from_pattern(
        pattern: &str,
        start: usize,
        step: usize,
        count: usize,
    ) -> Result<Self, FrameError> {
        if count == 0 {
            return Err(FrameError::EmptySequence);
        }
        if step == 0 {
            return Err(FrameError::Pattern("Frame step must be non-zero".into()));
        }

        let paths: Vec<PathBuf> = (0..count)
            .map(|i| Self::format_path(pattern, start + i * step))
            .collect::<Result<_, _>>()?;

        info!(
            "Sequence from pattern {}: {} frames ({}..{} step {})",
            pattern,
            count,
            start,
            start + (count - 1) * step,
            step
        );

        Ok(Self { paths })
    }

    /// Format one frame path from a pattern and frame number
    /// `frames#####.png` or `frames%05d.png` → `frames00042.png`
    fn format_path(pattern: &str, frame_num: usize) -> Result<PathBuf, FrameError> {
        let printf_re = Regex::new(r"%0(\d+)d").expect("static regex");
        if let Some(caps) = printf_re.captures(pattern) {
            let padding: usize = caps[1].parse().unwrap_or(4);
            let padded = format!("{:0width$}", frame_num, width = padding);
            let formatted = printf_re.replace(pattern, padded.as_str()).to_string();
            return Ok(PathBuf::from(formatted));
        }

        let hash_re = Regex::new(r"#+").expect("static regex");
        if let Some(m) = hash_re.find(pattern) {
            let padding = m.len();
            let mut formatted = String::with_capacity(pattern.len());
            formatted.push_str(&pattern[..m.start()]);
            formatted.push_str(&format!("{:0width$}", frame_num, width = padding));
            formatted.push_str(&pattern[m.end()..]);
            return Ok(PathBuf::from(formatted));
        }

        Err(FrameError::Pattern(format!(
            "Pattern has no frame placeholder (# run or %0Nd): {}",
            pattern
        )))
    }

    /// Create sequence from existing files matching a glob
    ///
    /// Files are ordered by the last digit group in their stem (frame
    /// number), not lexically, so `frame9` sorts before `frame10`.
    pub fn from_glob(pattern: &str) -> Result<Self, FrameError> {
        let entries = glob::glob(pattern)
            .map_err(|e| FrameError::Pattern(format!("Glob error: {}", e)))?;

        let files: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        if files.is_empty() {
            return Err(FrameError::Pattern(format!(
                "No files match pattern: {}",
                pattern
            )));
        }

        let re = Regex::new(r"(\d+)").expect("static regex");
        let mut numbered: Vec<(usize, PathBuf)> = Vec::with_capacity(files.len());

        for path in files {
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");

            // Use last number in filename as frame number
            if let Some(last_match) = re.find_iter(stem).last()
                && let Ok(num) = last_match.as_str().parse::<usize>()
            {
                numbered.push((num, path));
            }
        }

        if numbered.is_empty() {
            return Err(FrameError::Pattern("No frame numbers found".into()));
        }

        numbered.sort_by_key(|(num, _)| *num);

        info!("Sequence from glob {}: {} frames", pattern, numbered.len());

        Ok(Self {
            paths: numbered.into_iter().map(|(_, p)| p).collect(),
        })
    }

    /// Create sequence from all supported images in a directory
    ///
    /// Files sort by name; numbering conventions with zero padding keep
    /// that order frame-accurate.
    pub fn scan_dir(dir: &Path) -> Result<Self, FrameError> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| FrameError::Pattern(format!("Failed to read dir: {}", e)))?;

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file() && media::is_image(p))
            .collect();

        if paths.is_empty() {
            return Err(FrameError::EmptySequence);
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        info!("Sequence from dir {}: {} frames", dir.display(), paths.len());

        Ok(Self { paths })
    }

    /// Get frame count
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when the sequence has no frames (unreachable via constructors)
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Get path for one frame index
    pub fn get(&self, index: usize) -> Option<&PathBuf> {
        self.paths.get(index)
    }

    /// Get all paths in frame order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Hash-run pattern expansion
    /// Validates: Stepped numbering with pattern-declared padding
    #[test]
    fn test_pattern_hash_padding() {
        let seq = FrameSequence::from_pattern("seq/frames#####.png", 7, 3, 3).unwrap();

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap(), &PathBuf::from("seq/frames00007.png"));
        assert_eq!(seq.get(1).unwrap(), &PathBuf::from("seq/frames00010.png"));
        assert_eq!(seq.get(2).unwrap(), &PathBuf::from("seq/frames00013.png"));
    }

    /// Test: printf-style pattern expansion
    /// Validates: %0Nd padding and unit step
    #[test]
    fn test_pattern_printf_padding() {
        let seq = FrameSequence::from_pattern("lore/%03d.webp", 1, 1, 4).unwrap();

        assert_eq!(seq.len(), 4);
        assert_eq!(seq.get(0).unwrap(), &PathBuf::from("lore/001.webp"));
        assert_eq!(seq.get(3).unwrap(), &PathBuf::from("lore/004.webp"));
    }

    /// Test: Pattern rejection
    /// Validates: Placeholder-less patterns and zero counts are errors
    #[test]
    fn test_pattern_errors() {
        assert!(FrameSequence::from_pattern("frames.png", 0, 1, 5).is_err());
        assert!(FrameSequence::from_pattern("frames####.png", 0, 1, 0).is_err());
        assert!(FrameSequence::from_pattern("frames####.png", 0, 0, 5).is_err());
    }

    /// Test: Explicit path list
    /// Validates: Order preserved verbatim, empty list rejected
    #[test]
    fn test_from_paths() {
        let paths = vec![
            PathBuf::from("https-mirror/seq/1.webp"),
            PathBuf::from("https-mirror/seq/2.webp"),
        ];
        let seq = FrameSequence::from_paths(paths.clone()).unwrap();
        assert_eq!(seq.paths(), &paths[..]);

        assert!(FrameSequence::from_paths(Vec::new()).is_err());
    }

    /// Test: Directory scan ordering
    /// Validates: Supported files only, sorted by file name
    #[test]
    fn test_scan_dir_sorted() {
        let dir = std::env::temp_dir().join(format!("scrubba-seq-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        for name in ["b002.png", "a001.png", "c003.png"] {
            img.save(dir.join(name)).unwrap();
        }
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let seq = FrameSequence::scan_dir(&dir).unwrap();
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap().file_name().unwrap(), "a001.png");
        assert_eq!(seq.get(2).unwrap().file_name().unwrap(), "c003.png");

        let _ = std::fs::remove_dir_all(&dir);
    }

    /// Test: Glob discovery ordering
    /// Validates: Frames order by trailing number, not lexically
    #[test]
    fn test_from_glob_numeric_order() {
        let dir = std::env::temp_dir().join(format!("scrubba-glob-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let img = image::RgbaImage::from_pixel(1, 1, image::Rgba([0, 0, 0, 255]));
        for name in ["shot.10.png", "shot.9.png", "shot.11.png"] {
            img.save(dir.join(name)).unwrap();
        }

        let pattern = dir.join("shot.*.png");
        let seq = FrameSequence::from_glob(pattern.to_str().unwrap()).unwrap();

        assert_eq!(seq.len(), 3);
        assert_eq!(seq.get(0).unwrap().file_name().unwrap(), "shot.9.png");
        assert_eq!(seq.get(1).unwrap().file_name().unwrap(), "shot.10.png");
        assert_eq!(seq.get(2).unwrap().file_name().unwrap(), "shot.11.png");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
