//! Frame slot loading with RGBA8 pixel buffers
//!
//! **Why**: Scrubbing needs every frame addressable before its pixels exist.
//! Each slot carries its own load state so rendering can ask "ready or not?"
//! without blocking on decode.
//!
//! **Used by**: Loader workers (background decode), Scrubber (render reads)
//!
//! # Atomic Claiming
//!
//! `try_claim_for_loading()`: atomic Pending → Loading transition.
//! Prevents two workers from decoding the same slot (TOCTOU race).
//!
//! # State Machine
//!
//! `Pending → Loading → Loaded | Error`. Loaded and Error are terminal:
//! a failed slot is never retried and never transitions back to Pending.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Frame loading status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Pending, // Path set, decode not started
    Loading, // Claimed by a worker, decode in progress
    Loaded,  // RGBA8 pixels available
    Error,   // Decode failed, terminal
}

/// Internal frame data protected by mutex
#[derive(Debug)]
struct FrameData {
    pixels: Vec<u8>, // RGBA8, empty until loaded
    width: u32,
    height: u32,
    status: FrameStatus,
}

/// Single frame of a sequence with its file source
#[derive(Debug, Clone)]
pub struct Frame {
    data: Arc<Mutex<FrameData>>, // All mutable data in one mutex
    path: PathBuf,               // Immutable after creation
}

/// Frame and sequence errors
#[derive(Debug)]
pub enum FrameError {
    Decode(String),
    Pattern(String),
    EmptySequence,
}

impl std::fmt::Display for FrameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameError::Decode(e) => write!(f, "Decode error: {}", e),
            FrameError::Pattern(e) => write!(f, "Pattern error: {}", e),
            FrameError::EmptySequence => write!(f, "Sequence has no frames"),
        }
    }
}

impl std::error::Error for FrameError {}

impl Frame {
    /// Create pending frame for a source path
    pub fn new(path: PathBuf) -> Self {
        let data = FrameData {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            status: FrameStatus::Pending,
        };

        Self {
            data: Arc::new(Mutex::new(data)),
            path,
        }
    }

    /// Get source path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically claim frame for loading (Pending → Loading)
    ///
    /// **Why**: Only one worker may decode a slot; check-and-set under a
    /// single lock makes the transition race-free.
    ///
    /// # Returns
    ///
    /// - `true`: Successfully claimed, caller MUST decode the frame
    /// - `false`: Already loading, loaded, or errored - caller MUST skip
    fn try_claim_for_loading(&self) -> bool {
        let mut data = self.data.lock().unwrap();
        if data.status == FrameStatus::Pending {
            data.status = FrameStatus::Loading;
            true
        } else {
            false
        }
    }

    /// Decode frame from its source into the RGBA8 buffer
    ///
    /// **Used by**: Loader workers (background threads)
    ///
    /// On success the slot becomes `Loaded`; on failure it parks in the
    /// terminal `Error` state. A second call on a settled slot is a no-op
    /// that reports the settled outcome.
    pub fn load(&self) -> Result<(), FrameError> {
        if !self.try_claim_for_loading() {
            return match self.status() {
                FrameStatus::Error => Err(FrameError::Decode("Previously failed".into())),
                _ => Ok(()), // Loaded, or another worker mid-decode
            };
        }

        debug!("Loading frame: {}", self.path.display());

        let result = image::open(&self.path)
            .map(|img| img.to_rgba8())
            .map_err(|e| FrameError::Decode(e.to_string()));

        match result {
            Ok(rgba) => {
                let (width, height) = rgba.dimensions();
                let mut data = self.data.lock().unwrap();
                data.pixels = rgba.into_raw();
                data.width = width;
                data.height = height;
                data.status = FrameStatus::Loaded;
                debug!("Loaded frame: {}x{}", width, height);
                Ok(())
            }
            Err(e) => {
                self.data.lock().unwrap().status = FrameStatus::Error;
                Err(e)
            }
        }
    }

    /// Get status
    pub fn status(&self) -> FrameStatus {
        self.data.lock().unwrap().status
    }

    /// Run `f` over the decoded pixels, or return `None` if not loaded
    ///
    /// **Why**: Render reads pixels on every progress update; borrowing
    /// under the lock avoids cloning whole frames on the hot path.
    pub fn with_loaded<R>(&self, f: impl FnOnce(u32, u32, &[u8]) -> R) -> Option<R> {
        let data = self.data.lock().unwrap();
        if data.status == FrameStatus::Loaded {
            Some(f(data.width, data.height, &data.pixels))
        } else {
            None
        }
    }

    /// Get resolution as tuple (0x0 until loaded)
    pub fn resolution(&self) -> (u32, u32) {
        let data = self.data.lock().unwrap();
        (data.width, data.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: Frame creation
    /// Validates: Initial state is Pending with no pixels
    #[test]
    fn test_frame_creation() {
        let frame = Frame::new(PathBuf::from("seq/frames00007.png"));

        assert_eq!(frame.status(), FrameStatus::Pending);
        assert_eq!(frame.resolution(), (0, 0));
        assert_eq!(frame.path(), Path::new("seq/frames00007.png"));
    }

    /// Test: Load missing file returns error
    /// Validates: Failed decode parks the slot in terminal Error state
    #[test]
    fn test_load_missing_file() {
        let frame = Frame::new(PathBuf::from("/nonexistent/path/frames00001.png"));

        let result = frame.load();
        assert!(result.is_err());
        assert_eq!(frame.status(), FrameStatus::Error);

        // Terminal: a second load never re-claims the slot
        assert!(frame.load().is_err());
        assert_eq!(frame.status(), FrameStatus::Error);
    }

    /// Test: Pixel access gating
    /// Validates: with_loaded() yields nothing unless the slot is Loaded
    #[test]
    fn test_with_loaded_gating() {
        let frame = Frame::new(PathBuf::from("/nonexistent/frames00002.png"));
        assert!(frame.with_loaded(|_, _, _| ()).is_none());

        let _ = frame.load();
        assert!(frame.with_loaded(|_, _, _| ()).is_none());
    }

    /// Test: Concurrent load attempts don't panic
    /// Validates: Atomic claiming lets many threads race on one slot safely
    #[test]
    fn test_concurrent_load_attempts() {
        use std::thread;

        let frame = Frame::new(PathBuf::from("missing.png"));

        let mut handles = vec![];
        for _ in 0..5 {
            let frame_clone = frame.clone();
            handles.push(thread::spawn(move || {
                let _ = frame_clone.load();
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        // File doesn't exist: whichever thread won the claim errored the slot
        assert_eq!(frame.status(), FrameStatus::Error);
    }

    /// Test: Successful decode of a real file
    /// Validates: Pending → Loaded with correct resolution and pixel count
    #[test]
    fn test_load_real_image() {
        let path = std::env::temp_dir().join(format!("scrubba-frame-{}.png", std::process::id()));
        let img = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let frame = Frame::new(path.clone());
        frame.load().unwrap();

        assert_eq!(frame.status(), FrameStatus::Loaded);
        assert_eq!(frame.resolution(), (4, 3));
        let len = frame.with_loaded(|w, h, px| {
            assert_eq!((w, h), (4, 3));
            px.len()
        });
        assert_eq!(len, Some(4 * 3 * 4));

        let _ = std::fs::remove_file(&path);
    }
}
