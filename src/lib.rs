//! SCRUBBA - Scroll-driven image sequence scrubber library
//!
//! Re-exports all modules for use by binary targets.

// Core engine (sequence, slots, loading, compositing)
pub mod canvas;
pub mod driver;
pub mod frame;
pub mod loader;
pub mod scrubber;
pub mod sequence;

// App modules
pub mod cli;
pub mod utils;

// Re-export commonly used types
pub use canvas::{Canvas, CoverFit, cover_fit};
pub use driver::{PinConfig, ProgressCallback, ScrollDriver, ScrollTimeline};
pub use frame::{Frame, FrameError, FrameStatus};
pub use loader::Workers;
pub use scrubber::{LoadEvent, Scrubber};
pub use sequence::FrameSequence;
