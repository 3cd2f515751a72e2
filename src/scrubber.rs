//! Frame Scrubber: progress-to-frame mapping over a loading sequence
//!
//! **Why**: Scroll-linked sequence playback needs loading and rendering
//! decoupled. Decodes arrive in any order on worker threads; every render
//! reads whatever is loaded right now and paints the best available frame.
//!
//! **Used by**: demo binary, host integrations via `attach`
//!
//! # Best-Available Policy
//!
//! If progress reaches a frame whose decode hasn't finished, the canvas
//! keeps showing the last successfully painted frame instead of blanking.
//! No placeholder, no deadline fallback: a slot that never loads simply
//! never paints.

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};

use crate::canvas::Canvas;
use crate::driver::{PinConfig, ScrollDriver};
use crate::frame::{Frame, FrameStatus};
use crate::loader::Workers;
use crate::sequence::FrameSequence;

/// Decode completion posted by a worker
#[derive(Debug)]
pub struct LoadEvent {
    pub index: usize,
    pub result: Result<(), String>,
}

/// Scroll-driven image sequence scrubber
pub struct Scrubber {
    sequence: FrameSequence,
    slots: Vec<Frame>,
    canvas: Canvas,
    frame_idx: usize,
    first_rendered: bool, // one-shot latch: first decode triggers one render
    pin: Option<PinConfig>,
    event_tx: Sender<LoadEvent>,
    event_rx: Receiver<LoadEvent>,
}

impl Scrubber {
    /// Create scrubber over a sequence with a viewport-sized canvas
    ///
    /// One Pending slot is created per sequence entry up front; slots only
    /// ever move forward to Loaded or Error.
    pub fn new(
        sequence: FrameSequence,
        width: u32,
        height: u32,
        pin: Option<PinConfig>,
    ) -> Self {
        let slots = sequence
            .paths()
            .iter()
            .map(|p| Frame::new(p.clone()))
            .collect();

        let (event_tx, event_rx) = unbounded();

        info!(
            "Scrubber: {} frames, canvas {}x{}",
            sequence.len(),
            width,
            height
        );

        Self {
            sequence,
            slots,
            canvas: Canvas::new(width, height),
            frame_idx: 0,
            first_rendered: false,
            pin,
            event_tx,
            event_rx,
        }
    }

    /// Enqueue a decode job for every slot at once
    ///
    /// All requests are issued eagerly; only the pool width bounds how many
    /// decode in parallel. Completion order is unconstrained and reported
    /// through the scrubber's event channel.
    pub fn load_all(&self, workers: &Workers) {
        for (index, slot) in self.slots.iter().enumerate() {
            let slot = slot.clone();
            let tx = self.event_tx.clone();
            workers.execute(move || {
                let result = slot.load().map_err(|e| e.to_string());
                if result.is_ok() {
                    debug!("Frame {} decoded: {}", index, slot.path().display());
                }
                let _ = tx.send(LoadEvent { index, result });
            });
        }
        info!("Enqueued {} decode jobs", self.slots.len());
    }

    /// Drain decode completions from the workers
    ///
    /// The very first success across all slots - in completion order, not
    /// index order - triggers exactly one render so something appears
    /// before any scroll happens. Failures log a warning and leave prior
    /// canvas contents untouched. Returns the number of events drained.
    pub fn process_loaded(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            drained += 1;
            match event.result {
                Ok(()) => {
                    if !self.first_rendered {
                        self.first_rendered = true;
                        self.render();
                    }
                }
                Err(msg) => {
                    warn!(
                        "Failed to load frame {} ({}): {}",
                        event.index,
                        self.sequence
                            .get(event.index)
                            .map(|p| p.display().to_string())
                            .unwrap_or_default(),
                        msg
                    );
                }
            }
        }
        drained
    }

    /// Store the driver-supplied frame index as current progress
    ///
    /// The driver's binding range is clamped to `[0, len - 1]` by
    /// construction; no further clamping happens here.
    pub fn set_frame(&mut self, index: usize) {
        self.frame_idx = index;
    }

    /// Paint the current frame, if its slot is loaded
    ///
    /// Not loaded (or index out of range) → strict no-op: no clear, no
    /// draw, prior pixels stay. Otherwise clear and draw cover-fit.
    /// Idempotent for a fixed (index, loaded-set, canvas size).
    pub fn render(&mut self) {
        let Some(slot) = self.slots.get(self.frame_idx) else {
            return;
        };

        let canvas = &mut self.canvas;
        slot.with_loaded(|w, h, rgba| {
            canvas.clear();
            canvas.draw_cover(w, h, rgba);
        });
    }

    /// Track a viewport resize
    ///
    /// Dimensions refresh immediately; nothing is redrawn until the next
    /// progress update triggers a render at the new size.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("Canvas resize: {}x{}", width, height);
        self.canvas.resize(width, height);
    }

    /// Wire a scrubber into a scroll driver
    ///
    /// Registers the frame-index binding (each update stores the index and
    /// renders) and the pin config, if any. The scrubber keeps no reference
    /// to the driver; the driver owns the callback.
    pub fn attach<D: ScrollDriver>(scrubber: Arc<Mutex<Self>>, driver: &mut D) {
        let (frames, pin) = {
            let s = scrubber.lock().unwrap();
            (s.len(), s.pin.clone())
        };

        driver.bind_progress(
            frames,
            Box::new(move |index| {
                let mut s = scrubber.lock().unwrap();
                s.set_frame(index);
                s.render();
            }),
        );

        if let Some(pin) = pin {
            driver.pin(pin);
        }
    }

    /// Current frame index
    pub fn frame(&self) -> usize {
        self.frame_idx
    }

    /// Frame count
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True when the sequence has no frames
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Canvas read access (snapshots, assertions)
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Slot handle by index
    pub fn slot(&self, index: usize) -> Option<&Frame> {
        self.slots.get(index)
    }

    /// Status for every slot in index order
    pub fn statuses(&self) -> Vec<FrameStatus> {
        self.slots.iter().map(Frame::status).collect()
    }

    /// Count of slots already decoded
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.status() == FrameStatus::Loaded)
            .count()
    }

    /// Count of slots still pending or mid-decode
    pub fn pending_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.status(), FrameStatus::Pending | FrameStatus::Loading))
            .count()
    }

    /// Pin configuration
    pub fn pin(&self) -> Option<&PinConfig> {
        self.pin.as_ref()
    }
}
