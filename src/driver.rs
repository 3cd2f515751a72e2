//! Scroll progress drivers
//!
//! **Why**: The scrubber must not depend on any particular scroll or
//! animation library. Its whole contract with the host is a capability
//! trait: bind a frame-index property over a range and get a callback after
//! each change, plus pin registration. Hosts adapt their scroll machinery
//! behind `ScrollDriver`; `ScrollTimeline` is the bundled implementation
//! used by the demo binary and tests.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Callback invoked after each frame-index property change
pub type ProgressCallback = Box<dyn FnMut(usize) + Send>;

/// Pin declaration: freeze a section's scroll position for a distance
///
/// `trigger` identifies the pinned section to the driver; the scrubber
/// treats it as opaque. `distance` is in the driver's scroll units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinConfig {
    pub trigger: String,
    pub distance: f64,
}

/// Capability interface supplied by the host's scroll/animation layer
pub trait ScrollDriver {
    /// Bind a frame-index tween over `[0, frames - 1]`.
    ///
    /// The driver owns the mapping from its progress source to the index;
    /// it must deliver ordered updates clamped to the range and invoke
    /// `on_update` after each change.
    fn bind_progress(&mut self, frames: usize, on_update: ProgressCallback);

    /// Register a pinned section.
    fn pin(&mut self, pin: PinConfig);
}

struct Binding {
    frames: usize,
    on_update: ProgressCallback,
}

/// Snap normalized progress to the nearest index in [0, frames - 1]
fn snap(progress: f64, frames: usize) -> usize {
    if frames < 2 {
        return 0;
    }
    let target = progress * (frames - 1) as f64;
    (target.round() as usize).min(frames - 1)
}

/// Linear scroll-offset timeline
///
/// Maps an absolute scroll offset in `[0, distance]` to a snapped frame
/// index over each binding's range. Bidirectional: `scroll_to` accepts any
/// offset and clamps. Pinned sections freeze the reported content offset
/// across their distance while bound properties keep advancing.
pub struct ScrollTimeline {
    distance: f64,
    offset: f64,
    bindings: Vec<Binding>,
    pins: Vec<PinConfig>,
    triggers: HashMap<String, f64>, // trigger name -> pin start offset
}

impl ScrollTimeline {
    /// Create timeline over a total scroll distance
    pub fn new(distance: f64) -> Self {
        Self {
            distance: distance.max(f64::MIN_POSITIVE),
            offset: 0.0,
            bindings: Vec::new(),
            pins: Vec::new(),
            triggers: HashMap::new(),
        }
    }

    /// Declare where a pin trigger starts on this timeline
    pub fn register_trigger(&mut self, name: impl Into<String>, start_offset: f64) {
        self.triggers.insert(name.into(), start_offset);
    }

    /// Current raw scroll offset
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self) -> f64 {
        (self.offset / self.distance).clamp(0.0, 1.0)
    }

    /// Visual content offset after pin freezes
    ///
    /// While the raw offset traverses a pinned range the content holds
    /// still, so each pin subtracts the portion of its distance already
    /// traversed.
    pub fn content_offset(&self) -> f64 {
        let mut offset = self.offset;
        for pin in &self.pins {
            if let Some(&start) = self.triggers.get(&pin.trigger) {
                let traversed = (self.offset - start).clamp(0.0, pin.distance);
                offset -= traversed;
            }
        }
        offset
    }

    /// Move to an absolute offset and fire every binding's callback
    ///
    /// Offsets clamp to `[0, distance]`; movement in either direction is
    /// valid. Callbacks fire in binding order after the property updates.
    pub fn scroll_to(&mut self, offset: f64) {
        self.offset = offset.clamp(0.0, self.distance);

        let progress = self.progress();
        for binding in &mut self.bindings {
            (binding.on_update)(snap(progress, binding.frames));
        }
    }

    /// Move by a relative delta (negative scrolls backward)
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.offset + delta);
    }

    /// Current snapped frame for a binding of `frames` frames
    pub fn current_frame(&self, frames: usize) -> usize {
        snap(self.progress(), frames)
    }

    /// Registered pins
    pub fn pins(&self) -> &[PinConfig] {
        &self.pins
    }
}

impl ScrollDriver for ScrollTimeline {
    fn bind_progress(&mut self, frames: usize, on_update: ProgressCallback) {
        debug!("Timeline binding: {} frames over {}", frames, self.distance);
        self.bindings.push(Binding { frames, on_update });
    }

    fn pin(&mut self, pin: PinConfig) {
        debug!("Timeline pin: {} for {}", pin.trigger, pin.distance);
        // Unregistered triggers pin from the timeline origin
        self.triggers.entry(pin.trigger.clone()).or_insert(0.0);
        self.pins.push(pin);
    }
}
