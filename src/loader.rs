//! Background worker pool for frame decoding
//!
//! Crossbeam MPMC queue of boxed closures drained by named threads. Jobs
//! carry their own state (a cloned `Frame` handle plus a result sender), so
//! the pool stays generic. No cancellation and no timeout: a stalled decode
//! leaves its slot Pending indefinitely and the scrubber tolerates that.

use crossbeam_channel::{Sender, unbounded};
use log::{debug, error};
use std::thread;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Worker pool for background frame decoding.
///
/// # Example
/// ```rust
/// # use scrubba::loader::Workers;
/// let workers = Workers::new(2);
/// workers.execute(|| {
///     // decode on a worker thread
/// });
/// ```
pub struct Workers {
    sender: Sender<Job>,
    _handles: Vec<thread::JoinHandle<()>>, // Keep handles to prevent premature drop
}

impl Workers {
    /// Create worker pool with `num_threads` threads.
    ///
    /// Recommended: `num_cpus::get() * 3 / 4` (leave room for the driving
    /// thread), minimum 1.
    pub fn new(num_threads: usize) -> Self {
        let (tx, rx): (Sender<Job>, _) = unbounded();
        let mut handles = Vec::new();

        for worker_id in 0..num_threads.max(1) {
            let rx = rx.clone();

            let handle = thread::Builder::new()
                .name(format!("scrubba-worker-{}", worker_id))
                .spawn(move || {
                    debug!("Worker {} started", worker_id);

                    // Worker loop: execute closures until channel closes
                    while let Ok(job) = rx.recv() {
                        job();
                    }

                    debug!("Worker {} stopped", worker_id);
                })
                .expect("Failed to spawn worker thread");

            handles.push(handle);
        }

        debug!("Workers initialized: {} threads", num_threads.max(1));

        Self {
            sender: tx,
            _handles: handles,
        }
    }

    /// Execute closure on a worker thread.
    ///
    /// Closure runs asynchronously, no return value; results travel over
    /// whatever channel the closure captured.
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.sender.send(Box::new(f)) {
            error!("Failed to enqueue job: {}", e);
        }
    }
}

// Drop: sender closes, workers drain the queue and exit their recv() loop
impl Drop for Workers {
    fn drop(&mut self) {
        debug!("Workers shutting down ({} threads)...", self._handles.len());
    }
}
