use scrubba::cli::Args;
use scrubba::driver::{PinConfig, ScrollTimeline};
use scrubba::frame::FrameStatus;
use scrubba::loader::Workers;
use scrubba::scrubber::Scrubber;
use scrubba::sequence::FrameSequence;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Resolve CLI input into a frame sequence.
/// Priority: explicit -f files, then pattern/glob/directory positional.
fn build_sequence(args: &Args) -> Result<FrameSequence> {
    if !args.files.is_empty() {
        return FrameSequence::from_paths(args.files.clone()).context("explicit file list");
    }

    let Some(input) = &args.input else {
        bail!("No input: pass a pattern, glob, directory, or -f files (see --help)");
    };

    if input.is_dir() {
        return FrameSequence::scan_dir(input)
            .with_context(|| format!("scanning {}", input.display()));
    }

    let text = input.to_string_lossy();
    if text.contains('#') || text.contains("%0") {
        let Some(count) = args.frames else {
            bail!("Pattern input requires a frame count (-n/--frames)");
        };
        return FrameSequence::from_pattern(&text, args.start, args.step, count)
            .with_context(|| format!("expanding pattern {}", text));
    }

    if text.contains('*') {
        return FrameSequence::from_glob(&text)
            .with_context(|| format!("globbing {}", text));
    }

    // Single file: one-frame sequence
    FrameSequence::from_paths(vec![input.clone()]).context("single file input")
}

/// Write the canvas as a PNG snapshot
fn write_snapshot(scrubber: &Scrubber, dir: &Path, index: usize) -> Result<()> {
    let canvas = scrubber.canvas();
    let img = image::RgbaImage::from_raw(
        canvas.width(),
        canvas.height(),
        canvas.pixels().to_vec(),
    )
    .context("canvas buffer size mismatch")?;

    let path = dir.join(format!("canvas{:05}.png", index));
    img.save(&path)
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("Snapshot: {}", path.display());
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // Initialize logger based on --log flag
    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| "scrubba.log".into());

        let file = std::fs::File::create(&log_path)
            .with_context(|| format!("creating log file {}", log_path.display()))?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!(
            "Logging to file: {} (level: {:?})",
            log_path.display(),
            log_level
        );
    } else {
        // Console logging (respects RUST_LOG if set)
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .format_timestamp_millis()
            .init();
    }

    info!("Scrubba starting...");
    debug!("Command-line args: {:?}", args);

    let sequence = build_sequence(&args)?;
    let frame_count = sequence.len();

    let pin: Option<PinConfig> = args
        .pin
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .context("parsing --pin JSON")?;

    let (width, height) = (args.size[0], args.size[1]);
    let scrubber = Arc::new(Mutex::new(Scrubber::new(sequence, width, height, pin)));

    if let Some(dir) = &args.out_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating snapshot dir {}", dir.display()))?;
    }

    // Worker pool: 75% of CPU cores unless overridden
    let num_workers = args
        .workers
        .unwrap_or_else(|| (num_cpus::get() * 3 / 4).max(1))
        .max(1);
    info!("Using {} worker threads", num_workers);
    let workers = Workers::new(num_workers);

    scrubber.lock().unwrap().load_all(&workers);

    let mut timeline = ScrollTimeline::new(args.distance);
    Scrubber::attach(Arc::clone(&scrubber), &mut timeline);

    if args.scroll_step <= 0.0 {
        bail!("--scroll-step must be positive");
    }

    // Headless sweep: drain decode completions, advance scroll, snapshot
    let mut events_seen = 0;
    let mut snapshot_idx = 0;
    let mut iteration = 0;
    let mut offset = 0.0;

    while offset < args.distance + args.scroll_step {
        let clamped = offset.min(args.distance);
        events_seen += scrubber.lock().unwrap().process_loaded();
        timeline.scroll_to(clamped);

        if let Some(dir) = &args.out_dir
            && iteration % args.snapshot_every.max(1) == 0
        {
            write_snapshot(&scrubber.lock().unwrap(), dir, snapshot_idx)?;
            snapshot_idx += 1;
        }

        offset += args.scroll_step;
        iteration += 1;
    }

    // Let stragglers finish: every decode job posts exactly one event, but
    // give up after a quiet period rather than waiting on a stalled source
    let quiet_limit = std::time::Duration::from_secs(2);
    let mut last_progress = std::time::Instant::now();
    while events_seen < frame_count {
        let drained = scrubber.lock().unwrap().process_loaded();
        if drained > 0 {
            events_seen += drained;
            last_progress = std::time::Instant::now();
        } else if last_progress.elapsed() > quiet_limit {
            warn!(
                "{} decode(s) still outstanding after sweep, giving up on them",
                frame_count - events_seen
            );
            break;
        } else {
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
    }

    // Final render at the end of the scroll range
    {
        let mut s = scrubber.lock().unwrap();
        s.render();
        if let Some(dir) = &args.out_dir {
            write_snapshot(&s, dir, snapshot_idx)?;
        }

        let statuses = s.statuses();
        let loaded = statuses
            .iter()
            .filter(|st| **st == FrameStatus::Loaded)
            .count();
        let errored = statuses
            .iter()
            .filter(|st| **st == FrameStatus::Error)
            .count();
        info!(
            "Sweep done: {} frames, {} loaded, {} errored, final frame {}",
            frame_count,
            loaded,
            errored,
            s.frame()
        );
    }

    info!("Scrubba exiting");
    Ok(())
}
