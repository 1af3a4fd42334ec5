use anyhow::Context;
use clap::Parser;
use colored::*;
use indicatif::ProgressBar;
use netbounce::capture::{CaptureSource, JsonlCaptureSource};
use netbounce::panel::{
    init_logging, Config, FrameClock, PanelController, SleepClock, TRACK_CELL_WIDTH,
};
use std::sync::mpsc;
use std::thread;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

fn now_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Current container width in virtual pixels, derived from the terminal
/// width so terminal resizes flow into the reconciler
fn container_width(term: &console::Term, fallback: f64) -> f64 {
    let (_, cols) = term.size();
    if cols > 0 {
        f64::from(cols) * TRACK_CELL_WIDTH
    } else {
        fallback
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    config.validate().context("invalid configuration")?;
    init_logging(&config.log_level);

    println!("{}", "netbounce".bold());
    println!("Feed: {}\n", config.input);

    let mut controller = PanelController::new(config.speed, &config.palette, config.width)
        .context("failed to initialize panel")?;

    // Attach once per panel open; on failure the panel still runs, it just
    // never receives events
    let mut source = JsonlCaptureSource::new(&config.input);
    let events = match source.attach() {
        Ok(()) => {
            let (tx, rx) = mpsc::channel();
            thread::spawn(move || pump_events(source, tx));
            Some(rx)
        }
        Err(e) => {
            warn!(error = %e, "Monitoring not started");
            controller.set_status(format!("Cannot monitor this feed: {}", e));
            None
        }
    };

    let term = console::Term::stdout();
    let surface = ProgressBar::new_spinner();
    let mut clock = SleepClock::new(config.frame_interval());
    let mut last_width = container_width(&term, config.width);
    controller.resize(last_width, Instant::now());

    loop {
        let dt_ms = clock.wait_frame();
        let now = Instant::now();

        if let Some(rx) = &events {
            for event in rx.try_iter() {
                controller.ingest(&event, now_epoch_ms());
            }
        }

        let width = container_width(&term, config.width);
        if (width - last_width).abs() > f64::EPSILON {
            debug!(container_width = width, "Terminal resized");
            controller.resize(width, now);
            last_width = width;
        }

        controller.frame(dt_ms, now);
        surface.set_message(controller.render());
    }
}

/// Drain the capture source into the channel until the feed ends.
/// Runs on its own thread so a blocking feed never stalls the frame loop.
fn pump_events(mut source: impl CaptureSource, tx: mpsc::Sender<netbounce::capture::CaptureEvent>) {
    loop {
        match source.poll_event() {
            Ok(Some(event)) => {
                if tx.send(event).is_err() {
                    break;
                }
            }
            Ok(None) => {
                debug!("Capture feed finished");
                break;
            }
            Err(e) => {
                warn!(error = %e, "Capture feed error, stopping");
                break;
            }
        }
    }
}
