//! Runs a board against a JSON snapshot file.
//!
//! ```text
//! cargo run --example preview -- board.json [config.json] [out.png]
//! ```
//!
//! The snapshot file is re-read every refresh interval, so editing it while
//! the preview runs changes what is shown. Without an output path frames go
//! to the null sink and only the logs show what happens.

use anyhow::Context;
use departure_board::refresher::{BackgroundRefresher, JsonFileSource};
use departure_board::render::font::FontSet;
use departure_board::render::sink::FrameSink;
use departure_board::render::sinks::null::NullSink;
use departure_board::render::sinks::png::PngSink;
use departure_board::{Board, BoardConfig, FrameTime, RateRegulator};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let snapshot = args.next().context("usage: preview <board.json> [config.json] [out.png]")?;

    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("cannot read {path}"))?;
            BoardConfig::from_json_str(&text)?
        }
        None => BoardConfig::default(),
    };
    let config = Arc::new(config);

    // Writing a PNG every frame is wasteful, once a second is plenty to watch.
    let sink: Box<dyn FrameSink> = match args.next() {
        Some(path) => Box::new(PngSink::new(path).every(config.fps as u64)),
        None => Box::new(NullSink::new()),
    };

    let mut board = Board::new(config.clone(), FontSet::default(), sink)?;
    let refresher = BackgroundRefresher::spawn(
        Arc::new(JsonFileSource::new(snapshot)),
        board.ingest_handle(),
        config.refresh_interval(),
    );

    let running = Arc::new(AtomicBool::new(true));
    let render_running = running.clone();
    let fps = config.fps;

    let render = std::thread::spawn(move || -> anyhow::Result<()> {
        let mut regulator = RateRegulator::new(fps);
        let mut last_report = Instant::now();

        while render_running.load(Ordering::Relaxed) {
            regulator.regulate(|| board.frame(&FrameTime::now()))?;

            if last_report.elapsed() >= Duration::from_secs(10) {
                log::info!(
                    "{:.1} fps, {:?} per frame, {} overruns, scene {:?}",
                    regulator.effective_fps(),
                    regulator.average_work_time(),
                    regulator.overruns(),
                    board.active_scene()
                );
                last_report = Instant::now();
            }
        }
        Ok(())
    });

    tokio::signal::ctrl_c().await?;
    log::info!("Received Ctrl-C, shutting down...");
    running.store(false, Ordering::Relaxed);

    let report = refresher.shutdown().await;
    log::info!("{} refreshes, {} failures", report.successes, report.failures);

    match render.join() {
        Ok(result) => result,
        Err(_) => anyhow::bail!("render thread panicked"),
    }
}
