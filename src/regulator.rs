//! Render loop pacing.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: usize = 120;

#[derive(Debug, Clone, Copy)]
struct FrameSample {
    started: Instant,
    work: Duration,
}

/// Holds the render loop to a target frame rate.
///
/// [`regulate`](RateRegulator::regulate) runs one iteration of work and then
/// sleeps for whatever is left of the frame period. It never runs ahead of
/// the target rate; a slow frame simply starts the next one late. The
/// statistics cover the most recent frames and are for display only.
#[derive(Debug)]
pub struct RateRegulator {
    period: Duration,
    window: VecDeque<FrameSample>,
    frames: u64,
    overruns: u64,
}

impl RateRegulator {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            window: VecDeque::with_capacity(WINDOW),
            frames: 0,
            overruns: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Runs `work`, then sleeps out the rest of the frame period.
    pub fn regulate<T>(&mut self, work: impl FnOnce() -> T) -> T {
        let started = Instant::now();
        let out = work();
        let elapsed = started.elapsed();
        self.record(started, elapsed);

        match self.period.checked_sub(elapsed) {
            Some(rest) if !rest.is_zero() => std::thread::sleep(rest),
            Some(_) => {}
            None => {
                self.overruns += 1;
                log::debug!("Frame overran by {:?} (period {:?})", elapsed - self.period, self.period);
            }
        }
        out
    }

    fn record(&mut self, started: Instant, work: Duration) {
        if self.window.len() == WINDOW {
            self.window.pop_front();
        }
        self.window.push_back(FrameSample { started, work });
        self.frames += 1;
    }

    /// Frames per second over the recent window, 0 until two frames ran.
    pub fn effective_fps(&self) -> f64 {
        let (Some(first), Some(last)) = (self.window.front(), self.window.back()) else {
            return 0.0;
        };
        let span = last.started.saturating_duration_since(first.started).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        (self.window.len() - 1) as f64 / span
    }

    /// Mean time spent doing work per frame over the recent window.
    pub fn average_work_time(&self) -> Duration {
        if self.window.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.window.iter().map(|s| s.work).sum();
        total / self.window.len() as u32
    }

    /// Frames run since creation.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames whose work took longer than the period.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_runs_ahead_of_rate() {
        let mut regulator = RateRegulator::new(100);
        let start = Instant::now();
        for i in 0..5 {
            assert_eq!(regulator.regulate(|| i * 2), i * 2);
        }

        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(regulator.frames(), 5);
        let fps = regulator.effective_fps();
        assert!(fps > 0.0 && fps <= 100.0 + 1e-6, "fps = {fps}");
    }

    #[test]
    fn statistics_over_window() {
        let mut regulator = RateRegulator::new(50);
        let t0 = Instant::now();
        for i in 0..4u32 {
            regulator.record(t0 + Duration::from_millis(40) * i, Duration::from_millis(10 + i as u64 * 2));
        }

        assert!((regulator.effective_fps() - 25.0).abs() < 1e-9);
        assert_eq!(regulator.average_work_time(), Duration::from_millis(13));
    }

    #[test]
    fn window_is_bounded() {
        let mut regulator = RateRegulator::new(60);
        let t0 = Instant::now();
        for i in 0..(WINDOW as u32 + 30) {
            regulator.record(t0 + Duration::from_millis(10) * i, Duration::from_millis(1));
        }
        assert_eq!(regulator.frames(), WINDOW as u64 + 30);
        assert!((regulator.effective_fps() - 100.0).abs() < 1e-6);
    }

    #[test]
    fn slow_frames_count_as_overruns() {
        let mut regulator = RateRegulator::new(1000);
        regulator.regulate(|| std::thread::sleep(Duration::from_millis(3)));
        assert_eq!(regulator.overruns(), 1);
        assert_eq!(RateRegulator::new(0).period(), Duration::from_secs(1));
        assert!(regulator.average_work_time() >= Duration::from_millis(3));
    }
}
