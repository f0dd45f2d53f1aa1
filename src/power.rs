//! Brightness policy.
//!
//! The display runs at `normal_brightness` except inside an optional
//! power-saving window, which may cross midnight. The sink is only told
//! about a level when it differs from the one last applied.

use crate::config::BoardConfig;
use crate::render::sink::{FrameSink, SinkError};
use time::Time;

/// Daily time span, `start` inclusive and `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerWindow {
    pub start: Time,
    pub end: Time,
}

impl PowerWindow {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    /// A window whose start equals its end is empty.
    pub fn contains(&self, t: Time) -> bool {
        if self.start < self.end {
            self.start <= t && t < self.end
        } else if self.start > self.end {
            t >= self.start || t < self.end
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerPolicy {
    normal: u8,
    saving: Option<(PowerWindow, u8)>,
    applied: Option<u8>,
}

impl PowerPolicy {
    pub fn new(normal: u8) -> Self {
        Self { normal, saving: None, applied: None }
    }

    pub fn with_saving(mut self, window: PowerWindow, brightness: u8) -> Self {
        self.saving = Some((window, brightness));
        self
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let policy = Self::new(config.normal_brightness);
        match &config.power_saving {
            Some(ps) => policy.with_saving(PowerWindow::new(ps.start, ps.end), ps.brightness),
            None => policy,
        }
    }

    /// Brightness wanted at time of day `t`.
    pub fn desired(&self, t: Time) -> u8 {
        match self.saving {
            Some((window, level)) if window.contains(t) => level,
            _ => self.normal,
        }
    }

    /// Last level pushed to the sink.
    pub fn applied(&self) -> Option<u8> {
        self.applied
    }

    /// Pushes the desired level to `sink` if it changed. Returns the level
    /// that was applied, if any.
    pub fn apply(&mut self, t: Time, sink: &mut dyn FrameSink) -> Result<Option<u8>, SinkError> {
        let level = self.desired(t);
        if self.applied == Some(level) {
            return Ok(None);
        }

        sink.set_brightness(level)?;
        log::info!("Brightness set to {} at {}", level, t);
        self.applied = Some(level);
        Ok(Some(level))
    }

    /// Forgets the applied level so the next [`apply`](Self::apply) pushes
    /// it again (e.g. after a device re-init).
    pub fn reset(&mut self) {
        self.applied = None;
    }
}
