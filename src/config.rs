//! Board configuration.
//!
//! `BoardConfig` is constructed once at startup and handed (inside an `Arc`)
//! to the [`Board`](crate::board::Board), which passes it on to every scene
//! it builds. There is no global configuration lookup.
//!
//! `BoardConfig` provides sensible defaults via [`Default`], a fluent
//! [`BoardConfig::builder()`] with validation, and [`serde::Deserialize`] so a
//! host can load it from whatever source it likes.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use departure_board::config::BoardConfig;
//! let cfg = BoardConfig::default();
//! assert_eq!((cfg.width, cfg.height), (256, 64));
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use departure_board::config::BoardConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = BoardConfig::builder()
//!     .fps(30)
//!     .normal_brightness(200)
//!     .power_saving("22:00", "06:00", 16)
//!     .show_platform(true)
//!     .replacement("International", "Intl")
//!     .build()?; // returns Result<BoardConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! ## Load from JSON
//! ```rust
//! use departure_board::config::BoardConfig;
//! let cfg = BoardConfig::from_json_str(r#"{
//!     "fps": 25,
//!     "power_saving": { "start": "23:30", "end": "05:45", "brightness": 10 }
//! }"#).unwrap();
//! assert_eq!(cfg.fps, 25);
//! ```
//!
//! # Errors
//!
//! Validation can return [`ConfigError`] if values are invalid (e.g. a zero
//! display size, `fps == 0`, `services == 0` or a malformed `HH:MM` time).

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use time::Time;

/// Hours during which the display is dimmed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PowerSavingConfig {
    #[serde(deserialize_with = "deserialize_hhmm")]
    pub start: Time,
    #[serde(deserialize_with = "deserialize_hhmm")]
    pub end: Time,
    pub brightness: u8,
}

/// Which columns the departure rows carry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Prefix each row with its ordinal ("1st", "2nd", ...)
    pub order: bool,
    /// Show a "Plat N" column
    pub platform: bool,
    /// Append "(HH:MM)" to every calling point
    pub calling_times: bool,
    /// Maximum number of departures shown (first row plus the paging list)
    pub services: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            order: false,
            platform: false,
            calling_times: false,
            services: 6,
        }
    }
}

/// Timing of the informational message rotation on the "no services" screen.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageConfig {
    /// Seconds the "no services" notice stays up between message rotations
    pub frequency_secs: u64,
    /// Seconds each message page is held
    pub interval_secs: u64,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { frequency_secs: 60, interval_secs: 10 }
    }
}

/// Animation cadence shared by the marquee, carousel and paging list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Pixels moved per animation step
    pub step_px: u32,
    /// Animation steps to hold at a scroll start or row boundary
    pub pause_ticks: u32,
    /// Minimum milliseconds between animation steps
    pub interval_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { step_px: 1, pause_ticks: 80, interval_ms: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: u32,
    pub height: u32,
    /// Target render loop frequency
    pub fps: u32,
    /// Seconds between two upstream data refreshes
    pub refresh_interval_secs: u64,
    pub normal_brightness: u8,
    pub power_saving: Option<PowerSavingConfig>,
    /// Seconds after which static text is repainted even when unchanged
    pub static_refresh_secs: u64,
    pub layout: LayoutConfig,
    pub messages: MessageConfig,
    pub scroll: ScrollConfig,
    /// Substring replacements applied to station names ("International" -> "Intl")
    pub replacements: BTreeMap<String, String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 64,
            fps: 60,
            refresh_interval_secs: 120,
            normal_brightness: 255,
            power_saving: None,
            static_refresh_secs: 60,
            layout: LayoutConfig::default(),
            messages: MessageConfig::default(),
            scroll: ScrollConfig::default(),
            replacements: BTreeMap::new(),
        }
    }
}

impl BoardConfig {
    pub fn builder() -> BoardConfigBuilder {
        BoardConfigBuilder::default()
    }

    /// Parses and validates a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<BoardConfig, ConfigError> {
        let cfg: BoardConfig = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        validate(&cfg)?;
        Ok(cfg)
    }

    /// Checks the values a hand-built config may have gotten wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn static_refresh(&self) -> Duration {
        Duration::from_secs(self.static_refresh_secs)
    }

    pub fn scroll_interval(&self) -> Duration {
        Duration::from_millis(self.scroll.interval_ms)
    }

    pub fn message_frequency(&self) -> Duration {
        Duration::from_secs(self.messages.frequency_secs)
    }

    pub fn message_interval(&self) -> Duration {
        Duration::from_secs(self.messages.interval_secs)
    }
}

/// Builder for [`BoardConfig`].
#[derive(Debug, Clone, Default)]
pub struct BoardConfigBuilder {
    inner: BoardConfig,
    time_error: Option<ConfigError>,
}

impl BoardConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut BoardConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn size(self, width: u32, height: u32) -> Self { self.map(|c| { c.width = width; c.height = height; }) }
    pub fn fps(self, fps: u32) -> Self { self.map(|c| c.fps = fps) }
    pub fn refresh_interval(self, every: Duration) -> Self { self.map(|c| c.refresh_interval_secs = every.as_secs()) }
    pub fn normal_brightness(self, level: u8) -> Self { self.map(|c| c.normal_brightness = level) }
    pub fn static_refresh(self, every: Duration) -> Self { self.map(|c| c.static_refresh_secs = every.as_secs()) }
    pub fn show_order(self, on: bool) -> Self { self.map(|c| c.layout.order = on) }
    pub fn show_platform(self, on: bool) -> Self { self.map(|c| c.layout.platform = on) }
    pub fn calling_times(self, on: bool) -> Self { self.map(|c| c.layout.calling_times = on) }
    pub fn services(self, n: usize) -> Self { self.map(|c| c.layout.services = n) }
    pub fn message_frequency(self, every: Duration) -> Self { self.map(|c| c.messages.frequency_secs = every.as_secs()) }
    pub fn message_interval(self, hold: Duration) -> Self { self.map(|c| c.messages.interval_secs = hold.as_secs()) }
    pub fn scroll_step(self, px: u32) -> Self { self.map(|c| c.scroll.step_px = px) }
    pub fn scroll_pause_ticks(self, ticks: u32) -> Self { self.map(|c| c.scroll.pause_ticks = ticks) }
    pub fn scroll_interval(self, every: Duration) -> Self { self.map(|c| c.scroll.interval_ms = every.as_millis() as u64) }
    pub fn replacement<S: Into<String>>(self, from: S, to: S) -> Self {
        let (from, to) = (from.into(), to.into());
        self.map(|c| { c.replacements.insert(from, to); })
    }

    /// Enables the power-saving window. `start` and `end` are `HH:MM` strings.
    pub fn power_saving(mut self, start: &str, end: &str, brightness: u8) -> Self {
        match (parse_hhmm(start), parse_hhmm(end)) {
            (Ok(start), Ok(end)) => {
                self.inner.power_saving = Some(PowerSavingConfig { start, end, brightness });
            }
            (Err(e), _) | (_, Err(e)) => self.time_error = Some(e),
        }
        self
    }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut BoardConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<BoardConfig, ConfigError> {
        if let Some(e) = self.time_error {
            return Err(e);
        }
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroSize { width: u32, height: u32 },
    ZeroFps,
    ZeroServices,
    InvalidTime(String),
    Json(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroSize { width, height } =>
                write!(f, "display size {width}x{height} must be non-zero"),
            ConfigError::ZeroFps =>
                write!(f, "fps must be at least 1"),
            ConfigError::ZeroServices =>
                write!(f, "layout.services must be at least 1"),
            ConfigError::InvalidTime(s) =>
                write!(f, "'{s}' is not a valid HH:MM time"),
            ConfigError::Json(e) =>
                write!(f, "cannot parse configuration: {e}"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &BoardConfig) -> Result<(), ConfigError> {
    if c.width == 0 || c.height == 0 {
        return Err(ConfigError::ZeroSize { width: c.width, height: c.height });
    }
    if c.fps == 0 {
        return Err(ConfigError::ZeroFps);
    }
    if c.layout.services == 0 {
        return Err(ConfigError::ZeroServices);
    }
    Ok(())
}

/// Parses a `HH:MM` time of day.
pub fn parse_hhmm(s: &str) -> Result<Time, ConfigError> {
    let invalid = || ConfigError::InvalidTime(s.to_string());

    let (hours, minutes) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
    Time::from_hms(hours, minutes, 0).map_err(|_| invalid())
}

fn deserialize_hhmm<'de, D: Deserializer<'de>>(d: D) -> Result<Time, D::Error> {
    let s = String::deserialize(d)?;
    parse_hhmm(&s).map_err(serde::de::Error::custom)
}
