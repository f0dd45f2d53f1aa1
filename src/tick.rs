use std::sync::Once;
use std::time::{Duration, Instant};
use time::{OffsetDateTime, Time};

static LOCAL_OFFSET_WARNING: Once = Once::new();

/// The timestamp every region sees during one render pass.
///
/// `instant` drives animation pacing, `time_of_day` drives the clock and the
/// power-saving window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTime {
    pub instant: Instant,
    pub time_of_day: Time,
}

impl FrameTime {
    pub fn new(instant: Instant, time_of_day: Time) -> Self {
        Self { instant, time_of_day }
    }

    /// Current local time. Falls back to UTC when the local offset cannot be
    /// determined (e.g. in a multi-threaded process on some platforms).
    pub fn now() -> Self {
        let wall = match OffsetDateTime::now_local() {
            Ok(t) => t,
            Err(e) => {
                LOCAL_OFFSET_WARNING.call_once(|| {
                    log::warn!("Cannot determine local time offset ({e}), using UTC");
                });
                OffsetDateTime::now_utc()
            }
        };
        Self { instant: Instant::now(), time_of_day: wall.time() }
    }

    /// The same frame time moved forward by `d` (wall clock wraps at midnight).
    pub fn advanced(&self, d: Duration) -> Self {
        let step = time::Duration::try_from(d).unwrap_or(time::Duration::ZERO);
        Self {
            instant: self.instant + d,
            time_of_day: self.time_of_day + step,
        }
    }
}

/// What happened during a [`Board::tick`](crate::board::Board::tick).
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// The active content scene was switched
    pub scene_changed: bool,
    /// A new snapshot was applied to the scenes
    pub state_applied: bool,
    /// Brightness pushed to the sink during this tick, if any
    pub brightness: Option<u8>,
}

/// Outcome of one compositor refresh.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshStats {
    pub repainted: usize,   // Regions that were due and got painted
    pub active: usize,      // Regions currently on screen
}
