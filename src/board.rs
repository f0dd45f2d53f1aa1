//! The board controller.
//!
//! [`Board`] ties the compositor, the scenes and the brightness policy to an
//! output sink. The render loop calls [`Board::frame`] once per iteration;
//! snapshots arrive through [`Board::ingest`] or a [`SnapshotHandle`] from any
//! thread and are picked up at the start of the next tick.
//!
//! ```rust
//! use departure_board::{Board, BoardConfig, BoardState, FrameTime};
//! use departure_board::render::font::FontSet;
//! use departure_board::render::sinks::null::NullSink;
//! use std::sync::Arc;
//!
//! let mut board = Board::new(Arc::new(BoardConfig::default()), FontSet::default(), Box::new(NullSink::new())).unwrap();
//! board.ingest(BoardState::default());
//! board.frame(&FrameTime::now()).unwrap();
//! ```

use crate::compositor::FrameCompositor;
use crate::config::BoardConfig;
use crate::data::BoardState;
use crate::errors::BoardError;
use crate::power::PowerPolicy;
use crate::render::font::FontSet;
use crate::render::sink::FrameSink;
use crate::scene::{ActiveScene, SceneManager};
use crate::tick::{FrameTime, RefreshStats, TickResult};
use std::sync::Arc;
use tokio::sync::watch;

type Slot = Option<Arc<BoardState>>;

/// Write side of the board's snapshot slot. Cheap to clone and safe to use
/// from any thread; only the latest snapshot is kept.
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    tx: Arc<watch::Sender<Slot>>,
}

impl SnapshotHandle {
    pub fn ingest(&self, state: impl Into<Arc<BoardState>>) {
        self.tx.send_replace(Some(state.into()));
    }
}

pub struct Board {
    config: Arc<BoardConfig>,
    compositor: FrameCompositor,
    scenes: SceneManager,
    power: PowerPolicy,
    sink: Box<dyn FrameSink>,
    snapshot_tx: Arc<watch::Sender<Slot>>,
    snapshot_rx: watch::Receiver<Slot>,
}

impl Board {
    pub fn new(config: Arc<BoardConfig>, fonts: FontSet, sink: Box<dyn FrameSink>) -> Result<Self, BoardError> {
        config.validate()?;

        let mut compositor = FrameCompositor::new(config.width, config.height);
        let scenes = SceneManager::new(&config, &fonts, &mut compositor)?;
        let power = PowerPolicy::from_config(&config);
        let (tx, rx) = watch::channel(None);

        log::debug!("Board {}x{} ready, output to {}", config.width, config.height, sink.name());

        Ok(Self {
            config,
            compositor,
            scenes,
            power,
            sink,
            snapshot_tx: Arc::new(tx),
            snapshot_rx: rx,
        })
    }

    /// Hands the board a new snapshot. It is applied on the next tick.
    pub fn ingest(&self, state: impl Into<Arc<BoardState>>) {
        self.snapshot_tx.send_replace(Some(state.into()));
    }

    pub fn ingest_handle(&self) -> SnapshotHandle {
        SnapshotHandle { tx: self.snapshot_tx.clone() }
    }

    /// Adopts the latest snapshot, drives scene timers and applies the
    /// brightness policy.
    pub fn tick(&mut self, now: &FrameTime) -> Result<TickResult, BoardError> {
        let mut result = TickResult::default();

        if self.snapshot_rx.has_changed().unwrap_or(false) {
            let latest = self.snapshot_rx.borrow_and_update().clone();
            if let Some(state) = latest {
                let epoch = self.scenes.epoch();
                result.scene_changed = self.scenes.apply(state, &mut self.compositor);
                result.state_applied = self.scenes.epoch() != epoch;
            }
        }

        self.scenes.tick(now, &mut self.compositor);
        result.brightness = self.power.apply(now.time_of_day, self.sink.as_mut())?;
        Ok(result)
    }

    /// Repaints due regions and flushes the frame to the sink.
    pub fn render(&mut self, now: &FrameTime) -> Result<RefreshStats, BoardError> {
        self.compositor.refresh(now, self.sink.as_mut())
    }

    /// One render loop iteration: [`tick`](Self::tick) then [`render`](Self::render).
    pub fn frame(&mut self, now: &FrameTime) -> Result<RefreshStats, BoardError> {
        self.tick(now)?;
        self.render(now)
    }

    /// Rebuilds the frame after the device was re-initialised. Everything on
    /// screen and the brightness are pushed again.
    pub fn reinit(&mut self) {
        log::info!("Re-initialising {} output", self.sink.name());
        self.compositor.reinit(self.config.width, self.config.height);
        self.power.reset();
    }

    pub fn active_scene(&self) -> ActiveScene {
        self.scenes.active()
    }

    /// Number of changed snapshots applied so far.
    pub fn epoch(&self) -> u64 {
        self.scenes.epoch()
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn compositor(&self) -> &FrameCompositor {
        &self.compositor
    }

    pub fn compositor_mut(&mut self) -> &mut FrameCompositor {
        &mut self.compositor
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Board")
            .field("active", &self.scenes.active())
            .field("epoch", &self.scenes.epoch())
            .field("sink", &self.sink.name())
            .field("brightness", &self.power.applied())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::data::{Departure, Stop};
    use crate::render::sinks::memory::MemorySink;
    use crate::scene::SceneContent;
    use crate::widgets::testing::Ticker;
    use std::time::{Duration, Instant};
    use time::Time;

    fn board(config: BoardConfig) -> (Board, MemorySink) {
        let sink = MemorySink::new();
        let board = Board::new(Arc::new(config), FontSet::default(), Box::new(sink.clone())).unwrap();
        (board, sink)
    }

    fn d1() -> Departure {
        Departure {
            scheduled: "10:00".into(),
            actual: "10:03".into(),
            destination: "London Paddington".into(),
            stops: vec![Stop { location_name: "Reading".into(), time: "10:25".into() }],
            ..Default::default()
        }
    }

    fn state(departures: Vec<Departure>) -> BoardState {
        BoardState { name: "Bath Spa".into(), departures, messages: vec![] }
    }

    fn row_text(board: &mut Board, code: &str) -> String {
        let scene = board.scenes.departure_board().scene();
        let widget = scene.widget_mut(&mut board.compositor, code).unwrap();
        widget.as_static_text().unwrap().text().to_string()
    }

    #[test]
    fn initialising_until_first_snapshot() {
        let (mut board, sink) = board(BoardConfig::default());
        let mut ticker = Ticker::new(Duration::from_millis(20));

        let stats = board.frame(&ticker.next()).unwrap();
        assert_eq!(board.active_scene(), ActiveScene::Initialising);
        assert_eq!(stats.repainted, 2);
        assert_eq!(sink.recording().frames, 1);
        assert!(!sink.recording().last_frame.as_ref().unwrap().is_blank());
    }

    #[test]
    fn scenario_no_services_then_departures() {
        let (mut board, _sink) = board(BoardConfig::default());
        let mut ticker = Ticker::new(Duration::from_millis(20));

        board.ingest(state(vec![]));
        let result = board.tick(&ticker.next()).unwrap();
        assert!(result.scene_changed);
        assert_eq!(board.active_scene(), ActiveScene::NoServices);

        board.ingest(state(vec![d1()]));
        board.tick(&ticker.next()).unwrap();
        assert_eq!(board.active_scene(), ActiveScene::DepartureBoard);
        assert_eq!(row_text(&mut board, "row1-time"), "10:00");
        assert_eq!(row_text(&mut board, "row1-destination"), "London Paddington");
        assert_eq!(row_text(&mut board, "row1-status"), "Exp 10:03");
        board.render(&ticker.now()).unwrap();

        // the same departures rebuilt by the source
        board.ingest(state(vec![d1()]));
        let result = board.tick(&ticker.next()).unwrap();
        assert!(!result.state_applied);
        assert!(!result.scene_changed);
        assert_eq!(board.epoch(), 2);
        assert_eq!(board.render(&ticker.now()).unwrap().repainted, 0);
    }

    #[test]
    fn ingest_from_another_thread() {
        let (mut board, _sink) = board(BoardConfig::default());
        let handle = board.ingest_handle();

        std::thread::spawn(move || {
            handle.ingest(state(vec![]));
            handle.ingest(state(vec![d1()]));
        })
        .join()
        .unwrap();

        let result = board.tick(&FrameTime::now()).unwrap();
        assert!(result.state_applied);
        assert_eq!(board.active_scene(), ActiveScene::DepartureBoard);
        // only the latest snapshot is applied
        assert_eq!(board.epoch(), 1);
    }

    #[test]
    fn no_snapshot_no_update() {
        let (mut board, _sink) = board(BoardConfig::default());
        let mut ticker = Ticker::new(Duration::from_millis(20));
        for _ in 0..5 {
            let result = board.tick(&ticker.next()).unwrap();
            assert!(!result.state_applied);
        }
        assert_eq!(board.epoch(), 0);
    }

    #[test]
    fn power_window_applied_once() {
        let config = BoardConfig::builder().power_saving("22:00", "06:00", 12).build().unwrap();
        let (mut board, sink) = board(config);
        let start = Instant::now();
        let at = |h: u8, m: u8| FrameTime::new(start, Time::from_hms(h, m, 0).unwrap());

        assert_eq!(board.tick(&at(23, 0)).unwrap().brightness, Some(12));
        assert_eq!(board.tick(&at(23, 0)).unwrap().brightness, None);
        assert_eq!(board.tick(&at(23, 1)).unwrap().brightness, None);
        assert_eq!(board.tick(&at(12, 0)).unwrap().brightness, Some(255));
        assert_eq!(board.tick(&at(12, 0)).unwrap().brightness, None);
        assert_eq!(sink.recording().brightness, vec![12, 255]);

        board.reinit();
        assert_eq!(board.tick(&at(12, 0)).unwrap().brightness, Some(255));
    }

    #[test]
    fn sink_failure_reaches_caller() {
        let (mut board, sink) = board(BoardConfig::default());
        sink.fail_next_submit("spi timeout");

        let err = board.frame(&FrameTime::now()).unwrap_err();
        assert!(matches!(err, BoardError::Sink(_)));
        assert!(board.frame(&FrameTime::now()).is_ok());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = BoardConfig { fps: 0, ..Default::default() };
        let err = Board::new(Arc::new(config), FontSet::default(), Box::new(MemorySink::new())).unwrap_err();
        assert!(matches!(err, BoardError::Config(ConfigError::ZeroFps)));
    }

    #[test]
    fn no_services_scene_receives_messages() {
        let (mut board, _sink) = board(BoardConfig::default());
        let mut s = state(vec![]);
        s.messages = vec!["Lifts at this station are out of order".into()];
        board.ingest(s);
        board.tick(&FrameTime::now()).unwrap();

        assert_eq!(board.scenes().no_services().pages().len(), 1);
        assert!(board.scenes().no_services().scene().is_showing());
    }
}
