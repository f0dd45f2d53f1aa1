use crate::compositor::FrameCompositor;
use crate::config::BoardConfig;
use crate::data::BoardState;
use crate::errors::BoardError;
use crate::render::font::FontSet;
use crate::scene::{ClockScene, DepartureBoardScene, InitialisingScene, NoServicesScene, SceneContent};
use crate::tick::FrameTime;
use std::sync::Arc;

/// The content scene currently on screen. The clock is always shown as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActiveScene {
    Initialising,
    NoServices,
    DepartureBoard,
}

impl ActiveScene {
    /// The scene a snapshot calls for.
    pub fn for_state(state: Option<&BoardState>) -> Self {
        match state {
            None => ActiveScene::Initialising,
            Some(s) if s.departures.is_empty() => ActiveScene::NoServices,
            Some(_) => ActiveScene::DepartureBoard,
        }
    }
}

#[derive(Debug)]
pub struct SceneManager {
    clock: ClockScene,
    initialising: InitialisingScene,
    no_services: NoServicesScene,
    departure_board: DepartureBoardScene,
    active: ActiveScene,
    applied: Option<Arc<BoardState>>,
    /// Bumped every time a changed snapshot is applied
    epoch: u64,
}

impl SceneManager {
    /// Builds every scene and shows the clock and the initialising screen.
    pub fn new(config: &BoardConfig, fonts: &FontSet, comp: &mut FrameCompositor) -> Result<Self, BoardError> {
        let mut manager = Self {
            clock: ClockScene::new(config, fonts, comp)?,
            initialising: InitialisingScene::new(config, fonts, comp)?,
            no_services: NoServicesScene::new(config, fonts, comp)?,
            departure_board: DepartureBoardScene::new(config, fonts, comp)?,
            active: ActiveScene::Initialising,
            applied: None,
            epoch: 0,
        };
        manager.clock.show(comp);
        manager.initialising.show(comp);
        Ok(manager)
    }

    pub fn active(&self) -> ActiveScene {
        self.active
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn applied(&self) -> Option<&Arc<BoardState>> {
        self.applied.as_ref()
    }

    pub fn no_services(&self) -> &NoServicesScene {
        &self.no_services
    }

    pub fn departure_board(&self) -> &DepartureBoardScene {
        &self.departure_board
    }

    fn content_mut(&mut self, which: ActiveScene) -> &mut dyn SceneContent {
        match which {
            ActiveScene::Initialising => &mut self.initialising,
            ActiveScene::NoServices => &mut self.no_services,
            ActiveScene::DepartureBoard => &mut self.departure_board,
        }
    }

    /// Applies a snapshot. A snapshot equal to the one already applied does
    /// nothing at all. Returns whether the active scene changed.
    pub fn apply(&mut self, state: Arc<BoardState>, comp: &mut FrameCompositor) -> bool {
        if self.applied.as_deref() == Some(state.as_ref()) {
            return false;
        }

        let previous = self.active;
        let next = ActiveScene::for_state(Some(state.as_ref()));

        if previous != next {
            self.content_mut(previous).hide(comp);
        }
        self.content_mut(next).update_state(&state, comp);
        // Showing again would restart whatever the scene is cycling through.
        if previous != next {
            self.content_mut(next).show(comp);
        }

        self.active = next;
        self.applied = Some(state);
        self.epoch += 1;

        if previous != next {
            log::info!("Scene switch: {:?} -> {:?} (epoch {})", previous, next, self.epoch);
        } else {
            log::debug!("Scene {:?} updated (epoch {})", next, self.epoch);
        }
        previous != next
    }

    /// Drives time-based behavior of the scenes on screen.
    pub fn tick(&mut self, now: &FrameTime, comp: &mut FrameCompositor) {
        self.clock.update_tick(now, comp);
        let active = self.active;
        self.content_mut(active).update_tick(now, comp);
    }
}
