use crate::compositor::{FrameCompositor, Offset};
use crate::config::BoardConfig;
use crate::errors::BoardError;
use crate::render::font::FontSet;
use crate::scene::{Scene, SceneContent};
use crate::widgets::Clock;

const CLOCK_HEIGHT: u32 = 15;

/// The clock along the bottom edge. Shown for the lifetime of the board.
#[derive(Debug)]
pub struct ClockScene {
    scene: Scene,
}

impl ClockScene {
    pub fn new(config: &BoardConfig, fonts: &FontSet, comp: &mut FrameCompositor) -> Result<Self, BoardError> {
        let mut scene = Scene::new("clock");
        let clock = Clock::new(config.width, CLOCK_HEIGHT, fonts.bold_large.clone(), fonts.bold_tall.clone());
        let y = config.height.saturating_sub(CLOCK_HEIGHT) as i32;
        scene.add_element(comp, "clock", clock, Offset::new(0, y), true)?;
        Ok(Self { scene })
    }
}

impl SceneContent for ClockScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}
