use crate::compositor::{FrameCompositor, Offset};
use crate::config::BoardConfig;
use crate::errors::BoardError;
use crate::region::HAlign;
use crate::render::font::FontSet;
use crate::scene::{label, Scene, SceneContent};

pub const INITIALISING_TEXT: &str = "Departure board is initialising";

/// Shown until the first snapshot arrives.
#[derive(Debug)]
pub struct InitialisingScene {
    scene: Scene,
}

impl InitialisingScene {
    pub fn new(config: &BoardConfig, fonts: &FontSet, comp: &mut FrameCompositor) -> Result<Self, BoardError> {
        let mut scene = Scene::new("initialising");
        let text = label(config, &fonts.regular, config.width, 12, HAlign::Center).with_text(INITIALISING_TEXT);
        scene.add_element(comp, "initialising", text, Offset::new(0, 22), true)?;
        Ok(Self { scene })
    }
}

impl SceneContent for InitialisingScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
}
