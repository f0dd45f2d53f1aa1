//! Scenes: named groups of regions shown and hidden together.

mod clock;
mod departure_board;
mod initialising;
mod manager;
mod no_services;

pub use clock::ClockScene;
pub use departure_board::DepartureBoardScene;
pub use initialising::InitialisingScene;
pub use manager::{ActiveScene, SceneManager};
pub use no_services::{NoServicesMode, NoServicesScene};

use crate::compositor::{FrameCompositor, Offset, RegionId};
use crate::config::BoardConfig;
use crate::data::BoardState;
use crate::errors::BoardError;
use crate::render::font::Font;
use crate::tick::FrameTime;
use crate::widgets::{StaticText, Widget};
use crate::region::{HAlign, VAlign};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SceneElement {
    pub code: String,
    pub region: RegionId,
    pub offset: Offset,
    /// Shown when the scene is shown
    pub visible: bool,
    /// Currently on screen
    pub shown: bool,
}

#[derive(Debug)]
pub struct Scene {
    name: String,
    elements: Vec<SceneElement>,
    index: HashMap<String, usize>,
    showing: bool,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
            index: HashMap::new(),
            showing: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `widget` with the compositor under `code`. Each code can
    /// only be used once per scene.
    pub fn add_element(
        &mut self,
        comp: &mut FrameCompositor,
        code: &str,
        widget: impl Into<Widget>,
        offset: Offset,
        visible: bool,
    ) -> Result<RegionId, BoardError> {
        if self.index.contains_key(code) {
            return Err(BoardError::DuplicateElement {
                scene: self.name.clone(),
                code: code.to_string(),
            });
        }

        let region = comp.register(widget);
        self.index.insert(code.to_string(), self.elements.len());
        self.elements.push(SceneElement {
            code: code.to_string(),
            region,
            offset,
            visible,
            shown: false,
        });
        Ok(region)
    }

    pub fn element(&self, code: &str) -> Option<&SceneElement> {
        self.index.get(code).map(|i| &self.elements[*i])
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn region(&self, code: &str) -> Option<RegionId> {
        self.element(code).map(|e| e.region)
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Puts every visible element on screen. Idempotent.
    pub fn show(&mut self, comp: &mut FrameCompositor) {
        for element in self.elements.iter_mut().filter(|e| e.visible) {
            if !element.shown {
                comp.add(element.region, element.offset);
                element.shown = true;
            }
        }
        self.showing = true;
    }

    /// Takes every element off screen. Idempotent.
    pub fn hide(&mut self, comp: &mut FrameCompositor) {
        for element in &mut self.elements {
            comp.remove(element.region, element.offset);
            element.shown = false;
        }
        self.showing = false;
    }

    /// Marks an element visible, putting it on screen if the scene is showing.
    pub fn show_element(&mut self, comp: &mut FrameCompositor, code: &str) {
        let showing = self.showing;
        let Some(element) = self.element_mut(code) else { return };
        element.visible = true;
        if showing && !element.shown {
            comp.add(element.region, element.offset);
            element.shown = true;
        }
    }

    pub fn hide_element(&mut self, comp: &mut FrameCompositor, code: &str) {
        let Some(element) = self.element_mut(code) else { return };
        element.visible = false;
        if element.shown {
            comp.remove(element.region, element.offset);
            element.shown = false;
        }
    }

    pub fn widget_mut<'c>(&self, comp: &'c mut FrameCompositor, code: &str) -> Option<&'c mut Widget> {
        comp.widget_mut(self.region(code)?)
    }

    /// Sets the text of a text element. Unknown codes are ignored.
    pub fn set_text(&self, comp: &mut FrameCompositor, code: &str, text: &str) {
        if let Some(widget) = self.widget_mut(comp, code) {
            widget.set_text(text);
        }
    }

    fn element_mut(&mut self, code: &str) -> Option<&mut SceneElement> {
        let i = *self.index.get(code)?;
        self.elements.get_mut(i)
    }
}

/// The behavior behind a scene.
pub trait SceneContent {
    fn scene(&self) -> &Scene;
    fn scene_mut(&mut self) -> &mut Scene;

    /// Pushes a new snapshot into the scene's widgets.
    fn update_state(&mut self, _state: &BoardState, _comp: &mut FrameCompositor) {}

    /// Periodic behavior not driven by snapshots.
    fn update_tick(&mut self, _now: &FrameTime, _comp: &mut FrameCompositor) {}

    fn show(&mut self, comp: &mut FrameCompositor) {
        self.scene_mut().show(comp);
    }

    fn hide(&mut self, comp: &mut FrameCompositor) {
        self.scene_mut().hide(comp);
    }
}

/// A static label with the board-wide pacing applied.
pub(crate) fn label(config: &BoardConfig, font: &Arc<dyn Font>, width: u32, height: u32, align: HAlign) -> StaticText {
    StaticText::new(width, height, font.clone())
        .with_align(align, VAlign::Top)
        .with_interval(config.scroll_interval())
        .with_forced_refresh(config.static_refresh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::font;

    fn text(s: &str) -> StaticText {
        StaticText::new(30, 10, font()).with_text(s)
    }

    #[test]
    fn duplicate_codes_are_rejected() {
        let mut comp = FrameCompositor::new(64, 32);
        let mut scene = Scene::new("test");

        scene.add_element(&mut comp, "title", text("a"), Offset::new(0, 0), true).unwrap();
        let err = scene
            .add_element(&mut comp, "title", text("b"), Offset::new(0, 10), true)
            .unwrap_err();

        match err {
            BoardError::DuplicateElement { scene, code } => {
                assert_eq!(scene, "test");
                assert_eq!(code, "title");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(scene.elements().len(), 1);
    }

    #[test]
    fn show_and_hide_are_idempotent() {
        let mut comp = FrameCompositor::new(64, 32);
        let mut scene = Scene::new("test");
        scene.add_element(&mut comp, "a", text("a"), Offset::new(0, 0), true).unwrap();
        scene.add_element(&mut comp, "b", text("b"), Offset::new(0, 10), false).unwrap();

        scene.show(&mut comp);
        scene.show(&mut comp);
        assert_eq!(comp.active_count(), 1);
        assert!(scene.is_showing());

        scene.hide(&mut comp);
        scene.hide(&mut comp);
        assert_eq!(comp.active_count(), 0);
    }

    #[test]
    fn element_visibility_follows_scene() {
        let mut comp = FrameCompositor::new(64, 32);
        let mut scene = Scene::new("test");
        let b = scene.add_element(&mut comp, "b", text("b"), Offset::new(0, 10), false).unwrap();

        scene.show_element(&mut comp, "b");
        assert_eq!(comp.active_count(), 0);

        scene.show(&mut comp);
        assert!(comp.is_active(b, Offset::new(0, 10)));

        scene.hide_element(&mut comp, "b");
        assert_eq!(comp.active_count(), 0);
        scene.show(&mut comp);
        assert_eq!(comp.active_count(), 0);
    }

    #[test]
    fn set_text_reaches_widget() {
        let mut comp = FrameCompositor::new(64, 32);
        let mut scene = Scene::new("test");
        scene.add_element(&mut comp, "a", text("a"), Offset::new(0, 0), true).unwrap();

        scene.set_text(&mut comp, "a", "changed");
        scene.set_text(&mut comp, "missing", "ignored");
        let widget = scene.widget_mut(&mut comp, "a").unwrap();
        assert_eq!(widget.as_static_text().unwrap().text(), "changed");
    }
}
