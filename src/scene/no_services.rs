use crate::compositor::{FrameCompositor, Offset};
use crate::config::BoardConfig;
use crate::data::BoardState;
use crate::errors::BoardError;
use crate::region::HAlign;
use crate::render::font::{wordwrap, Font, FontSet};
use crate::scene::{label, Scene, SceneContent};
use crate::tick::FrameTime;
use crate::widgets::Carousel;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const NO_SERVICES_TEXT: &str = "No services available at this time.";

const LINES_PER_PAGE: usize = 3;

/// What the middle of the screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoServicesMode {
    /// The "no services" notice, until `until` (armed on the first tick)
    Notice { until: Option<Instant> },
    /// The message carousel, until it completes a rotation past `started_at`
    Messages { started_at: u64 },
}

/// Station name plus either the "no services" notice or a rotation of the
/// station's informational messages.
#[derive(Debug)]
pub struct NoServicesScene {
    scene: Scene,
    font: Arc<dyn Font>,
    width: u32,
    frequency: Duration,
    messages: Vec<String>,
    pages: Vec<String>,
    mode: NoServicesMode,
}

impl NoServicesScene {
    pub fn new(config: &BoardConfig, fonts: &FontSet, comp: &mut FrameCompositor) -> Result<Self, BoardError> {
        let mut scene = Scene::new("no_services");

        let title = label(config, &fonts.bold, config.width, 13, HAlign::Center);
        scene.add_element(comp, "title", title, Offset::new(0, 0), true)?;

        let notice = label(config, &fonts.regular, config.width, 12, HAlign::Center).with_text(NO_SERVICES_TEXT);
        scene.add_element(comp, "notice", notice, Offset::new(0, 22), true)?;

        let carousel = Carousel::new(config.width, 34, fonts.regular.clone())
            .with_align(HAlign::Center)
            .with_interval(config.scroll_interval())
            .with_hold(config.message_interval())
            .with_step(config.scroll.step_px);
        scene.add_element(comp, "messages", carousel, Offset::new(0, 14), false)?;

        Ok(Self {
            scene,
            font: fonts.regular.clone(),
            width: config.width,
            frequency: config.message_frequency(),
            messages: Vec::new(),
            pages: Vec::new(),
            mode: NoServicesMode::Notice { until: None },
        })
    }

    pub fn mode(&self) -> NoServicesMode {
        self.mode
    }

    /// Messages split into screen-sized pages.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    fn update_messages(&mut self, messages: &[String], comp: &mut FrameCompositor) {
        if self.messages == messages {
            return;
        }
        self.messages = messages.to_vec();
        self.pages = paginate(self.font.as_ref(), self.width, messages);

        let pages = self.pages.clone();
        if let Some(carousel) = self.carousel(comp) {
            carousel.update_messages(&pages);
        }
        self.show_notice(comp, None);
    }

    fn carousel<'c>(&self, comp: &'c mut FrameCompositor) -> Option<&'c mut Carousel> {
        self.scene.widget_mut(comp, "messages")?.as_carousel_mut()
    }

    fn show_notice(&mut self, comp: &mut FrameCompositor, until: Option<Instant>) {
        self.scene.hide_element(comp, "messages");
        self.scene.show_element(comp, "notice");
        self.mode = NoServicesMode::Notice { until };
    }

    fn show_messages(&mut self, comp: &mut FrameCompositor) {
        let started_at = match self.carousel(comp) {
            Some(carousel) => {
                carousel.restart();
                carousel.rotations()
            }
            None => return,
        };
        self.scene.hide_element(comp, "notice");
        self.scene.show_element(comp, "messages");
        self.mode = NoServicesMode::Messages { started_at };
    }
}

impl SceneContent for NoServicesScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update_state(&mut self, state: &BoardState, comp: &mut FrameCompositor) {
        self.scene.set_text(comp, "title", &state.name);
        self.update_messages(&state.messages, comp);
    }

    fn update_tick(&mut self, now: &FrameTime, comp: &mut FrameCompositor) {
        if self.pages.is_empty() {
            return;
        }

        match self.mode {
            NoServicesMode::Notice { until: None } => {
                self.mode = NoServicesMode::Notice { until: Some(now.instant + self.frequency) };
            }
            NoServicesMode::Notice { until: Some(t) } if now.instant >= t => {
                log::debug!("NoServices: rotating {} message page(s)", self.pages.len());
                self.show_messages(comp);
            }
            NoServicesMode::Messages { started_at } => {
                let done = self.carousel(comp).map_or(true, |c| c.rotations() > started_at);
                if done {
                    self.show_notice(comp, Some(now.instant + self.frequency));
                }
            }
            NoServicesMode::Notice { .. } => {}
        }
    }

    fn show(&mut self, comp: &mut FrameCompositor) {
        self.show_notice(comp, None);
        self.scene.show(comp);
    }
}

/// Word-wraps every message to `width` and groups the lines into pages.
fn paginate(font: &dyn Font, width: u32, messages: &[String]) -> Vec<String> {
    messages
        .iter()
        .flat_map(|message| {
            wordwrap(font, width, message)
                .chunks(LINES_PER_PAGE)
                .map(|lines| lines.join("\n"))
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::testing::*;

    fn setup() -> (NoServicesScene, FrameCompositor) {
        let config = BoardConfig::builder()
            .message_frequency(Duration::from_secs(60))
            .message_interval(Duration::from_secs(1))
            .build()
            .unwrap();
        let mut comp = FrameCompositor::new(config.width, config.height);
        let scene = NoServicesScene::new(&config, &FontSet::default(), &mut comp).unwrap();
        (scene, comp)
    }

    fn state(messages: &[&str]) -> BoardState {
        BoardState {
            name: "Bath Spa".into(),
            departures: vec![],
            messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn is_shown(scene: &NoServicesScene, comp: &FrameCompositor, code: &str) -> bool {
        let e = scene.scene().element(code).unwrap();
        comp.is_active(e.region, e.offset)
    }

    #[test]
    fn paginates_three_lines_per_page() {
        let f = font();
        // 5 characters per line
        let pages = paginate(f.as_ref(), 30, &["aa bb cc dd ee".to_string(), "ff".to_string()]);
        assert_eq!(pages, ["aa bb\ncc dd\nee", "ff"]);

        let pages = paginate(f.as_ref(), 30, &["a b c d e f g h".to_string()]);
        assert_eq!(pages, ["a b c\nd e f\ng h"]);
    }

    #[test]
    fn shows_title_and_notice() {
        let (mut scene, mut comp) = setup();
        scene.update_state(&state(&[]), &mut comp);
        scene.show(&mut comp);

        assert!(is_shown(&scene, &comp, "title"));
        assert!(is_shown(&scene, &comp, "notice"));
        assert!(!is_shown(&scene, &comp, "messages"));

        let title = scene.scene().widget_mut(&mut comp, "title").unwrap();
        assert_eq!(title.as_static_text().unwrap().text(), "Bath Spa");
    }

    #[test]
    fn alternates_between_notice_and_messages() {
        let (mut scene, mut comp) = setup();
        let mut ticker = Ticker::new(Duration::from_millis(20));
        scene.update_state(&state(&["Lifts out of order"]), &mut comp);
        scene.show(&mut comp);

        scene.update_tick(&ticker.next(), &mut comp);
        assert!(matches!(scene.mode(), NoServicesMode::Notice { until: Some(_) }));

        ticker.skip(Duration::from_secs(60));
        scene.update_tick(&ticker.next(), &mut comp);
        assert!(matches!(scene.mode(), NoServicesMode::Messages { .. }));
        assert!(is_shown(&scene, &comp, "messages"));
        assert!(!is_shown(&scene, &comp, "notice"));

        // let the carousel slide the page in, hold it and finish the rotation
        for _ in 0..200 {
            let now = ticker.next();
            comp.refresh(&now, &mut crate::render::sinks::null::NullSink::new()).unwrap();
            scene.update_tick(&now, &mut comp);
        }
        assert!(matches!(scene.mode(), NoServicesMode::Notice { until: Some(_) }));
        assert!(is_shown(&scene, &comp, "notice"));
        assert!(!is_shown(&scene, &comp, "messages"));
    }

    #[test]
    fn no_messages_keeps_notice() {
        let (mut scene, mut comp) = setup();
        let mut ticker = Ticker::new(Duration::from_secs(30));
        scene.update_state(&state(&[]), &mut comp);
        scene.show(&mut comp);

        for _ in 0..10 {
            scene.update_tick(&ticker.next(), &mut comp);
        }
        assert_eq!(scene.mode(), NoServicesMode::Notice { until: None });
        assert!(is_shown(&scene, &comp, "notice"));
    }

    #[test]
    fn new_messages_restart_with_notice() {
        let (mut scene, mut comp) = setup();
        let mut ticker = Ticker::new(Duration::from_millis(20));
        scene.update_state(&state(&["first"]), &mut comp);
        scene.show(&mut comp);
        scene.update_tick(&ticker.next(), &mut comp);
        ticker.skip(Duration::from_secs(61));
        scene.update_tick(&ticker.next(), &mut comp);
        assert!(matches!(scene.mode(), NoServicesMode::Messages { .. }));

        // same messages: nothing changes
        scene.update_state(&state(&["first"]), &mut comp);
        assert!(matches!(scene.mode(), NoServicesMode::Messages { .. }));

        scene.update_state(&state(&["second"]), &mut comp);
        assert_eq!(scene.mode(), NoServicesMode::Notice { until: None });
        assert!(is_shown(&scene, &comp, "notice"));
        assert_eq!(scene.pages(), ["second"]);
    }
}
