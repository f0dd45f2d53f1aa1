use crate::compositor::{FrameCompositor, Offset};
use crate::config::{BoardConfig, LayoutConfig};
use crate::data::{ordinal, BoardState, Departure};
use crate::errors::BoardError;
use crate::region::HAlign;
use crate::render::font::FontSet;
use crate::scene::{label, Scene, SceneContent};
use crate::widgets::{ListCell, ListItem, PagingList, ScrollText};
use std::collections::BTreeMap;

const ROW_HEIGHT: u32 = 12;
/// The first row uses the bold face, which is a pixel taller.
const FIRST_ROW_HEIGHT: u32 = 13;
const CALLING_Y: u32 = FIRST_ROW_HEIGHT;
const REMAINING_Y: u32 = CALLING_Y + ROW_HEIGHT;
const CALLING_LABEL: &str = "Calling at:";
const CALLING_LABEL_WIDTH: u32 = 66;

/// Horizontal position of every column of a departure row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    order: Option<(u32, u32)>,
    time: (u32, u32),
    destination: (u32, u32),
    platform: Option<(u32, u32)>,
    status: (u32, u32),
}

impl Columns {
    fn new(width: u32, layout: &LayoutConfig) -> Self {
        let status = (width.saturating_sub(56), 56);
        let platform = layout.platform.then(|| (status.0.saturating_sub(44), 42));
        let order = layout.order.then_some((0, 25));
        let time_x = order.map_or(0, |(x, w)| x + w);
        let destination_x = time_x + 34;
        let destination_end = platform.map_or(status.0, |(x, _)| x).saturating_sub(2);

        Self {
            order,
            time: (time_x, 34),
            destination: (destination_x, destination_end.saturating_sub(destination_x)),
            platform,
            status,
        }
    }
}

/// Texts of one departure row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct RowText {
    order: String,
    time: String,
    destination: String,
    platform: String,
    status: String,
}

impl RowText {
    fn new(position: usize, departure: &Departure, replacements: &BTreeMap<String, String>) -> Self {
        Self {
            order: ordinal(position),
            time: departure.scheduled.clone(),
            destination: departure.destination_name(replacements),
            platform: departure.platform.as_ref().map(|p| format!("Plat {p}")).unwrap_or_default(),
            status: departure.status(),
        }
    }
}

/// The live board: first departure in full with its calling points, the
/// following services paging underneath.
#[derive(Debug)]
pub struct DepartureBoardScene {
    scene: Scene,
    columns: Columns,
    services: usize,
    calling_times: bool,
    replacements: BTreeMap<String, String>,
}

impl DepartureBoardScene {
    pub fn new(config: &BoardConfig, fonts: &FontSet, comp: &mut FrameCompositor) -> Result<Self, BoardError> {
        let mut scene = Scene::new("departure_board");
        let columns = Columns::new(config.width, &config.layout);

        let cells = [
            ("row1-order", columns.order, &fonts.bold, HAlign::Left),
            ("row1-time", Some(columns.time), &fonts.bold, HAlign::Left),
            ("row1-destination", Some(columns.destination), &fonts.bold, HAlign::Left),
            ("row1-platform", columns.platform, &fonts.regular, HAlign::Left),
            ("row1-status", Some(columns.status), &fonts.regular, HAlign::Right),
        ];
        for (code, column, font, align) in cells {
            if let Some((x, width)) = column {
                let text = label(config, font, width, FIRST_ROW_HEIGHT, align);
                scene.add_element(comp, code, text, Offset::new(x as i32, 0), true)?;
            }
        }

        let calling_label = label(config, &fonts.regular, CALLING_LABEL_WIDTH, ROW_HEIGHT, HAlign::Left)
            .with_text(CALLING_LABEL);
        scene.add_element(comp, "calling_label", calling_label, Offset::new(0, CALLING_Y as i32), true)?;

        let calling_x = CALLING_LABEL_WIDTH + 2;
        let calling_at = ScrollText::new(config.width.saturating_sub(calling_x), ROW_HEIGHT, fonts.regular.clone())
            .with_interval(config.scroll_interval())
            .with_scroll(config.scroll.step_px, config.scroll.pause_ticks)
            .with_forced_refresh(config.static_refresh());
        scene.add_element(comp, "calling_at", calling_at, Offset::new(calling_x as i32, CALLING_Y as i32), true)?;

        let remaining = PagingList::new(config.width, 2 * ROW_HEIGHT, ROW_HEIGHT, fonts.regular.clone())
            .with_interval(config.scroll_interval())
            .with_scroll(config.scroll.step_px, config.scroll.pause_ticks);
        scene.add_element(comp, "remaining", remaining, Offset::new(0, REMAINING_Y as i32), true)?;

        Ok(Self {
            scene,
            columns,
            services: config.layout.services,
            calling_times: config.layout.calling_times,
            replacements: config.replacements.clone(),
        })
    }

    fn update_first_row(&self, row: &RowText, comp: &mut FrameCompositor) {
        self.scene.set_text(comp, "row1-order", &row.order);
        self.scene.set_text(comp, "row1-time", &row.time);
        self.scene.set_text(comp, "row1-destination", &row.destination);
        self.scene.set_text(comp, "row1-platform", &row.platform);
        self.scene.set_text(comp, "row1-status", &row.status);
    }

    fn list_item(&self, row: RowText) -> ListItem {
        let c = &self.columns;
        let mut cells = Vec::with_capacity(5);
        if let Some((x, w)) = c.order {
            cells.push(ListCell::new(row.order, x, w));
        }
        cells.push(ListCell::new(row.time, c.time.0, c.time.1));
        cells.push(ListCell::new(row.destination, c.destination.0, c.destination.1));
        if let Some((x, w)) = c.platform {
            cells.push(ListCell::new(row.platform, x, w));
        }
        cells.push(ListCell::new(row.status, c.status.0, c.status.1).aligned(HAlign::Right));
        ListItem::new(cells)
    }
}

impl SceneContent for DepartureBoardScene {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn update_state(&mut self, state: &BoardState, comp: &mut FrameCompositor) {
        let first = state.departures.first();

        let row = first
            .map(|d| RowText::new(1, d, &self.replacements))
            .unwrap_or_default();
        self.update_first_row(&row, comp);

        let calling_at = first
            .map(|d| d.calling_at(&self.replacements, self.calling_times))
            .unwrap_or_default();
        self.scene.set_text(comp, "calling_at", &calling_at);

        let items: Vec<ListItem> = state
            .departures
            .iter()
            .enumerate()
            .take(self.services)
            .skip(1)
            .map(|(i, d)| self.list_item(RowText::new(i + 1, d, &self.replacements)))
            .collect();

        if let Some(list) = self.scene.widget_mut(comp, "remaining").and_then(|w| w.as_paging_list_mut()) {
            list.update_items(items);
        }
    }
}
