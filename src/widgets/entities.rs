//! Entity list card: one row per entity, name on the left, state on the
//! right. Tapping a row asks the host to open that entity's detail dialog.

use std::time::Instant;

use dashboard_widgets_common::lifecycle::UNAVAILABLE_STATES;
use dashboard_widgets_common::odometer::PLACEHOLDER;
use dashboard_widgets_common::warnings::WarningLedger;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;

use crate::colors::PLACEHOLDER as PLACEHOLDER_COLOR;
use crate::config::EntitiesCardConfig;
use crate::host::{Host, MORE_INFO_EVENT};
use crate::styles::{LABEL_FONT, LABEL_STYLE_DIM, LABEL_STYLE_WHITE, LEFT_ALIGNED, RIGHT_ALIGNED};
use crate::widgets::Card;
use crate::widgets::primitives::{TITLE_HEIGHT, draw_card_background, draw_title};

const ROW_HEIGHT: u32 = 14;
const ROW_PADDING: i32 = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Row {
    entity: String,
    name: String,
    /// `None` while the entity is missing or unavailable.
    value: Option<String>,
}

pub struct EntitiesCard {
    title: String,
    rows: Vec<Row>,
    warnings: WarningLedger,
}

impl EntitiesCard {
    pub fn new(card: &EntitiesCardConfig) -> Self {
        Self {
            title: card.title.clone().unwrap_or_default(),
            rows: card
                .entities
                .iter()
                .map(|entity| Row {
                    entity: entity.clone(),
                    name: entity.clone(),
                    value: None,
                })
                .collect(),
            warnings: WarningLedger::new(),
        }
    }

    /// `(name, value)` for each row, `None` where a placeholder is shown.
    pub fn rows(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.rows
            .iter()
            .map(|row| (row.name.as_str(), row.value.as_deref()))
    }

    fn rows_top(area: Rectangle) -> i32 {
        let title = if area.size.height > TITLE_HEIGHT { TITLE_HEIGHT } else { 0 };
        area.top_left.y + title as i32 + 2
    }
}

impl Card for EntitiesCard {
    fn set_hass(
        &mut self,
        host: &dyn Host,
        _now: Instant,
    ) {
        for row in &mut self.rows {
            let Some(entity) = host.entity(&row.entity) else {
                self.warnings
                    .report(format_args!("{}: entity not found", row.entity));
                row.value = None;
                continue;
            };
            if let Some(name) = entity.friendly_name() {
                name.clone_into(&mut row.name);
            }
            if UNAVAILABLE_STATES.contains(&entity.state.trim()) {
                self.warnings
                    .report(format_args!("{}: entity is unavailable", row.entity));
                row.value = None;
                continue;
            }
            row.value = Some(match entity.unit() {
                Some(unit) => format!("{} {unit}", entity.state),
                None => entity.state.clone(),
            });
        }
    }

    fn tick(
        &mut self,
        _now: Instant,
    ) {
    }

    fn tap(
        &mut self,
        host: &mut dyn Host,
        point: Point,
        area: Rectangle,
    ) -> bool {
        let offset = point.y - Self::rows_top(area);
        if offset < 0 {
            return false;
        }
        let Some(row) = self.rows.get(offset as usize / ROW_HEIGHT as usize) else {
            return false;
        };
        host.fire_event(MORE_INFO_EVENT, &row.entity);
        true
    }

    fn draw<D>(
        &self,
        display: &mut D,
        area: Rectangle,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_card_background(display, area);
        draw_title(display, area, &self.title);

        let placeholder = MonoTextStyle::new(LABEL_FONT, PLACEHOLDER_COLOR);
        let left = area.top_left.x + ROW_PADDING;
        let right = area.top_left.x + area.size.width as i32 - ROW_PADDING;
        let bottom = area.top_left.y + area.size.height as i32;

        for (i, row) in self.rows.iter().enumerate() {
            let baseline = Self::rows_top(area) + (i as i32 + 1) * ROW_HEIGHT as i32 - 3;
            if baseline > bottom {
                break;
            }
            Text::with_text_style(&row.name, Point::new(left, baseline), LABEL_STYLE_DIM, LEFT_ALIGNED)
                .draw(display)
                .ok();
            match &row.value {
                Some(value) => Text::with_text_style(value, Point::new(right, baseline), LABEL_STYLE_WHITE, RIGHT_ALIGNED)
                    .draw(display)
                    .ok(),
                None => {
                    let mut buf = [0u8; 4];
                    Text::with_text_style(PLACEHOLDER.encode_utf8(&mut buf), Point::new(right, baseline), placeholder, RIGHT_ALIGNED)
                        .draw(display)
                        .ok()
                }
            };
        }
    }
}
