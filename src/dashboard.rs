//! Dashboard: a grid of cards driven by host updates and a frame loop.
//!
//! ```text
//! host ──set_hass──► every card (in delivery order)
//! loop ──frame────► resize debounce ─► reflow ─► card.tick() for each card
//!      ──draw─────► card.draw(cell) for each card
//! pointer ──tap───► card under the point
//! ```
//!
//! Container resizes arrive in bursts while a window is dragged. They are
//! debounced and only the last size is laid out, once the burst settles.

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

use crate::colors::BLACK;
use crate::config::DashboardConfig;
use crate::host::Host;
use crate::layout::GridLayout;
use crate::scheduler::Debouncer;
use crate::widgets::{AnyCard, Card, ClockAnchor};

pub struct Dashboard {
    cards: Vec<AnyCard>,
    layout: GridLayout,
    resize: Debouncer,
    pending_size: Option<Size>,
}

impl Dashboard {
    /// Build every configured card. Clocks are pinned to the system time.
    pub fn from_config(
        config: &DashboardConfig,
        size: Size,
        now: Instant,
    ) -> Self {
        Self::with_anchor(config, size, ClockAnchor::from_system(config.utc_offset_minutes, now), now)
    }

    /// Build every configured card with clocks pinned to `anchor`.
    pub fn with_anchor(
        config: &DashboardConfig,
        size: Size,
        anchor: ClockAnchor,
        now: Instant,
    ) -> Self {
        let cards: Vec<AnyCard> = config
            .cards
            .iter()
            .map(|card| AnyCard::from_config(card, anchor, now))
            .collect();
        let layout = GridLayout::new(config.columns, cards.len(), size);
        log::info!(
            "dashboard {:?}: {} cards in {} columns",
            config.title.as_deref().unwrap_or(""),
            cards.len(),
            layout.effective_columns()
        );
        Self {
            cards,
            layout,
            resize: Debouncer::default(),
            pending_size: None,
        }
    }

    #[inline]
    pub fn cards(&self) -> &[AnyCard] { &self.cards }

    #[inline]
    pub const fn layout(&self) -> &GridLayout { &self.layout }

    /// Forward new host state to every card.
    pub fn set_hass(
        &mut self,
        host: &dyn Host,
        now: Instant,
    ) {
        for card in &mut self.cards {
            card.set_hass(host, now);
        }
    }

    /// Record a container resize. Layout follows once resizes stop.
    pub fn resize(
        &mut self,
        size: Size,
        now: Instant,
    ) {
        self.pending_size = Some(size);
        self.resize.notify(now);
    }

    /// Run one frame: settle a debounced resize, then tick every card.
    pub fn frame(
        &mut self,
        now: Instant,
    ) {
        if self.resize.poll(now)
            && let Some(size) = self.pending_size.take()
        {
            self.layout.reflow(size);
        }
        for card in &mut self.cards {
            card.tick(now);
        }
    }

    /// Forward a press to the card under `point`. Returns `true` if handled.
    pub fn tap(
        &mut self,
        host: &mut dyn Host,
        point: Point,
    ) -> bool {
        let Some(index) = self.layout.card_at(point) else {
            return false;
        };
        let area = self.layout.cells()[index];
        self.cards
            .get_mut(index)
            .is_some_and(|card| card.tap(host, point, area))
    }

    /// Clear the target and draw every card into its cell.
    pub fn draw<D>(
        &self,
        display: &mut D,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        display.clear(BLACK).ok();
        for (card, cell) in self.cards.iter().zip(self.layout.cells()) {
            card.draw(display, *cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use dashboard_widgets_common::clock::ClockTime;

    use super::*;
    use crate::host::MockHost;

    const TOML: &str = r#"
        columns = 2

        [[card]]
        type = "gauge"
        entity = "sensor.temp"

        [[card]]
        type = "button"
        entity = "light.desk"
    "#;

    fn dashboard(now: Instant) -> Dashboard {
        let config = DashboardConfig::from_toml(TOML).expect("valid config");
        Dashboard::with_anchor(&config, Size::new(200, 100), ClockAnchor::new(ClockTime::default(), now), now)
    }

    #[test]
    fn test_resize_is_debounced() {
        let t0 = Instant::now();
        let mut dash = dashboard(t0);
        assert_eq!(dash.layout().effective_columns(), 2);

        dash.resize(Size::new(150, 100), t0);
        dash.resize(Size::new(120, 100), t0 + Duration::from_millis(100));
        dash.frame(t0 + Duration::from_millis(200));
        assert_eq!(dash.layout().size(), Size::new(200, 100), "Still inside the quiet period");

        dash.frame(t0 + Duration::from_millis(250));
        assert_eq!(dash.layout().size(), Size::new(120, 100), "Last size wins");
        assert_eq!(dash.layout().effective_columns(), 1);
    }

    #[test]
    fn test_tap_routes_to_card_under_point() {
        let t0 = Instant::now();
        let mut dash = dashboard(t0);
        let mut host = MockHost::new();
        host.set_state("light.desk", "off");

        assert!(!dash.tap(&mut host, Point::new(20, 20)), "Gauge ignores taps");
        assert!(dash.tap(&mut host, Point::new(150, 50)));
        assert_eq!(host.calls.len(), 1);
        assert!(!dash.tap(&mut host, Point::new(1, 1)), "Gap belongs to no card");
    }
}
