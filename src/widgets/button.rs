//! Button card: a name, an optional entity whose on/off state tints the
//! button, and a configurable tap action.

use std::time::Instant;

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::Text;

use crate::colors::{GRAY, GREEN};
use crate::config::{ButtonCardConfig, TapAction, split_service};
use crate::host::{Host, MORE_INFO_EVENT, ServiceCall};
use crate::styles::{MIDDLE_CENTERED, TITLE_STYLE_WHITE};
use crate::widgets::Card;
use crate::widgets::primitives::draw_card_background;

const BUTTON_INSET: u32 = 8;
const CORNER: Size = Size::new(6, 6);

pub struct ButtonCard {
    entity: Option<String>,
    name: String,
    action: TapAction,
    on: bool,
}

impl ButtonCard {
    pub fn new(card: &ButtonCardConfig) -> Self {
        let name = card
            .name
            .clone()
            .or_else(|| card.entity.clone())
            .unwrap_or_default();
        Self {
            entity: card.entity.clone(),
            name,
            action: card.tap_action.clone(),
            on: false,
        }
    }

    /// Whether the button's entity currently reads as on.
    #[inline]
    pub const fn is_on(&self) -> bool { self.on }

    /// Run the configured action. Returns `false` when there was nothing to do.
    fn run(
        &self,
        host: &mut dyn Host,
    ) -> bool {
        match &self.action {
            TapAction::Toggle => {
                let Some(entity) = &self.entity else {
                    log::warn!("{}: toggle needs an entity", self.name);
                    return false;
                };
                host.call_service(ServiceCall::new("homeassistant", "toggle").with("entity_id", entity.as_str()));
            }
            TapAction::CallService { service, entity } => {
                let Some((domain, service)) = split_service(service) else {
                    log::warn!("{}: invalid service {service:?}", self.name);
                    return false;
                };
                let mut call = ServiceCall::new(domain, service);
                if let Some(target) = entity.as_ref().or(self.entity.as_ref()) {
                    call = call.with("entity_id", target.as_str());
                }
                host.call_service(call);
            }
            TapAction::Navigate { path } => host.navigate(path),
            TapAction::MoreInfo => {
                let Some(entity) = &self.entity else {
                    return false;
                };
                host.fire_event(MORE_INFO_EVENT, entity);
            }
            TapAction::None => return false,
        }
        true
    }
}

impl Card for ButtonCard {
    fn set_hass(
        &mut self,
        host: &dyn Host,
        _now: Instant,
    ) {
        if let Some(entity) = &self.entity {
            self.on = host.entity(entity).is_some_and(|e| e.is_on());
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
        _point: Point,
        _area: Rectangle,
    ) -> bool {
        self.run(host)
    }

    fn draw<D>(
        &self,
        display: &mut D,
        area: Rectangle,
    ) where
        D: DrawTarget<Color = Rgb565>,
    {
        draw_card_background(display, area);

        let face = area.offset(-(BUTTON_INSET as i32));
        let fill = if self.on { GREEN } else { GRAY };
        RoundedRectangle::with_equal_corners(face, CORNER)
            .into_styled(PrimitiveStyle::with_fill(fill))
            .draw(display)
            .ok();
        Text::with_text_style(&self.name, area.center(), TITLE_STYLE_WHITE, MIDDLE_CENTERED)
            .draw(display)
            .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    fn tap(
        card: &mut ButtonCard,
        host: &mut MockHost,
    ) -> bool {
        card.tap(host, Point::zero(), Rectangle::zero())
    }

    fn button(
        entity: Option<&str>,
        action: TapAction,
    ) -> ButtonCard {
        ButtonCard::new(&ButtonCardConfig {
            entity: entity.map(str::to_owned),
            name: None,
            tap_action: action,
        })
    }

    #[test]
    fn test_toggle_calls_service_and_tracks_state() {
        let mut host = MockHost::new();
        host.set_state("light.desk", "off");
        let mut card = button(Some("light.desk"), TapAction::Toggle);
        card.set_hass(&host, Instant::now());
        assert!(!card.is_on());

        assert!(tap(&mut card, &mut host));
        let call = &host.calls[0];
        assert_eq!((call.domain.as_str(), call.service.as_str()), ("homeassistant", "toggle"));
        assert_eq!(call.entity_id(), Some("light.desk"));

        card.set_hass(&host, Instant::now());
        assert!(card.is_on(), "State comes back from the host");
    }

    #[test]
    fn test_call_service_targets_action_entity_first() {
        let mut host = MockHost::new();
        let mut card = button(
            Some("light.desk"),
            TapAction::CallService {
                service: "scene.turn_on".into(),
                entity: Some("scene.movie".into()),
            },
        );
        assert!(tap(&mut card, &mut host));
        let call = &host.calls[0];
        assert_eq!((call.domain.as_str(), call.service.as_str()), ("scene", "turn_on"));
        assert_eq!(call.entity_id(), Some("scene.movie"));
    }

    #[test]
    fn test_call_service_rejects_malformed_name() {
        let mut host = MockHost::new();
        let mut card = button(
            None,
            TapAction::CallService {
                service: "turn_on".into(),
                entity: None,
            },
        );
        assert!(!tap(&mut card, &mut host));
        assert!(host.calls.is_empty());
    }

    #[test]
    fn test_navigate_and_more_info() {
        let mut host = MockHost::new();
        let mut nav = button(None, TapAction::Navigate { path: "/lovelace/1".into() });
        assert!(tap(&mut nav, &mut host));
        assert_eq!(host.navigations, vec!["/lovelace/1".to_owned()]);

        let mut info = button(Some("sensor.t"), TapAction::MoreInfo);
        assert!(tap(&mut info, &mut host));
        assert_eq!(host.events, vec![(MORE_INFO_EVENT.to_owned(), "sensor.t".to_owned())]);
    }

    #[test]
    fn test_none_and_missing_entity_do_nothing() {
        let mut host = MockHost::new();
        assert!(!tap(&mut button(Some("light.x"), TapAction::None), &mut host));
        assert!(!tap(&mut button(None, TapAction::Toggle), &mut host));
        assert!(host.calls.is_empty());
    }
}
