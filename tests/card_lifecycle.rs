//! End-to-end card behaviour through the public API: host updates, frame
//! ticks, taps, and resizes on a whole dashboard.

use std::time::{Duration, Instant};

use dashboard_widgets::config::{DashboardConfig, GaugeCardConfig};
use dashboard_widgets::dashboard::Dashboard;
use dashboard_widgets::host::{EntityState, MockHost};
use dashboard_widgets::widgets::{AnyCard, Card, ClockAnchor, GaugeCard};
use dashboard_widgets_common::clock::ClockTime;
use embedded_graphics::mock_display::MockDisplay;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;

const MS: Duration = Duration::from_millis(1);

const DASHBOARD: &str = r#"
    columns = 2

    [[card]]
    type = "gauge"
    entity = "sensor.temp"
    min = 0
    max = 100

    [[card]]
    type = "digital-clock"
    show_seconds = true

    [[card]]
    type = "button"
    entity = "light.desk"
"#;

fn gauge() -> GaugeCard {
    GaugeCard::new(&GaugeCardConfig {
        entity: "sensor.temp".into(),
        ..GaugeCardConfig::default()
    })
}

#[test]
fn test_needle_resumes_from_last_good_after_outage() {
    let t0 = Instant::now();
    let mut host = MockHost::new();
    let mut card = gauge();

    host.set_state("sensor.temp", "42");
    card.set_hass(&host, t0);
    card.tick(t0);
    let held = card.needle_angle().expect("needle shown");

    host.set_state("sensor.temp", "unavailable");
    card.set_hass(&host, t0 + 100 * MS);
    card.tick(t0 + 1500 * MS);
    assert!(card.lifecycle().shows_placeholder());
    assert_eq!(card.needle_angle(), Some(held), "Needle frozen during the outage");

    card.tick(t0 + 2000 * MS);
    host.set_state("sensor.temp", "45");
    card.set_hass(&host, t0 + 2000 * MS);
    assert_eq!(card.needle_angle(), Some(held), "Transition starts from the held angle");

    card.tick(t0 + 2200 * MS);
    let moving = card.needle_angle().unwrap();
    let target = card.target_angle().unwrap();
    let (lo, hi) = if held < target { (held, target) } else { (target, held) };
    assert!(moving > lo && moving < hi, "Needle between {held} and {target}: {moving}");

    card.tick(t0 + 3000 * MS);
    assert_eq!(card.needle_angle(), Some(target));
    assert!(!card.lifecycle().shows_placeholder());
}

#[test]
fn test_odometer_counts_up_digit_by_digit() {
    let t0 = Instant::now();
    let mut host = MockHost::new();
    let mut card = gauge();

    host.set_state("sensor.temp", "68");
    card.set_hass(&host, t0);
    host.set_state("sensor.temp", "71");
    card.set_hass(&host, t0);

    let mut seen = Vec::new();
    for ms in (0..=1000).step_by(20) {
        card.tick(t0 + ms * MS);
        let readout = card.odometer().readout().unwrap_or_default().trim().to_owned();
        if seen.last() != Some(&readout) {
            seen.push(readout);
        }
    }
    assert_eq!(seen, vec!["068", "069", "070", "071"]);
}

#[test]
fn test_dashboard_end_to_end() {
    let t0 = Instant::now();
    let config = DashboardConfig::from_toml(DASHBOARD).expect("valid dashboard");
    let anchor = ClockAnchor::new(
        ClockTime {
            hour: 12,
            minute: 0,
            second: 0,
        },
        t0,
    );
    let mut dash = Dashboard::with_anchor(&config, Size::new(200, 200), anchor, t0);

    let mut host = MockHost::new();
    host.set_state("sensor.temp", "50");
    host.set_entity("light.desk", EntityState::new("off"));
    dash.set_hass(&host, t0);

    dash.frame(t0 + 1000 * MS);
    let AnyCard::DigitalClock(clock) = &dash.cards()[1] else {
        panic!("Second card should be the digital clock");
    };
    assert_eq!(clock.readout(), "12:00:01");

    // Third card sits in the second row, first column
    let button_cell = dash.layout().cells()[2];
    assert!(dash.tap(&mut host, button_cell.center()));
    dash.set_hass(&host, t0 + 1100 * MS);
    let AnyCard::Button(button) = &dash.cards()[2] else {
        panic!("Third card should be the button");
    };
    assert!(button.is_on(), "Toggle reached the host and came back");

    let mut display: MockDisplay<Rgb565> = MockDisplay::new();
    display.set_allow_overdraw(true);
    display.set_allow_out_of_bounds_drawing(true);
    dash.draw(&mut display);
}

#[test]
fn test_resize_burst_lays_out_once() {
    let t0 = Instant::now();
    let config = DashboardConfig::from_toml(DASHBOARD).expect("valid dashboard");
    let anchor = ClockAnchor::new(ClockTime::default(), t0);
    let mut dash = Dashboard::with_anchor(&config, Size::new(300, 200), anchor, t0);

    for step in 0..10u32 {
        dash.resize(Size::new(300 - step * 10, 200), t0 + step * 20 * MS);
        dash.frame(t0 + step * 20 * MS);
    }
    assert_eq!(dash.layout().size(), Size::new(300, 200), "Nothing laid out mid-burst");

    dash.frame(t0 + 180 * MS + 150 * MS);
    assert_eq!(dash.layout().size(), Size::new(210, 200));
}
