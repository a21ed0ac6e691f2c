// Crate-level lints: Allow common embedded/graphics patterns that pedantic lints flag
#![allow(clippy::cast_possible_truncation)] // Intentional f32->i32, u32->i32 casts for pixel math
#![allow(clippy::cast_precision_loss)] // u32/i32->f32 in graphics calculations
#![allow(clippy::cast_sign_loss)] // i32->u32 where we know sign is positive

//! Desktop preview of a dashboard.
//!
//! Loads a dashboard from the first argument, `./dashboard.toml`, or the
//! bundled demo, and drives it from a mock host that publishes simulated
//! sensor readings once a second. Every so often the outdoor sensor drops to
//! `unavailable` for a few seconds to exercise placeholders and recovery.
//!
//! # Controls
//!
//! | Input | Action |
//! |-------|--------|
//! | Click | Tap the card under the pointer |
//! | R     | Toggle between full and narrow layout (debounced resize) |
//! | Esc   | Quit |

use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use dashboard_widgets::config::{ConfigError, DashboardConfig};
use dashboard_widgets::dashboard::Dashboard;
use dashboard_widgets::host::{EntityState, MockHost};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, MouseButton};
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};

const SCREEN_WIDTH: u32 = 320;
const SCREEN_HEIGHT: u32 = 240;
const NARROW_WIDTH: u32 = 200;

/// Target frame time (~50 FPS).
const FRAME_TIME: Duration = Duration::from_millis(20);

/// How often the mock host publishes new readings.
const HOST_PERIOD: Duration = Duration::from_secs(1);

const DEMO_CONFIG: &str = include_str!("../demos/dashboard.toml");

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match load_config().or_else(|err| {
        log::error!("{err}, falling back to the bundled demo");
        DashboardConfig::from_toml(DEMO_CONFIG)
    }) {
        Ok(config) => config,
        Err(err) => {
            log::error!("bundled demo is invalid: {err}");
            std::process::exit(1);
        }
    };

    let mut display: SimulatorDisplay<Rgb565> = SimulatorDisplay::new(Size::new(SCREEN_WIDTH, SCREEN_HEIGHT));
    let output_settings = OutputSettingsBuilder::new().scale(2).build();
    let title = config.title.clone().unwrap_or_else(|| "Dashboard".to_owned());
    let mut window = Window::new(&title, &output_settings);

    let start = Instant::now();
    let mut dashboard = Dashboard::from_config(&config, display.size(), start);
    let mut host = MockHost::new();
    seed_host(&mut host);
    publish(&mut host, 0.0);
    dashboard.set_hass(&host, start);

    let mut last_publish = start;
    let mut narrow = false;

    loop {
        let frame_start = Instant::now();

        // ======================================================================
        // Input
        // ======================================================================

        let mut host_dirty = false;
        for event in window.events() {
            match event {
                SimulatorEvent::Quit
                | SimulatorEvent::KeyDown {
                    keycode: Keycode::Escape, ..
                } => return,
                SimulatorEvent::KeyDown {
                    keycode: Keycode::R,
                    repeat: false,
                    ..
                } => {
                    narrow = !narrow;
                    let width = if narrow { NARROW_WIDTH } else { SCREEN_WIDTH };
                    dashboard.resize(Size::new(width, SCREEN_HEIGHT), frame_start);
                }
                SimulatorEvent::MouseButtonUp {
                    mouse_btn: MouseButton::Left,
                    point,
                } => {
                    host_dirty |= dashboard.tap(&mut host, point);
                }
                _ => {}
            }
        }

        // ======================================================================
        // Host Updates
        // ======================================================================

        if frame_start.saturating_duration_since(last_publish) >= HOST_PERIOD {
            last_publish = frame_start;
            publish(&mut host, frame_start.duration_since(start).as_secs_f32());
            host_dirty = true;
        }
        if host_dirty {
            dashboard.set_hass(&host, frame_start);
        }

        // ======================================================================
        // Frame
        // ======================================================================

        dashboard.frame(frame_start);
        dashboard.draw(&mut display);
        window.update(&display);

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

/// Dashboard from the first argument, `./dashboard.toml`, or the demo.
fn load_config() -> Result<DashboardConfig, ConfigError> {
    if let Some(path) = std::env::args_os().nth(1) {
        return DashboardConfig::load(&PathBuf::from(path));
    }
    let local = Path::new("dashboard.toml");
    if local.exists() {
        return DashboardConfig::load(local);
    }
    log::info!("no dashboard.toml found, using the bundled demo");
    DashboardConfig::from_toml(DEMO_CONFIG)
}

/// Entities the demo dashboard binds to, with their static attributes.
fn seed_host(host: &mut MockHost) {
    host.set_entity(
        "sensor.outdoor_temperature",
        EntityState::new("0")
            .with_attribute("friendly_name", "Outdoor")
            .with_attribute("unit_of_measurement", "C"),
    );
    host.set_entity(
        "sensor.living_room_humidity",
        EntityState::new("0")
            .with_attribute("friendly_name", "Humidity")
            .with_attribute("unit_of_measurement", "%"),
    );
    host.set_entity(
        "sensor.power",
        EntityState::new("0")
            .with_attribute("friendly_name", "Power")
            .with_attribute("unit_of_measurement", "W"),
    );
    host.set_entity(
        "climate.hallway",
        EntityState::new("heat")
            .with_attribute("friendly_name", "Hallway")
            .with_attribute("temperature", 21.0)
            .with_attribute("unit_of_measurement", "C"),
    );
    host.set_entity("light.desk", EntityState::new("off").with_attribute("friendly_name", "Desk lamp"));
}

/// Publish simulated readings for time `t` in seconds.
fn publish(
    host: &mut MockHost,
    t: f32,
) {
    // Outdoor sensor drops out for 4s of every 30s
    if t % 30.0 >= 26.0 {
        host.set_state("sensor.outdoor_temperature", "unavailable");
    } else {
        let outdoor = fake_signal(t, -15.0, 35.0, 0.05);
        host.set_state("sensor.outdoor_temperature", format!("{outdoor:.1}"));
    }
    let humidity = fake_signal(t, 30.0, 70.0, 0.03);
    host.set_state("sensor.living_room_humidity", format!("{humidity:.0}"));
    let power = fake_signal(t, 80.0, 3200.0, 0.2);
    host.set_state("sensor.power", format!("{power:.0}"));

    let hallway = fake_signal(t, 17.0, 23.0, 0.02);
    if let Some(climate) = host.entity_mut("climate.hallway") {
        climate
            .attributes
            .insert("current_temperature".to_owned(), f64::from(hallway).into());
    }
}

/// Generate a sinusoidal signal oscillating between min and max values.
///
/// # Parameters
/// - `t`: Time in seconds
/// - `min`: Minimum output value
/// - `max`: Maximum output value
/// - `freq`: Oscillation frequency (higher = faster cycles)
fn fake_signal(
    t: f32,
    min: f32,
    max: f32,
    freq: f32,
) -> f32 {
    let normalized = (t * freq).sin().mul_add(0.5, 0.5);
    min + normalized * (max - min)
}
