//! Dashboard configuration loaded from TOML.
//!
//! ```toml
//! columns = 3
//!
//! [[card]]
//! type = "gauge"
//! entity = "sensor.outdoor_temperature"
//! min = -40
//! max = 120
//! ```
//!
//! Field-level problems inside a gauge (bad bounds, angles, decimals) are not
//! errors here: they are corrected by
//! [`GaugeConfig::validated`](dashboard_widgets_common::config::GaugeConfig::validated)
//! with a one-time warning. Only an unreadable or malformed file, an empty
//! dashboard, or a service name that cannot be dispatched is a [`ConfigError`].

use std::path::{Path, PathBuf};

use dashboard_widgets_common::config::RawGaugeConfig;
use dashboard_widgets_common::peak::{DEFAULT_HOLD_MS, PeakMode};
use serde::Deserialize;

/// Default number of grid columns.
pub const DEFAULT_COLUMNS: u32 = 3;

/// Default thermostat setpoint step.
pub const DEFAULT_SETPOINT_STEP: f32 = 0.5;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dashboard config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("dashboard has no cards")]
    NoCards,
    #[error("card {index}: service `{service}` is not of the form domain.service")]
    InvalidService { index: usize, service: String },
}

// =============================================================================
// Dashboard
// =============================================================================

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_columns")]
    pub columns: u32,
    /// Offset from UTC for clock cards, in minutes.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(rename = "card", default)]
    pub cards: Vec<CardConfig>,
}

fn default_columns() -> u32 { DEFAULT_COLUMNS }

impl DashboardConfig {
    /// Parse and check a dashboard from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse a dashboard file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        log::info!("loaded {} cards from {}", config.cards.len(), path.display());
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.cards.is_empty() {
            return Err(ConfigError::NoCards);
        }
        for (index, card) in self.cards.iter().enumerate() {
            if let CardConfig::Button(button) = card
                && let TapAction::CallService { service, .. } = &button.tap_action
                && split_service(service).is_none()
            {
                return Err(ConfigError::InvalidService {
                    index,
                    service: service.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Split `domain.service` into its parts.
pub fn split_service(service: &str) -> Option<(&str, &str)> {
    let (domain, name) = service.split_once('.')?;
    (!domain.is_empty() && !name.is_empty()).then_some((domain, name))
}

// =============================================================================
// Cards
// =============================================================================

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CardConfig {
    Gauge(GaugeCardConfig),
    Thermostat(ThermostatCardConfig),
    AnalogClock(AnalogClockCardConfig),
    DigitalClock(DigitalClockCardConfig),
    Entities(EntitiesCardConfig),
    Button(ButtonCardConfig),
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct GaugeCardConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
    #[serde(default)]
    pub start_angle: Option<f32>,
    #[serde(default)]
    pub end_angle: Option<f32>,
    #[serde(default)]
    pub decimals: Option<i32>,
    /// Seconds.
    #[serde(default)]
    pub animation_duration: Option<f32>,
    #[serde(default)]
    pub peak: Option<PeakConfig>,
}

impl GaugeCardConfig {
    /// Gauge fields still to be validated.
    pub fn raw(&self) -> RawGaugeConfig {
        RawGaugeConfig {
            min: self.min,
            max: self.max,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
            decimals: self.decimals,
            animation_duration_s: self.animation_duration,
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct PeakConfig {
    #[serde(default)]
    pub mode: PeakModeConfig,
    #[serde(default = "default_hold_ms")]
    pub hold_ms: u32,
}

fn default_hold_ms() -> u32 { DEFAULT_HOLD_MS }

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PeakModeConfig {
    #[default]
    Max,
    Min,
}

impl From<PeakModeConfig> for PeakMode {
    fn from(mode: PeakModeConfig) -> Self {
        match mode {
            PeakModeConfig::Max => Self::Max,
            PeakModeConfig::Min => Self::Min,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct ThermostatCardConfig {
    pub entity: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub min: Option<f32>,
    #[serde(default)]
    pub max: Option<f32>,
    #[serde(default)]
    pub decimals: Option<i32>,
    #[serde(default)]
    pub step: Option<f32>,
    #[serde(default)]
    pub animation_duration: Option<f32>,
}

/// Thermostat column bounds when none are configured.
pub const THERMOSTAT_MIN: f32 = 5.0;
pub const THERMOSTAT_MAX: f32 = 35.0;

impl ThermostatCardConfig {
    /// Column fields still to be validated. Bounds and decimals default to a
    /// room-temperature scale rather than the gauge's 0..100.
    pub fn raw(&self) -> RawGaugeConfig {
        RawGaugeConfig {
            min: Some(self.min.unwrap_or(THERMOSTAT_MIN)),
            max: Some(self.max.unwrap_or(THERMOSTAT_MAX)),
            decimals: Some(self.decimals.unwrap_or(1)),
            animation_duration_s: self.animation_duration,
            ..RawGaugeConfig::default()
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct AnalogClockCardConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DigitalClockCardConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hour12: bool,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
}

fn default_true() -> bool { true }

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct EntitiesCardConfig {
    #[serde(default)]
    pub title: Option<String>,
    pub entities: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ButtonCardConfig {
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tap_action: TapAction,
}

/// What a tap on a button does.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum TapAction {
    /// Toggle the button's entity.
    #[default]
    Toggle,
    /// Call `domain.service`, targeting `entity` or the button's entity.
    CallService {
        service: String,
        #[serde(default)]
        entity: Option<String>,
    },
    Navigate { path: String },
    /// Ask the host to open the entity's detail dialog.
    MoreInfo,
    None,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_card_types() {
        let config = DashboardConfig::from_toml(
            r#"
            columns = 2
            utc_offset_minutes = 60

            [[card]]
            type = "gauge"
            entity = "sensor.temp"
            min = -40
            max = 120
            decimals = 1
            peak = { mode = "min", hold_ms = 500 }

            [[card]]
            type = "thermostat"
            entity = "climate.hall"
            step = 1.0

            [[card]]
            type = "analog-clock"

            [[card]]
            type = "digital-clock"
            hour12 = true

            [[card]]
            type = "entities"
            entities = ["sensor.a", "sensor.b"]

            [[card]]
            type = "button"
            entity = "light.desk"
            tap_action = { action = "navigate", path = "/lights" }
            "#,
        )
        .unwrap();

        assert_eq!(config.columns, 2);
        assert_eq!(config.utc_offset_minutes, 60);
        assert_eq!(config.cards.len(), 6);

        let CardConfig::Gauge(gauge) = &config.cards[0] else {
            panic!("First card should be a gauge");
        };
        assert_eq!(gauge.raw().min, Some(-40.0));
        assert_eq!(gauge.raw().decimals, Some(1));
        assert_eq!(
            gauge.peak,
            Some(PeakConfig {
                mode: PeakModeConfig::Min,
                hold_ms: 500
            })
        );

        let CardConfig::AnalogClock(clock) = &config.cards[2] else {
            panic!("Third card should be an analog clock");
        };
        assert!(clock.show_seconds, "Seconds shown by default");

        let CardConfig::Button(button) = &config.cards[5] else {
            panic!("Last card should be a button");
        };
        assert_eq!(button.tap_action, TapAction::Navigate { path: "/lights".into() });
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [[card]]
            type = "button"
            entity = "switch.fan"
            "#,
        )
        .unwrap();
        assert_eq!(config.columns, DEFAULT_COLUMNS);
        assert_eq!(config.title, None);
        let CardConfig::Button(button) = &config.cards[0] else {
            panic!("Expected a button");
        };
        assert_eq!(button.tap_action, TapAction::Toggle);
    }

    #[test]
    fn test_empty_dashboard_is_error() {
        assert!(matches!(DashboardConfig::from_toml("columns = 2"), Err(ConfigError::NoCards)));
    }

    #[test]
    fn test_unknown_card_type_is_parse_error() {
        let result = DashboardConfig::from_toml(
            r#"
            [[card]]
            type = "radar"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_service_rejected() {
        let result = DashboardConfig::from_toml(
            r#"
            [[card]]
            type = "button"
            tap_action = { action = "call-service", service = "toggle" }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidService { index: 0, .. })));
    }

    #[test]
    fn test_out_of_range_gauge_fields_still_parse() {
        // Corrected later by GaugeConfig::validated, not rejected here
        let config = DashboardConfig::from_toml(
            r#"
            [[card]]
            type = "gauge"
            entity = "sensor.x"
            min = 10
            max = 5
            decimals = 40
            "#,
        )
        .unwrap();
        let CardConfig::Gauge(gauge) = &config.cards[0] else {
            panic!("Expected a gauge");
        };
        assert_eq!(gauge.raw().decimals, Some(40));
    }

    #[test]
    fn test_split_service() {
        assert_eq!(split_service("light.turn_on"), Some(("light", "turn_on")));
        assert_eq!(split_service("light."), None);
        assert_eq!(split_service("toggle"), None);
    }

    #[test]
    fn test_load_missing_file() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
