//! Normalization of raw host state into the values the view is built from.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::climate::{FanMode, HvacAction, HvacMode};
use crate::config::WidgetConfig;
use crate::host::{EntityState, StateSource};

const ATTR_ACTION: &str = "hvac_action";
const ATTR_FAN_MODE: &str = "fan_mode";
const ATTR_TEMPERATURE: &str = "temperature";
const ATTR_FRIENDLY_NAME: &str = "friendly_name";

/// States a sensor reports when it has no usable value.
const RESERVED_SENSOR_STATES: [&str; 2] = ["unavailable", "unknown"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Setpoint {
    Known(f64),
    Unknown,
}

impl Setpoint {
    fn from_attribute(value: Option<&Value>) -> Self {
        let parsed = match value {
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        match parsed {
            Some(value) if value.is_finite() => Setpoint::Known(value),
            _ => Setpoint::Unknown,
        }
    }
}

/// House temperature reading with its three validity states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AuxReading {
    Valid(String),
    Unavailable,
    Absent,
}

impl AuxReading {
    fn from_sensor(sensor: Option<&EntityState>) -> Self {
        let Some(sensor) = sensor else {
            return AuxReading::Absent;
        };
        let value = sensor.state.trim();
        if value.is_empty()
            || RESERVED_SENSOR_STATES
                .iter()
                .any(|reserved| value.eq_ignore_ascii_case(reserved))
        {
            AuxReading::Unavailable
        } else {
            AuxReading::Valid(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedState {
    pub title: String,
    pub mode: HvacMode,
    pub action: HvacAction,
    pub fan: FanMode,
    pub setpoint: Setpoint,
    pub house_temperature: AuxReading,
}

/// Normalizes a device record and the optional house sensor record.
///
/// `sensor` is ignored unless the configuration names a house sensor.
pub fn extract(
    device: &EntityState,
    sensor: Option<&EntityState>,
    config: &WidgetConfig,
) -> NormalizedState {
    let mode = if device.state.trim().is_empty() {
        HvacMode::Off
    } else {
        HvacMode::from(device.state.as_str())
    };
    let action = device
        .str_attribute(ATTR_ACTION)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(HvacAction::from)
        .unwrap_or_default();
    let fan = device
        .str_attribute(ATTR_FAN_MODE)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(FanMode::from)
        .unwrap_or_default();
    let setpoint = Setpoint::from_attribute(device.attribute(ATTR_TEMPERATURE));

    let house_temperature = match config.house_temp_sensor {
        Some(_) => AuxReading::from_sensor(sensor),
        None => AuxReading::Absent,
    };

    let title = config
        .name
        .clone()
        .or_else(|| device.str_attribute(ATTR_FRIENDLY_NAME).map(str::to_string))
        .unwrap_or_else(|| config.entity.clone());

    if !mode.is_known() {
        debug!("Entity {} reports unrecognized mode {}", config.entity, mode);
    }
    if setpoint == Setpoint::Unknown {
        debug!("Entity {} has no numeric setpoint", config.entity);
    }

    NormalizedState {
        title,
        mode,
        action,
        fan,
        setpoint,
        house_temperature,
    }
}

/// Looks up both entities in `source`. Returns `None` when the tracked entity
/// is missing from the state table.
pub fn extract_from(source: &impl StateSource, config: &WidgetConfig) -> Option<NormalizedState> {
    let device = source.entity(&config.entity)?;
    let sensor = config
        .house_temp_sensor
        .as_deref()
        .and_then(|id| source.entity(id));
    Some(extract(device, sensor, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(sensor: Option<&str>) -> WidgetConfig {
        let mut builder = WidgetConfig::builder();
        builder.entity("climate.hallway");
        if let Some(sensor) = sensor {
            builder.house_temp_sensor(sensor);
        }
        builder.build().unwrap()
    }

    #[test]
    fn defaults_for_empty_record() {
        let state = extract(&EntityState::default(), None, &config(None));
        assert_eq!(state.mode, HvacMode::Off);
        assert_eq!(state.action, HvacAction::Idle);
        assert_eq!(state.fan, FanMode::Off);
        assert_eq!(state.setpoint, Setpoint::Unknown);
        assert_eq!(state.house_temperature, AuxReading::Absent);
        assert_eq!(state.title, "climate.hallway");
    }

    #[test]
    fn full_record() {
        let device = EntityState::new("COOL")
            .with_attribute("hvac_action", "Cooling")
            .with_attribute("fan_mode", "high")
            .with_attribute("temperature", 72)
            .with_attribute("friendly_name", "Hallway");
        let state = extract(&device, None, &config(None));
        assert_eq!(state.mode, HvacMode::Cool);
        assert_eq!(state.action, HvacAction::Cooling);
        assert_eq!(state.fan, FanMode::High);
        assert_eq!(state.setpoint, Setpoint::Known(72.0));
        assert_eq!(state.title, "Hallway");
    }

    #[test]
    fn setpoint_parsing() {
        let numeric_string = EntityState::new("heat").with_attribute("temperature", " 68.5 ");
        assert_eq!(
            extract(&numeric_string, None, &config(None)).setpoint,
            Setpoint::Known(68.5)
        );

        let garbage = EntityState::new("heat").with_attribute("temperature", "warm");
        assert_eq!(
            extract(&garbage, None, &config(None)).setpoint,
            Setpoint::Unknown
        );

        let null = EntityState::new("heat").with_attribute("temperature", Value::Null);
        assert_eq!(
            extract(&null, None, &config(None)).setpoint,
            Setpoint::Unknown
        );
    }

    #[test]
    fn non_string_attributes_fall_back() {
        let device = EntityState::new("heat")
            .with_attribute("hvac_action", 3)
            .with_attribute("fan_mode", true);
        let state = extract(&device, None, &config(None));
        assert_eq!(state.action, HvacAction::Idle);
        assert_eq!(state.fan, FanMode::Off);
    }

    #[test]
    fn empty_action_and_fan_fall_back() {
        let device = EntityState::new("cool")
            .with_attribute("hvac_action", "")
            .with_attribute("fan_mode", "  ");
        let state = extract(&device, None, &config(None));
        assert_eq!(state.action, HvacAction::Idle);
        assert_eq!(state.fan, FanMode::Off);
    }

    #[test]
    fn sensor_ignored_without_configuration() {
        let sensor = EntityState::new("70.5");
        let state = extract(&EntityState::new("heat"), Some(&sensor), &config(None));
        assert_eq!(state.house_temperature, AuxReading::Absent);
    }

    #[test]
    fn sensor_readings() {
        let config = config(Some("sensor.house"));
        let device = EntityState::new("heat");

        let valid = EntityState::new("70.5");
        assert_eq!(
            extract(&device, Some(&valid), &config).house_temperature,
            AuxReading::Valid("70.5".to_string())
        );

        for reserved in ["unavailable", "unknown", "UNAVAILABLE", ""] {
            let sensor = EntityState::new(reserved);
            assert_eq!(
                extract(&device, Some(&sensor), &config).house_temperature,
                AuxReading::Unavailable
            );
        }

        assert_eq!(
            extract(&device, None, &config).house_temperature,
            AuxReading::Absent
        );
    }

    #[test]
    fn extract_from_missing_entity() {
        let source: HashMap<String, EntityState> = HashMap::new();
        assert!(extract_from(&source, &config(None)).is_none());
    }

    #[test]
    fn extract_from_resolves_sensor() {
        let mut source = HashMap::new();
        source.insert("climate.hallway".to_string(), EntityState::new("auto"));
        source.insert("sensor.house".to_string(), EntityState::new("69"));
        let state = extract_from(&source, &config(Some("sensor.house"))).unwrap();
        assert_eq!(state.mode, HvacMode::Auto);
        assert_eq!(state.house_temperature, AuxReading::Valid("69".to_string()));
    }

    #[test]
    fn config_name_wins_over_friendly_name() {
        let config = WidgetConfig::builder()
            .entity("climate.hallway")
            .name("Downstairs")
            .build()
            .unwrap();
        let device = EntityState::new("off").with_attribute("friendly_name", "Hallway");
        assert_eq!(extract(&device, None, &config).title, "Downstairs");
    }
}
