use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CardError;

/// Card configuration, fixed for the lifetime of a card instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Builder)]
#[builder(build_fn(validate = "Self::validate", error = "CardError"))]
pub struct WidgetConfig {
    /// Climate entity to track, e.g. `climate.hallway`.
    #[builder(setter(into))]
    pub entity: String,
    /// Optional sensor entity providing the house temperature.
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_temp_sensor: Option<String>,
    /// Mode buttons show icon and label when set, label only otherwise.
    #[builder(default = "true")]
    pub display_mode_icons: bool,
    /// Title override; falls back to the entity's friendly name.
    #[builder(setter(into, strip_option), default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl WidgetConfig {
    pub fn builder() -> WidgetConfigBuilder {
        WidgetConfigBuilder::default()
    }

    /// Validates a raw host configuration object.
    pub fn from_value(value: Value) -> Result<Self, CardError> {
        let raw: RawWidgetConfig =
            serde_json::from_value(value).map_err(|e| CardError::InvalidConfig(e.to_string()))?;

        let mut builder = WidgetConfig::builder();
        if let Some(entity) = raw.entity {
            builder.entity(entity);
        }
        if let Some(sensor) = raw.house_temp_sensor.filter(|s| !s.trim().is_empty()) {
            builder.house_temp_sensor(sensor);
        }
        if let Some(icons) = raw.display_mode_icons {
            builder.display_mode_icons(icons);
        }
        if let Some(name) = raw.name {
            builder.name(name);
        }
        builder.build()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CardError> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_value(value)
    }
}

impl WidgetConfigBuilder {
    fn validate(&self) -> Result<(), CardError> {
        match &self.entity {
            Some(entity) if entity.trim().is_empty() => Err(CardError::MissingEntity),
            _ => Ok(()),
        }
    }
}

/// Host configuration as written by the user. `type` is consumed by the host
/// and ignored here, as are any other unknown keys.
#[derive(Debug, Default, Deserialize)]
struct RawWidgetConfig {
    entity: Option<String>,
    house_temp_sensor: Option<String>,
    display_mode_icons: Option<bool>,
    name: Option<String>,
}
