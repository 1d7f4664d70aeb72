use std::collections::HashMap;

use climate_card::{
    EntityState, FanMode, HvacMode, Service, ServiceCall, ServiceCaller, StateSource,
};
use tracing::{info, warn};

pub const SAMPLE_ENTITY: &str = "climate.living_room";
pub const SAMPLE_SENSOR: &str = "sensor.house_temperature";

/// In-memory host that applies service calls to its own state table.
#[derive(Debug, Default)]
pub struct SimulatedHost {
    states: HashMap<String, EntityState>,
    /// Mode restored by `turn_on`, per entity.
    resume_modes: HashMap<String, HvacMode>,
    /// Readings hidden while a sensor is forced unavailable.
    hidden_readings: HashMap<String, String>,
}

impl SimulatedHost {
    pub fn new(states: HashMap<String, EntityState>) -> Self {
        Self {
            states,
            ..Self::default()
        }
    }

    pub fn sample() -> Self {
        let mut states = HashMap::new();
        states.insert(
            SAMPLE_ENTITY.to_string(),
            EntityState::new("heat")
                .with_attribute("hvac_action", "heating")
                .with_attribute("fan_mode", "low")
                .with_attribute("temperature", 70)
                .with_attribute("friendly_name", "Living Room"),
        );
        states.insert(SAMPLE_SENSOR.to_string(), EntityState::new("68.4"));
        Self::new(states)
    }

    pub fn cycle_fan(&mut self, entity_id: &str) {
        if let Some(entity) = self.states.get_mut(entity_id) {
            let fan = entity
                .str_attribute("fan_mode")
                .map(FanMode::from)
                .unwrap_or_default()
                .next();
            entity
                .attributes
                .insert("fan_mode".to_string(), fan.as_str().into());
        }
    }

    /// Flips a sensor between its reading and `unavailable`.
    pub fn toggle_sensor(&mut self, sensor_id: &str) {
        let Some(sensor) = self.states.get_mut(sensor_id) else {
            return;
        };
        match self.hidden_readings.remove(sensor_id) {
            Some(reading) => sensor.state = reading,
            None => {
                let reading = std::mem::replace(&mut sensor.state, "unavailable".to_string());
                self.hidden_readings.insert(sensor_id.to_string(), reading);
            }
        }
    }

    fn apply_mode(&mut self, entity_id: &str, mode: HvacMode) {
        let Some(entity) = self.states.get_mut(entity_id) else {
            warn!("Service call for unknown entity {entity_id}");
            return;
        };
        let action = match mode {
            HvacMode::Off => "off",
            HvacMode::Heat => "heating",
            HvacMode::Cool => "cooling",
            HvacMode::FanOnly | HvacMode::Auto | HvacMode::Other(_) => "idle",
        };
        let resume = match mode {
            HvacMode::Off => HvacMode::from(entity.state.as_str()),
            ref mode => mode.clone(),
        };
        if resume != HvacMode::Off {
            self.resume_modes.insert(entity_id.to_string(), resume);
        }
        entity.state = mode.as_str().to_string();
        entity
            .attributes
            .insert("hvac_action".to_string(), action.into());
    }
}

impl StateSource for SimulatedHost {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.states.get(entity_id)
    }
}

impl ServiceCaller for SimulatedHost {
    fn call_service(&mut self, call: ServiceCall) {
        info!("Host received {call:?}");
        let entity_id = call.service_data.entity_id;
        match call.service {
            Service::SetHvacMode => {
                if let Some(mode) = call.service_data.hvac_mode {
                    self.apply_mode(&entity_id, mode);
                }
            }
            Service::TurnOff => self.apply_mode(&entity_id, HvacMode::Off),
            Service::TurnOn => {
                let mode = self
                    .resume_modes
                    .get(&entity_id)
                    .cloned()
                    .unwrap_or(HvacMode::Auto);
                self.apply_mode(&entity_id, mode);
            }
        }
    }
}
