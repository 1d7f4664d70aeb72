//! Boundary types shared with the dashboard host.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::climate::HvacMode;

pub const CLIMATE_DOMAIN: &str = "climate";

/// A single entity record as kept in the host's state table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    pub state: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute, ignoring values of any other JSON type.
    pub fn str_attribute(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

/// Lookup from entity id to the latest state record.
pub trait StateSource {
    fn entity(&self, entity_id: &str) -> Option<&EntityState>;
}

impl StateSource for HashMap<String, EntityState> {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.get(entity_id)
    }
}

impl StateSource for BTreeMap<String, EntityState> {
    fn entity(&self, entity_id: &str) -> Option<&EntityState> {
        self.get(entity_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    SetHvacMode,
    TurnOn,
    TurnOff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceData {
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hvac_mode: Option<HvacMode>,
}

/// An outbound `callService(domain, service, payload)` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: Service,
    pub service_data: ServiceData,
}

/// The host's command transport. Delivery is fire-and-forget from the card's
/// point of view.
pub trait ServiceCaller {
    fn call_service(&mut self, call: ServiceCall);
}

impl ServiceCaller for Vec<ServiceCall> {
    fn call_service(&mut self, call: ServiceCall) {
        self.push(call);
    }
}
