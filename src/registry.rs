//! Explicit registration of card types with the host.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::info;

use crate::card::{CARD_TYPE, ClimateCard, ConfiguredCard};
use crate::error::CardError;

/// Prefix the host puts in front of custom card types in user configuration.
const CUSTOM_PREFIX: &str = "custom:";

#[derive(Debug, Clone)]
pub struct CardDescriptor {
    pub card_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    factory: fn(Value) -> Result<ConfiguredCard, CardError>,
}

#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: BTreeMap<&'static str, CardDescriptor>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: CardDescriptor) -> Result<(), CardError> {
        if self.cards.contains_key(descriptor.card_type) {
            return Err(CardError::AlreadyRegistered(
                descriptor.card_type.to_string(),
            ));
        }
        info!("Registered card type {}", descriptor.card_type);
        self.cards.insert(descriptor.card_type, descriptor);
        Ok(())
    }

    pub fn get(&self, card_type: &str) -> Option<&CardDescriptor> {
        let card_type = card_type.strip_prefix(CUSTOM_PREFIX).unwrap_or(card_type);
        self.cards.get(card_type)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &CardDescriptor> {
        self.cards.values()
    }

    /// Configures a new card of `card_type`; accepts the `custom:` form.
    pub fn create(&self, card_type: &str, config: Value) -> Result<ConfiguredCard, CardError> {
        let descriptor = self
            .get(card_type)
            .ok_or_else(|| CardError::UnknownCardType(card_type.to_string()))?;
        (descriptor.factory)(config)
    }
}

/// Registers every card this crate provides. Call once at startup.
pub fn register_cards(registry: &mut CardRegistry) -> Result<(), CardError> {
    registry.register(CardDescriptor {
        card_type: CARD_TYPE,
        name: "Climate Control Card",
        description: "Mode, fan and power controls for a single climate entity",
        factory: ClimateCard::from_value,
    })
}
