//! Card lifecycle: configure, bind to a state source, then push and press.

use serde_json::Value;
use tracing::{debug, warn};

use crate::command::{Command, Interaction, dispatch_to};
use crate::config::WidgetConfig;
use crate::error::CardError;
use crate::extract::extract_from;
use crate::host::{EntityState, ServiceCaller, StateSource};
use crate::render::{Node, render};
use crate::view::{ViewModel, map_to_view};

pub const CARD_TYPE: &str = "climate-control-card";

/// Height hint for the host's layout, in rows.
pub const CARD_SIZE: u32 = 3;

const STUB_ENTITY: &str = "climate.thermostat";

/// Entry point of the lifecycle.
pub struct ClimateCard;

impl ClimateCard {
    pub fn configure(config: WidgetConfig) -> ConfiguredCard {
        debug!("Configuring {} for {}", CARD_TYPE, config.entity);
        ConfiguredCard { config }
    }

    /// Validates a raw host configuration and configures a card from it.
    pub fn from_value(value: Value) -> Result<ConfiguredCard, CardError> {
        WidgetConfig::from_value(value).map(Self::configure)
    }

    /// Configuration offered by the host's card picker.
    pub fn stub_config() -> WidgetConfig {
        WidgetConfig {
            entity: STUB_ENTITY.to_string(),
            house_temp_sensor: None,
            display_mode_icons: true,
            name: None,
        }
    }
}

/// A card with a validated configuration that has not seen any state yet.
#[derive(Debug, Clone)]
pub struct ConfiguredCard {
    config: WidgetConfig,
}

impl ConfiguredCard {
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn card_size(&self) -> u32 {
        CARD_SIZE
    }

    /// Binds the card to the host's state and performs the first push.
    pub fn bind(self, source: &impl StateSource) -> RenderableCard {
        let mut card = RenderableCard {
            config: self.config,
            last_snapshot: None,
            rendered: None,
        };
        card.push(source);
        card
    }
}

/// Output of the last successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCard {
    pub view: ViewModel,
    pub tree: Node,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Rendered,
    /// The tracked entity was missing; the previous output is kept.
    Skipped,
}

#[derive(Debug, Clone)]
pub struct RenderableCard {
    config: WidgetConfig,
    last_snapshot: Option<EntityState>,
    rendered: Option<RenderedCard>,
}

impl RenderableCard {
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn rendered(&self) -> Option<&RenderedCard> {
        self.rendered.as_ref()
    }

    pub fn last_snapshot(&self) -> Option<&EntityState> {
        self.last_snapshot.as_ref()
    }

    /// Handles a state push from the host, rebuilding the whole output.
    pub fn push(&mut self, source: &impl StateSource) -> PushOutcome {
        let Some(state) = extract_from(source, &self.config) else {
            if self.last_snapshot.is_some() {
                warn!(
                    "Entity {} disappeared from the state table, keeping last render",
                    self.config.entity
                );
            } else {
                warn!("Entity {} not found, skipping render", self.config.entity);
            }
            return PushOutcome::Skipped;
        };
        self.last_snapshot = source.entity(&self.config.entity).cloned();

        let view = map_to_view(&state, &self.config);
        let tree = render(&view);
        debug!(
            "Rendered {} in mode {} ({})",
            self.config.entity, state.mode, view.action_label
        );
        self.rendered = Some(RenderedCard { view, tree });
        PushOutcome::Rendered
    }

    /// Dispatches `interaction` against the last rendered view.
    pub fn press(
        &self,
        interaction: Interaction,
        caller: &mut impl ServiceCaller,
    ) -> Option<Command> {
        let Some(rendered) = &self.rendered else {
            warn!(
                "Ignoring {:?} on {}: nothing rendered yet",
                interaction, self.config.entity
            );
            return None;
        };
        Some(dispatch_to(
            &self.config.entity,
            &rendered.view,
            interaction,
            caller,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::HvacMode;
    use crate::host::{Service, ServiceCall};
    use serde_json::json;
    use std::collections::HashMap;

    const ENTITY: &str = "climate.hallway";

    fn states(mode: &str) -> HashMap<String, EntityState> {
        let mut states = HashMap::new();
        states.insert(
            ENTITY.to_string(),
            EntityState::new(mode)
                .with_attribute("hvac_action", "idle")
                .with_attribute("temperature", 70),
        );
        states
    }

    fn card() -> ConfiguredCard {
        ClimateCard::configure(WidgetConfig::builder().entity(ENTITY).build().unwrap())
    }

    #[test]
    fn configure_from_host_value() {
        let card = ClimateCard::from_value(json!({ "entity": ENTITY })).unwrap();
        assert_eq!(card.config().entity, ENTITY);
        assert_eq!(card.card_size(), CARD_SIZE);

        let err = ClimateCard::from_value(json!({})).unwrap_err();
        assert!(matches!(err, CardError::MissingEntity));
    }

    #[test]
    fn bind_renders_immediately() {
        let card = card().bind(&states("cool"));
        let rendered = card.rendered().unwrap();
        assert_eq!(
            rendered.view.active_mode().map(|b| b.mode.clone()),
            Some(HvacMode::Cool)
        );
        assert_eq!(card.last_snapshot().map(|s| s.state.as_str()), Some("cool"));
    }

    #[test]
    fn bind_without_entity_renders_nothing() {
        let empty: HashMap<String, EntityState> = HashMap::new();
        let card = card().bind(&empty);
        assert!(card.rendered().is_none());
        let mut calls: Vec<ServiceCall> = Vec::new();
        assert!(card.press(Interaction::TogglePower, &mut calls).is_none());
        assert!(calls.is_empty());
    }

    #[test]
    fn missing_entity_keeps_previous_output() {
        let mut card = card().bind(&states("heat"));
        let before = card.rendered().cloned();

        let empty: HashMap<String, EntityState> = HashMap::new();
        assert_eq!(card.push(&empty), PushOutcome::Skipped);
        assert_eq!(card.rendered().cloned(), before);
        assert!(card.rendered().is_some());
    }

    #[test]
    fn push_rebuilds_from_scratch() {
        let mut card = card().bind(&states("heat"));
        assert_eq!(card.push(&states("off")), PushOutcome::Rendered);
        let view = &card.rendered().unwrap().view;
        assert!(!view.power.on);
        assert_eq!(view.power.label, "Turn On");

        let mut again = ClimateCard::configure(card.config().clone()).bind(&states("off"));
        assert_eq!(again.push(&states("off")), PushOutcome::Rendered);
        assert_eq!(again.rendered(), card.rendered());
    }

    #[test]
    fn press_dispatches_one_command() {
        let card = card().bind(&states("heat"));
        let mut calls: Vec<ServiceCall> = Vec::new();

        let command = card
            .press(Interaction::SelectMode(HvacMode::Heat), &mut calls)
            .unwrap();
        assert_eq!(command.entity_id(), ENTITY);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].service, Service::SetHvacMode);
        assert_eq!(calls[0].service_data.hvac_mode, Some(HvacMode::Heat));

        card.press(Interaction::TogglePower, &mut calls);
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].service, Service::TurnOff);
    }

    #[test]
    fn stale_view_decides_power_toggle() {
        let card = card().bind(&states("off"));
        // device switched on elsewhere, no push yet
        let mut calls: Vec<ServiceCall> = Vec::new();
        card.press(Interaction::TogglePower, &mut calls);
        assert_eq!(calls[0].service, Service::TurnOn);
    }

    #[test]
    fn stub_config_is_valid() {
        let stub = ClimateCard::stub_config();
        let value = serde_json::to_value(&stub).unwrap();
        let card = ClimateCard::from_value(value).unwrap();
        assert_eq!(card.config(), &stub);
    }
}
