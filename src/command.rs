//! Translation of user interactions into device commands.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::climate::HvacMode;
use crate::host::{CLIMATE_DOMAIN, Service, ServiceCall, ServiceCaller, ServiceData};
use crate::view::ViewModel;

/// A discrete user action on a rendered control.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "mode", rename_all = "snake_case")]
pub enum Interaction {
    SelectMode(HvacMode),
    TogglePower,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    SetHvacMode { entity_id: String, hvac_mode: HvacMode },
    TurnOn { entity_id: String },
    TurnOff { entity_id: String },
}

impl Command {
    pub fn entity_id(&self) -> &str {
        match self {
            Command::SetHvacMode { entity_id, .. }
            | Command::TurnOn { entity_id }
            | Command::TurnOff { entity_id } => entity_id,
        }
    }

    pub fn to_service_call(&self) -> ServiceCall {
        let (service, hvac_mode) = match self {
            Command::SetHvacMode { hvac_mode, .. } => {
                (Service::SetHvacMode, Some(hvac_mode.clone()))
            }
            Command::TurnOn { .. } => (Service::TurnOn, None),
            Command::TurnOff { .. } => (Service::TurnOff, None),
        };
        ServiceCall {
            domain: CLIMATE_DOMAIN.to_string(),
            service,
            service_data: ServiceData {
                entity_id: self.entity_id().to_string(),
                hvac_mode,
            },
        }
    }
}

/// Resolves an interaction against the view it was made on.
///
/// The power decision reads `view.power`, so a view that is stale relative to
/// the device still decides the direction of the toggle.
pub fn dispatch(entity_id: &str, view: &ViewModel, interaction: Interaction) -> Command {
    let entity_id = entity_id.to_string();
    match interaction {
        Interaction::SelectMode(hvac_mode) => Command::SetHvacMode {
            entity_id,
            hvac_mode,
        },
        Interaction::TogglePower if view.power.on => Command::TurnOff { entity_id },
        Interaction::TogglePower => Command::TurnOn { entity_id },
    }
}

/// Builds the command for `interaction` and hands it to the host.
pub fn dispatch_to(
    entity_id: &str,
    view: &ViewModel,
    interaction: Interaction,
    caller: &mut impl ServiceCaller,
) -> Command {
    let command = dispatch(entity_id, view, interaction);
    let call = command.to_service_call();
    info!(
        "Calling {}.{:?} for {}",
        call.domain,
        call.service,
        command.entity_id()
    );
    caller.call_service(call);
    command
}
